#[cfg(test)]
mod tests {
    use crate::cli::{BuildArgs, Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    fn build_args(argv: &[&str]) -> BuildArgs {
        let Command::Build(args) = Cli::try_parse_from(argv).unwrap().into_command();
        args
    }

    #[test]
    fn test_build_is_the_default_command() {
        let args = build_args(&["libuild"]);
        assert!(args.config.is_none());
        assert!(args.watch.is_none());
    }

    #[test]
    fn test_explicit_build_subcommand() {
        let args = build_args(&["libuild", "build", "-c", "custom.json"]);
        assert_eq!(args.config, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn test_bare_watch_flag_uses_src() {
        let args = build_args(&["libuild", "--watch"]);
        assert_eq!(args.watch, Some(PathBuf::from("./src/")));

        let args = build_args(&["libuild", "build", "-w"]);
        assert_eq!(args.watch, Some(PathBuf::from("./src/")));
    }

    #[test]
    fn test_watch_flag_with_path() {
        let args = build_args(&["libuild", "-w", "lib"]);
        assert_eq!(args.watch, Some(PathBuf::from("lib")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["libuild", "build", "--verbose", "--no-color"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["libuild", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["libuild", "serve"]).is_err());
    }
}
