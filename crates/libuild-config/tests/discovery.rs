//! Loading configuration files end to end.

use libuild_config::{
    ConfigDiscovery, ConfigError, ModuleFormat, ProjectMetadata, UserConfig, resolve_all,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project(package_json: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("package.json"), package_json).expect("write package.json");
    dir
}

fn load(root: &Path, explicit: Option<&Path>) -> libuild_config::Result<Option<UserConfig>> {
    ConfigDiscovery::new(root).load_or_default(explicit)
}

#[test]
fn json_config_is_loaded_and_resolved() {
    let dir = project(r#"{"name":"@acme/widget"}"#);
    fs::write(
        dir.path().join("libuild.config.json"),
        r#"{ "targets": ["esm", "umd"], "sourcemap": false, "banner": "/* acme */" }"#,
    )
    .unwrap();

    let meta = ProjectMetadata::read(dir.path()).unwrap();
    let user = load(dir.path(), None).unwrap();
    let configs = resolve_all(user.as_ref(), &meta, dir.path()).unwrap();

    assert_eq!(configs.len(), 1);
    let config = &configs[0];
    assert_eq!(config.library_name, "@acme/widget");
    assert_eq!(config.targets, vec![ModuleFormat::Esm, ModuleFormat::Umd]);
    assert!(!config.sourcemap);
    assert_eq!(config.banner.as_deref(), Some("/* acme */"));
}

#[test]
fn toml_config_is_loaded() {
    let dir = project(r#"{"name":"demo"}"#);
    fs::write(
        dir.path().join("libuild.config.toml"),
        r#"
outDir = "lib"
targets = ["cjs"]

[globals]
react = "React"
"#,
    )
    .unwrap();

    let meta = ProjectMetadata::read(dir.path()).unwrap();
    let user = load(dir.path(), None).unwrap();
    let config = resolve_all(user.as_ref(), &meta, dir.path())
        .unwrap()
        .remove(0);

    assert_eq!(config.out_dir, PathBuf::from("lib"));
    assert_eq!(config.targets, vec![ModuleFormat::Cjs]);
    assert_eq!(config.globals.get("react").map(String::as_str), Some("React"));
}

#[test]
fn list_config_yields_one_build_per_element() {
    let dir = project(r#"{"name":"demo"}"#);
    fs::write(
        dir.path().join("libuild.config.json"),
        r#"[{ "entry": "./src/a.js" }, { "entry": "./src/b.js", "targets": ["umd"] }]"#,
    )
    .unwrap();

    let meta = ProjectMetadata::read(dir.path()).unwrap();
    let user = load(dir.path(), None).unwrap();
    let configs = resolve_all(user.as_ref(), &meta, dir.path()).unwrap();

    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].entry, PathBuf::from("./src/a.js"));
    assert_eq!(configs[1].targets, vec![ModuleFormat::Umd]);
}

#[test]
fn explicit_path_is_relative_to_project_root() {
    let dir = project(r#"{"name":"demo"}"#);
    fs::create_dir_all(dir.path().join("config")).unwrap();
    fs::write(
        dir.path().join("config/release.json"),
        r#"{ "minify": true }"#,
    )
    .unwrap();

    let user = load(dir.path(), Some(Path::new("config/release.json"))).unwrap();
    assert!(matches!(user, Some(UserConfig::Object(p)) if p.minify == Some(true)));
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = project(r#"{"name":"demo"}"#);

    assert!(load(dir.path(), None).unwrap().is_none());
    assert!(
        load(dir.path(), Some(Path::new("nope.json")))
            .unwrap()
            .is_none()
    );
}

#[test]
fn scalar_config_is_invalid() {
    let dir = project(r#"{"name":"demo"}"#);
    fs::write(dir.path().join("libuild.config.json"), r#""esm""#).unwrap();

    let err = load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig(_)));
}

#[test]
fn syntax_errors_are_fatal() {
    let dir = project(r#"{"name":"demo"}"#);
    fs::write(dir.path().join("libuild.config.json"), "{ targets: ").unwrap();

    let err = load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
