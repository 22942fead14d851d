//! Configuration for libuild.
//!
//! Turns an optional, partial user configuration plus the project's
//! `package.json` into fully populated [`BuildConfig`] values.
//!
//! ```no_run
//! use libuild_config::{ConfigDiscovery, ProjectMetadata, find_project_root, resolve_all};
//!
//! let root = find_project_root(std::env::current_dir()?).unwrap();
//! let meta = ProjectMetadata::read(&root)?;
//! let user = ConfigDiscovery::new(&root).load_or_default(None)?;
//! let configs = resolve_all(user.as_ref(), &meta, &root)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod partial;
pub mod resolve;

pub use config::{
    BuildConfig, ExportsMode, ExternalPredicate, ModuleFormat, NodeResolveOptions,
    TypeScriptOptions,
};
pub use discovery::{CONFIG_FILE_NAMES, ConfigDiscovery, ConfigLoader, FsConfigLoader};
pub use error::{ConfigError, LoadError, Result};
pub use metadata::{ProjectMetadata, find_project_root};
pub use partial::{
    ConfigFn, ExternalKeyword, ExternalSpec, PartialConfig, TsSpec, UserConfig, WatchSpec,
};
pub use resolve::{defaults, resolve, resolve_all};
