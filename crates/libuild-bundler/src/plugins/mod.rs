//! Plugin pipeline for libuild builds.
//!
//! - [`registry`]: the ordered stages a descriptor asks the engine to run
//! - [`external`]: keeps configured dependencies out of the bundle
//! - [`dts_emit`]: the rolldown plugin backing the declarations stage

pub mod external;
pub mod registry;

#[cfg(feature = "dts-generation")]
pub mod dts_emit;

pub use external::ExternalPlugin;
pub use registry::{PluginPhase, PluginRegistry, PluginStage};

#[cfg(feature = "dts-generation")]
pub use dts_emit::DtsEmitPlugin;
