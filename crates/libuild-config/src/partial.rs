//! User-facing configuration shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BuildConfig, ExportsMode, ModuleFormat, NodeResolveOptions, TypeScriptOptions};
use crate::error::{ConfigError, Result};

/// A configuration where every key is optional.
///
/// Keys follow the camelCase spelling used in JSON config files. A present key
/// replaces the default for that key wholesale; nested objects are never
/// merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialConfig {
    pub library_name: Option<String>,
    pub entry: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub sourcemap: Option<bool>,
    pub targets: Option<Vec<ModuleFormat>>,
    pub exports: Option<ExportsMode>,
    pub external: Option<ExternalSpec>,
    pub dts: Option<bool>,
    pub banner: Option<String>,
    pub watch: Option<WatchSpec>,
    pub ts: Option<TsSpec>,
    pub node_resolve: Option<NodeResolveOptions>,
    pub minify: Option<bool>,
    pub analyze: Option<bool>,
    pub globals: Option<BTreeMap<String, String>>,
}

/// `external` accepts an explicit list or the `"dependencies"` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalSpec {
    List(Vec<String>),
    Keyword(ExternalKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExternalKeyword {
    /// dependencies plus peerDependencies from package.json
    Dependencies,
}

/// `watch: false | true | "path"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WatchSpec {
    Enabled(bool),
    Path(PathBuf),
}

/// `ts: false | true | { tsconfig }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TsSpec {
    Enabled(bool),
    Options(TypeScriptOptions),
}

/// Produces a partial configuration from the computed defaults.
pub type ConfigFn = Arc<dyn Fn(&BuildConfig) -> PartialConfig + Send + Sync>;

/// A structurally valid user configuration.
#[derive(Clone)]
pub enum UserConfig {
    Object(PartialConfig),
    /// One build per element, in order.
    List(Vec<PartialConfig>),
    Function(ConfigFn),
}

impl UserConfig {
    /// Validate the shape of a loaded value.
    ///
    /// Only plain objects and lists of plain objects are accepted. Field types
    /// are checked by deserialization; unknown keys are ignored.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(UserConfig::Object(parse_partial(value, None)?)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(_) => parse_partial(item, Some(index)),
                    other => Err(ConfigError::InvalidConfig(format!(
                        "list element {index} must be an object, got {}",
                        kind_of(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(UserConfig::List),
            other => Err(ConfigError::InvalidConfig(format!(
                "configuration must be an object, a list of objects, or a function; got {}",
                kind_of(&other)
            ))),
        }
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&BuildConfig) -> PartialConfig + Send + Sync + 'static,
    {
        UserConfig::Function(Arc::new(f))
    }
}

impl fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserConfig::Object(partial) => f.debug_tuple("Object").field(partial).finish(),
            UserConfig::List(list) => f.debug_tuple("List").field(list).finish(),
            UserConfig::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<PartialConfig> for UserConfig {
    fn from(partial: PartialConfig) -> Self {
        UserConfig::Object(partial)
    }
}

fn parse_partial(value: Value, index: Option<usize>) -> Result<PartialConfig> {
    serde_json::from_value(value).map_err(|e| match index {
        Some(index) => ConfigError::InvalidConfig(format!("list element {index}: {e}")),
        None => ConfigError::InvalidConfig(e.to_string()),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_value_becomes_object_config() {
        let config = UserConfig::from_value(json!({
            "libraryName": "widget",
            "targets": ["esm", "umd"],
            "ts": false,
            "external": "dependencies",
            "watch": "lib"
        }))
        .unwrap();

        let UserConfig::Object(partial) = config else {
            panic!("expected object config");
        };
        assert_eq!(partial.library_name.as_deref(), Some("widget"));
        assert_eq!(
            partial.targets,
            Some(vec![ModuleFormat::Esm, ModuleFormat::Umd])
        );
        assert_eq!(partial.ts, Some(TsSpec::Enabled(false)));
        assert_eq!(
            partial.external,
            Some(ExternalSpec::Keyword(ExternalKeyword::Dependencies))
        );
        assert_eq!(partial.watch, Some(WatchSpec::Path(PathBuf::from("lib"))));
    }

    #[test]
    fn list_of_objects_is_accepted() {
        let config =
            UserConfig::from_value(json!([{ "outDir": "a" }, { "outDir": "b" }])).unwrap();
        let UserConfig::List(list) = config else {
            panic!("expected list config");
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].out_dir, Some(PathBuf::from("b")));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = UserConfig::from_value(json!({ "visualizer": true })).unwrap();
        assert!(matches!(config, UserConfig::Object(p) if p == PartialConfig::default()));
    }

    #[test]
    fn scalar_shapes_are_rejected() {
        for value in [json!("esm"), json!(42), json!(null), json!(true)] {
            let err = UserConfig::from_value(value).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidConfig(_)));
        }
    }

    #[test]
    fn list_with_non_object_element_is_rejected() {
        let err = UserConfig::from_value(json!([{}, "oops"])).unwrap_err();
        assert!(err.to_string().contains("list element 1"));
    }
}
