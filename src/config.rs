//! Configuration management for rpmsmith.
//!
//! The configuration file is a JSON document of per-extension namespaces,
//! plus an `extensions.enabled` list naming the extensions to load:
//!
//! ```json
//! {
//!     "extensions": {"enabled": ["python_venv", "blocks"]},
//!     "core": {"name": "my-pkg", "version": "1.2.3"},
//!     "blocks": {"post": ["echo done"]}
//! }
//! ```
//!
//! Environment variables take precedence over file values: an option at
//! `namespace.option` can be overridden with `RPMSMITH_NAMESPACE_OPTION`.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "RPMSMITH";

/// Resolved build configuration.
///
/// Extensions never see this file's raw JSON; each reads its own namespace
/// as a typed options struct via [`Config::namespace`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    root: Map<String, Value>,
}

impl Config {
    /// Load configuration from a JSON file and apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Config file {} is not valid JSON", path.display()))?;
        let mut config = Self::from_value(value)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Build a configuration from an in-memory JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => bail!("Config must be a JSON object, found {}", json_type(&other)),
        }
    }

    /// Deserialize one extension's namespace into its options struct.
    ///
    /// An absent namespace deserializes from an empty object, so options
    /// structs with serde defaults still resolve.
    pub fn namespace<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .root
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::from_value(value)
            .with_context(|| format!("Invalid configuration in the {name} section"))
    }

    /// The extension names requested by the configuration, in file order.
    pub fn enabled_extensions(&self) -> Vec<String> {
        self.root
            .get("extensions")
            .and_then(|ext| ext.get("enabled"))
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set a single option, creating the namespace if needed.
    ///
    /// The CLI uses this to inject `core.source` from `--source`.
    pub fn set(&mut self, namespace: &str, option: &str, value: Value) {
        let ns = self
            .root
            .entry(namespace.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(ns) = ns {
            ns.insert(option.to_string(), value);
        }
    }

    /// Override file values from the environment.
    ///
    /// For every option present in the file, `RPMSMITH_<NS>_<OPTION>`
    /// (uppercased) replaces it. Values that parse as JSON keep their type;
    /// anything else becomes a string.
    pub fn apply_env_overrides(&mut self) {
        for (namespace, value) in self.root.iter_mut() {
            let Value::Object(options) = value else {
                continue;
            };
            for (option, slot) in options.iter_mut() {
                let var = format!(
                    "{}_{}_{}",
                    ENV_PREFIX,
                    namespace.to_uppercase(),
                    option.to_uppercase()
                );
                if let Ok(raw) = std::env::var(&var) {
                    *slot = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
                }
            }
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
