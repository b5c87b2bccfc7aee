//! Baseline extension for the common RPM metadata fields.
//!
//! Always loaded first regardless of the requested whitelist; every other
//! extension can rely on the core tags and the prep/clean scaffolding being
//! present.

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

const DEFAULT_BUILDROOT: &str =
    "%(mktemp -ud %{_tmppath}/%{name}-%{version}-%{release}-XXXXXX)";

/// Options for the `core` namespace.
#[derive(Debug, Deserialize)]
struct CoreOptions {
    /// The name of the RPM file which is generated.
    name: String,
    /// The RPM version to build.
    version: String,
    /// The release number for the RPM. Accepts a string or an integer.
    #[serde(default = "default_release", deserialize_with = "string_or_number")]
    release: String,
    /// The short package summary.
    #[serde(default)]
    summary: Option<String>,
    /// The RPM package group in which this package belongs.
    #[serde(default)]
    group: Option<String>,
    /// The license under which the package is distributed.
    #[serde(default)]
    license: Option<String>,
    /// The URL of the package source.
    #[serde(default)]
    url: Option<String>,
    /// The path to the package source.
    #[serde(default)]
    source: Option<String>,
    /// The name of the buildroot directory to use.
    #[serde(default = "default_buildroot")]
    buildroot: String,
}

fn default_release() -> String {
    "1".to_string()
}

fn default_buildroot() -> String {
    DEFAULT_BUILDROOT.to_string()
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

/// Completes the common core RPM metadata fields.
pub struct CoreExtension;

impl Extension for CoreExtension {
    fn name(&self) -> &'static str {
        "core"
    }

    fn description(&self) -> &'static str {
        "Complete the common core RPM metadata fields."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: CoreOptions = config.namespace("core")?;

        spec.tags.set("Name", &opts.name);
        spec.tags.set("Version", &opts.version);
        spec.tags.set("Release", &opts.release);
        spec.tags.set("BuildRoot", &opts.buildroot);

        if let Some(summary) = &opts.summary {
            spec.tags.set("Summary", summary);
        }
        if let Some(group) = &opts.group {
            spec.tags.set("Group", group);
        }
        if let Some(license) = &opts.license {
            spec.tags.set("License", license);
        }
        if let Some(url) = &opts.url {
            spec.tags.set("Url", url);
        }
        if let Some(source) = &opts.source {
            spec.tags.set("Source0", source);
        }

        spec.blocks.add("prep", "rm -rf %{buildroot}/*");
        spec.blocks.add("clean", "rm -rf %{buildroot}");

        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generate(core: Value) -> Result<Spec> {
        let config = Config::from_value(json!({ "core": core })).unwrap();
        CoreExtension.generate(&config, Spec::new())
    }

    #[test]
    fn test_required_tags_in_order() {
        let spec = generate(json!({"name": "pkg", "version": "1.2.3"})).unwrap();

        let tags: Vec<(&str, &str)> = spec.tags.iter().collect();
        assert_eq!(
            tags,
            [
                ("Name", "pkg"),
                ("Version", "1.2.3"),
                ("Release", "1"),
                ("BuildRoot", DEFAULT_BUILDROOT),
            ]
        );
    }

    #[test]
    fn test_optional_tags_included_when_set() {
        let spec = generate(json!({
            "name": "pkg",
            "version": "1.2.3",
            "summary": "a package",
            "group": "Applications/System",
            "license": "Apache2",
            "url": "https://example.com",
            "source": "pkg"
        }))
        .unwrap();

        assert_eq!(spec.tags.get("Summary"), Some("a package"));
        assert_eq!(spec.tags.get("Group"), Some("Applications/System"));
        assert_eq!(spec.tags.get("License"), Some("Apache2"));
        assert_eq!(spec.tags.get("Url"), Some("https://example.com"));
        assert_eq!(spec.tags.get("Source0"), Some("pkg"));
    }

    #[test]
    fn test_release_accepts_integer_or_string() {
        let from_int = generate(json!({"name": "p", "version": "1.0.0", "release": 3})).unwrap();
        assert_eq!(from_int.tags.get("Release"), Some("3"));

        let from_str = generate(json!({"name": "p", "version": "1.0.0", "release": "4"})).unwrap();
        assert_eq!(from_str.tags.get("Release"), Some("4"));
    }

    #[test]
    fn test_prep_and_clean_scaffolding() {
        let spec = generate(json!({"name": "pkg", "version": "1.0.0"})).unwrap();
        assert_eq!(spec.blocks.get("prep").unwrap(), ["rm -rf %{buildroot}/*"]);
        assert_eq!(spec.blocks.get("clean").unwrap(), ["rm -rf %{buildroot}"]);
    }

    #[test]
    fn test_missing_name_is_an_error() {
        assert!(generate(json!({"version": "1.0.0"})).is_err());
    }
}
