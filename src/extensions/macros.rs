//! Extension for user-supplied `%define` macros.

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

/// Options for the `macros` namespace.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MacroOptions {
    /// Macro definitions as `"name value"` strings.
    macros: Vec<String>,
}

/// Adds arbitrary macros to the spec.
pub struct MacrosExtension;

impl Extension for MacrosExtension {
    fn name(&self) -> &'static str {
        "macros"
    }

    fn description(&self) -> &'static str {
        "Add arbitrary macro definitions."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: MacroOptions = config.namespace("macros")?;

        for line in &opts.macros {
            let Some((name, value)) = line.trim().split_once(char::is_whitespace) else {
                bail!("Macro definition {line:?} is missing a value");
            };
            spec.macros.set(name, value.trim_start());
        }

        Ok(spec)
    }
}
