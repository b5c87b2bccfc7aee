//! Description provider backed by a literal config value.

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

/// Options for the `description_text` namespace.
#[derive(Debug, Deserialize)]
struct DescriptionOptions {
    /// The literal description to set within the RPM.
    text: String,
}

/// Simple text provider for RPM descriptions.
pub struct DescriptionTextExtension;

impl Extension for DescriptionTextExtension {
    fn name(&self) -> &'static str {
        "description_text"
    }

    fn description(&self) -> &'static str {
        "A simple text description provider."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: DescriptionOptions = config.namespace("description_text")?;
        spec.blocks.add("description", opts.text);
        Ok(spec)
    }
}
