//! Extension for adding custom lines to any recognized block.

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

/// Options for the `blocks` namespace: one line list per recognized block.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BlockOptions {
    post: Vec<String>,
    postun: Vec<String>,
    pre: Vec<String>,
    preun: Vec<String>,
    prep: Vec<String>,
    build: Vec<String>,
    install: Vec<String>,
    clean: Vec<String>,
    desc: Vec<String>,
    files: Vec<String>,
    changelog: Vec<String>,
}

impl BlockOptions {
    /// Pairs of (target block name, configured lines).
    ///
    /// `desc` is an alias for the `description` block.
    fn entries(&self) -> [(&'static str, &[String]); 11] {
        [
            ("post", &self.post),
            ("postun", &self.postun),
            ("pre", &self.pre),
            ("preun", &self.preun),
            ("prep", &self.prep),
            ("build", &self.build),
            ("install", &self.install),
            ("clean", &self.clean),
            ("description", &self.desc),
            ("files", &self.files),
            ("changelog", &self.changelog),
        ]
    }
}

/// Adds configured lines to arbitrary RPM blocks.
pub struct BlocksExtension;

impl Extension for BlocksExtension {
    fn name(&self) -> &'static str {
        "blocks"
    }

    fn description(&self) -> &'static str {
        "Add custom lines to an RPM block."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: BlockOptions = config.namespace("blocks")?;

        for (block, lines) in opts.entries() {
            if !lines.is_empty() {
                spec.blocks.extend(block, lines.iter().cloned());
            }
        }

        Ok(spec)
    }
}
