//! The composition driver.
//!
//! Feeds each loaded extension, in order, the shared configuration and the
//! spec built so far. Execution is strictly sequential; later extensions
//! depend on earlier ones having already written shared state.

use crate::config::Config;
use crate::spec::Spec;

use super::{Extension, ExtensionError};

/// Run every extension's generate step against a fresh spec.
///
/// The spec is threaded through by value: each extension receives the
/// accumulated document and returns the updated one. A failing extension
/// aborts composition immediately — no later extension runs, and there is
/// no partial-result recovery.
pub fn compose(config: &Config, extensions: &[&dyn Extension]) -> Result<Spec, ExtensionError> {
    let mut spec = Spec::new();
    for extension in extensions {
        spec = extension.generate(config, spec).map_err(|source| {
            ExtensionError::InvalidGenerationResult {
                extension: extension.name().to_string(),
                source,
            }
        })?;
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use std::cell::Cell;

    struct AppendLine {
        name: &'static str,
        block: &'static str,
        line: &'static str,
    }

    impl Extension for AppendLine {
        fn name(&self) -> &'static str {
            self.name
        }
        fn description(&self) -> &'static str {
            "appends one line"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
        fn generate(&self, _config: &Config, mut spec: Spec) -> Result<Spec> {
            spec.blocks.add(self.block, self.line);
            Ok(spec)
        }
    }

    struct SetMacro {
        name: &'static str,
        value: &'static str,
    }

    impl Extension for SetMacro {
        fn name(&self) -> &'static str {
            self.name
        }
        fn description(&self) -> &'static str {
            "sets the x macro"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
        fn generate(&self, _config: &Config, mut spec: Spec) -> Result<Spec> {
            spec.macros.set("x", self.value);
            Ok(spec)
        }
    }

    struct Failing;

    impl Extension for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn description(&self) -> &'static str {
            "always fails"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
        fn generate(&self, _config: &Config, _spec: Spec) -> Result<Spec> {
            bail!("config option missing")
        }
    }

    struct Recording<'a> {
        ran: &'a Cell<bool>,
    }

    impl Extension for Recording<'_> {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn description(&self) -> &'static str {
            "records that it ran"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
        fn generate(&self, _config: &Config, spec: Spec) -> Result<Spec> {
            self.ran.set(true);
            Ok(spec)
        }
    }

    #[test]
    fn test_blocks_accumulate_in_execution_order() {
        let first = AppendLine {
            name: "first",
            block: "post",
            line: "echo first",
        };
        let second = AppendLine {
            name: "second",
            block: "post",
            line: "echo second",
        };

        let spec = compose(&Config::default(), &[&first, &second]).unwrap();
        assert_eq!(
            spec.blocks.get("post").unwrap(),
            ["echo first", "echo second"]
        );
    }

    #[test]
    fn test_later_extension_overwrites_macro() {
        let first = SetMacro {
            name: "first",
            value: "one",
        };
        let second = SetMacro {
            name: "second",
            value: "two",
        };

        let spec = compose(&Config::default(), &[&first, &second]).unwrap();
        assert_eq!(spec.macros.get("x"), Some("two"));
        assert_eq!(spec.macros.len(), 1);
    }

    #[test]
    fn test_failure_names_the_extension() {
        let err = compose(&Config::default(), &[&Failing]).unwrap_err();
        match &err {
            ExtensionError::InvalidGenerationResult { extension, .. } => {
                assert_eq!(extension, "failing");
            }
            other => panic!("expected InvalidGenerationResult, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_aborts_before_later_extensions() {
        let ran = Cell::new(false);
        let after = Recording { ran: &ran };

        let result = compose(&Config::default(), &[&Failing, &after]);
        assert!(result.is_err());
        assert!(!ran.get(), "extensions after a failure must not run");
    }

    #[test]
    fn test_empty_extension_list_yields_empty_spec() {
        let spec = compose(&Config::default(), &[]).unwrap();
        assert!(spec.macros.is_empty());
        assert!(spec.globals.is_empty());
        assert!(spec.tags.is_empty());
        assert!(spec.blocks.is_empty());
    }
}
