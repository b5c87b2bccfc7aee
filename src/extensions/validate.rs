//! Inter-extension dependency validation.
//!
//! Runs after the full ordered set is resolved. Checks presence and version
//! compatibility only: an extension may depend on one positioned anywhere
//! in the load order, and no cycle detection is performed.

use std::collections::HashMap;

use semver::{Version, VersionReq};

use super::{Extension, ExtensionError};

/// Validate every declared requirement of the loaded extensions.
///
/// Extensions are checked in loaded order and requirements in declaration
/// order; the first failure short-circuits. Success means every dependency
/// is present and its declared version satisfies every constraint.
pub fn validate(loaded: &[&dyn Extension]) -> Result<(), ExtensionError> {
    let lookup: HashMap<&str, &dyn Extension> =
        loaded.iter().map(|ext| (ext.name(), *ext)).collect();

    for extension in loaded {
        for requirement in extension.requirements() {
            let dependency = lookup.get(requirement.extension).copied().ok_or_else(|| {
                ExtensionError::MissingDependency {
                    dependency: requirement.extension.to_string(),
                    extension: extension.name().to_string(),
                }
            })?;

            let found = Version::parse(dependency.version()).map_err(|source| {
                ExtensionError::MalformedVersion {
                    extension: dependency.name().to_string(),
                    version: dependency.version().to_string(),
                    source,
                }
            })?;

            for constraint in requirement.constraints {
                let range = VersionReq::parse(constraint).map_err(|source| {
                    ExtensionError::MalformedConstraint {
                        extension: extension.name().to_string(),
                        dependency: requirement.extension.to_string(),
                        constraint: constraint.to_string(),
                        source,
                    }
                })?;

                if !range.matches(&found) {
                    return Err(ExtensionError::InvalidDependency {
                        dependency: requirement.extension.to_string(),
                        constraint: constraint.to_string(),
                        extension: extension.name().to_string(),
                        found: dependency.version().to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}
