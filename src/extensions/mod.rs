//! The extension system that assembles SPEC files.
//!
//! Every unit of packaging policy is an [`Extension`]: it has a name, a
//! semantic version, optional requirements on other extensions, and a
//! `generate` step that contributes macros, globals, tags, and block lines
//! to the shared [`Spec`](crate::spec::Spec).
//!
//! A build resolves extensions in three stages:
//! 1. [`Registry::load`](registry::Registry::load) picks and orders the
//!    requested extensions (the baseline `core` extension is always first).
//! 2. [`validate`](validate::validate) checks that every declared
//!    requirement is loaded with a compatible version.
//! 3. [`compose`](compose::compose) runs each extension's `generate` in
//!    order, threading the spec through.

pub mod blocks;
pub mod compose;
pub mod core;
pub mod description_text;
pub mod file_extras;
pub mod file_permissions;
pub mod macros;
pub mod python_venv;
pub mod registry;
pub mod validate;

pub use compose::compose;
pub use registry::{Registry, BASELINE};
pub use validate::validate;

use crate::config::Config;
use crate::spec::Spec;
use anyhow::Result;

/// A declared dependency on another extension.
///
/// Constraints are semver range expressions (`">=1.0.0"`, `"<2.0.0"`); all
/// of them must hold for the dependency's declared version. Declaration
/// order is preserved so validation failures are deterministic.
#[derive(Debug, Clone, Copy)]
pub struct Requirement {
    /// Name of the required extension.
    pub extension: &'static str,
    /// Version range constraints the requirement must satisfy.
    pub constraints: &'static [&'static str],
}

/// A pluggable unit of SPEC generation policy.
///
/// Extensions are registered once, never mutated after load, and must be
/// deterministic: `generate` may only read its own config namespace and the
/// spec built so far. Later extensions observe earlier contributions; no
/// extension may assume it runs first or last except `core`, which is
/// guaranteed first.
pub trait Extension {
    /// Unique identifier; matches the registration key and config namespace.
    fn name(&self) -> &'static str;

    /// Human-readable summary of what the extension contributes.
    fn description(&self) -> &'static str;

    /// Semantic version of the extension, as a full `MAJOR.MINOR.PATCH`.
    fn version(&self) -> &'static str;

    /// Requirements on other extensions. Empty by default.
    fn requirements(&self) -> &'static [Requirement] {
        &[]
    }

    /// Contribute to the spec, returning the updated document.
    fn generate(&self, config: &Config, spec: Spec) -> Result<Spec>;
}

/// Errors raised by the extension engine.
///
/// All variants are fatal and non-retryable; composition is deterministic,
/// so retrying with the same inputs would reproduce the failure. The engine
/// never prints — callers decide how to surface these.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// A declared dependency extension is not in the loaded set.
    #[error("{dependency} is required by {extension} but is not loaded.")]
    MissingDependency {
        dependency: String,
        extension: String,
    },

    /// A dependency is loaded but its version fails a declared constraint.
    #[error("{dependency}-{constraint} is required by {extension} but found {dependency}-{found}.")]
    InvalidDependency {
        dependency: String,
        constraint: String,
        extension: String,
        found: String,
    },

    /// An extension declares a version the semver parser rejects.
    #[error("{extension} declares an invalid version {version:?}")]
    MalformedVersion {
        extension: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    /// An extension declares a requirement constraint that is not a valid
    /// semver range.
    #[error("{extension} declares an invalid constraint {constraint:?} on {dependency}")]
    MalformedConstraint {
        extension: String,
        dependency: String,
        constraint: String,
        #[source]
        source: semver::Error,
    },

    /// An extension's generate step failed or produced an invalid spec.
    #[error("The {extension} extension did not produce a valid spec")]
    InvalidGenerationResult {
        extension: String,
        #[source]
        source: anyhow::Error,
    },
}
