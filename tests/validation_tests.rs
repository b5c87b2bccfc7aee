//! Loader ordering and dependency validation against the shipped
//! extension catalog.

mod helpers;

use anyhow::Result;
use helpers::requested;
use rpmsmith::config::Config;
use rpmsmith::extensions::{validate, Extension, ExtensionError, Registry, Requirement};
use rpmsmith::spec::Spec;

fn loaded_names(registry: &Registry, request: &[&str]) -> Vec<String> {
    registry
        .load(&requested(request))
        .iter()
        .map(|ext| ext.name().to_string())
        .collect()
}

#[test]
fn test_builtin_load_order_follows_request() {
    let registry = Registry::with_builtins();

    // Two opposite requests yield opposite non-baseline order.
    assert_eq!(
        loaded_names(&registry, &["blocks", "python_venv", "file_extras"]),
        ["core", "blocks", "python_venv", "file_extras"]
    );
    assert_eq!(
        loaded_names(&registry, &["file_extras", "python_venv", "blocks"]),
        ["core", "file_extras", "python_venv", "blocks"]
    );
}

#[test]
fn test_builtin_load_is_reproducible() {
    let registry = Registry::with_builtins();
    let request = ["file_permissions", "file_extras", "python_venv", "blocks"];
    assert_eq!(
        loaded_names(&registry, &request),
        loaded_names(&registry, &request)
    );
}

#[test]
fn test_duplicates_and_unknown_names_tolerated() {
    let registry = Registry::with_builtins();
    assert_eq!(
        loaded_names(&registry, &["blocks", "no_such_plugin", "blocks"]),
        ["core", "blocks"]
    );
}

#[test]
fn test_file_extras_requires_file_permissions() {
    let registry = Registry::with_builtins();

    let incomplete = registry.load(&requested(&["file_extras"]));
    let err = validate(&incomplete).unwrap_err();
    assert!(matches!(err, ExtensionError::MissingDependency { .. }));
    assert_eq!(
        err.to_string(),
        "file_permissions is required by file_extras but is not loaded."
    );

    let complete = registry.load(&requested(&["file_extras", "file_permissions"]));
    validate(&complete).expect("file_permissions satisfies the requirement");
}

// A stand-in for an outdated version of a real extension.
struct OldPermissions;

impl Extension for OldPermissions {
    fn name(&self) -> &'static str {
        "file_permissions"
    }
    fn description(&self) -> &'static str {
        "Set default file permissions to a user and group."
    }
    fn version(&self) -> &'static str {
        "0.9.0"
    }
    fn generate(&self, _config: &Config, spec: Spec) -> Result<Spec> {
        Ok(spec)
    }
}

struct NeedsPermissions;

impl Extension for NeedsPermissions {
    fn name(&self) -> &'static str {
        "file_extras"
    }
    fn description(&self) -> &'static str {
        "Package files not in the buildroot."
    }
    fn version(&self) -> &'static str {
        "1.1.0"
    }
    fn requirements(&self) -> &'static [Requirement] {
        &[Requirement {
            extension: "file_permissions",
            constraints: &[">=1.0.0", "<2.0.0"],
        }]
    }
    fn generate(&self, _config: &Config, spec: Spec) -> Result<Spec> {
        Ok(spec)
    }
}

#[test]
fn test_outdated_dependency_version_rejected() {
    let mut registry = Registry::new();
    registry.register(Box::new(NeedsPermissions));
    registry.register(Box::new(OldPermissions));

    let loaded = registry.load(&requested(&["file_extras", "file_permissions"]));
    let err = validate(&loaded).unwrap_err();

    assert!(matches!(err, ExtensionError::InvalidDependency { .. }));
    assert_eq!(
        err.to_string(),
        "file_permissions->=1.0.0 is required by file_extras but found file_permissions-0.9.0."
    );
}
