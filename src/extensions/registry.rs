//! Extension catalog and ordered loading.
//!
//! The registry is an explicit, per-build object rather than a process-wide
//! plugin table: tests construct their own with exactly the extensions they
//! need, and the CLI builds one with [`Registry::with_builtins`].

use std::collections::HashSet;

use super::{
    blocks::BlocksExtension, core::CoreExtension, description_text::DescriptionTextExtension,
    file_extras::FileExtrasExtension, file_permissions::FilePermissionsExtension,
    macros::MacrosExtension, python_venv::PythonVenvExtension, Extension,
};

/// The mandatory baseline extension, always loaded first.
pub const BASELINE: &str = "core";

/// Catalog of available extensions.
#[derive(Default)]
pub struct Registry {
    catalog: Vec<Box<dyn Extension>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in extension.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CoreExtension));
        registry.register(Box::new(BlocksExtension));
        registry.register(Box::new(MacrosExtension));
        registry.register(Box::new(PythonVenvExtension));
        registry.register(Box::new(FilePermissionsExtension));
        registry.register(Box::new(FileExtrasExtension));
        registry.register(Box::new(DescriptionTextExtension));
        registry
    }

    /// Add an extension to the catalog.
    ///
    /// Callers must not register two extensions with the same name; if they
    /// do, one of them is silently dropped at load time.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        self.catalog.push(extension);
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Resolve the requested names into an ordered extension list.
    ///
    /// The whitelist is the baseline name followed by the requested names,
    /// deduplicated keeping the first occurrence. Catalog entries outside
    /// the whitelist are dropped, duplicates collapse to one, and the
    /// result is ordered by whitelist position — never by registration
    /// order. Names absent from the catalog are ignored without error.
    pub fn load(&self, requested: &[String]) -> Vec<&dyn Extension> {
        let mut whitelist: Vec<&str> = Vec::with_capacity(requested.len() + 1);
        let mut seen = HashSet::new();
        for name in std::iter::once(BASELINE).chain(requested.iter().map(String::as_str)) {
            if seen.insert(name) {
                whitelist.push(name);
            }
        }

        let mut loaded: Vec<&dyn Extension> = Vec::new();
        let mut names = HashSet::new();
        for extension in &self.catalog {
            let name = extension.name();
            if whitelist.contains(&name) && names.insert(name) {
                loaded.push(extension.as_ref());
            }
        }

        loaded.sort_by_key(|extension| {
            whitelist
                .iter()
                .position(|name| *name == extension.name())
                .unwrap_or(usize::MAX)
        });
        loaded
    }
}
