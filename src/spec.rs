//! The SPEC file document model.
//!
//! A [`Spec`] is the shared accumulator that extensions write into during
//! composition: `%define` macros, `%global` definitions, package tags, and
//! named text blocks. It is created empty for each build, mutated in
//! extension order, and handed to the renderer once composition finishes.

use std::collections::HashMap;

/// An insertion-ordered mapping with unique keys.
///
/// Used for macros, globals, and tags. Writing an existing key replaces the
/// value but keeps the position of the first insertion, so render order is
/// stable no matter how many extensions touch a name.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl OrderedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Last write wins; first insertion fixes the position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&at) => self.entries[at].1 = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&at| self.entries[at].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// Named text blocks (`%prep`, `%install`, `%files`, ...).
///
/// Each block is an ordered list of lines that any number of extensions may
/// append to. Blocks render in the order they were first created.
#[derive(Debug, Clone, Default)]
pub struct Blocks {
    blocks: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl Blocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lines of a block, creating it empty if absent.
    ///
    /// Returning the `Vec` directly lets extensions append, extend, or
    /// insert at a specific position (e.g. `%defattr` at the front of
    /// `files`).
    pub fn get_mut(&mut self, name: &str) -> &mut Vec<String> {
        let at = match self.index.get(name) {
            Some(&at) => at,
            None => {
                let at = self.blocks.len();
                self.index.insert(name.to_string(), at);
                self.blocks.push((name.to_string(), Vec::new()));
                at
            }
        };
        &mut self.blocks[at].1
    }

    /// Get the lines of a block, if it exists.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.index.get(name).map(|&at| self.blocks[at].1.as_slice())
    }

    /// Append a single line to a block.
    pub fn add(&mut self, name: &str, line: impl Into<String>) {
        self.get_mut(name).push(line.into());
    }

    /// Append several lines to a block.
    pub fn extend<I, S>(&mut self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let block = self.get_mut(name);
        for line in lines {
            block.push(line.into());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate blocks in the order they were first created.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.blocks.iter().map(|(n, l)| (n.as_str(), l.as_slice()))
    }
}

/// A SPEC file under construction.
///
/// Extensions receive the spec by value from the composition driver and
/// return it after mutating; no instance is ever shared between builds.
#[derive(Debug, Clone, Default)]
pub struct Spec {
    pub macros: OrderedMap,
    pub globals: OrderedMap,
    pub tags: OrderedMap,
    pub blocks: Blocks,
}

impl Spec {
    pub fn new() -> Self {
        Self::default()
    }
}
