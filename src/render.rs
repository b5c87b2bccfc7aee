//! SPEC file text rendering.
//!
//! Serializes a finished [`Spec`] into rpmbuild's file syntax: `%define`
//! macros first, then `%global` definitions, then tags, then each block as
//! a `%name` header followed by its lines. Entries render in insertion
//! order and blocks in the order they were first created.

use crate::spec::Spec;

/// Render a spec document to SPEC file text.
pub fn render(spec: &Spec) -> String {
    let mut out = String::new();

    for (name, value) in spec.macros.iter() {
        out.push_str(&format!("%define {name} {value}\n"));
    }
    for (name, value) in spec.globals.iter() {
        out.push_str(&format!("%global {name} {value}\n"));
    }
    if !out.is_empty() {
        out.push('\n');
    }

    for (name, value) in spec.tags.iter() {
        out.push_str(&format!("{name}: {value}\n"));
    }
    if !spec.tags.is_empty() {
        out.push('\n');
    }

    for (name, lines) in spec.blocks.iter() {
        out.push_str(&format!("%{name}\n"));
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_render_adjacent_in_order() {
        let mut spec = Spec::new();
        spec.macros.set("a", "1");
        spec.macros.set("b", "2");

        assert!(render(&spec).contains("%define a 1\n%define b 2"));
    }

    #[test]
    fn test_globals_render_adjacent_in_order() {
        let mut spec = Spec::new();
        spec.globals.set("test1", "test1");
        spec.globals.set("test2", "test2");

        assert!(render(&spec).contains("%global test1 test1\n%global test2 test2"));
    }

    #[test]
    fn test_tags_render_adjacent_in_order() {
        let mut spec = Spec::new();
        spec.tags.set("Name", "pkg");
        spec.tags.set("Version", "1.2.3");

        assert!(render(&spec).contains("Name: pkg\nVersion: 1.2.3"));
    }

    #[test]
    fn test_blocks_render_header_then_lines() {
        let mut spec = Spec::new();
        spec.blocks.extend("install", ["step one", "step two"]);
        spec.blocks.add("files", "/usr/share/thing");

        let text = render(&spec);
        assert!(text.contains("%install\nstep one\nstep two"));
        assert!(text.contains("%files\n/usr/share/thing"));
    }

    #[test]
    fn test_blocks_render_in_creation_order() {
        let mut spec = Spec::new();
        spec.blocks.add("post", "late block first");
        spec.blocks.add("prep", "early block second");

        let text = render(&spec);
        let post = text.find("%post").unwrap();
        let prep = text.find("%prep").unwrap();
        assert!(post < prep);
    }

    #[test]
    fn test_sections_ordered_macros_globals_tags_blocks() {
        let mut spec = Spec::new();
        spec.blocks.add("description", "text");
        spec.tags.set("Name", "pkg");
        spec.globals.set("g", "1");
        spec.macros.set("m", "1");

        let text = render(&spec);
        let define = text.find("%define").unwrap();
        let global = text.find("%global").unwrap();
        let tag = text.find("Name:").unwrap();
        let block = text.find("%description").unwrap();
        assert!(define < global && global < tag && tag < block);
    }

    #[test]
    fn test_empty_spec_renders_empty() {
        assert_eq!(render(&Spec::new()), "");
    }
}
