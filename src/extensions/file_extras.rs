//! Extension which packages files not placed in the buildroot by other
//! extensions.
//!
//! Depends on `file_permissions` for the ownership macros used in the
//! generated chown step.

use anyhow::{bail, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::spec::Spec;

use super::{Extension, Requirement};

/// Options for the `file_extras` namespace.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExtrasOptions {
    /// Extra files to include. Paths are relative to the buildroot.
    files: Vec<RawFile>,
}

/// A file entry as written in the config: either `"src:dest"` or a map with
/// optional `config`/`doc` markers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFile {
    Short(String),
    Full {
        src: String,
        dest: String,
        #[serde(default)]
        config: Value,
        #[serde(default)]
        doc: Value,
    },
}

/// A resolved file mapping.
#[derive(Debug, PartialEq, Eq)]
struct FileEntry {
    src: String,
    dest: String,
    file_type: Option<FileType>,
}

#[derive(Debug, PartialEq, Eq)]
enum FileType {
    /// `%config` marker, optionally with a modifier such as `noreplace`.
    Config(Option<String>),
    /// `%doc` marker.
    Doc,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl RawFile {
    fn resolve(&self) -> Result<FileEntry> {
        match self {
            RawFile::Short(text) => {
                let Some((src, dest)) = text.split_once(':') else {
                    bail!("The file entry {text:?} is missing a :");
                };
                Ok(FileEntry {
                    src: src.to_string(),
                    dest: dest.to_string(),
                    file_type: None,
                })
            }
            RawFile::Full {
                src,
                dest,
                config,
                doc,
            } => {
                let file_type = if truthy(config) {
                    let modifier = match config {
                        Value::String(text) => Some(text.clone()),
                        _ => None,
                    };
                    Some(FileType::Config(modifier))
                } else if truthy(doc) {
                    Some(FileType::Doc)
                } else {
                    None
                };
                Ok(FileEntry {
                    src: src.clone(),
                    dest: dest.clone(),
                    file_type,
                })
            }
        }
    }
}

impl FileEntry {
    /// The `%files` directive for this entry.
    fn directive(&self) -> String {
        match &self.file_type {
            Some(FileType::Config(Some(modifier))) => {
                format!("%config({modifier}) /{}", self.dest)
            }
            Some(FileType::Config(None)) => format!("%config /{}", self.dest),
            Some(FileType::Doc) => format!("%doc /{}", self.dest),
            None => format!("/{}", self.dest),
        }
    }
}

/// Packages extra files from the source tree.
pub struct FileExtrasExtension;

impl Extension for FileExtrasExtension {
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

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: ExtrasOptions = config.namespace("file_extras")?;

        for raw in &opts.files {
            let entry = raw.resolve()?;

            spec.blocks.add(
                "install",
                format!("mkdir -p \"%{{buildroot}}/%(dirname {})\"", entry.dest),
            );
            spec.blocks.add(
                "install",
                format!(
                    "cp -R %{{SOURCE0}}/{} %{{buildroot}}/{}",
                    entry.src, entry.dest
                ),
            );
            spec.blocks.add("files", entry.directive());
            spec.blocks.add(
                "post",
                format!(
                    "chown -R %{{file_permissions_user}}:%{{file_permissions_group}} /{}",
                    entry.dest
                ),
            );
        }

        Ok(spec)
    }
}
