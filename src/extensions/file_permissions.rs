//! Extension which sets default ownership for all packaged files.

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

/// Options for the `file_permissions` namespace.
#[derive(Debug, Deserialize)]
struct PermissionOptions {
    /// The owner user.
    user: String,
    /// The owner group.
    group: String,
    /// Create the user if it does not exist.
    #[serde(default)]
    create_user: bool,
    /// Create the group if it does not exist.
    #[serde(default)]
    create_group: bool,
}

/// Applies a default owner and group to everything in the buildroot.
pub struct FilePermissionsExtension;

impl Extension for FilePermissionsExtension {
    fn name(&self) -> &'static str {
        "file_permissions"
    }

    fn description(&self) -> &'static str {
        "Set default file permissions to a user and group."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: PermissionOptions = config.namespace("file_permissions")?;

        spec.macros.set("file_permissions_user", &opts.user);
        spec.macros.set("file_permissions_group", &opts.group);

        // The defattr directive must precede every file entry, including
        // those written by extensions that already ran.
        spec.blocks.get_mut("files").insert(
            0,
            "%defattr(-,%{file_permissions_user},%{file_permissions_group},-)".to_string(),
        );

        if opts.create_user {
            spec.blocks.add(
                "pre",
                "id -u %{file_permissions_user} &>/dev/null || \
                 useradd %{file_permissions_user}",
            );
        }
        if opts.create_group {
            spec.blocks.add(
                "pre",
                "id -g %{file_permissions_group} &>/dev/null || \
                 groupadd %{file_permissions_group}",
            );
        }

        Ok(spec)
    }
}
