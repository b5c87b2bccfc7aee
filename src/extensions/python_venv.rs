//! Extension for packaging a Python virtualenv.
//!
//! Builds the virtualenv inside the buildroot, installs requirements files
//! and the project itself, then relocates the venv to its installation
//! prefix so the packaged interpreter paths are correct on the target host.

use anyhow::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::spec::Spec;

use super::Extension;

/// Options for the `python_venv` namespace.
#[derive(Debug, Deserialize)]
struct VenvOptions {
    /// The executable to use for creating a venv.
    #[serde(default = "default_cmd")]
    cmd: String,
    /// Flags to pass to the venv during creation.
    #[serde(default = "default_flags")]
    flags: Vec<String>,
    /// The name of the installed venv.
    name: String,
    /// The path in which to install the venv.
    #[serde(default = "default_path")]
    path: String,
    /// The python executable to use in the venv.
    #[serde(default)]
    python: Option<String>,
    /// Names of requirements files to install in the venv.
    #[serde(default = "default_requirements")]
    requirements: Vec<String>,
    /// Flags to pass to pip during pip install calls.
    #[serde(default)]
    pip_flags: Vec<String>,
}

fn default_cmd() -> String {
    "virtualenv".to_string()
}

fn default_flags() -> Vec<String> {
    vec!["--always-copy".to_string()]
}

fn default_path() -> String {
    "/usr/share/python".to_string()
}

fn default_requirements() -> Vec<String> {
    vec!["requirements.txt".to_string()]
}

/// Packaging extension for generating a virtualenv.
pub struct PythonVenvExtension;

impl Extension for PythonVenvExtension {
    fn name(&self) -> &'static str {
        "python_venv"
    }

    fn description(&self) -> &'static str {
        "Packaging extension for generating virtualenv."
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn generate(&self, config: &Config, mut spec: Spec) -> Result<Spec> {
        let opts: VenvOptions = config.namespace("python_venv")?;

        let mut venv_pip = "%{venv_python} %{venv_bin}/pip install".to_string();
        if !opts.pip_flags.is_empty() {
            venv_pip.push(' ');
            venv_pip.push_str(&opts.pip_flags.join(" "));
        }

        let mut venv_cmd = opts.cmd.clone();
        if !opts.flags.is_empty() {
            venv_cmd.push(' ');
            venv_cmd.push_str(&opts.flags.join(" "));
        }
        if let Some(python) = &opts.python {
            venv_cmd.push_str(" --python=");
            venv_cmd.push_str(python);
        }

        spec.macros.set("venv_cmd", venv_cmd);
        spec.macros.set("venv_name", &opts.name);
        spec.macros
            .set("venv_install_dir", format!("{}/%{{venv_name}}", opts.path));
        spec.macros
            .set("venv_dir", "%{buildroot}/%{venv_install_dir}");
        spec.macros.set("venv_bin", "%{venv_dir}/bin");
        spec.macros.set("venv_python", "%{venv_bin}/python");
        spec.macros.set("venv_pip", venv_pip);

        // rpm's default post-install step byte-compiles every .py file with
        // the system python, which breaks venvs built with another
        // interpreter. Strip it from the hook chain.
        spec.globals.set(
            "__os_install_post",
            "%(echo '%{__os_install_post}' | sed -e \
             's!/usr/lib[^[:space:]]*/brp-python-bytecompile[[:space:]].*$!!g')",
        );

        spec.tags.set("AutoReq", "No");
        spec.tags.set("AutoProv", "No");

        spec.blocks
            .add("prep", "mkdir -p %{buildroot}/%{venv_install_dir}");

        let install = spec.blocks.get_mut("install");
        install.push("%{venv_cmd} %{venv_dir}".to_string());
        for requirement in &opts.requirements {
            install.push(format!("%{{venv_pip}} -r %{{SOURCE0}}/{requirement}"));
        }
        install.push("pushd %{SOURCE0}".to_string());
        install.push("%{venv_python} setup.py install".to_string());
        install.push("popd".to_string());
        install.push(
            "# RECORD files are used by wheels for checksum. They contain path names which"
                .to_string(),
        );
        install.push(
            "# match the buildroot and must be removed or the package will fail to build."
                .to_string(),
        );
        install.push("find %{buildroot} -name \"RECORD\" -exec rm -rf {} \\;".to_string());
        install.push("# Change the virtualenv path to the target installation directory.".to_string());
        install.push(
            "venvctrl-relocate --source=%{venv_dir} --destination=/%{venv_install_dir}"
                .to_string(),
        );

        spec.blocks.add("files", "/%{venv_install_dir}");

        Ok(spec)
    }
}
