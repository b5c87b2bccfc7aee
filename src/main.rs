//! Rpmsmith - build RPM packages from pluggable SPEC file extensions.
//!
//! The pipeline for one build:
//! - load the JSON configuration (with `.env` and environment overrides)
//! - resolve and order the enabled extensions (baseline always first)
//! - validate inter-extension dependencies
//! - compose the SPEC document and render it to text
//! - stage the source tree and drive `rpmbuild`
//!
//! This is the only layer that prints or chooses an exit status; the
//! engine reports everything through typed errors.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

use rpmsmith::config::Config;
use rpmsmith::extensions::{compose, validate, Registry};
use rpmsmith::render;
use rpmsmith::rpmbuild;

#[derive(Parser)]
#[command(name = "rpmsmith")]
#[command(about = "Generate an RPM from pluggable SPEC extensions")]
struct Cli {
    /// The path to a configuration file.
    config: PathBuf,

    /// Path to package source. Default is the config parent directory.
    #[arg(long)]
    source: Option<PathBuf>,

    /// Output path for the final RPM. Default is the current directory.
    #[arg(long, default_value = "./")]
    destination: PathBuf,

    /// Print the SPEC file without generating an RPM with it.
    #[arg(long)]
    spec: bool,

    /// Enable real-time streaming output of rpmbuild.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present; real environment variables still win.
    dotenvy::dotenv().ok();

    let config_path = cli
        .config
        .canonicalize()
        .with_context(|| format!("Config file {} not found", cli.config.display()))?;
    let source = match cli.source {
        Some(source) => source
            .canonicalize()
            .with_context(|| format!("Source path {} not found", source.display()))?,
        None => config_path
            .parent()
            .context("Config file has no parent directory")?
            .to_path_buf(),
    };

    let mut config = Config::from_file(&config_path)?;
    config.set(
        "core",
        "source",
        Value::String(source.display().to_string()),
    );

    let registry = Registry::with_builtins();
    let loaded = registry.load(&config.enabled_extensions());
    validate(&loaded)?;

    let spec = compose(&config, &loaded)?;
    let spec_text = render::render(&spec);

    if cli.spec {
        println!("{spec_text}");
        return Ok(());
    }

    rpmbuild::preflight()?;
    let root = rpmbuild::BuildRoot::create()?;
    root.copy_source(&source)?;
    let specfile = root.write_spec(&spec_text)?;
    let rpm = rpmbuild::build(&root, &specfile, cli.verbose)?;
    let artifact = rpmbuild::move_artifact(&rpm, &cli.destination)?;

    println!("RPM generated at {}", artifact.display());
    Ok(())
}
