//! Configuration command implementations

use crate::cli::{ConfigCommands, EXIT_CLEAN, Output};
use crate::config::{CONFIG_TEMPLATE, MarkguardConfig, REPO_CONFIG_FILE};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::ExitCode;

pub async fn execute(
    cmd: ConfigCommands,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<ExitCode> {
    match cmd {
        ConfigCommands::Init { force } => init(force, output).await,
        ConfigCommands::Show { format } => show(&format, config_path).await,
        ConfigCommands::Validate => validate(config_path, output).await,
    }
}

async fn init(force: bool, output: &Output) -> Result<ExitCode> {
    let path = Path::new(REPO_CONFIG_FILE);
    if path.exists() && !force {
        bail!("{REPO_CONFIG_FILE} already exists; rerun with --force to overwrite it");
    }

    std::fs::write(path, CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    output.success(&format!("Created {REPO_CONFIG_FILE}"));
    output.info("Edit it to change the marker or the hook list");

    Ok(ExitCode::from(EXIT_CLEAN))
}

async fn show(format: &str, config_path: Option<&Path>) -> Result<ExitCode> {
    let config = MarkguardConfig::load(config_path).context("failed to load configuration")?;

    let rendered = match format.to_lowercase().as_str() {
        "yaml" | "yml" => config.to_yaml()?,
        "json" => config.to_json()?,
        "toml" => config.to_toml()?,
        other => bail!("unsupported format '{other}' (expected yaml, json or toml)"),
    };
    println!("{}", rendered.trim_end());

    Ok(ExitCode::from(EXIT_CLEAN))
}

async fn validate(config_path: Option<&Path>, output: &Output) -> Result<ExitCode> {
    let config = MarkguardConfig::load(config_path).context("configuration is invalid")?;

    output.success("Configuration is valid");
    output.key_value("Marker", &config.guard.marker);
    output.key_value("Scan mode", &format!("{:?}", config.scan_mode()));
    output.key_value("Fail fast", &config.hooks.fail_fast.to_string());

    let local = config.hooks.repos.iter().filter(|r| r.is_local()).count();
    output.key_value(
        "Repositories",
        &format!("{} ({local} local)", config.hooks.repos.len()),
    );
    output.key_value("Hooks", &config.hook_count().to_string());

    Ok(ExitCode::from(EXIT_CLEAN))
}
