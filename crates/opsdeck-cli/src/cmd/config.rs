use std::path::Path;

use clap::Subcommand;
use opsdeck_client::config::{Config, WarnLevel};

use crate::output::{print_json, print_kv};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a starter config file
    Init {
        /// API base URL
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,
        /// API token (can be added later by editing the file)
        #[arg(long)]
        token: Option<String>,
    },

    /// Show the resolved configuration
    Show,

    /// Check the configuration for problems
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(explicit: Option<&Path>, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Init { base_url, token } => init(explicit, base_url, token),
        ConfigSubcommand::Show => show(explicit, json),
        ConfigSubcommand::Validate => validate(explicit, json),
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(explicit: Option<&Path>, base_url: String, token: Option<String>) -> anyhow::Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => Path::new(".opsdeck").join("config.yaml"),
    };
    if path.exists() {
        anyhow::bail!("config already exists at {}", path.display());
    }

    let config = Config {
        base_url,
        api_token: token,
        ..Default::default()
    };
    config.save(&path)?;
    println!("Config written to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(explicit: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let path = super::config_path(explicit)?;
    let config = Config::load(&path)?;

    // Never print the token itself.
    let token_display = match &config.api_token {
        Some(_) => "set".to_string(),
        None => "not set".to_string(),
    };

    if json {
        return print_json(&serde_json::json!({
            "path": path.display().to_string(),
            "baseUrl": config.base_url,
            "apiToken": token_display,
            "timeoutSeconds": config.timeout_seconds,
        }));
    }

    print_kv(&[
        ("Config", path.display().to_string()),
        ("Base URL", config.base_url.clone()),
        ("API token", token_display),
        ("Timeout", format!("{}s", config.timeout_seconds)),
    ]);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(explicit: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let path = super::config_path(explicit)?;
    let config = Config::load(&path)?;
    let warnings = config.validate();

    if json {
        print_json(&warnings)?;
    } else if warnings.is_empty() {
        println!("Config OK ({}).", path.display());
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Error => "error",
                WarnLevel::Warning => "warning",
            };
            println!("{tag}: {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config has errors");
    }
    Ok(())
}
