pub mod config;
pub mod docs;
pub mod jd;
pub mod profile;
pub mod readiness;
pub mod sop;
pub mod tasks;

use std::path::{Path, PathBuf};

use anyhow::Context;
use opsdeck_client::{ApiClient, ApiError, Config};

/// Resolve the config path: explicit flag first, then the standard lookup
/// (env var, ./.opsdeck/, ~/.opsdeck/).
pub fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    Config::resolve_path().context("no config found: run 'opsdeck config init'")
}

pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = config_path(explicit)?;
    Config::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

pub fn build_client(explicit: Option<&Path>) -> anyhow::Result<ApiClient> {
    let config = load_config(explicit)?;
    Ok(ApiClient::from_config(&config)?)
}

/// Convert an API failure into what the person at the terminal should see.
/// Rate limits get their own longer-form notice; everything else prefers
/// the server's user-facing message when one exists.
pub fn surface(err: ApiError) -> anyhow::Error {
    match &err {
        ApiError::RateLimited {
            message,
            retry_after_seconds,
        } => {
            let hint = retry_after_seconds
                .map(|s| format!(" Retry in about {s}s."))
                .unwrap_or_default();
            anyhow::anyhow!("{message}{hint} The generators are rate limited; this is not a failure of your data.")
        }
        _ => anyhow::anyhow!("{}", err.display_message()),
    }
}
