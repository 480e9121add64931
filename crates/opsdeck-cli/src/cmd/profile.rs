use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use opsdeck_client::ApiClient;
use opsdeck_core::profile::OrganizationProfile;

use crate::output::{print_json, print_kv};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Show the organization profile and its completion scoring
    Show,

    /// Save profile fields
    Save {
        /// Field assignments, camelCase keys (e.g. --set businessName="Acme")
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,

        /// YAML file with profile fields (merged under --set assignments)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Run the quality analysis (served from cache for up to 24h)
    Analyze,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, subcmd: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProfileSubcommand::Show => show(client, json).await,
        ProfileSubcommand::Save { sets, file } => save(client, sets, file.as_deref(), json).await,
        ProfileSubcommand::Analyze => analyze(client, json).await,
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

async fn show(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let snapshot = client.knowledge_base().await.map_err(super::surface)?;

    if json {
        return print_json(&serde_json::json!({
            "organizationProfile": snapshot.profile,
            "completionAnalysis": snapshot.completion,
            "qualityAnalysis": snapshot.quality,
            "documents": snapshot.documents,
        }));
    }

    let Some(profile) = &snapshot.profile else {
        println!("No organization profile yet. Save one with 'opsdeck profile save'.");
        return Ok(());
    };

    let unset = || "—".to_string();
    print_kv(&[
        (
            "Business",
            profile.business_name.clone().unwrap_or_else(unset),
        ),
        ("Industry", profile.industry.clone().unwrap_or_else(unset)),
        (
            "Audience",
            profile.target_audience.clone().unwrap_or_else(unset),
        ),
        (
            "Offerings",
            profile.core_offerings.clone().unwrap_or_else(unset),
        ),
        (
            "Last edited by",
            profile.last_edited_by.clone().unwrap_or_else(unset),
        ),
        (
            "Contributors",
            profile
                .contributors_count
                .map(|c| c.to_string())
                .unwrap_or_else(unset),
        ),
    ]);

    if let Some(completion) = &snapshot.completion {
        println!();
        print_kv(&[
            ("Overall completion", format!("{}%", completion.overall_score)),
            (
                "Essentials",
                tier_line(
                    completion.tier1_essential.percentage,
                    completion.tier1_essential.complete,
                ),
            ),
            (
                "Context",
                tier_line(
                    completion.tier2_context.percentage,
                    completion.tier2_context.complete,
                ),
            ),
            (
                "Intelligence",
                tier_line(
                    completion.tier3_intelligence.percentage,
                    completion.tier3_intelligence.complete,
                ),
            ),
        ]);
    }
    Ok(())
}

fn tier_line(percentage: u8, complete: bool) -> String {
    if complete {
        format!("{percentage}% (complete)")
    } else {
        format!("{percentage}%")
    }
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

async fn save(
    client: &ApiClient,
    sets: Vec<String>,
    file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let mut fields = serde_json::Map::new();

    if let Some(path) = file {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let from_file: serde_json::Value =
            serde_yaml::from_str(&data).context("profile file is not valid YAML")?;
        if let serde_json::Value::Object(map) = from_file {
            fields.extend(map);
        } else {
            anyhow::bail!("profile file must be a mapping of field: value");
        }
    }

    for assignment in &sets {
        let (key, value) = assignment
            .split_once('=')
            .with_context(|| format!("expected FIELD=VALUE, got '{assignment}'"))?;
        let value = match value {
            "true" => serde_json::Value::Bool(true),
            "false" => serde_json::Value::Bool(false),
            other => serde_json::Value::String(other.to_string()),
        };
        fields.insert(key.to_string(), value);
    }

    if fields.is_empty() {
        anyhow::bail!("nothing to save: pass --set or --file");
    }

    let profile: OrganizationProfile = serde_json::from_value(serde_json::Value::Object(fields))
        .context("unrecognised profile fields")?;

    let outcome = client.save_profile(&profile).await.map_err(super::surface)?;

    if json {
        return print_json(&serde_json::json!({
            "organizationProfile": outcome.profile,
            "completionAnalysis": outcome.completion,
            "message": outcome.message,
        }));
    }

    match outcome.completion {
        Some(completion) => println!(
            "Profile saved. Completion now {}%.",
            completion.overall_score
        ),
        None => println!("Profile saved."),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

async fn analyze(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let outcome = client
        .run_quality_analysis()
        .await
        .map_err(super::surface)?;

    if json {
        return print_json(&serde_json::json!({
            "qualityAnalysis": outcome.quality,
            "cached": outcome.cached,
        }));
    }

    let Some(quality) = outcome.quality else {
        println!("No quality analysis available yet.");
        return Ok(());
    };

    let mut source = if outcome.cached { "cached" } else { "fresh" }.to_string();
    if quality.is_stale(Utc::now()) {
        source.push_str(", stale");
    }
    println!(
        "Quality score: {}/100 ({source}, analyzed {})",
        quality.overall_score,
        quality.analyzed_at.to_rfc3339()
    );
    for rec in &quality.top_recommendations {
        println!("  [{}] {}", rec.priority.as_str(), rec.message);
    }
    Ok(())
}
