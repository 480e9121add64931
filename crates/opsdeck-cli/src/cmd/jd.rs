use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use opsdeck_client::{collect_analysis, io, ApiClient};
use opsdeck_core::jd::{JdAnalysis, JdIntake};

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum JdSubcommand {
    /// Analyze a role from a YAML intake file (streams progress)
    Analyze {
        /// Intake file (roleTitle, keyTasks, ...)
        #[arg(long)]
        file: PathBuf,

        /// Write the full analysis JSON here
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Save an analysis to the library
    Save {
        #[arg(long)]
        title: String,

        /// Analysis JSON produced by 'jd analyze -o'
        #[arg(long)]
        file: PathBuf,
    },

    /// List saved job descriptions
    List,

    /// Download a saved job description as a PDF
    Download {
        id: String,

        /// Target path (default: server-suggested filename)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, subcmd: JdSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        JdSubcommand::Analyze { file, output } => {
            analyze(client, &file, output.as_deref(), json).await
        }
        JdSubcommand::Save { title, file } => save(client, &title, &file, json).await,
        JdSubcommand::List => list(client, json).await,
        JdSubcommand::Download { id, output } => download(client, &id, output.as_deref()).await,
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

async fn analyze(
    client: &ApiClient,
    file: &Path,
    output: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let intake: JdIntake = serde_yaml::from_str(&data).context("intake file is not valid YAML")?;

    let stream = client.analyze_role(&intake).await.map_err(super::surface)?;
    let analysis = collect_analysis(stream, |stage| {
        if !json {
            println!("… {stage}");
        }
    })
    .await
    .map_err(super::surface)?;

    if let Some(path) = output {
        io::atomic_write(path, serde_json::to_string_pretty(&analysis)?.as_bytes())?;
        if !json {
            println!("Full analysis written to {}", path.display());
        }
    }

    if json {
        return print_json(&analysis);
    }

    let preview = &analysis.preview;
    println!("\n{}", preview.title);
    if let Some(summary) = &preview.summary {
        println!("{summary}");
    }
    for r in &preview.responsibilities {
        println!("  • {r}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// save / list / download
// ---------------------------------------------------------------------------

async fn save(client: &ApiClient, title: &str, file: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let analysis: JdAnalysis =
        serde_json::from_str(&data).context("analysis file is not valid JSON")?;

    let id = client
        .save_jd(title, &analysis)
        .await
        .map_err(super::surface)?;

    if json {
        return print_json(&serde_json::json!({ "id": id }));
    }
    println!("Saved '{title}' as {id}");
    Ok(())
}

async fn list(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let jds = client.saved_jds().await.map_err(super::surface)?;

    if json {
        return print_json(&jds);
    }

    if jds.is_empty() {
        println!("No saved job descriptions yet.");
        return Ok(());
    }

    let rows = jds
        .iter()
        .map(|jd| {
            vec![
                jd.id.clone(),
                jd.title.clone(),
                jd.created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["id", "title", "created"], rows);
    Ok(())
}

async fn download(client: &ApiClient, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let download = client.download_jd(id).await.map_err(super::surface)?;
    let path = target_path(output, download.file_name.as_deref(), id);
    io::atomic_write(&path, &download.bytes)?;
    println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
    Ok(())
}

/// Explicit target, then the server's suggested filename, then the id.
pub(super) fn target_path(output: Option<&Path>, suggested: Option<&str>, id: &str) -> PathBuf {
    match (output, suggested) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(name)) => PathBuf::from(name),
        (None, None) => PathBuf::from(format!("{id}.pdf")),
    }
}
