use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use opsdeck_client::{io, ApiClient, SopSession, SopUpdateRequest};
use opsdeck_core::sop::SopGenerateRequest;

use crate::output::{print_json, print_table};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SopSubcommand {
    /// Generate an SOP from a YAML request file (businessName, tasks, ...)
    Generate {
        #[arg(long)]
        file: PathBuf,
    },

    /// Revise an SOP with instructions or replacement markdown
    Update {
        id: String,

        /// Free-form revision instructions for the generator
        #[arg(long)]
        instructions: Option<String>,

        /// Markdown file replacing the body
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List saved SOPs
    List,

    /// Show an SOP's current content
    Show {
        id: String,

        /// Print the rendered HTML instead of markdown
        #[arg(long)]
        html: bool,
    },

    /// List an SOP's versions
    Versions { id: String },

    /// Make an older version current again
    Restore {
        id: String,

        #[arg(long)]
        version: String,
    },

    /// Download an SOP as a PDF
    Download {
        id: String,

        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Ask for review suggestions on an SOP
    Review { id: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run(client: &ApiClient, subcmd: SopSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SopSubcommand::Generate { file } => generate(client, &file, json).await,
        SopSubcommand::Update {
            id,
            instructions,
            file,
        } => update(client, &id, instructions, file.as_deref(), json).await,
        SopSubcommand::List => list(client, json).await,
        SopSubcommand::Show { id, html } => show(client, &id, html).await,
        SopSubcommand::Versions { id } => versions(client, &id, json).await,
        SopSubcommand::Restore { id, version } => restore(client, &id, &version, json).await,
        SopSubcommand::Download { id, output } => download(client, &id, output.as_deref()).await,
        SopSubcommand::Review { id } => review(client, &id, json).await,
    }
}

// ---------------------------------------------------------------------------
// generate / update
// ---------------------------------------------------------------------------

async fn generate(client: &ApiClient, file: &Path, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let request: SopGenerateRequest =
        serde_yaml::from_str(&data).context("request file is not valid YAML")?;

    let sop = client.generate_sop(&request).await.map_err(super::surface)?;

    if json {
        return print_json(&sop);
    }
    println!("Generated '{}' ({})", sop.title, sop.id);
    Ok(())
}

async fn update(
    client: &ApiClient,
    id: &str,
    instructions: Option<String>,
    file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    if instructions.is_none() && file.is_none() {
        anyhow::bail!("nothing to update: pass --instructions or --file");
    }

    let markdown = match file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let request = SopUpdateRequest {
        id: id.to_string(),
        instructions,
        markdown,
    };
    let sop = client.update_sop(&request).await.map_err(super::surface)?;

    if json {
        return print_json(&sop);
    }
    println!(
        "Updated '{}' (now version {})",
        sop.title,
        sop.version_number.unwrap_or(1)
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

async fn list(client: &ApiClient, json: bool) -> anyhow::Result<()> {
    let sops = client.saved_sops().await.map_err(super::surface)?;

    if json {
        return print_json(&sops);
    }

    if sops.is_empty() {
        println!("No saved SOPs yet.");
        return Ok(());
    }

    let rows = sops
        .iter()
        .map(|s| {
            vec![
                s.id.clone(),
                s.title.clone(),
                s.version_number
                    .map(|v| format!("v{v}"))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["id", "title", "version"], rows);
    Ok(())
}

async fn show(client: &ApiClient, id: &str, html: bool) -> anyhow::Result<()> {
    let session = SopSession::open(client, id).await.map_err(super::surface)?;
    let content = session.selected_content();

    if content.is_unavailable() {
        println!(
            "Content unavailable for '{}'. Regenerate it with 'opsdeck sop update {} --instructions ...'.",
            session.document().title,
            id
        );
        return Ok(());
    }

    let body = if html {
        content.html().with_context(|| {
            format!(
                "no HTML rendering stored for '{}'; re-save or regenerate to produce one",
                session.document().title
            )
        })?
    } else {
        // Legacy documents store the markdown as a bare string.
        content.markdown().unwrap_or_default()
    };
    println!("{body}");
    Ok(())
}

// ---------------------------------------------------------------------------
// versions / restore
// ---------------------------------------------------------------------------

async fn versions(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let session = SopSession::open(client, id).await.map_err(super::surface)?;

    if json {
        return print_json(&session.versions().to_vec());
    }

    let rows = session
        .versions()
        .iter()
        .map(|v| {
            vec![
                format!("v{}", v.version_number),
                v.id.clone(),
                if v.is_current_version {
                    "current".to_string()
                } else {
                    String::new()
                },
                v.version_created_at
                    .or(v.created_at)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["version", "id", "", "created"], rows);
    Ok(())
}

async fn restore(client: &ApiClient, id: &str, version: &str, json: bool) -> anyhow::Result<()> {
    let mut session = SopSession::open(client, id).await.map_err(super::surface)?;
    session.restore(version).await.map_err(super::surface)?;

    if json {
        return print_json(&serde_json::json!({
            "id": id,
            "currentVersionId": session.selected_version_id(),
            "versions": session.versions(),
        }));
    }
    println!(
        "Restored. Current version is now {} of '{}'.",
        session.selected_version_id(),
        session.document().title
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// download / review
// ---------------------------------------------------------------------------

async fn download(client: &ApiClient, id: &str, output: Option<&Path>) -> anyhow::Result<()> {
    let download = client.download_sop(id).await.map_err(super::surface)?;
    let path = super::jd::target_path(output, download.file_name.as_deref(), id);
    io::atomic_write(&path, &download.bytes)?;
    println!("Wrote {} ({} bytes)", path.display(), download.bytes.len());
    Ok(())
}

async fn review(client: &ApiClient, id: &str, json: bool) -> anyhow::Result<()> {
    let suggestions = client.review_sop(id).await.map_err(super::surface)?;

    if json {
        return print_json(&suggestions);
    }

    if suggestions.is_empty() {
        println!("No suggestions — the reviewer had nothing to flag.");
        return Ok(());
    }

    for s in &suggestions {
        println!("[{}] {}", s.suggestion_type, s.reason);
        println!("  - {}", s.original);
        println!("  + {}", s.suggested);
    }
    Ok(())
}
