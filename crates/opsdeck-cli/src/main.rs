mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, jd::JdSubcommand, profile::ProfileSubcommand, sop::SopSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "opsdeck",
    about = "Organization knowledge base, role builder, and SOP builder from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: $OPSDECK_CONFIG, ./.opsdeck/, then ~/.opsdeck/)
    #[arg(long, global = true, env = "OPSDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage connection settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// View and edit the organization profile
    Profile {
        #[command(subcommand)]
        subcommand: ProfileSubcommand,
    },

    /// Knowledge-base readiness: health, Business Brain, next step
    Readiness,

    /// Quick wins and remaining profile tasks
    Tasks,

    /// Uploaded knowledge documents and their extraction state
    Docs,

    /// Role builder (AI job descriptions)
    Jd {
        #[command(subcommand)]
        subcommand: JdSubcommand,
    },

    /// SOP builder (generation, versions, review)
    Sop {
        #[command(subcommand)]
        subcommand: SopSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // Streaming commands narrate progress; keep their tracing at INFO.
    let default_level = match &cli.command {
        Commands::Jd { .. } | Commands::Sop { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(dispatch(cli)) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config { subcommand } => cmd::config::run(config_path, subcommand, cli.json),
        Commands::Profile { subcommand } => {
            let client = cmd::build_client(config_path)?;
            cmd::profile::run(&client, subcommand, cli.json).await
        }
        Commands::Readiness => {
            let client = cmd::build_client(config_path)?;
            cmd::readiness::run(&client, cli.json).await
        }
        Commands::Tasks => {
            let client = cmd::build_client(config_path)?;
            cmd::tasks::run(&client, cli.json).await
        }
        Commands::Docs => {
            let client = cmd::build_client(config_path)?;
            cmd::docs::run(&client, cli.json).await
        }
        Commands::Jd { subcommand } => {
            let client = cmd::build_client(config_path)?;
            cmd::jd::run(&client, subcommand, cli.json).await
        }
        Commands::Sop { subcommand } => {
            let client = cmd::build_client(config_path)?;
            cmd::sop::run(&client, subcommand, cli.json).await
        }
    }
}
