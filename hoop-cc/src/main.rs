//! hoop-cc - Capture Client
//!
//! Command-line front end for the assessment flow: submits recorded clips to
//! the Analysis Service under the stored session id and manages that id.
//! Camera capture is not driven from here; see the library's `capture_loop`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use hoop_cc::client::AnalysisClient;
use hoop_cc::config::ClientConfig;
use hoop_cc::flow::AssessmentFlow;
use hoop_cc::session::{SessionManager, STATE_FILE_NAME};
use hoop_common::api::AnalysisOutcome;
use hoop_common::config::{RootFolderInitializer, RootFolderResolver};

/// Command-line arguments for hoop-cc
#[derive(Parser, Debug)]
#[command(name = "hoop-cc")]
#[command(about = "Dribbling assessment capture client")]
#[command(version)]
struct Args {
    /// Analysis Service base URL (overrides the config file)
    #[arg(short, long, env = "HOOP_SERVER_URL")]
    server_url: Option<String>,

    /// Root folder holding client state
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Config file (default: <config dir>/hoop-coach/hoop-cc.toml)
    #[arg(short, long, env = "HOOP_CC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit recorded clips, in order, to the current session
    Submit {
        /// Clip files
        #[arg(required = true)]
        clips: Vec<PathBuf>,

        /// Start a new session instead of resuming the stored one
        #[arg(long)]
        new: bool,
    },
    /// Show the stored session id
    Session,
    /// Start a new session
    New,
    /// Discard the session on the server and forget it locally
    Delete,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        "Starting Hoop Coach Capture Client (hoop-cc) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| hoop_common::config::module_config_path("hoop-cc"));
    let mut config = match &config_path {
        Some(path) => ClientConfig::load(path).context("Failed to load configuration")?,
        None => ClientConfig::default(),
    };
    if let Some(url) = args.server_url {
        config.server_url = url;
    }
    config.validate().context("Invalid configuration")?;

    let root_folder = RootFolderResolver::new("hoop-cc")
        .with_cli_arg(args.root_folder.or_else(|| config.root_folder.clone()))
        .resolve();
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let sessions = SessionManager::open(initializer.file_path(STATE_FILE_NAME))
        .context("Failed to read client state")?;
    info!("Client state: {}", sessions.state_path().display());

    let client = AnalysisClient::new(&config.server_url, config.connect_timeout())
        .context("Failed to build HTTP client")?;
    let mut flow = AssessmentFlow::new(
        Arc::new(client),
        sessions,
        config.retry,
        config.reset_delay(),
    );

    match args.command {
        Command::Submit { clips, new } => submit(&mut flow, clips, new).await,
        Command::Session => {
            match flow.session_id() {
                Some(id) => println!("{id}"),
                None => println!("No stored session"),
            }
            Ok(())
        }
        Command::New => {
            let id = flow.start_new()?;
            println!("{id}");
            Ok(())
        }
        Command::Delete => {
            match flow.session_id().map(str::to_owned) {
                Some(id) => {
                    let deleted = flow.delete_session().await?;
                    let result = if deleted {
                        "deleted"
                    } else {
                        "unknown to server, cleared"
                    };
                    println!("{id}: {result}");
                }
                None => println!("No stored session"),
            }
            Ok(())
        }
    }
}

async fn submit(flow: &mut AssessmentFlow, clips: Vec<PathBuf>, new: bool) -> Result<()> {
    let session_id = if new { flow.start_new()? } else { flow.enter()? };
    println!("Session {session_id}");

    for path in clips {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let outcome = match flow.submit_clip(bytes).await {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("{}", flow.status().message());
                return Err(err.into());
            }
        };
        print_outcome(&outcome);

        if outcome.is_saturated() {
            break;
        }
    }

    println!("{}", flow.status().message());
    Ok(())
}

fn print_outcome(outcome: &AnalysisOutcome) {
    let answered = outcome
        .feedback_list()
        .iter()
        .find(|clip| clip.clip_number == outcome.clip_number());
    if let Some(clip) = answered {
        println!("\nClip {}:\n{}", clip.clip_number, clip.feedback);
    }
    let themes: Vec<&str> = outcome.key_themes().iter().map(|t| t.label()).collect();
    if !themes.is_empty() {
        println!("Themes so far: {}", themes.join(", "));
    }

    if let Some(consolidated) = outcome.consolidated() {
        println!("\n=== Assessment ===\n{}", consolidated.feedback);
        println!("Technique: {}", consolidated.technique);
        println!("Skill level: {}", consolidated.skill_level);
        for tip in &consolidated.tips {
            println!("  - {tip}");
        }
        println!("Suggested drill: {}", consolidated.drill_suggestion);
    }
}
