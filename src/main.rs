//! formrunner - declarative web form submission
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formrunner::cli::{execute, Action, CommandContext};
use formrunner::core::TypingConfig;
use formrunner::{Config, Menu};

/// Fill and submit opt-in forms from a registry of targets
#[derive(Parser, Debug)]
#[command(name = "formrunner")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Registry file (overrides FORMRUNNER_REGISTRY)
    #[arg(long, short = 'r', global = true)]
    registry: Option<PathBuf>,

    /// Comma-separated identities (overrides EMAILS)
    #[arg(long, global = true)]
    emails: Option<String>,

    /// Run in headed browser mode (visible window)
    #[arg(long, global = true)]
    headed: bool,

    /// Type without pauses between keystrokes
    #[arg(long, global = true)]
    no_typing_delay: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a target url as unverified
    Add {
        url: String,
        /// JSON file holding the form's input_fields object
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// List targets with their verification status
    List,
    /// Flip verification of the target at a 1-based position
    Toggle { position: usize },
    /// Try every unverified target and mark successes verified
    Verify,
    /// Replay every verified target for every identity
    Campaign,
    /// Interactive menu (default)
    Menu,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref registry) = args.registry {
        config.registry.path = registry.clone();
    }

    if let Some(ref emails) = args.emails {
        config.set_emails(emails);
    }

    if args.headed {
        config.browser.headed = true;
    }

    if args.no_typing_delay {
        config.typing = TypingConfig::instant();
    }

    let action = match args.command.unwrap_or(Commands::Menu) {
        Commands::Add { url, schema } => Action::AddTarget { url, schema },
        Commands::List => Action::ListTargets,
        Commands::Toggle { position } => Action::Toggle { position },
        Commands::Verify => Action::Verify,
        Commands::Campaign => Action::Campaign,
        Commands::Menu => {
            let mut menu = Menu::with_config(&config);
            menu.run().await?;
            return Ok(());
        }
    };

    let ctx = CommandContext::from_config(&config);
    let output = execute(action, &ctx).await?;
    println!("{}", output);

    Ok(())
}
