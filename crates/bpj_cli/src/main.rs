use std::net::SocketAddr;

use bpj_client::cli::{handle_command, JournalArgs, JournalCommands};
use bpj_client::config::{READ_KEY_VARS, SERVICE_KEY_VARS};
use bpj_client::{ApiConfig, Journal};
use bpj_core::Result;
use bpj_web::AppState;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "BioPeptidePlus journal reader", long_about = None)]
pub struct Cli {
    /// Base URL of the data API (defaults to SUPABASE_URL)
    #[arg(long)]
    url: Option<String>,
    /// API key (defaults to SUPABASE_ANON_KEY, or SUPABASE_SERVICE_ROLE_KEY for migrate)
    #[arg(long)]
    key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Journal(JournalCommands),
    /// Serve the journal JSON API
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

/// Read path configuration. A broken configuration is treated like a missing
/// one so the bundled articles are still shown.
fn read_config(cli: &Cli) -> Option<ApiConfig> {
    match ApiConfig::with_overrides(cli.url.clone(), cli.key.clone(), &READ_KEY_VARS) {
        Ok(Some(config)) => {
            info!("🔌 Data API at {}", config.base_url());
            Some(config)
        }
        Ok(None) => {
            info!("🔌 No data API configured, showing bundled articles only");
            None
        }
        Err(e) => {
            warn!("⚠️ Ignoring data API configuration: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    bpj_client::logging::init_logging();
    let cli = Cli::parse();

    let journal = Journal::from_config(read_config(&cli))?;

    match cli.command {
        Commands::Journal(command) => {
            let service = match &command {
                JournalCommands::Migrate { .. } => {
                    ApiConfig::with_overrides(cli.url.clone(), cli.key.clone(), &SERVICE_KEY_VARS)?
                }
                _ => None,
            };
            handle_command(JournalArgs { command }, &journal, service).await?;
        }
        Commands::Serve { addr } => {
            bpj_web::serve(addr, AppState::new(journal)).await?;
        }
    }

    Ok(())
}
