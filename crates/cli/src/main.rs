mod request;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsource_api::{FirestoreConnector, MemoryStore, StoreConnector};
use docsource_engine::{Provider, ReadResponse};
use docsource_types::{Diagnostics, LookupError};
use docsource_util::{ProviderConfig, load_config, redact_sensitive};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docsource")]
#[command(about = "Read a single document and publish its fields as typed values")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one document
    Read {
        /// Request file (JSON or YAML); stdin when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Serve documents from a JSON fixture instead of the store
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Print provider metadata and data source schemas
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {}", redact_sensitive(&format!("{error:#}")));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands) -> Result<ExitCode> {
    let config = load_config().context("load provider config")?;
    debug!(provider_type = %config.provider_type, "provider config ready");

    match command {
        Commands::Read {
            request: request_path,
            fixture,
        } => {
            let request = request::read_request(request_path.as_deref())?;
            let response = match connector(&config, fixture)? {
                Ok(connector) => read_document(&config, connector, &request)?,
                Err(failed) => failed,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.has_error() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema => {
            let provider = Provider::new(&config, Arc::new(MemoryStore::new()));
            let out = json!({
                "provider": provider.metadata(),
                "data_sources": provider.schemas(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build the store connector. A store client that cannot be built is reported
/// as a failed read rather than a command error.
fn connector(config: &ProviderConfig, fixture: Option<PathBuf>) -> Result<Result<Arc<dyn StoreConnector>, ReadResponse>> {
    if let Some(path) = fixture {
        let fixture = request::read_fixture(&path)?;
        let store = MemoryStore::from_fixture(&fixture).with_context(|| format!("load fixture {}", path.display()))?;
        info!(fixture = %path.display(), "serving documents from fixture");
        let connector: Arc<dyn StoreConnector> = Arc::new(store);
        return Ok(Ok(connector));
    }

    match FirestoreConnector::from_env(config.base_url.as_deref(), config.user_agent.as_deref()) {
        Ok(connector) => {
            debug!(base_url = connector.base_url(), "store endpoint resolved");
            let connector: Arc<dyn StoreConnector> = Arc::new(connector);
            Ok(Ok(connector))
        }
        Err(error) => {
            let error = LookupError::connection(redact_sensitive(&error.to_string()));
            Ok(Err(ReadResponse::failed(Diagnostics::from(error.to_diagnostic()))))
        }
    }
}

fn read_document(
    config: &ProviderConfig,
    connector: Arc<dyn StoreConnector>,
    request: &serde_json::Map<String, serde_json::Value>,
) -> Result<ReadResponse> {
    let provider = Provider::new(config, connector);
    let type_name = format!("{}_firestore_document", provider.type_name());
    let source = provider
        .data_source(&type_name)
        .with_context(|| format!("data source '{type_name}' is not registered"))?;
    Ok(source.read(request))
}
