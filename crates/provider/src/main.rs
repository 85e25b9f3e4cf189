//! cloud.ca Terraform Provider driver
//!
//! Runs single provider operations against the cloud.ca API. State and
//! configuration are exchanged as JSON or MessagePack on stdin/stdout or
//! through files.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use cloudca_provider::config::{API_KEY_ENV, API_URL_ENV};
use cloudca_provider::state::{make_state, string_value, StateFormat};
use cloudca_provider::{CloudcaProvider, Diagnostic, DynamicValue};

/// cloud.ca Terraform Provider
#[derive(Parser)]
#[command(name = "terraform-provider-cloudca")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// cloud.ca API URL
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// cloud.ca API key
    #[arg(long, env = API_KEY_ENV, global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Encoding of state/config input and state output
    #[arg(long, value_enum, default_value_t = StateFormat::Json, global = true)]
    format: StateFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider and resource schemas
    Schema,

    /// Create a resource from its configuration
    Create {
        /// Resource type, e.g. cloudca_network_acl
        type_name: String,

        /// Configuration file, `-` for stdin
        #[arg(long, default_value = "-")]
        config: PathBuf,
    },

    /// Refresh a resource from its state
    Read {
        type_name: String,

        /// State file, `-` for stdin
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Delete a resource described by its state
    Delete {
        type_name: String,

        /// State file, `-` for stdin
        #[arg(long, default_value = "-")]
        state: PathBuf,
    },

    /// Import an existing resource by <service_code>/<environment_name>/<id>
    Import { type_name: String, id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries documents only
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let provider = CloudcaProvider::new();
    let format = cli.format;

    if !matches!(cli.command, Commands::Schema) {
        let provider_config = make_state(vec![
            ("api_url", string_value(cli.api_url.unwrap_or_default())),
            ("api_key", string_value(cli.api_key.unwrap_or_default())),
        ]);
        fail_on(provider.configure(&provider_config).await)?;
    }

    match cli.command {
        Commands::Schema => print_json(&provider.schema()),
        Commands::Create { type_name, config } => {
            let config = read_value(&config, format)?;
            fail_on(provider.validate_resource_config(&type_name, &config)?)?;

            let plan = provider.plan_resource_change(&type_name, &DynamicValue::Null, &config)?;
            let state = provider
                .apply_resource_change(&type_name, &DynamicValue::Null, &plan.planned_state)
                .await?;
            info!("Created {} {}", type_name, state.id());
            write_value(&state, format)
        }
        Commands::Read { type_name, state } => {
            let state = read_value(&state, format)?;
            let refreshed = provider.read_resource(&type_name, &state).await?;
            write_value(&refreshed.unwrap_or_default(), format)
        }
        Commands::Delete { type_name, state } => {
            let state = read_value(&state, format)?;
            provider
                .apply_resource_change(&type_name, &state, &DynamicValue::Null)
                .await?;
            info!("Deleted {} {}", type_name, state.id());
            Ok(())
        }
        Commands::Import { type_name, id } => {
            let state = provider.import_resource_state(&type_name, &id).await?;
            write_value(&state, format)
        }
    }
}

fn read_value(path: &Path, format: StateFormat) -> Result<DynamicValue> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
    };
    format
        .decode(&raw)
        .with_context(|| format!("parsing {:?} input", format))
}

fn write_value(value: &DynamicValue, format: StateFormat) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&format.encode(value)?)?;
    stdout.flush()?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fail_on(diagnostics: Vec<Diagnostic>) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    for d in &diagnostics {
        match &d.attribute {
            Some(attr) => eprintln!("Error: {} ({}): {}", d.summary, attr, d.detail),
            None => eprintln!("Error: {}: {}", d.summary, d.detail),
        }
    }
    bail!("{} error(s) reported", diagnostics.len())
}
