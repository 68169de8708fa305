// ABOUTME: CLI for company-registry lookups and offline extraction of saved registry pages.
// ABOUTME: One-shot commands print a JSON body and exit non-zero unless it was a success; serve runs the HTTP API.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use regscrape_extract::{extract_detail, extract_search_results, extract_sections};
use regscrape_service::{
    handle_autocomplete, handle_complete_info, handle_search, health, port_from_env, serve,
    ApiResponse, ChromeLauncher, InfoRequest, RegistryService, SearchRequest, ServiceConfig,
};
use serde_json::{json, Value};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Look up companies in public business registers
#[derive(Parser, Debug)]
#[command(name = "regscrape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Jurisdiction code, e.g. ee, lv, fi
    #[arg(short, long, global = true, default_value = "ee")]
    jurisdiction: String,

    /// Output compact JSON instead of pretty
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the registry by company name or number
    Search(QueryArgs),

    /// List autocomplete suggestions for a partial name
    Autocomplete(QueryArgs),

    /// Retrieve the full record from a company detail page URL
    Info {
        url: String,
    },

    /// Extract records from a saved HTML page without a browser
    Extract {
        /// HTML file to read
        #[arg(long)]
        html: PathBuf,

        /// Base URL for resolving relative links (default: the jurisdiction's registry)
        #[arg(long)]
        base_url: Option<String>,

        #[arg(long, value_enum, default_value_t = ExtractKind::Detail)]
        kind: ExtractKind,
    },

    /// Print service health
    Health,

    /// Serve the lookup API over HTTP
    Serve {
        /// Port to listen on (default: $PORT, then 6666)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(clap::Args, Debug)]
struct QueryArgs {
    /// Company name
    #[arg(long)]
    name: Option<String>,

    /// Registry code
    #[arg(long)]
    number: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExtractKind {
    Sections,
    Search,
    Detail,
}

impl QueryArgs {
    fn into_request(self, jurisdiction: &str) -> SearchRequest {
        SearchRequest {
            jurisdiction_code: Some(jurisdiction.to_string()),
            company_name: self.name,
            company_number: self.number,
        }
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn extract_file(
    html: &Path,
    base_url: Option<String>,
    kind: ExtractKind,
    jurisdiction: &str,
) -> Result<Value> {
    let page = fs::read_to_string(html)
        .with_context(|| format!("failed to read {}", html.display()))?;
    let mut config = ServiceConfig::from_env(jurisdiction).extract;
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    let value = match kind {
        ExtractKind::Sections => serde_json::to_value(extract_sections(&page, &config)?)?,
        ExtractKind::Search => serde_json::to_value(extract_search_results(&page, &config)?)?,
        ExtractKind::Detail => serde_json::to_value(extract_detail(&page, &config)?)?,
    };
    Ok(value)
}

async fn run(command: Commands, jurisdiction: String) -> ApiResponse {
    let service = || RegistryService::new(ChromeLauncher);
    match command {
        Commands::Search(args) => {
            handle_search(&service(), &args.into_request(&jurisdiction)).await
        }
        Commands::Autocomplete(args) => {
            handle_autocomplete(&service(), &args.into_request(&jurisdiction)).await
        }
        Commands::Info { url } => {
            let req = InfoRequest {
                jurisdiction_code: Some(jurisdiction),
                url: Some(url),
            };
            handle_complete_info(&service(), &req).await
        }
        Commands::Extract {
            html,
            base_url,
            kind,
        } => match extract_file(&html, base_url, kind, &jurisdiction) {
            Ok(value) => ApiResponse::ok(value),
            Err(err) => ApiResponse::new(400, json!({ "error": format!("{:#}", err) })),
        },
        Commands::Health | Commands::Serve { .. } => health(),
    }
}

async fn serve_http(port: Option<u16>) -> ExitCode {
    let port = port.unwrap_or_else(port_from_env);
    match serve(RegistryService::new(ChromeLauncher), port).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Error: {}", err);
        return ExitCode::FAILURE;
    }
    let compact = cli.compact;

    let response = match cli.command {
        Commands::Serve { port } => return serve_http(port).await,
        command => run(command, cli.jurisdiction).await,
    };
    let rendered = if compact {
        serde_json::to_string(&response.body)
    } else {
        serde_json::to_string_pretty(&response.body)
    };
    match rendered {
        Ok(out) => println!("{}", out),
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    }

    if response.status == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
