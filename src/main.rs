//! Appx CLI
//!
//! Command-line interface for the API directory.
//! Provides the interactive browser, a one-shot listing, and the catalog service.

use appx::logging::{self, LogTarget};
use appx::session::{FetchRequest, FilterMode, Session};
use appx::{search, AppConfig, AppSource, DEFAULT_BASE_URL};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Appx - API directory browser
///
/// Lists app API endpoints and filters them by name as you type.
#[derive(Parser)]
#[command(name = "appx")]
#[command(author = "Appx Contributors")]
#[command(version)]
#[command(about = "Search, discover, and integrate app APIs", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Source options for the default `browse` command
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the catalog comes from
#[derive(Args, Clone, Debug)]
struct SourceArgs {
    /// Base URL of the catalog service
    #[arg(long, env = "APPX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Read the catalog from a JSON file instead of the service
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Filter locally or ask the service for every query
    #[arg(long, value_enum, default_value_t = FilterMode::Client)]
    mode: FilterMode,
}

impl SourceArgs {
    fn config(&self) -> AppConfig {
        AppConfig {
            base_url: self.base_url.clone(),
            catalog_file: self.catalog.clone(),
            filter_mode: self.mode,
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Browse the directory interactively (default)
    Browse {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the apps matching a query
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Name filter (case-insensitive substring)
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        query: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Serve a catalog file on /api/apps and /api/apps/search
    Serve {
        /// JSON file with [{id, name, api}, ...]
        #[arg(short, long)]
        catalog: PathBuf,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        addr: SocketAddr,
    },
}

fn main() {
    let Cli { source, command } = Cli::parse();
    let command = command.unwrap_or(Commands::Browse { source });

    let result = match command {
        Commands::Browse { source } => {
            logging::init(LogTarget::File(logging::default_log_path()));
            tracing::info!(version = appx::VERSION, "appx browser starting up");
            appx::tui::run(source.config())
        }

        Commands::List {
            source,
            query,
            json,
        } => {
            logging::init(LogTarget::Stderr);
            cmd_list(source.config(), &query, json)
        }

        Commands::Serve { catalog, addr } => {
            logging::init(LogTarget::Stderr);
            cmd_serve(&catalog, addr)
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        if e.is_fetch_error() {
            eprintln!(
                "{} is the catalog service running? Point --base-url (or APPX_BASE_URL) at it, or pass --catalog <file>",
                style("hint:").yellow()
            );
        }
        std::process::exit(1);
    }
}

fn run_requests(
    session: &mut Session,
    source: &dyn AppSource,
    requests: impl IntoIterator<Item = FetchRequest>,
) {
    for request in requests {
        session.apply(request.execute(source));
    }
}

/// List command implementation
fn cmd_list(config: AppConfig, query: &str, json: bool) -> appx::Result<()> {
    let source = config.source()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading API directory from {}", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let mut session = Session::new(config.filter_mode);
    let requests = session.reload();
    run_requests(&mut session, source.as_ref(), requests);
    let request = session.set_query(query);
    run_requests(&mut session, source.as_ref(), request);

    spinner.finish_and_clear();

    if let Some(reason) = session.error() {
        return Err(appx::AppxError::LoadFailed(reason.to_string()));
    }

    let view = session.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{} {}", style("→").cyan().bold(), style(session.counter_text()).bold());
    println!();

    for (i, app) in view.iter().enumerate() {
        let name: String = search::highlight(&app.name, query)
            .iter()
            .map(|segment| {
                if segment.is_match {
                    style(segment.text).yellow().bold().underlined().to_string()
                } else {
                    style(segment.text).bold().to_string()
                }
            })
            .collect();

        println!("  {} {}", style(format!("{:3}.", i + 1)).dim(), name);
        println!("       {}", style(&app.api).cyan());
    }

    if view.is_empty() {
        println!("  {}", style("No results found").dim());
    }

    Ok(())
}

/// Serve command implementation
fn cmd_serve(catalog: &std::path::Path, addr: SocketAddr) -> appx::Result<()> {
    let records = appx::catalog::load_catalog(catalog)?;

    println!(
        "{} Serving {} apps on {}",
        style("→").cyan().bold(),
        style(records.len()).yellow(),
        style(format!("http://{}", addr)).cyan()
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(appx::server::serve(addr, records))
}
