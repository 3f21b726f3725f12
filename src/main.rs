//! meditree - index a media directory and serve it over HTTP.
//!
//! Usage:
//!   meditree                    Build the tree and serve it
//!   meditree --config PATH      Use a specific configuration file
//!   meditree export [-o FILE]   Write the listing JSON without serving
//!   meditree --help             Show help

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use meditree_server::{AppConfig, AppState, Server};

#[derive(Parser)]
#[command(
    name = "meditree",
    version,
    about = "Index a media directory and serve it over HTTP",
    long_about = "meditree walks a directory once, keeps the files matching the \
                  configured patterns, and serves the resulting tree as JSON at \
                  /list and the files themselves at /file/<path>."
)]
struct Cli {
    /// Configuration file (defaults to meditree.json in this or a parent directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured port
    #[arg(short, long)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the tree and write the listing JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Command::Export { output }) => run_export(&config, output),
        None => run_serve(&config, cli.port),
    }
}

/// Load the configuration from an explicit path or by discovery.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path),
        None => {
            let cwd = std::env::current_dir().context("Cannot read working directory")?;
            AppConfig::discover(&cwd)
        }
    };
    config.context("Failed to load configuration")
}

/// Build the tree, then serve it until Ctrl-C.
fn run_serve(config: &AppConfig, port: Option<u16>) -> Result<()> {
    let state = AppState::init(config).context("Failed to build media tree")?;
    print_summary(&state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(async move {
        let server = Server::bind(addr, state.into())
            .await
            .with_context(|| format!("Cannot listen on {addr}"))?;
        server
            .run(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("shutting down");
            })
            .await
            .context("Server failed")
    })
}

/// Build the tree and export the listing JSON.
fn run_export(config: &AppConfig, output: Option<PathBuf>) -> Result<()> {
    let state = AppState::init(config).context("Failed to build media tree")?;
    print_summary(&state);

    let listing = state.listing();
    match output {
        Some(output_path) => {
            std::fs::write(&output_path, &listing)
                .with_context(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", String::from_utf8_lossy(&listing));
        }
    }

    Ok(())
}

/// Print a short build summary to stderr.
fn print_summary(state: &AppState) {
    let tree = state.tree();
    let classifier = state.classifier();
    if classifier.is_empty() {
        tracing::warn!("no file patterns configured, the listing will be empty");
    }

    eprintln!();
    eprintln!("{}", "─".repeat(60));
    eprintln!(" {}", tree.root_path.display());
    eprintln!(
        " {} files ({}), {} directories",
        tree.stats.total_files,
        humansize::format_size(tree.stats.total_size, humansize::BINARY),
        tree.stats.total_dirs
    );
    eprintln!(
        " {} excluded files, {} pruned directories",
        tree.stats.excluded_files, tree.stats.pruned_dirs
    );
    eprintln!(" {} file pattern(s):", classifier.len());
    for (pattern, tag) in classifier.rules() {
        eprintln!("   {pattern} -> {tag}");
    }
    eprintln!(" Built in {:.2}s", tree.build_duration.as_secs_f64());
    eprintln!("{}", "─".repeat(60));

    if tree.has_omissions() {
        eprintln!();
        eprintln!("{} path(s) omitted during build:", tree.omissions.len());
        for omission in &tree.omissions {
            eprintln!("  {}: {}", omission.path.display(), omission.message);
        }
    }
    eprintln!();
}
