mod app;
mod cache;
mod commands;
mod config;
mod domain;
mod event;
mod graphql;
mod hook;
mod navigator;
mod query;
mod session;
mod ui;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter directives for the log file, `RUST_LOG` syntax
const LOG_ENV: &str = "ERP9S_LOG";

#[derive(Parser, Debug)]
#[command(name = "erp9s")]
#[command(about = "A terminal dashboard for the recruitment ERP gateway, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/erp9s/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// GraphQL gateway URL, overrides the config file and environment
  #[arg(short, long)]
  gateway: Option<String>,
}

/// Log to a file under the data dir; the terminal belongs to the UI.
fn init_logging() -> Result<WorkerGuard> {
  let dir = dirs::data_dir()
    .ok_or_else(|| eyre!("Could not determine a data directory for the log file"))?
    .join("erp9s");
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let file = tracing_appender::rolling::never(&dir, "erp9s.log");
  let (writer, guard) = tracing_appender::non_blocking(file);
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging()?;

  let config = config::Config::load(args.config.as_deref(), args.gateway)?;

  let session = session::Session::from_config(&config)?;
  tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting erp9s");

  let mut app = app::App::new(&config, session);
  app.run().await?;

  Ok(())
}
