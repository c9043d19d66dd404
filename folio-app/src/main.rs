use anyhow::{Context, Result};
use clap::Parser;
use folio_common::observability::{LogConfig, LogFormat, init_logging};
use folio_config::FolioConfigLoader;
use std::path::PathBuf;
use tether::{Tether, build_from_config, run_exec, session_from_config};
mod tether;

/// A portfolio you browse from the terminal.
#[derive(Parser, Debug)]
#[command(name = "folio", version)]
struct Cli {
    /// Config file; defaults to `folio.yaml` in the user config dir and then
    /// the working directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run LINE without the UI and print the transcript. Repeatable.
    #[arg(long = "exec", value_name = "LINE")]
    exec: Vec<String>,

    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// text or json
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let loader = match &cli.config {
        Some(path) => FolioConfigLoader::new().with_file(path),
        None => FolioConfigLoader::new().with_default_locations(),
    };
    let cfg = loader.load().context("loading configuration")?;

    // 2) Logging; stderr stays quiet while the UI owns the screen
    let interactive = cli.exec.is_empty();
    let log_path = init_logging(LogConfig {
        app_name: "folio",
        log_dir: cli.log_dir.clone().or_else(|| cfg.logging.dir.clone()),
        emit_stderr: cfg.logging.stderr && !interactive,
        format: cli.log_format.unwrap_or(cfg.logging.format),
        default_filter: cfg.logging.filter.clone(),
    })?;
    tracing::info!(log = %log_path.display(), interactive, "folio starting");

    let session = session_from_config(&cfg);

    if !interactive {
        for line in run_exec(session, &cli.exec) {
            println!("{line}");
        }
        return Ok(());
    }

    let mut tether = Tether::new();
    build_from_config(&mut tether, &cfg, session)?;
    tether.run().await
}
