use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nxstat::{Config, ReportOptions};

#[derive(Parser)]
#[command(
    name = "nxstat",
    version,
    about = "Repository manager access-log traffic, broken down by package format"
)]
struct Cli {
    /// Access log to analyze. Use `-` to read standard input.
    log_file: PathBuf,

    /// Extra configuration file, layered over ~/.config/nxstat/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of clients to rank per package format.
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Print the analysis as JSON instead of text tables.
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(top) = cli.top {
        config.report.top_clients = top;
    }

    tracing::info!(path = %cli.log_file.display(), "analyzing");
    let analysis = nxstat::analyze(&cli.log_file, &config)?;
    if analysis.summary.malformed > 0 {
        tracing::warn!(
            malformed = analysis.summary.malformed,
            "some lines did not look like access-log entries and were skipped"
        );
    }

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut stdout, &analysis)?;
        writeln!(stdout)?;
    } else {
        let options = ReportOptions::from(&config.report);
        stdout.write_all(analysis.render(&options).as_bytes())?;
    }
    Ok(())
}
