//! CLI entry point for seqfetch.

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};

mod app;
mod cli;

use app::config::RunConfig;
use app::{runtime, terminal};
use cli::Args;

const DEBUG_HINT: &str = "Use --debug for developer friendly information";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    terminal::init_tracing(terminal::resolve_default_log_level(&args));
    debug!(?args, "CLI arguments parsed");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if args.debug {
                eprintln!("Error: {err:?}");
            } else {
                eprintln!("{err}\n\n{DEBUG_HINT}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = RunConfig::from_args(args, io::stderr().is_terminal())?;
    info!("seqfetch starting");

    let report = runtime::run(config).await?;

    let mut stdout = io::stdout().lock();
    for line in report.summary.table.report_lines() {
        writeln!(stdout, "{line}")?;
    }
    if let Some(path) = report.saved_copy {
        info!(path = %path.display(), "saved record copy");
    }
    Ok(())
}
