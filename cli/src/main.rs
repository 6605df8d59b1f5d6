mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::CommandLine;
use tadisc_common::{Config, DiscoveryError, config};
use tadisc_core::{DiscoveryService, FileAccessoryStore};
use terminal::{logging, print};
use tracing::{error, info};

/// Conventional exit status after SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(&commands.log_file, commands.verbose)?;
    let mut store = FileAccessoryStore::create(&commands.output)
        .with_context(|| format!("failed to clear {}", commands.output.display()))?;

    let from_options = if commands.options {
        config::read_options_timeout(&commands.options_file)
    } else {
        None
    };
    let probe_timeout = config::resolve_scan_timeout(from_options, commands.timeout);

    let mut cfg: Config = Config::default().with_probe_timeout(probe_timeout);
    if let Some(jobs) = commands.jobs {
        cfg = cfg.with_concurrency(jobs.get());
    }
    info!(
        "Probe timeout {:.3}s, query timeout {:.1}s, up to {} concurrent hosts",
        cfg.probe_timeout.as_secs_f64(),
        cfg.query_timeout.as_secs_f64(),
        cfg.concurrency
    );

    let port: u16 = cfg.port;
    let mut service = DiscoveryService::new(cfg);
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            error!("Failed to listen for Ctrl-C, interrupts are disabled");
            std::future::pending::<()>().await;
        }
    };

    match service.run(&commands.network, &mut store, shutdown).await {
        Ok(report) => {
            if !commands.quiet {
                print::report(&report, port);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(DiscoveryError::Interrupted) => {
            if !commands.quiet {
                print::interrupted();
            }
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}
