//! # MedTrace CLI
//!
//! Entry point: reads configuration from the environment, applies
//! command-line overrides, opens the configured ledger store and runs one
//! command.
//!
//! Exit codes: `0` success, `2` invalid input, `3` duplicate commission,
//! `4` unknown medication, `5` storage failure, `1` anything else.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use medtrace_ledger::{LedgerError, LedgerErrorKind};
use tracing::{debug, error};

use medtrace_node::cli::{self, Cli, Command};
use medtrace_node::config::NodeConfig;
use medtrace_node::demo;
use medtrace_node::logging::init_logging;
use medtrace_node::runtime::Node;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("[medtrace] {:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = NodeConfig::from_env().context("Failed to read configuration")?;
    cli.apply(&mut config);
    init_logging(&config.logging).context("Failed to initialize logging")?;
    debug!("[medtrace] Configuration: {:?}", config);

    let output = if cli.command == Command::Demo {
        demo::run().await?
    } else {
        let node = Node::open(&config).context("Failed to open ledger store")?;
        let logger = node.spawn_event_logger();
        let output = cli::execute(node.service(), cli.command).await;
        node.shutdown(logger).await;
        output?
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<LedgerError>().map(LedgerError::kind) {
        Some(LedgerErrorKind::Validation) => 2,
        Some(LedgerErrorKind::Conflict) => 3,
        Some(LedgerErrorKind::NotFound) => 4,
        Some(LedgerErrorKind::Storage) => 5,
        None => 1,
    }
}
