// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::{CommandConfig, Config};
use crate::engine::Supervisor;
use crate::exec::ProcessRunner;
use crate::watch::NotifySourceFactory;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (any failure here is fatal, before anything runs)
/// - the supervisor with the real process runner and `notify` watchers
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.conf);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {:?}", config_path))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let supervisor = Supervisor::new(NotifySourceFactory, Arc::new(ProcessRunner));

    // A watcher that fails to start aborts the rest of setup, but whatever
    // was already started keeps running until interrupted.
    let _handle = match supervisor.watch(Arc::new(cfg)) {
        Ok(handle) => {
            info!(watchers = handle.watcher_count(), "all watchers started");
            Some(handle)
        }
        Err(err) => {
            error!(error = %err, "watcher setup aborted");
            None
        }
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("interrupt received; exiting");

    Ok(())
}

/// Simple dry-run output: print startup commands and watchers.
fn print_dry_run(cfg: &Config) {
    println!("watchrun dry-run");
    println!();

    println!("startup commands ({}):", cfg.commands().len());
    print_commands(cfg.commands());
    println!();

    println!("watchers ({}):", cfg.watchers().len());
    for (idx, watcher) in cfg.watchers().iter().enumerate() {
        let state = if watcher.enable { "enabled" } else { "disabled" };
        println!("  - {} ({state})", watcher.label(idx));
        if watcher.recursive {
            println!("      recursive: true");
        }
        println!("      targets: {:?}", watcher.targets);
        print_commands(&watcher.commands);
    }
}

fn print_commands(commands: &[CommandConfig]) {
    for cmd in commands {
        println!("      cmd: {cmd}");
        if let Some(ref dir) = cmd.dir {
            println!("        dir: {}", dir.display());
        }
        println!("        timeout: {:?}", cmd.effective_timeout());
    }
}
