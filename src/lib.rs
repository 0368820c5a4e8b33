// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod graph;
pub mod logging;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::config::{ConfiguredGraph, build_graph, validate_config};
use crate::engine::{RunReport, Scheduler};
use crate::types::{FailurePolicy, TerminationMode};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - task graph construction
/// - scheduler seeding and the worker pool
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let mut cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {:?}", config_path))?;

    apply_cli_overrides(&mut cfg, &args);
    validate_config(&cfg).context("invalid command-line overrides")?;

    let configured = build_graph(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &configured);
        return Ok(());
    }

    let ConfiguredGraph { graph, seeds } = configured;

    let options = cfg.config.scheduler_options();
    let scheduler = Scheduler::new(Arc::new(graph), options);
    for (task, payload) in seeds {
        scheduler.seed(task, payload)?;
    }

    // Ctrl-C → graceful shutdown (the only way out of daemon mode).
    {
        let shutdown = scheduler.shutdown_handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl-C received; shutting down");
            shutdown.shutdown();
        });
    }

    let report = scheduler.run().await?;
    print_report(&report);
    Ok(())
}

/// Command-line flags take precedence over the `[config]` section.
pub fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) {
    if let Some(workers) = args.workers {
        cfg.config.workers = workers;
    }
    if let Some(concurrency) = args.concurrency {
        cfg.config.concurrency = Some(concurrency);
    }
    if let Some(mode) = args.termination {
        cfg.config.termination = mode;
    }
    if args.daemon {
        cfg.config.termination = TerminationMode::Daemon;
    }
    if let Some(policy) = args.failure_policy {
        cfg.config.failure_policy = policy;
    }
    if args.fail_fast {
        cfg.config.failure_policy = FailurePolicy::FailFast;
    }
}

fn print_report(report: &RunReport) {
    println!("fandag run finished");
    println!("  completed = {}", report.completed);
    println!("  failed    = {}", report.failed);
    match report.max_depth {
        Some(depth) => println!("  max depth = {depth}"),
        None => println!("  max depth = -"),
    }
    if report.abandoned > 0 {
        println!("  abandoned = {}", report.abandoned);
    }
}

/// Simple dry-run output: print pool settings, tasks, triggers and seeds.
fn print_dry_run(cfg: &ConfigFile, configured: &ConfiguredGraph) {
    let options = cfg.config.scheduler_options();

    println!("fandag dry-run");
    println!("  config.workers = {}", options.workers);
    println!("  config.concurrency = {}", options.effective_concurrency());
    println!("  config.termination = {:?}", options.termination);
    println!("  config.failure_policy = {:?}", options.failure_policy);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        println!("      action: {:?}", task.action);
        if let Some(factor) = task.factor {
            println!("      factor: {factor}");
        }
        if let Some(amount) = task.amount {
            println!("      amount: {amount}");
        }
        if let Some(delay) = task.delay_ms {
            println!("      delay_ms: {delay}");
        }
        if !task.triggers.is_empty() {
            println!("      triggers: {:?}", task.triggers);
        }
    }
    println!();

    println!("seeds ({}):", cfg.seed.len());
    for seed in cfg.seed.iter() {
        println!("  - {} <- {}", seed.task, seed.payload);
    }
    println!();

    let seed_ids: Vec<_> = configured.seeds.iter().map(|(id, _)| *id).collect();
    match configured.graph.unrolled_count(&seed_ids) {
        Some(count) => println!("expected action invocations: {count}"),
        None => println!("expected action invocations: unbounded (trigger cycle reachable)"),
    }

    debug!("dry-run complete (no execution)");
}
