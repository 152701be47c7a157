#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Bampf trooper through scripted steps.

mod config;
mod script;
mod session;
mod soak;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use bampf_core::Level;
use bampf_rendering::RenderingBackend;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};

use session::{Session, TextBackend};

/// Drives a trooper through scripted steps and prints what its observers see.
#[derive(Parser, Debug)]
#[command(name = "bampf")]
#[command(about = "Runs scripted steps against a Bampf trooper")]
struct Args {
    /// Trooper level; 0 is the single-cube preview.
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(Level::MAX.get()))
    )]
    level: u32,

    /// Path to a TOML file overriding the energy and cell tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log merges, splits, and every step.
    #[arg(short, long)]
    verbose: bool,

    /// Run this many random steps instead of the script.
    #[arg(long)]
    soak: Option<usize>,

    /// Seed for the random steps of a soak run.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Steps such as `attach*9`, `detach-cores=12`, `tick*250`, `pickup`.
    steps: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = config::load(args.config.as_deref())?;
    let level = Level::new(args.level);
    let mut session = Session::new(level, &config)
        .with_context(|| format!("failed to start a level {} trooper", level.get()))?;

    if let Some(steps) = args.soak {
        let report = soak::run(&mut session, steps, args.seed)
            .with_context(|| format!("soak run with seed {} failed", args.seed))?;
        println!(
            "soak: {} steps, {} merges, health {}..={}",
            report.steps, report.merges, report.lowest, report.highest
        );
        println!("{}", session.status_line());
        return Ok(());
    }

    let steps = script::parse(&args.steps)?;
    info!(level = level.get(), steps = steps.len(), "running script");

    let mut backend = TextBackend::new(io::stdout().lock());
    backend.present("start", session.scene())?;
    println!("{}", session.status_line());
    for (step, label) in steps.into_iter().zip(&args.steps) {
        session.run(step)?;
        backend.present(label, session.scene())?;
        println!("{}", session.status_line());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_max_level(filter)
        .with_writer(io::stderr)
        .init();
}
