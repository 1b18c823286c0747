// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! `weave`: assemble graphs from a lexicon file and print them as JSON.

use clap::{Parser, ValueEnum};
use sectionweave::config::Lexicon;
use sectionweave::section::Point;
use sectionweave::{Aggregate, ExhaustivePolicy, Linkage, RandomPolicy, Result, SelectionPolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    Exhaustive,
    Random,
}

#[derive(Parser)]
#[command(name = "weave")]
#[command(about = "Assemble connected graphs from a dictionary of typed sections", long_about = None)]
#[command(version)]
struct Cli {
    /// Lexicon file (TOML, or JSON with a .json extension)
    lexicon: PathBuf,

    /// Selection policy
    #[arg(long, value_enum, default_value = "exhaustive")]
    policy: PolicyKind,

    /// Nucleation point; repeat for several. Overrides the lexicon's nuclei.
    #[arg(long = "nucleus")]
    nuclei: Vec<String>,

    /// Seed for the random policy
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_solutions: Option<usize>,

    #[arg(long)]
    max_steps: Option<usize>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long)]
    max_network_size: Option<usize>,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_log: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());
    if cli.json_log {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut lexicon = Lexicon::load(&cli.lexicon)?;
    if !cli.nuclei.is_empty() {
        lexicon.nuclei = cli.nuclei.iter().map(Point::new).collect();
    }
    let params = &mut lexicon.parameters;
    if cli.seed.is_some() {
        params.seed = cli.seed;
    }
    if let Some(n) = cli.max_solutions {
        params.max_solutions = n;
    }
    if let Some(n) = cli.max_steps {
        params.max_steps = n;
    }
    if let Some(n) = cli.max_depth {
        params.max_depth = n;
    }
    if let Some(n) = cli.max_network_size {
        params.max_network_size = n;
    }

    let dictionary = lexicon.to_dictionary()?;
    let nuclei = lexicon.nucleus_set();
    let params = lexicon.parameters.clone();

    let solutions = match cli.policy {
        PolicyKind::Exhaustive => {
            let mut policy = ExhaustivePolicy::new(dictionary, params)?;
            search(&mut policy, &nuclei)?;
            info!("{} steps taken", policy.steps_taken());
            policy.get_solutions()
        }
        PolicyKind::Random => {
            let mut policy = RandomPolicy::new(dictionary, params)?;
            search(&mut policy, &nuclei)?;
            info!("{} steps taken", policy.steps_taken());
            policy.get_solutions()
        }
    };

    info!("{} distinct solutions", solutions.len());
    print_solutions(&solutions)
}

fn search<P: SelectionPolicy>(policy: &mut P, nuclei: &std::collections::BTreeSet<Point>) -> Result<()> {
    let mut engine = Aggregate::new(policy);
    engine.aggregate(nuclei)?;
    info!(
        "{}, frame trail at most {} deep",
        engine.statistics(),
        engine.max_frame_depth()
    );
    Ok(())
}

fn print_solutions(solutions: &[Linkage]) -> Result<()> {
    let text = serde_json::to_string_pretty(solutions)?;
    println!("{}", text);
    Ok(())
}
