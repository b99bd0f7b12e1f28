//! Project savings from a stream CSV or a scenario JSON file
//!
//! Examples:
//!   project --goal 10000 --streams streams.csv
//!   project --scenario plans.json --format json --output plans_out.json

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};

use savings_projection::output::{write_csv, write_json, write_summary};
use savings_projection::scenario::load_scenarios;
use savings_projection::stream::load_streams;
use savings_projection::{Scenario, ScenarioRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Summary,
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "project", about = "Project savings growth toward a goal")]
struct Args {
    /// Savings goal (overrides the goal in a scenario file)
    #[arg(long)]
    goal: Option<f64>,

    /// CSV of stream definitions (replaces the streams in a scenario file)
    #[arg(long)]
    streams: Option<PathBuf>,

    /// JSON scenario file holding one scenario or an array of them
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// First observation time, RFC 3339 (defaults to now); weeks follow the local calendar
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// Stop after this many weeks (never more than the hard cap)
    #[arg(long)]
    max_steps: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Project even if inputs fail validation
    #[arg(long)]
    skip_validation: bool,
}

fn build_scenarios(args: &Args) -> Result<Vec<Scenario>> {
    let mut scenarios = match &args.scenario {
        Some(path) => load_scenarios(path)
            .with_context(|| format!("failed to load scenarios from {}", path.display()))?,
        None => {
            let Some(path) = &args.streams else {
                bail!("either --streams or --scenario is required");
            };
            let Some(goal) = args.goal else {
                bail!("--goal is required when projecting from a stream CSV");
            };
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "streams".to_string());
            vec![Scenario::new(name, goal, Vec::new())]
        }
    };

    let streams = match &args.streams {
        Some(path) => Some(
            load_streams(path)
                .with_context(|| format!("failed to load streams from {}", path.display()))?,
        ),
        None => None,
    };

    for scenario in &mut scenarios {
        if let Some(goal) = args.goal {
            scenario.goal = Some(goal);
        }
        if let Some(start) = args.start {
            scenario.start = Some(start);
        }
        if let Some(max_steps) = args.max_steps {
            scenario.max_steps = max_steps;
        }
        if let Some(streams) = &streams {
            scenario.streams = streams.clone();
        }
    }

    Ok(scenarios)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenarios = build_scenarios(&args)?;
    if scenarios.is_empty() {
        bail!("no scenarios to project");
    }

    if !args.skip_validation {
        for scenario in &scenarios {
            scenario
                .validate()
                .with_context(|| format!("scenario {:?} is invalid", scenario.name))?;
        }
    }

    if args.format == OutputFormat::Csv && scenarios.len() > 1 {
        bail!("CSV output holds a single scenario; use --format json or summary");
    }

    let start = Instant::now();
    let outcomes = ScenarioRunner::starting_now().run_all(&scenarios);
    log::info!("projection finished in {:?}", start.elapsed());

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        OutputFormat::Csv => write_csv(&outcomes[0].result, &mut out)?,
        OutputFormat::Json if outcomes.len() == 1 => write_json(&outcomes[0].result, &mut out)?,
        OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &outcomes)?,
        OutputFormat::Summary => {
            for (idx, outcome) in outcomes.iter().enumerate() {
                if idx > 0 {
                    writeln!(out)?;
                }
                writeln!(out, "== {} ==", outcome.name)?;
                write_summary(&outcome.result, outcome.goal, &mut out)?;
            }
        }
    }
    out.flush()?;

    if let Some(path) = &args.output {
        println!("Output written to {}", path.display());
    }
    Ok(())
}
