// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use xc_core::igc::IgcError;
use xc_core::optimizer::{optimizer_by_id, OPTIMIZERS};
use xc_core::{Flight, IgcParser, OptimizerConfig, Point};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON optimizer config (cycles, mc_cycles, seed)
    #[arg(long, env = "XC_OPTIMIZER_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an IGC file and print a summary
    Parse {
        file: PathBuf,
        /// Print the whole flight as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find the turnpoints that maximize flown distance
    Optimize {
        file: PathBuf,
        /// Number of turnpoints including start and finish
        #[arg(short = 'n', long, default_value_t = 3)]
        turnpoints: usize,
        #[arg(long, default_value = "montecarlo")]
        optimizer: String,
        /// Parallel search workers
        #[arg(long)]
        cycles: Option<usize>,
        /// Perturbations per worker
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialise logging")?;

    match cli.command {
        Commands::Parse { file, json } => {
            let flight = load_flight(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&flight)?);
            } else {
                print_summary(&file, &flight);
            }
        }
        Commands::Optimize {
            file,
            turnpoints,
            optimizer,
            cycles,
            iterations,
            seed,
            json,
        } => {
            let mut config = match &cli.config {
                Some(path) => OptimizerConfig::from_file(path)
                    .with_context(|| format!("Failed to load optimizer config {:?}", path))?,
                None => OptimizerConfig::default(),
            };
            if let Some(cycles) = cycles {
                config.cycles = cycles;
            }
            if let Some(iterations) = iterations {
                config.mc_cycles = iterations;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            config.validate()?;

            let flight = load_flight(&file)?;
            let optimizer = optimizer_by_id(&optimizer, config)
                .with_context(|| format!("Available optimizers: {}", OPTIMIZERS.join(", ")))?;
            info!(
                "Optimizing — file={:?} points={} turnpoints={} optimizer={}",
                file,
                flight.points.len(),
                turnpoints,
                optimizer.id()
            );
            let result = optimizer.optimize(&flight.points, turnpoints)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for (i, point) in result.turnpoints.iter().enumerate() {
                    println!("{:>2} {}", i, describe_point(point));
                }
                println!("Distance: {:.3} km", result.distance / 1000.0);
            }
        }
    }

    Ok(())
}

fn load_flight(file: &Path) -> Result<Flight> {
    match IgcParser::parse_file(file) {
        Ok(flight) => Ok(flight),
        Err(IgcError::Parse(err)) => {
            let partial = err.partial();
            eprintln!(
                "Stopped after {} fixes ({:?} error)",
                partial.points.len(),
                err.kind()
            );
            Err(err).with_context(|| format!("Failed to parse {:?}", file))
        }
        Err(err) => Err(err).with_context(|| format!("Failed to read {:?}", file)),
    }
}

fn print_summary(file: &Path, flight: &Flight) {
    let header = &flight.header;
    println!("File:         {:?}", file);
    match header.manufacturer_info() {
        Some(m) => println!("Recorder:     {} ({})", m.name, header.unique_id),
        None => println!("Recorder:     {} ({})", header.manufacturer, header.unique_id),
    }
    if let Some(date) = header.date {
        println!("Date:         {}", date);
    }
    if let Some(pilot) = &header.pilot {
        println!("Pilot:        {}", pilot);
    }
    if let Some(glider) = &header.glider_type {
        println!("Glider:       {}", glider);
    }
    println!("Fixes:        {}", flight.points.len());
    if let (Some(first), Some(last)) = (flight.points.first(), flight.points.last()) {
        println!("Start:        {}", describe_point(first));
        println!("End:          {}", describe_point(last));
    }
    println!("Events:       {}", flight.events.len());
    println!("Log entries:  {}", flight.logbook.len());
    if let Some(task) = &flight.task {
        println!(
            "Task:         #{} {} ({} turnpoints)",
            task.number,
            task.description,
            task.turnpoints.len()
        );
    }
    println!(
        "Signed:       {}",
        if flight.signature.is_empty() { "no" } else { "yes" }
    );
}

fn describe_point(point: &Point) -> String {
    let time = point
        .time
        .map(|t| t.to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let validity = point.fix_validity.map_or('-', |v| v.as_char());
    format!(
        "{} {} {:>10.5} {:>11.5} {:>5}m",
        time, validity, point.latitude, point.longitude, point.gnss_altitude
    )
}
