//! trek: drift chamber track reconstruction from the command line.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

use trek_io::{read_events, SetupConfig, TrackWriter};
use trek_reco::{reconstruct_batch, ChamberReconstructor, ReconstructionStatistics};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    TrekIo(#[from] trek_io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] trek_core::Error),
}

/// Straight-line track reconstruction for four-wire drift chambers.
#[derive(Parser)]
#[command(name = "trek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct tracks from an event file
    Process {
        /// Input event file (JSON lines)
        input: PathBuf,

        /// Setup configuration (JSON)
        #[arg(short, long)]
        chambers: PathBuf,

        /// Output track file (.csv or .jsonl)
        #[arg(short, long)]
        output: PathBuf,

        /// Reconstruct events one after another
        #[arg(long)]
        sequential: bool,
    },

    /// Show the chambers of a setup configuration
    Info {
        /// Setup configuration (JSON)
        chambers: PathBuf,
    },

    /// Time sequential against parallel batch reconstruction
    Benchmark {
        /// Input event file (JSON lines)
        input: PathBuf,

        /// Setup configuration (JSON)
        #[arg(short, long)]
        chambers: PathBuf,

        /// Number of iterations
        #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
        iterations: u64,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Process {
            input,
            chambers,
            output,
            sequential,
        } => {
            let setup = SetupConfig::from_file(&chambers)?;
            let config = setup
                .reconstruction
                .clone()
                .with_parallel(!sequential && setup.reconstruction.parallel);
            config.validate()?;
            debug!("Reconstruction config: {:?}", config);
            let reconstructor = ChamberReconstructor::new(config);

            info!("Reading events from {}", input.display());
            let events = read_events(&input)?;
            info!(
                "{} event(s), {} chamber(s)",
                events.len(),
                setup.chambers.len()
            );

            let start = Instant::now();
            let outcomes = reconstruct_batch(&events, &setup.chambers, &reconstructor);
            let elapsed = start.elapsed();

            let mut writer = TrackWriter::create(&output)?;
            info!("Writing tracks to {} ({:?})", output.display(), writer.format());
            let written = writer.write_outcomes(&outcomes)?;
            writer.flush()?;

            let stats = ReconstructionStatistics::from_outcomes(&outcomes);
            println!(
                "Processed {} events in {:.3}s",
                stats.events,
                elapsed.as_secs_f64()
            );
            println!(
                "Tracks: {} ({:.1}%)",
                written,
                stats.success_ratio() * 100.0
            );
            println!("No eligible hits: {}", stats.no_eligible_hits);
            println!("No candidate: {}", stats.no_candidate);
            println!("Unknown chamber: {}", stats.unknown_chamber);
            if stats.other > 0 {
                println!("Other failures: {}", stats.other);
            }
        }

        Commands::Info { chambers } => {
            let setup = SetupConfig::from_file(&chambers)?;
            println!("Setup: {}", chambers.display());
            println!("Chambers: {}", setup.chambers.len());
            for id in setup.chamber_ids() {
                let chamber = &setup.chambers[&id];
                println!(
                    "  chamber {:>4}  plane {:>2}  group {:>2}",
                    id, chamber.plane, chamber.group
                );
                for (wire, params) in chamber.calibration.wires.iter().enumerate() {
                    println!(
                        "    wire {}  offset {:>6}  speed {:.5}",
                        wire, params.offset, params.speed
                    );
                }
            }
            let rc = &setup.reconstruction;
            println!(
                "Reconstruction: near clamp {}, far clamp {}, epsilon {:e}, parallel {} (from {} combinations)",
                rc.near_clamp, rc.far_clamp, rc.degeneracy_epsilon, rc.parallel, rc.parallel_threshold
            );
        }

        Commands::Benchmark {
            input,
            chambers,
            iterations,
        } => {
            let setup = SetupConfig::from_file(&chambers)?;
            let events = read_events(&input)?;

            println!(
                "Benchmarking with {} events, {} iterations",
                events.len(),
                iterations
            );
            println!(
                "{:<12} | {:<15} | {:<15} | {:<15}",
                "Mode", "Mean Time (ms)", "Min Time (ms)", "Max Time (ms)"
            );
            println!("{:-<67}", "");

            for (parallel, name) in [(false, "Sequential"), (true, "Parallel")] {
                let reconstructor =
                    ChamberReconstructor::new(setup.reconstruction.clone().with_parallel(parallel));

                // Warmup
                let _ = reconstruct_batch(&events, &setup.chambers, &reconstructor);

                let mut times = Vec::new();
                for _ in 0..iterations {
                    let start = Instant::now();
                    let outcomes = reconstruct_batch(&events, &setup.chambers, &reconstructor);
                    times.push(start.elapsed().as_secs_f64() * 1000.0);
                    debug!(
                        "{} pass: {} tracks",
                        name,
                        outcomes.iter().filter(|o| o.track().is_some()).count()
                    );
                }

                let min_time = times.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                let max_time = times.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                let mean_time = times.iter().sum::<f64>() / times.len() as f64;

                println!(
                    "{:<12} | {:<15.3} | {:<15.3} | {:<15.3}",
                    name, mean_time, min_time, max_time
                );
            }
        }
    }

    Ok(())
}
