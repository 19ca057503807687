//! Zero-temperature relaxation of the 2D Ising model on a torus.
//!
//! `ensemble`  – many trials, fraction reaching the ground state
//! `single`    – one trial, energy / magnetization time series
//! `snapshots` – one trial, PNG of the lattice after every sweep
//! `animate`   – stitch snapshots into a looping GIF

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ising_t0::config::{SeedPolicy, SimConfig, DEFAULT_CHECKPOINT_INTERVAL, DEFAULT_CHECKPOINT_START};
use ising_t0::ensemble::{Ensemble, TrialOutcome};
use ising_t0::measure::Recorder;
use ising_t0::render::{self, SnapshotWriter, DEFAULT_FRAME_DELAY_MS};
use ising_t0::report;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "ising_t0", about = "Zero-temperature 2D Ising dynamics")]
struct Cli {
    /// Debug-level logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an ensemble of independent trials
    Ensemble(EnsembleArgs),
    /// Record energy and magnetization of a single trial
    Single(SingleArgs),
    /// Write a PNG of a single trial after every sweep
    Snapshots(SnapshotArgs),
    /// Assemble snapshots into a looping GIF
    Animate(AnimateArgs),
}

#[derive(Args)]
struct Common {
    /// Lattice side length L
    #[arg(long, default_value = "50")]
    lattice_size: usize,

    /// Master seed; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,
}

impl Common {
    fn seed_policy(&self) -> SeedPolicy {
        self.seed.map_or(SeedPolicy::Entropy, SeedPolicy::Fixed)
    }
}

#[derive(Args)]
struct EnsembleArgs {
    #[command(flatten)]
    common: Common,

    /// Sweeps per trial
    #[arg(long, default_value = "3000")]
    time_steps: usize,

    /// Number of trials
    #[arg(long, default_value = "10")]
    num_configs: usize,

    /// First sweep at which the ground-state test runs
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_START)]
    checkpoint_start: usize,

    /// Sweeps between ground-state tests
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_INTERVAL)]
    checkpoint_interval: usize,

    /// Worker threads (0 = rayon default)
    #[arg(long, default_value = "0")]
    threads: usize,

    /// Output directory
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip the ASCII dump of final lattices
    #[arg(long)]
    no_lattice_dump: bool,
}

#[derive(Args)]
struct SingleArgs {
    #[command(flatten)]
    common: Common,

    #[arg(long, default_value = "3000")]
    time_steps: usize,

    /// Record every k-th sweep
    #[arg(long, default_value = "10")]
    record_every: usize,

    #[arg(long, default_value = "time_series.csv")]
    output: PathBuf,

    /// Also save the final lattice as a PNG
    #[arg(long)]
    final_image: Option<PathBuf>,

    #[arg(long, default_value = "8")]
    scale: u32,
}

#[derive(Args)]
struct SnapshotArgs {
    #[command(flatten)]
    common: Common,

    #[arg(long, default_value = "500")]
    time_steps: usize,

    #[arg(long, default_value = "snapshots")]
    output_dir: PathBuf,

    /// Pixels per lattice site
    #[arg(long, default_value = "8")]
    scale: u32,
}

#[derive(Args)]
struct AnimateArgs {
    #[arg(long, default_value = "snapshots")]
    input_dir: PathBuf,

    #[arg(long, default_value = "ordering_process.gif")]
    output: PathBuf,

    /// Number of frames to use
    #[arg(long, default_value = "400")]
    frames: usize,

    /// Display time per frame in milliseconds
    #[arg(long, default_value_t = DEFAULT_FRAME_DELAY_MS)]
    delay_ms: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    match cli.command {
        Command::Ensemble(args) => run_ensemble(args),
        Command::Single(args) => run_single(args),
        Command::Snapshots(args) => run_snapshots(args),
        Command::Animate(args) => run_animate(args),
    }
}

fn run_ensemble(args: EnsembleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = SimConfig::new(args.common.lattice_size, args.time_steps, args.num_configs)
        .with_checkpoints(args.checkpoint_start, args.checkpoint_interval);
    let ensemble = Ensemble::new(cfg)?;
    println!("Configuration:\n{:#?}", ensemble.config());

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new().num_threads(args.threads).build_global()?;
    }
    fs::create_dir_all(&args.output_dir)?;

    let bar = ProgressBar::new(args.num_configs as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )?);

    let start = Instant::now();
    let result = ensemble.run_with(args.common.seed_policy(), &|_: &TrialOutcome| bar.inc(1))?;
    let elapsed = start.elapsed();
    bar.finish();

    let n = args.num_configs;
    let summary_path = args.output_dir.join(format!("{n}_config_ensemble_data.txt"));
    let mut summary = BufWriter::new(File::create(&summary_path)?);
    report::write_summary(&mut summary, &result, Some(elapsed))?;
    summary.flush()?;

    let trials_path = args.output_dir.join(format!("{n}_config_trials.csv"));
    report::write_trials_csv(File::create(&trials_path)?, &result.outcomes)?;

    if !args.no_lattice_dump {
        let dump_path = args.output_dir.join(format!("{n}_configurations_lattices.txt"));
        let mut dump = BufWriter::new(File::create(&dump_path)?);
        report::write_lattice_dump(&mut dump, &result.outcomes)?;
        dump.flush()?;
    }

    info!(summary = %summary_path.display(), trials = %trials_path.display(), "results written");
    println!(
        "Simulation complete: {} ground / {} active",
        result.ground_count, result.active_count
    );
    Ok(())
}

fn run_single(args: SingleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut recorder = Recorder::new(args.record_every)?;
    let cfg = SimConfig::new(args.common.lattice_size, args.time_steps, 1);
    let ensemble = Ensemble::new(cfg)?;

    let outcome = ensemble.run_single(args.common.seed_policy(), &mut recorder)?;

    report::write_time_series_csv(File::create(&args.output)?, &recorder.samples)?;
    if let Some(path) = &args.final_image {
        render::save_snapshot(&outcome.lattice, args.scale, path)?;
    }

    info!(
        samples = recorder.samples.len(),
        every = recorder.every(),
        energy = outcome.observables.energy,
        abs_magnetization = outcome.observables.abs_magnetization,
        "single trial complete"
    );
    println!("Time series → {}", args.output.display());
    Ok(())
}

fn run_snapshots(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = SimConfig::new(args.common.lattice_size, args.time_steps, 1);
    let ensemble = Ensemble::new(cfg)?;

    let mut writer = SnapshotWriter::new(args.output_dir.clone(), args.scale)?;
    ensemble.run_single(args.common.seed_policy(), &mut writer)?;
    let written = writer.finish()?;

    println!("{written} snapshots → {}", args.output_dir.display());
    Ok(())
}

fn run_animate(args: AnimateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let frames = render::collect_snapshot_frames(&args.input_dir, args.frames)?;
    let mut out = BufWriter::new(File::create(&args.output)?);
    render::encode_animation(&mut out, frames, args.delay_ms)?;
    out.flush()?;
    println!("GIF saved as {}", args.output.display());
    Ok(())
}
