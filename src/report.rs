// report.rs - Human-readable summaries, ASCII lattice dumps and CSV output
//
// Everything here consumes finished results; nothing is called from inside
// the sweep loop.

use crate::ensemble::{EnsembleResult, TrialOutcome, TrialStatus};
use crate::error::Result;
use crate::lattice::{SpinLattice, SPIN_UP};
use crate::measure::Sample;
use csv::WriterBuilder;
use std::io::Write;
use std::time::Duration;

/// Characters used by the ASCII dump.
pub const UP_CHAR: char = 'X';
pub const DOWN_CHAR: char = ' ';
pub const ROW_DELIMITER: char = '|';
const SEPARATOR_WIDTH: usize = 79;

/// Ensemble summary: counts, fractions, raw series and their means.
pub fn write_summary<W: Write>(
    writer: &mut W,
    result: &EnsembleResult,
    elapsed: Option<Duration>,
) -> Result<()> {
    let cfg = &result.config;
    writeln!(writer, "Lattice dimensions: {}", cfg.lattice_size)?;
    writeln!(writer, "Number of configurations: {}", result.num_configs())?;
    writeln!(writer)?;
    writeln!(writer, "Total MC steps per configuration: {}", cfg.time_steps_max)?;
    writeln!(
        writer,
        "Checkpoints: from step {} every {} steps",
        cfg.checkpoint_start, cfg.checkpoint_interval
    )?;
    writeln!(writer, "Master seed: {}", result.master_seed)?;
    writeln!(writer)?;
    writeln!(writer, "Number of active states: {}", result.active_count)?;
    writeln!(writer, "Fraction of active states: {:.4}", result.active_fraction())?;
    writeln!(writer)?;
    writeln!(writer, "Number of ground states: {}", result.ground_count)?;
    writeln!(writer, "Fraction of ground states: {:.4}", result.ground_fraction())?;
    writeln!(writer, "Ground states detected at steps: {:?}", result.absorption_sweeps())?;
    writeln!(writer)?;
    writeln!(writer, "Magnetization (all configs): {:?}", result.magn_all)?;
    writeln!(writer, "Mean magnetization (all configs): {:.4}", result.mean_magn_all())?;
    writeln!(writer)?;
    writeln!(writer, "Energy (all configs): {:?}", result.energy_all)?;
    writeln!(writer, "Mean energy (all configs): {:.4}", result.mean_energy_all())?;
    writeln!(writer)?;
    writeln!(writer, "Magnetization (active configs): {:?}", result.magn_active)?;
    writeln!(writer, "Mean magnetization (active configs): {:.4}", result.mean_magn_active())?;
    writeln!(writer)?;
    writeln!(writer, "Energy (active configs): {:?}", result.energy_active)?;
    writeln!(writer, "Mean energy (active configs): {:.4}", result.mean_energy_active())?;
    if let Some(elapsed) = elapsed {
        writeln!(writer)?;
        writeln!(writer, "Execution time: {:.2} seconds", elapsed.as_secs_f64())?;
    }
    Ok(())
}

/// One lattice row per line, `X` for +1 and a blank for −1, `|` on both sides.
pub fn write_lattice_ascii<W: Write>(writer: &mut W, lattice: &SpinLattice) -> Result<()> {
    for r in 0..lattice.side() {
        let line: String = lattice
            .row(r)
            .iter()
            .map(|&s| if s == SPIN_UP { UP_CHAR } else { DOWN_CHAR })
            .collect();
        writeln!(writer, "{ROW_DELIMITER}{line}{ROW_DELIMITER}")?;
    }
    Ok(())
}

/// Final lattice of every trial, each under a header and followed by a rule.
pub fn write_lattice_dump<W: Write>(writer: &mut W, outcomes: &[TrialOutcome]) -> Result<()> {
    for o in outcomes {
        writeln!(writer, "Configuration number: {}", o.index)?;
        write_lattice_ascii(writer, &o.lattice)?;
        writeln!(writer, "{}", "_".repeat(SEPARATOR_WIDTH))?;
    }
    Ok(())
}

/// One CSV row per trial.
pub fn write_trials_csv<W: Write>(writer: W, outcomes: &[TrialOutcome]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record([
        "trial", "seed", "status", "absorbed_at", "sweeps", "energy", "magnetization", "abs_magnetization",
    ])?;
    for o in outcomes {
        let (status, absorbed_at) = match o.status {
            TrialStatus::Ground { absorbed_at } => ("ground", absorbed_at.to_string()),
            TrialStatus::Active => ("active", String::new()),
        };
        wtr.write_record(&[
            o.index.to_string(),
            o.seed.to_string(),
            status.to_string(),
            absorbed_at,
            o.sweeps_run.to_string(),
            o.observables.energy.to_string(),
            o.observables.magnetization.to_string(),
            o.observables.abs_magnetization.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Energy and magnetization against sweep number.
pub fn write_time_series_csv<W: Write>(writer: W, samples: &[Sample]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["step", "energy", "magnetization", "abs_magnetization"])?;
    for s in samples {
        wtr.write_record(&[
            s.sweep.to_string(),
            s.energy.to_string(),
            s.magnetization.to_string(),
            s.abs_magnetization.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
