// ensemble.rs - Independent trials, absorption detection and aggregation

use crate::config::{SeedPolicy, SimConfig};
use crate::detector::{is_absorbed, Checkpoints};
use crate::dynamics::sweep;
use crate::error::Result;
use crate::lattice::SpinLattice;
use crate::observables::{mean, Observables};
use crate::observer::SweepObserver;
use crate::topology::NeighborTable;
use crate::utils::rng::{entropy_seed, trial_rng, trial_seed};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStatus {
    /// Fully polarized, first seen at checkpoint `absorbed_at`
    Ground { absorbed_at: usize },
    /// Still disordered after the last sweep
    Active,
}

impl TrialStatus {
    pub fn is_ground(&self) -> bool {
        matches!(self, TrialStatus::Ground { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TrialStatus::Active)
    }
}

/// Final state of one trial.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    pub index: usize,
    pub seed: u64,
    pub status: TrialStatus,
    pub sweeps_run: usize,
    pub observables: Observables,
    pub lattice: SpinLattice,
}

/// One simulation run with its own lattice and random stream.
pub struct Trial<R: Rng> {
    index: usize,
    lattice: SpinLattice,
    rng: R,
    sweep: usize,
    absorbed_at: Option<usize>,
}

impl<R: Rng> Trial<R> {
    /// Balanced random start drawn from `rng`.
    pub fn new(index: usize, side: usize, mut rng: R) -> Result<Self> {
        let lattice = SpinLattice::random_balanced(side, &mut rng)?;
        Ok(Self::from_lattice(index, lattice, rng))
    }

    pub fn from_lattice(index: usize, lattice: SpinLattice, rng: R) -> Self {
        Self { index, lattice, rng, sweep: 0, absorbed_at: None }
    }

    pub fn lattice(&self) -> &SpinLattice {
        &self.lattice
    }

    /// Completed sweeps so far.
    pub fn sweeps_done(&self) -> usize {
        self.sweep
    }

    pub fn is_absorbed(&self) -> bool {
        self.absorbed_at.is_some()
    }

    /// Advance by one sweep.
    pub fn step(&mut self, table: &NeighborTable) {
        sweep(&mut self.lattice, table, &mut self.rng);
        self.sweep += 1;
    }

    /// Sweep until `time_steps_max` or until a checkpoint finds a ground
    /// state, whichever comes first.
    pub fn run(
        &mut self,
        table: &NeighborTable,
        time_steps_max: usize,
        checkpoints: Checkpoints,
    ) -> TrialStatus {
        while !self.is_absorbed() && self.sweep < time_steps_max {
            self.step(table);
            if checkpoints.is_checkpoint(self.sweep) && is_absorbed(&self.lattice) {
                debug!(trial = self.index, sweep = self.sweep, "absorbed into ground state");
                self.absorbed_at = Some(self.sweep);
            }
        }
        self.status()
    }

    /// Sweep exactly `time_steps_max` times with no absorption test,
    /// reporting sweep 0 and every later sweep to `observer`.
    pub fn run_observed(
        &mut self,
        table: &NeighborTable,
        time_steps_max: usize,
        observer: &mut impl SweepObserver,
    ) {
        observer.on_sweep(self.sweep, &self.lattice, table);
        while self.sweep < time_steps_max {
            self.step(table);
            observer.on_sweep(self.sweep, &self.lattice, table);
        }
    }

    pub fn status(&self) -> TrialStatus {
        match self.absorbed_at {
            Some(absorbed_at) => TrialStatus::Ground { absorbed_at },
            None => TrialStatus::Active,
        }
    }

    /// Measure the terminal state and give up the lattice.
    pub fn finish(self, table: &NeighborTable, seed: u64) -> TrialOutcome {
        let status = self.status();
        TrialOutcome {
            index: self.index,
            seed,
            status,
            sweeps_run: self.sweep,
            observables: Observables::measure(&self.lattice, table),
            lattice: self.lattice,
        }
    }
}

/// Aggregation over all trials of an ensemble.
#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub config: SimConfig,
    pub master_seed: u64,
    /// Trial order, independent of scheduling
    pub outcomes: Vec<TrialOutcome>,
    pub ground_count: usize,
    pub active_count: usize,
    pub energy_all: Vec<f64>,
    /// |m| per trial
    pub magn_all: Vec<f64>,
    pub energy_active: Vec<f64>,
    pub magn_active: Vec<f64>,
}

impl EnsembleResult {
    pub fn from_outcomes(config: SimConfig, master_seed: u64, outcomes: Vec<TrialOutcome>) -> Self {
        let mut ground_count = 0;
        let mut energy_all = Vec::with_capacity(outcomes.len());
        let mut magn_all = Vec::with_capacity(outcomes.len());
        let mut energy_active = Vec::new();
        let mut magn_active = Vec::new();

        for o in &outcomes {
            let obs = o.observables;
            energy_all.push(obs.energy);
            magn_all.push(obs.abs_magnetization);
            if o.status.is_active() {
                energy_active.push(obs.energy);
                magn_active.push(obs.abs_magnetization);
            } else {
                ground_count += 1;
            }
        }

        Self {
            config,
            master_seed,
            active_count: outcomes.len() - ground_count,
            ground_count,
            outcomes,
            energy_all,
            magn_all,
            energy_active,
            magn_active,
        }
    }

    pub fn num_configs(&self) -> usize {
        self.outcomes.len()
    }

    pub fn ground_fraction(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.ground_count as f64 / self.outcomes.len() as f64
        }
    }

    pub fn active_fraction(&self) -> f64 {
        1.0 - self.ground_fraction()
    }

    pub fn mean_energy_all(&self) -> f64 {
        mean(&self.energy_all)
    }

    pub fn mean_magn_all(&self) -> f64 {
        mean(&self.magn_all)
    }

    /// 0 when no trial is active.
    pub fn mean_energy_active(&self) -> f64 {
        mean(&self.energy_active)
    }

    /// 0 when no trial is active.
    pub fn mean_magn_active(&self) -> f64 {
        mean(&self.magn_active)
    }

    /// Sweeps at which ground trials were caught, in trial order.
    pub fn absorption_sweeps(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter_map(|o| match o.status {
                TrialStatus::Ground { absorbed_at } => Some(absorbed_at),
                TrialStatus::Active => None,
            })
            .collect()
    }
}

/// A validated configuration with the neighbour table for its size.
pub struct Ensemble {
    config: SimConfig,
    table: NeighborTable,
}

impl Ensemble {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let table = NeighborTable::new(config.lattice_size);
        Ok(Self { config, table })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn checkpoints(&self) -> Result<Checkpoints> {
        Checkpoints::new(self.config.checkpoint_start, self.config.checkpoint_interval)
    }

    /// Run all trials in parallel.
    pub fn run(&self, seed: SeedPolicy) -> Result<EnsembleResult> {
        self.run_with(seed, &|_: &TrialOutcome| {})
    }

    /// Run all trials in parallel, calling `progress` once per finished trial.
    pub fn run_with(
        &self,
        seed: SeedPolicy,
        progress: &(dyn Fn(&TrialOutcome) + Sync),
    ) -> Result<EnsembleResult> {
        let master = resolve_seed(seed);
        let cfg = &self.config;
        info!(
            lattice_size = cfg.lattice_size,
            sites = cfg.n_sites(),
            time_steps_max = cfg.time_steps_max,
            num_configs = cfg.num_configs,
            master_seed = master,
            "starting ensemble"
        );

        let outcomes = (0..cfg.num_configs)
            .into_par_iter()
            .map(|index| -> Result<TrialOutcome> {
                let outcome = self.run_trial(master, index)?;
                progress(&outcome);
                Ok(outcome)
            })
            .collect::<Result<Vec<_>>>()?;

        let result = EnsembleResult::from_outcomes(cfg.clone(), master, outcomes);
        info!(
            ground = result.ground_count,
            active = result.active_count,
            ground_fraction = result.ground_fraction(),
            "ensemble complete"
        );
        if result.active_count == 0 {
            warn!("no active trials; active-only means are reported as 0");
        }
        Ok(result)
    }

    /// Trial `index` under `master`; same output for the same pair.
    pub fn run_trial(&self, master: u64, index: usize) -> Result<TrialOutcome> {
        let seed = trial_seed(master, index);
        debug!(trial = index, seed, "starting trial");
        let mut trial = Trial::new(index, self.config.lattice_size, trial_rng(master, index))?;
        trial.run(&self.table, self.config.time_steps_max, self.checkpoints()?);
        let outcome = trial.finish(&self.table, seed);
        debug!(
            trial = index,
            sweeps = outcome.sweeps_run,
            energy = outcome.observables.energy,
            ground = outcome.status.is_ground(),
            "finished trial"
        );
        Ok(outcome)
    }

    /// Single trial for exactly `time_steps_max` sweeps, without early
    /// termination, feeding every sweep to `observer`.
    pub fn run_single(
        &self,
        seed: SeedPolicy,
        observer: &mut impl SweepObserver,
    ) -> Result<TrialOutcome> {
        let master = resolve_seed(seed);
        let mut trial = Trial::new(0, self.config.lattice_size, trial_rng(master, 0))?;
        info!(
            lattice_size = self.config.lattice_size,
            sweeps = self.config.time_steps_max,
            master_seed = master,
            "starting single trial"
        );
        trial.run_observed(&self.table, self.config.time_steps_max, observer);
        Ok(trial.finish(&self.table, trial_seed(master, 0)))
    }
}

/// Validate `config` and run the whole ensemble.
pub fn run_ensemble(config: SimConfig, seed: SeedPolicy) -> Result<EnsembleResult> {
    Ensemble::new(config)?.run(seed)
}

fn resolve_seed(seed: SeedPolicy) -> u64 {
    match seed {
        SeedPolicy::Fixed(s) => s,
        SeedPolicy::Entropy => entropy_seed(),
    }
}
