// config.rs - Run parameters for ensemble and single-trial simulations

use crate::error::{IsingError, Result};

/// Default checkpoint schedule: first absorption test at sweep 500,
/// then every 50 sweeps.
pub const DEFAULT_CHECKPOINT_START: usize = 500;
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 50;

/// Run‑time configuration (single source of truth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Lattice side length L (N = L² sites)
    pub lattice_size: usize,
    /// Sweeps per trial
    pub time_steps_max: usize,
    /// Number of independent trials
    pub num_configs: usize,
    pub checkpoint_start: usize,
    pub checkpoint_interval: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lattice_size:        50,
            time_steps_max:      3000,
            num_configs:         10,
            checkpoint_start:    DEFAULT_CHECKPOINT_START,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl SimConfig {
    pub fn new(lattice_size: usize, time_steps_max: usize, num_configs: usize) -> Self {
        Self {
            lattice_size,
            time_steps_max,
            num_configs,
            ..Self::default()
        }
    }

    pub fn with_checkpoints(mut self, start: usize, interval: usize) -> Self {
        self.checkpoint_start = start;
        self.checkpoint_interval = interval;
        self
    }

    /// Number of sites N = L².
    #[inline(always)]
    pub fn n_sites(&self) -> usize {
        self.lattice_size * self.lattice_size
    }

    /// Reject every configuration the dynamics cannot run.
    pub fn validate(&self) -> Result<()> {
        validate_lattice_size(self.lattice_size)?;
        if self.time_steps_max == 0 {
            return Err(IsingError::InvalidConfig(
                "time_steps_max must be positive".into(),
            ));
        }
        if self.num_configs == 0 {
            return Err(IsingError::InvalidConfig(
                "num_configs must be positive".into(),
            ));
        }
        if self.checkpoint_interval == 0 {
            return Err(IsingError::InvalidConfig(
                "checkpoint_interval must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// L must be positive and L² even so the initializer can split the sites
/// into two equal halves.
pub fn validate_lattice_size(lattice_size: usize) -> Result<()> {
    if lattice_size == 0 {
        return Err(IsingError::InvalidConfig(
            "lattice_size must be positive".into(),
        ));
    }
    let n = lattice_size * lattice_size;
    if n % 2 != 0 {
        return Err(IsingError::InvalidConfig(format!(
            "N = {lattice_size}² = {n} is odd and cannot be split into equal +1/-1 halves"
        )));
    }
    Ok(())
}

/// Where each trial's random stream comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// Reproducible: trial streams derived from this master seed
    Fixed(u64),
    /// Master seed drawn from the OS once per run
    Entropy,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        SeedPolicy::Entropy
    }
}
