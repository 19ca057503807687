/// Record time-series observables of a single trial
use crate::error::{IsingError, Result};
use crate::lattice::SpinLattice;
use crate::observables::Observables;
use crate::observer::SweepObserver;
use crate::topology::NeighborTable;

/// One time-series sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub sweep: usize,
    pub energy: f64,
    pub magnetization: f64,
    pub abs_magnetization: f64,
}

/// Samples sweep 0 and every `every`‑th sweep after it.
#[derive(Debug, Clone)]
pub struct Recorder {
    every: usize,
    pub samples: Vec<Sample>,
}

impl Recorder {
    pub fn new(every: usize) -> Result<Self> {
        if every == 0 {
            return Err(IsingError::InvalidConfig("record_every must be positive".into()));
        }
        Ok(Self { every, samples: Vec::new() })
    }

    pub fn every(&self) -> usize {
        self.every
    }

    /// Push a new measurement unconditionally
    pub fn push(&mut self, sweep: usize, lattice: &SpinLattice, table: &NeighborTable) {
        let obs = Observables::measure(lattice, table);
        self.samples.push(Sample {
            sweep,
            energy: obs.energy,
            magnetization: obs.magnetization,
            abs_magnetization: obs.abs_magnetization,
        });
    }

    pub fn sweeps(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.sweep).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.energy).collect()
    }

    pub fn abs_magnetizations(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.abs_magnetization).collect()
    }
}

impl SweepObserver for Recorder {
    fn on_sweep(&mut self, sweep: usize, lattice: &SpinLattice, table: &NeighborTable) {
        if sweep % self.every == 0 {
            self.push(sweep, lattice, table);
        }
    }
}
