// detector.rs - Ground-state test and the checkpoint schedule it runs on

use crate::error::{IsingError, Result};
use crate::lattice::SpinLattice;

/// True iff every spin has the same value. Such a state is a fixed point of
/// the zero-temperature rule, so absorption is permanent.
pub fn is_absorbed(lattice: &SpinLattice) -> bool {
    match lattice.spins().split_first() {
        Some((first, rest)) => rest.iter().all(|s| s == first),
        None => true,
    }
}

/// Sweeps at which the detector runs: `start`, `start + interval`, …
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoints {
    start: usize,
    interval: usize,
}

impl Checkpoints {
    pub fn new(start: usize, interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(IsingError::InvalidConfig("checkpoint_interval must be positive".into()));
        }
        Ok(Self { start, interval })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    #[inline(always)]
    pub fn is_checkpoint(&self, sweep: usize) -> bool {
        sweep >= self.start && (sweep - self.start) % self.interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let cp = Checkpoints::new(500, 50).unwrap();
        assert!(!cp.is_checkpoint(450));
        assert!(!cp.is_checkpoint(499));
        assert!(cp.is_checkpoint(500));
        assert!(!cp.is_checkpoint(525));
        assert!(cp.is_checkpoint(550));
        assert!(cp.is_checkpoint(3000));
    }

    #[test]
    fn offset_start() {
        let cp = Checkpoints::new(7, 3).unwrap();
        let hits: Vec<usize> = (1..=16).filter(|&s| cp.is_checkpoint(s)).collect();
        assert_eq!(hits, vec![7, 10, 13, 16]);
    }

    #[test]
    fn zero_interval_rejected() {
        let err = Checkpoints::new(1, 0).unwrap_err();
        assert!(matches!(err, IsingError::InvalidConfig(_)));
    }
}
