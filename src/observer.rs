// observer.rs - Hook through which a running trial hands out snapshots
//
// The sweep loop never touches files or images. Anything that wants to see
// intermediate states (time-series recording, PNG snapshots, ...) implements
// `SweepObserver` and is driven by `Ensemble::run_single`.

use crate::lattice::SpinLattice;
use crate::topology::NeighborTable;

pub trait SweepObserver {
    /// Called with sweep 0 (initial state) and after every completed sweep.
    fn on_sweep(&mut self, sweep: usize, lattice: &SpinLattice, table: &NeighborTable);
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {
    fn on_sweep(&mut self, _sweep: usize, _lattice: &SpinLattice, _table: &NeighborTable) {}
}
