// observables.rs - Energy and magnetization of a lattice snapshot

use crate::dynamics::local_field;
use crate::lattice::SpinLattice;
use crate::topology::NeighborTable;

/// Local energy of site i: −s_i Σ_{j∈nb(i)} s_j
#[inline(always)]
pub fn site_energy(site: usize, lattice: &SpinLattice, table: &NeighborTable) -> i32 {
    -(lattice.get(site) as i32) * local_field(site, lattice, table)
}

/// E = ½ Σ_i −s_i Σ_j s_j. Each bond is seen from both ends, hence the ½.
pub fn energy(lattice: &SpinLattice, table: &NeighborTable) -> f64 {
    let twice: i64 = (0..lattice.len())
        .map(|i| site_energy(i, lattice, table) as i64)
        .sum();
    twice as f64 / 2.0
}

/// m = (1/N) Σ s_i, signed.
pub fn magnetization(lattice: &SpinLattice) -> f64 {
    lattice.spin_sum() as f64 / lattice.len() as f64
}

/// |m|. Initial states are ±symmetric, so only the modulus carries
/// information across an ensemble.
pub fn abs_magnetization(lattice: &SpinLattice) -> f64 {
    magnetization(lattice).abs()
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observables {
    pub energy: f64,
    pub magnetization: f64,
    pub abs_magnetization: f64,
}

impl Observables {
    /// Measure all observables from current lattice state
    pub fn measure(lattice: &SpinLattice, table: &NeighborTable) -> Self {
        let m = magnetization(lattice);
        Observables {
            energy: energy(lattice, table),
            magnetization: m,
            abs_magnetization: m.abs(),
        }
    }
}

/// Arithmetic mean, 0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
