// dynamics.rs - Zero-temperature single-spin-flip rule and random sweeps

use crate::lattice::{SpinLattice, SPIN_DOWN, SPIN_UP};
use crate::topology::NeighborTable;
use rand::Rng;

/// Σ of the four neighbour spins of `site`; one of −4, −2, 0, 2, 4.
#[inline(always)]
pub fn local_field(site: usize, lattice: &SpinLattice, table: &NeighborTable) -> i32 {
    table
        .neighbors(site)
        .iter()
        .map(|&j| lattice.get(j) as i32)
        .sum()
}

/// New value for `site`: align with the neighbour majority, or flip with
/// probability ½ when the local field vanishes. Never raises the energy.
#[inline(always)]
pub fn propose(
    site: usize,
    lattice: &SpinLattice,
    table: &NeighborTable,
    rng: &mut impl Rng,
) -> i8 {
    let s = local_field(site, lattice, table);
    if s > 0 {
        SPIN_UP
    } else if s < 0 {
        SPIN_DOWN
    } else if rng.gen_bool(0.5) {
        -lattice.get(site)
    } else {
        lattice.get(site)
    }
}

/// Returned by `attempt`, lets callers track flips without rescanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub site: usize,
    pub flipped: bool,
}

/// Draw one site uniformly and apply the rule in place.
#[inline(always)]
pub fn attempt(lattice: &mut SpinLattice, table: &NeighborTable, rng: &mut impl Rng) -> StepInfo {
    let site = rng.gen_range(0..lattice.len());
    let old = lattice.get(site);
    let new = propose(site, lattice, table, rng);
    lattice.set(site, new);
    StepInfo { site, flipped: new != old }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub attempts: usize,
    pub flips: usize,
}

/// One Monte Carlo sweep: N attempts, sites drawn with replacement.
/// Each update sees the effect of every earlier one in the same sweep.
pub fn sweep(lattice: &mut SpinLattice, table: &NeighborTable, rng: &mut impl Rng) -> SweepStats {
    let n = lattice.len();
    let mut flips = 0;
    for _ in 0..n {
        if attempt(lattice, table, rng).flipped {
            flips += 1;
        }
    }
    SweepStats { attempts: n, flips }
}
