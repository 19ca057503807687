// lattice.rs - Owned spin configuration on an L×L torus

use crate::config::validate_lattice_size;
use crate::error::{IsingError, Result};
use rand::Rng;

pub const SPIN_UP: i8 = 1;
pub const SPIN_DOWN: i8 = -1;

/// Budget for the rejection-sampling initializer, in draws per site.
/// Turning N/2 sites down takes about N·ln 2 draws on average.
pub const MAX_INIT_DRAWS_PER_SITE: usize = 64;

/// Row-major array of ±1 spins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinLattice {
    side: usize,
    spins: Vec<i8>,
}

impl SpinLattice {
    /// Start from all +1, then flip uniformly drawn sites to −1 until exactly
    /// N/2 distinct sites are down. A draw that lands on a site that is
    /// already down is discarded.
    pub fn random_balanced(side: usize, rng: &mut impl Rng) -> Result<Self> {
        validate_lattice_size(side)?;
        let n = side * side;
        let mut lattice = Self::polarized(side, SPIN_UP);

        let target = n / 2;
        let max_draws = MAX_INIT_DRAWS_PER_SITE * n;
        let mut down = 0;
        let mut draws = 0;
        while down < target {
            if draws == max_draws {
                return Err(IsingError::NonTerminatingInitialization { draws });
            }
            draws += 1;
            let idx = rng.gen_range(0..n);
            if lattice.spins[idx] != SPIN_DOWN {
                lattice.spins[idx] = SPIN_DOWN;
                down += 1;
            }
        }
        Ok(lattice)
    }

    /// Every site set to `spin`.
    pub fn polarized(side: usize, spin: i8) -> Self {
        debug_assert!(spin == SPIN_UP || spin == SPIN_DOWN);
        Self { side, spins: vec![spin; side * side] }
    }

    /// (row + col) even → +1, odd → −1.
    pub fn checkerboard(side: usize) -> Self {
        let spins = (0..side * side)
            .map(|i| if (i / side + i % side) % 2 == 0 { SPIN_UP } else { SPIN_DOWN })
            .collect();
        Self { side, spins }
    }

    /// Wrap an explicit row-major configuration.
    pub fn from_spins(side: usize, spins: Vec<i8>) -> Result<Self> {
        if spins.len() != side * side {
            return Err(IsingError::InvalidConfig(format!(
                "expected {} spins for L = {side}, got {}",
                side * side,
                spins.len()
            )));
        }
        if let Some(pos) = spins.iter().position(|&s| s != SPIN_UP && s != SPIN_DOWN) {
            return Err(IsingError::InvalidConfig(format!(
                "spin at site {pos} is {}, expected +1 or -1",
                spins[pos]
            )));
        }
        Ok(Self { side, spins })
    }

    /// Side length L.
    #[inline(always)]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of sites N.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, i: usize) -> i8 {
        self.spins[i]
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, spin: i8) {
        debug_assert!(spin == SPIN_UP || spin == SPIN_DOWN);
        self.spins[i] = spin;
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// One lattice row, left to right.
    pub fn row(&self, r: usize) -> &[i8] {
        &self.spins[r * self.side..(r + 1) * self.side]
    }

    pub fn count_up(&self) -> usize {
        self.spins.iter().filter(|&&s| s == SPIN_UP).count()
    }

    pub fn count_down(&self) -> usize {
        self.len() - self.count_up()
    }

    /// Σ s_i
    pub fn spin_sum(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }
}
