//! Integration tests: zero-temperature update rule and sweeps.

use ising_t0::dynamics::{attempt, local_field, propose, sweep};
use ising_t0::lattice::{SpinLattice, SPIN_DOWN, SPIN_UP};
use ising_t0::observables::energy;
use ising_t0::topology::NeighborTable;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

#[test]
fn test_local_field_takes_even_values() {
    let mut rng = Pcg64::seed_from_u64(7);
    let table = NeighborTable::new(8);
    let lattice = SpinLattice::random_balanced(8, &mut rng).unwrap();
    for i in 0..lattice.len() {
        let s = local_field(i, &lattice, &table);
        assert!([-4, -2, 0, 2, 4].contains(&s), "site {i}: field {s}");
    }
}

#[test]
fn test_rule_aligns_with_majority() {
    let table = NeighborTable::new(4);
    // Site 5 = (1,1); make three of its neighbours down
    let mut lattice = SpinLattice::polarized(4, SPIN_UP);
    let [left, right, up, _down] = *table.neighbors(5);
    lattice.set(left, SPIN_DOWN);
    lattice.set(right, SPIN_DOWN);
    lattice.set(up, SPIN_DOWN);
    assert_eq!(local_field(5, &lattice, &table), -2);

    let mut rng = Pcg64::seed_from_u64(3);
    for _ in 0..20 {
        assert_eq!(propose(5, &lattice, &table, &mut rng), SPIN_DOWN);
    }
}

#[test]
fn test_zero_field_flips_about_half_the_time() {
    let table = NeighborTable::new(4);
    let lattice = SpinLattice::checkerboard(4);
    let mut rng = Pcg64::seed_from_u64(11);

    let trials = 10_000;
    let mut flips = 0;
    for _ in 0..trials {
        if propose(0, &lattice, &table, &mut rng) != lattice.get(0) {
            flips += 1;
        }
    }
    let p = flips as f64 / trials as f64;
    assert!((p - 0.5).abs() < 0.03, "flip probability {p}");
}

#[test]
fn test_energy_never_increases_per_update() {
    let mut rng = Pcg64::seed_from_u64(2024);
    for side in [2, 4, 7, 12] {
        let table = NeighborTable::new(side);
        // Arbitrary (not necessarily balanced) start
        let spins = (0..side * side)
            .map(|_| if rng.gen_bool(0.5) { SPIN_UP } else { SPIN_DOWN })
            .collect();
        let mut lattice = SpinLattice::from_spins(side, spins).unwrap();

        let mut e = energy(&lattice, &table);
        for _ in 0..20 * side * side {
            let info = attempt(&mut lattice, &table, &mut rng);
            assert!(info.site < lattice.len());
            let e_new = energy(&lattice, &table);
            assert!(e_new <= e, "energy rose from {e} to {e_new} on L={side}");
            e = e_new;
        }
    }
}

#[test]
fn test_ground_state_is_fixed_point() {
    let mut rng = Pcg64::seed_from_u64(5);
    for spin in [SPIN_UP, SPIN_DOWN] {
        let table = NeighborTable::new(6);
        let mut lattice = SpinLattice::polarized(6, spin);
        for i in 0..lattice.len() {
            assert_eq!(propose(i, &lattice, &table, &mut rng), spin);
        }
        let before = lattice.clone();
        let stats = sweep(&mut lattice, &table, &mut rng);
        assert_eq!(lattice, before);
        assert_eq!(stats.flips, 0);
    }
}

#[test]
fn test_sweep_makes_n_attempts() {
    let mut rng = Pcg64::seed_from_u64(9);
    let table = NeighborTable::new(10);
    let mut lattice = SpinLattice::random_balanced(10, &mut rng).unwrap();
    let stats = sweep(&mut lattice, &table, &mut rng);
    assert_eq!(stats.attempts, 100);
    assert!(stats.flips <= stats.attempts);
}

#[test]
fn test_checkerboard_has_zero_field_everywhere() {
    let table = NeighborTable::new(6);
    let lattice = SpinLattice::checkerboard(6);
    for i in 0..lattice.len() {
        assert_eq!(local_field(i, &lattice, &table), 0);
    }
}
