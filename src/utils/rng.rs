use rand_chacha::ChaCha20Rng;
use rand::SeedableRng;
use rand::RngCore;

/// SplitMix64 finalizer, spreads nearby inputs across the whole u64 range.
#[inline(always)]
fn mix(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Seed of trial `trial` under `master`.
pub fn trial_seed(master: u64, trial: usize) -> u64 {
    mix(master ^ (trial as u64).wrapping_add(1).wrapping_mul(0x9E3779B97F4A7C15))
}

/// Per‑trial deterministic RNG; independent of how trials map to threads.
pub fn trial_rng(master: u64, trial: usize) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(trial_seed(master, trial))
}

/// Fresh master seed from the OS.
pub fn entropy_seed() -> u64 {
    ChaCha20Rng::from_entropy().next_u64()
}
