//! RNG oracle for deterministic random number generation.
//!
//! Every random draw in a battle (hit checks, critical checks, damage
//! variance, action speed, state application and removal, enemy drops) is
//! derived from the battle seed plus a running draw counter, so two battles
//! with the same seed and the same commands are identical.

use std::cell::Cell;

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max) - u64::from(min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed from battle state components.
///
/// * `battle_seed` - Seed fixed when the battle is created
/// * `nonce` - Draw sequence number
/// * `context` - Distinguishes draw kinds (raw, percent, range)
pub fn compute_seed(battle_seed: u64, nonce: u64, context: u32) -> u64 {
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Sequential draw source over a stateless [`RngOracle`].
///
/// Each call consumes one nonce. The caller persists [`Dice::cursor`] after
/// use so the next phase continues the same stream.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    seed: u64,
    cursor: Cell<u64>,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, seed: u64, cursor: u64) -> Self {
        Self {
            rng,
            seed,
            cursor: Cell::new(cursor),
        }
    }

    /// Number of draws taken so far (including those before this value was built).
    pub fn cursor(&self) -> u64 {
        self.cursor.get()
    }

    fn next_seed(&self, context: u32) -> u64 {
        let nonce = self.cursor.get();
        self.cursor.set(nonce.wrapping_add(1));
        compute_seed(self.seed, nonce, context)
    }

    /// Raw 32-bit draw.
    pub fn next_u32(&self) -> u32 {
        self.rng.next_u32(self.next_seed(0))
    }

    /// Uniform value in `[0, 1)`.
    pub fn chance(&self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// True with probability `probability` (clamped to `[0, 1]`).
    ///
    /// Probabilities at the bounds still consume a draw.
    pub fn check(&self, probability: f64) -> bool {
        self.chance() < probability.clamp(0.0, 1.0)
    }

    /// True with probability `percent / 100`.
    pub fn percent(&self, percent: u8) -> bool {
        self.rng.roll_d100(self.next_seed(1)) <= u32::from(percent)
    }

    /// Uniform integer in `[min, max]` inclusive.
    pub fn range(&self, min: u32, max: u32) -> u32 {
        self.rng.range(self.next_seed(2), min, max)
    }

    /// Uniform index in `[0, len)`; `len == 0` yields 0.
    pub fn index(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.range(0, (len - 1) as u32) as usize
    }
}

impl std::fmt::Debug for Dice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dice")
            .field("seed", &self.seed)
            .field("cursor", &self.cursor.get())
            .finish()
    }
}
