//! Portable seeded random numbers for matrix generation.
//!
//! `rand`'s `StdRng` is allowed to change its algorithm between releases,
//! which would silently change the benchmark inputs. [`Mt64`] is the
//! 64-bit Mersenne Twister (MT19937-64), the same stream produced by
//! C++'s `std::mt19937_64`, so a given seed means the same matrix
//! everywhere.

use rand::distributions::Distribution;
use rand::{Error, Rng, RngCore, SeedableRng};

const NN: usize = 312;
const MM: usize = 156;
const MATRIX_A: u64 = 0xB502_6F5A_A966_19E9;
const UPPER_MASK: u64 = 0xFFFF_FFFF_8000_0000;
const LOWER_MASK: u64 = 0x0000_0000_7FFF_FFFF;

/// MT19937-64 engine.
///
/// # Example
///
/// ```
/// use matbench::rng::Mt64;
/// use rand::{RngCore, SeedableRng};
///
/// let mut a = Mt64::seed_from_u64(123);
/// let mut b = Mt64::seed_from_u64(123);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug)]
pub struct Mt64 {
    state: [u64; NN],
    index: usize,
}

impl Mt64 {
    fn new(seed: u64) -> Self {
        let mut state = [0u64; NN];
        state[0] = seed;
        for i in 1..NN {
            let prev = state[i - 1];
            state[i] = 6364136223846793005u64
                .wrapping_mul(prev ^ (prev >> 62))
                .wrapping_add(i as u64);
        }
        Self { state, index: NN }
    }

    /// Regenerates the whole state block once all 312 words are consumed.
    fn twist(&mut self) {
        for i in 0..NN {
            let x = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % NN] & LOWER_MASK);
            let mut x_a = x >> 1;
            if x & 1 != 0 {
                x_a ^= MATRIX_A;
            }
            self.state[i] = self.state[(i + MM) % NN] ^ x_a;
        }
        self.index = 0;
    }
}

impl RngCore for Mt64 {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        if self.index >= NN {
            self.twist();
        }
        let mut x = self.state[self.index];
        self.index += 1;

        // Tempering
        x ^= (x >> 29) & 0x5555_5555_5555_5555;
        x ^= (x << 17) & 0x71D6_7FFF_EDA6_0000;
        x ^= (x << 37) & 0xFFF7_EEE0_0000_0000;
        x ^= x >> 43;
        x
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mt64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    /// Uses the seed directly, as `std::mt19937_64(seed)` does.
    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Uniform `f64` in `[0, 1)` from a single 64-bit draw: `x / 2^64`.
///
/// Matches `std::generate_canonical<double, 53>` over a 64-bit engine,
/// including the clamp for draws that round up to `1.0`. This is not the
/// same mapping as `rand`'s `Standard` (which keeps the top 53 bits).
#[derive(Clone, Copy, Debug, Default)]
pub struct Canonical;

impl Distribution<f64> for Canonical {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        const SCALE: f64 = 1.0 / 18_446_744_073_709_551_616.0; // 2^-64
        let value = rng.next_u64() as f64 * SCALE;
        if value >= 1.0 {
            1.0 - f64::EPSILON / 2.0
        } else {
            value
        }
    }
}
