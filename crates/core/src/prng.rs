//! Seedable Xorshift64 generator for deterministic layouts.
//!
//! Field evaluation itself is random-free. The generator is only used to
//! place default sources and to jitter streamline seed lattices, so the
//! same scene seed always yields the same picture on every platform.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A zero seed is a fixed point of xorshift and is replaced by a fixed
/// non-zero constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_F1E1_D5CA_1A2B;

    /// Creates a generator; `seed == 0` is replaced by a non-zero fallback.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform `f64` in `[0, 1)` built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform `f64` in `[min, max)`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform `f64` in `[-1, 1)`, used for symmetric jitter.
    pub fn next_signed(&mut self) -> f64 {
        self.next_f64() * 2.0 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // Pinned: changing the generator moves every default source layout.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for i in 0..500 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at {i}");
        }
    }

    #[test]
    fn serialization_round_trip_preserves_state() {
        let mut rng = Xorshift64::new(7);
        for _ in 0..10 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..20 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                span in 1e-3_f64..1e4,
            ) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..50 {
                    let v = rng.next_range(min, min + span);
                    prop_assert!(v >= min && v < min + span, "{v} outside [{min}, {})", min + span);
                }
            }

            #[test]
            fn next_signed_in_symmetric_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..50 {
                    let v = rng.next_signed();
                    prop_assert!((-1.0..1.0).contains(&v), "{v} outside [-1, 1)");
                }
            }
        }
    }
}
