use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Quality of the generator backing an [`IndexPicker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RandomStrength {
    /// Seeded from the operating system's secure source
    Secure,
    /// Seeded from the system clock after the OS source failed
    Weak,
    /// Fixed seed, for reproducible runs
    Seeded,
}

/// Uniform index selection over `0..len`
#[derive(Debug)]
pub struct IndexPicker {
    rng: StdRng,
    strength: RandomStrength,
}

impl IndexPicker {
    /// Prefer the OS entropy source, falling back to a clock seed
    pub fn from_entropy() -> Self {
        match StdRng::from_rng(OsRng) {
            Ok(rng) => Self {
                rng,
                strength: RandomStrength::Secure,
            },
            Err(err) => {
                tracing::warn!(error = %err, "os random source unavailable, using clock seed");
                Self {
                    rng: StdRng::seed_from_u64(clock_seed()),
                    strength: RandomStrength::Weak,
                }
            }
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            strength: RandomStrength::Seeded,
        }
    }

    pub fn strength(&self) -> RandomStrength {
        self.strength
    }

    /// None when `len` is zero
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

impl Default for IndexPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_yields_none() {
        let mut picker = IndexPicker::seeded(1);
        assert_eq!(picker.pick(0), None);
    }

    #[test]
    fn picks_stay_in_range() {
        let mut picker = IndexPicker::seeded(7);
        for len in 1..20 {
            for _ in 0..100 {
                let idx = picker.pick(len).unwrap();
                assert!(idx < len);
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = IndexPicker::seeded(42);
        let mut b = IndexPicker::seeded(42);
        let xs: Vec<_> = (0..10).map(|_| a.pick(1000)).collect();
        let ys: Vec<_> = (0..10).map(|_| b.pick(1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn entropy_picker_is_secure_on_this_host() {
        let picker = IndexPicker::from_entropy();
        assert_eq!(picker.strength(), RandomStrength::Secure);
    }
}
