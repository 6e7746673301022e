//! A fast bounded integer source.
//!
//! `rand`'s general-purpose distributions are more precise than this engine
//! needs: every multiplier and set lookup only wants a uniform integer in a
//! small, fixed range, over and over, for the lifetime of a generator. Rather
//! than pay a fresh sampling call each time, [`RandomRing`] pre-samples a
//! small ring of values once and hands them out round-robin. This is not a
//! cryptographic source and callers must not treat it as one.

const RING_LEN: usize = 255;

/// A pre-sampled ring of uniformly distributed integers in `[lo, hi]`.
///
/// The ring is filled once, at construction, from any `rand::Rng`. Tests can
/// pass a seeded `SmallRng` to get a reproducible sequence; production code
/// seeds from an OS-backed RNG. Calling [`RandomRing::next`] never re-samples
/// the underlying source; it just advances a cursor, wrapping at the end of
/// the ring.
#[derive(Debug, Clone)]
pub struct RandomRing {
    values: [u32; RING_LEN],
    cursor: usize,
}

impl RandomRing {
    /// Build a new ring of values uniformly distributed in `[lo, hi]`
    /// (inclusive), sampled from `rng`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    pub fn new<R>(rng: &mut R, lo: u32, hi: u32) -> Self
    where
        R: rand::Rng + ?Sized,
    {
        assert!(lo <= hi, "RandomRing requires lo <= hi, got {lo} > {hi}");
        let mut values = [0u32; RING_LEN];
        for v in &mut values {
            *v = rng.gen_range(lo..=hi);
        }
        Self { values, cursor: 0 }
    }

    /// Return the next value from the ring, advancing (and wrapping) the
    /// cursor.
    pub fn next(&mut self) -> u32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % RING_LEN;
        value
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn values_stay_within_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut ring = RandomRing::new(&mut rng, 3, 9);
        for _ in 0..(RING_LEN * 3) {
            let v = ring.next();
            assert!((3..=9).contains(&v));
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let mut rng_a = SmallRng::seed_from_u64(42);
        let mut ring_a = RandomRing::new(&mut rng_a, 0, 100);

        let mut rng_b = SmallRng::seed_from_u64(42);
        let mut ring_b = RandomRing::new(&mut rng_b, 0, 100);

        for _ in 0..10 {
            assert_eq!(ring_a.next(), ring_b.next());
        }
    }

    #[test]
    fn degenerate_range_returns_constant() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ring = RandomRing::new(&mut rng, 5, 5);
        for _ in 0..10 {
            assert_eq!(ring.next(), 5);
        }
    }
}
