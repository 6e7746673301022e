//! The two trivial generators (C5): a constant repeated byte, and a
//! pre-sampled alphanumeric tile.

use rand::Rng;

/// Default size of the pre-sampled alphanumeric buffer. Tests may build a
/// smaller buffer with [`AlphaNumGenerator::with_pool_size`] to stay fast.
pub const DEFAULT_ALPHA_NUM_POOL: usize = 64 * 1024;

const ALPHA_NUM_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz";

/// Repeats a single byte for every read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConstantByteGenerator {
    byte: u8,
}

impl ConstantByteGenerator {
    pub(crate) fn new(byte: u8) -> Self {
        Self { byte }
    }

    pub(crate) fn read(&self, start: u64, end: u64) -> Vec<u8> {
        if start > end {
            return Vec::new();
        }
        vec![self.byte; (end - start + 1) as usize]
    }
}

/// Serves slices of a buffer of random alphanumeric bytes sampled once at
/// construction. Because the buffer is finite, reads past its length tile
/// back to the start — the same bytes are returned on every read, but the
/// bytes are not necessarily contiguous with the file's logical offsets
/// beyond one buffer length (this matches the original implementation,
/// which has never guaranteed more than "length and character class").
#[derive(Debug, Clone)]
pub(crate) struct AlphaNumGenerator {
    pool: Vec<u8>,
}

impl AlphaNumGenerator {
    pub(crate) fn new<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::with_pool_size(rng, DEFAULT_ALPHA_NUM_POOL)
    }

    pub(crate) fn with_pool_size<R>(rng: &mut R, pool_size: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let pool_size = pool_size.max(1);
        let pool = (0..pool_size)
            .map(|_| {
                let idx = rng.gen_range(0..ALPHA_NUM_CHARS.len());
                ALPHA_NUM_CHARS[idx]
            })
            .collect();
        Self { pool }
    }

    pub(crate) fn read(&self, start: u64, end: u64) -> Vec<u8> {
        if start > end {
            return Vec::new();
        }
        let needed = (end - start + 1) as usize;
        let mut out = Vec::with_capacity(needed);
        let pool_len = self.pool.len();
        let mut remaining = needed;
        while remaining > 0 {
            let take = remaining.min(pool_len);
            out.extend_from_slice(&self.pool[..take]);
            remaining -= take;
        }
        out
    }
}
