//! Construction configuration (A3): the knobs needed to build a
//! reproducible [`crate::SizeFs`].

use serde::Deserialize;

/// Configuration for constructing a [`crate::SizeFs`].
///
/// Mirrors the way this crate's generator stack seeds its own randomness:
/// every run with the same `seed` produces byte-for-byte identical content
/// for every file, which matters for tests and for anyone diffing captured
/// output across runs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Seed for the RNG backing every file's content generator. Two
    /// `SizeFs` instances built from the same seed produce identical
    /// output for identical namespace operations.
    pub seed: [u8; 32],
    /// Whether to pre-populate `/zeros`, `/ones`, and `/alpha_num` with
    /// their default files (`100K`, `4M`, `4M-1B`, `4M+1B`) at startup.
    #[serde(default = "default_seed_default_files")]
    pub seed_default_files: bool,
    /// Default `max_random` bound applied to `*`/`+`/`?` multipliers when a
    /// file's xattrs don't set `max_random` explicitly.
    #[serde(default = "default_max_random")]
    pub max_random: u32,
    /// Default pool size for `alpha_num` generators when a file's xattrs
    /// don't set `alpha_num_pool` explicitly.
    #[serde(default = "default_alpha_num_pool")]
    pub alpha_num_pool: usize,
}

fn default_seed_default_files() -> bool {
    true
}

fn default_max_random() -> u32 {
    sizefs_xeger::DEFAULT_MAX_RANDOM
}

fn default_alpha_num_pool() -> usize {
    sizefs_xeger::DEFAULT_ALPHA_NUM_POOL
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: [0u8; 32],
            seed_default_files: default_seed_default_files(),
            max_random: default_max_random(),
            alpha_num_pool: default_alpha_num_pool(),
        }
    }
}
