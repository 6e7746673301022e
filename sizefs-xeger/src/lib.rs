//! Byte-content generation engine for synthetic, size-addressed files.
//!
//! This crate has no notion of paths, directories, or a filesystem: it
//! parses a small regex-like grammar ([`Pattern`](pattern::Pattern)) and
//! drives it to produce bytes on demand, and separately decodes the
//! `<number><unit>` filename grammar used to pick a file's logical size.
//! Everything here is synchronous and single-threaded; callers that need
//! concurrent access must serialize it themselves.

mod error;
mod generator;
mod pattern;
mod producer;
mod rng;
mod size;
mod trivial;

pub use error::{Error, Result};
pub use size::parse_size;
pub use trivial::DEFAULT_ALPHA_NUM_POOL;

use rand::{rngs::StdRng, Rng, SeedableRng};

use generator::XegerGenerator;
use trivial::{AlphaNumGenerator, ConstantByteGenerator};

/// The default `max_random` bound applied to `*`/`+`/`?` multipliers when
/// a caller doesn't override it.
pub const DEFAULT_MAX_RANDOM: u32 = 10;

/// Parameters used to build a [`Generator`]. Every field beyond `kind` and
/// `size` is generator-specific; irrelevant fields are simply ignored by
/// the generator kind that doesn't use them.
#[derive(Debug, Clone, Default)]
pub struct GeneratorSpec {
    pub kind: GeneratorKind,
    pub size: u64,
    pub filler: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub padder: Option<String>,
    pub max_random: Option<u32>,
    pub alpha_num_pool: Option<usize>,
}

/// Which concrete generator a file is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    Zeros,
    #[default]
    Ones,
    AlphaNum,
    Xeger,
}

/// A byte-content generator for one virtual file. Wraps whichever concrete
/// generator the file's kind selects, behind a single `read` entry point.
#[derive(Debug)]
pub enum Generator {
    Zeros(ConstantByteGenerator),
    Ones(ConstantByteGenerator),
    AlphaNum(AlphaNumGenerator),
    Xeger(XegerGenerator),
}

impl Generator {
    /// Build a generator from `spec`, seeding its randomness deterministically
    /// from `seed` (the same knob `sizefs`'s top-level config exposes, in the
    /// same shape `StdRng::from_seed` takes).
    pub fn build(spec: &GeneratorSpec, seed: [u8; 32]) -> Result<Self> {
        let mut rng = StdRng::from_seed(seed);
        Self::build_with_rng(spec, &mut rng)
    }

    /// Build a generator from `spec`, drawing all randomness from `rng`.
    /// Exposed so callers (and this crate's own tests) can get
    /// reproducible output from a seeded RNG.
    pub fn build_with_rng<R>(spec: &GeneratorSpec, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        match spec.kind {
            GeneratorKind::Zeros => Ok(Generator::Zeros(ConstantByteGenerator::new(b'0'))),
            GeneratorKind::Ones => Ok(Generator::Ones(ConstantByteGenerator::new(b'1'))),
            GeneratorKind::AlphaNum => {
                let pool_size = spec.alpha_num_pool.unwrap_or(DEFAULT_ALPHA_NUM_POOL);
                Ok(Generator::AlphaNum(AlphaNumGenerator::with_pool_size(
                    rng, pool_size,
                )))
            }
            GeneratorKind::Xeger => {
                let max_random = spec.max_random.unwrap_or(DEFAULT_MAX_RANDOM);
                let xeger = XegerGenerator::new(
                    spec.size,
                    spec.filler.as_deref(),
                    spec.prefix.as_deref(),
                    spec.suffix.as_deref(),
                    spec.padder.as_deref(),
                    max_random,
                    rng,
                )?;
                Ok(Generator::Xeger(xeger))
            }
        }
    }

    /// Answer an inclusive byte range `[start, end]`, clamped to the file's
    /// logical size.
    pub fn read(&mut self, start: u64, end: u64) -> Vec<u8> {
        match self {
            Generator::Zeros(gen) | Generator::Ones(gen) => gen.read(start, end),
            Generator::AlphaNum(gen) => gen.read(start, end),
            Generator::Xeger(gen) => gen.read(start, end),
        }
    }
}
