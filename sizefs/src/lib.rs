//! A mock filesystem whose file contents are synthesized on demand rather
//! than stored. A file's logical size comes from its name (`5B`, `100K`,
//! `4M-1B`, ...); its byte content comes from a generator selected and
//! configured through extended attributes inherited from its parent
//! directory. No content is ever persisted, and no bridge to an actual
//! mount point (FUSE or otherwise) lives in this crate.

mod config;
mod error;
mod fs;
mod namespace;
mod xattr;

pub use config::Config;
pub use error::{errno, Error, Result};
pub use fs::{FileHandle, NodeKind, SizeFs, Stat, StatFs};

impl SizeFs {
    /// Build a filesystem from a [`Config`], pre-populating the default
    /// `/zeros`, `/ones`, `/alpha_num` directories unless
    /// `seed_default_files` is `false`.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.seed_default_files {
            Self::seeded_with_defaults(config.seed, config.max_random, config.alpha_num_pool)
        } else {
            Ok(Self::with_defaults(config.seed, config.max_random, config.alpha_num_pool))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_without_defaults_starts_empty() {
        let config = Config {
            seed_default_files: false,
            ..Config::default()
        };
        let fs = SizeFs::from_config(&config).unwrap();
        assert!(fs.readdir("/").unwrap().len() == 2); // just "." and ".."
    }

    #[test]
    fn from_config_with_defaults_seeds_known_directories() {
        let fs = SizeFs::from_config(&Config::default()).unwrap();
        let top = fs.readdir("/").unwrap();
        for dir in ["zeros", "ones", "alpha_num"] {
            assert!(top.iter().any(|e| e == dir), "missing {dir}");
        }
    }

    #[test]
    fn same_seed_produces_identical_content() {
        let mut a = SizeFs::seeded([9u8; 32]).unwrap();
        let mut b = SizeFs::seeded([9u8; 32]).unwrap();
        assert_eq!(
            a.read("/alpha_num/100K", 64, 0).unwrap(),
            b.read("/alpha_num/100K", 64, 0).unwrap()
        );
    }

    #[test]
    fn config_alpha_num_pool_reaches_newly_created_files() {
        let config = Config {
            seed_default_files: false,
            alpha_num_pool: 4,
            ..Config::default()
        };
        let mut fs = SizeFs::from_config(&config).unwrap();
        fs.mkdir("/plain").unwrap();
        fs.setxattr("/plain", "generator", "alpha_num").unwrap();
        fs.create("/plain/32B").unwrap();
        let out = fs.read("/plain/32B", 32, 0).unwrap();
        assert_eq!(out.len(), 32);
        assert!(out.iter().all(u8::is_ascii_alphanumeric));
    }
}
