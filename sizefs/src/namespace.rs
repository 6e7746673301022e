//! The namespace & xattr store (C7): a root directory holding a flat map of
//! top-level directories, each holding a flat map of files. There is no
//! deeper nesting — this mirrors the mock filesystem's only job, which is
//! serving synthetic file content, not modeling a general directory tree.

use std::{collections::BTreeMap, time::SystemTime};

use sizefs_xeger::{Generator, GeneratorKind, GeneratorSpec};

use crate::{
    error::{Error, Result},
    xattr::XattrMap,
};

const DEFAULT_MAX_RANDOM: u32 = 10;

/// Content-affecting xattr keys, read back out of a file's own xattr map at
/// generator-rebuild time.
const KEY_GENERATOR: &str = "generator";
const KEY_FILLER: &str = "filler";
const KEY_PREFIX: &str = "prefix";
const KEY_SUFFIX: &str = "suffix";
const KEY_PADDER: &str = "padder";
const KEY_MAX_RANDOM: &str = "max_random";

/// Derive a per-file RNG seed from the namespace's base seed and the file's
/// path, so every file gets its own reproducible stream instead of every
/// file replaying the exact same one.
fn derive_seed(base: [u8; 32], path: &str) -> [u8; 32] {
    // FNV-1a, mixed byte-by-byte into the base seed. Small and
    // dependency-free; this only needs to scatter paths, not resist
    // adversarial input.
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in path.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let hash_bytes = hash.to_le_bytes();
    let mut seed = base;
    for (i, b) in seed.iter_mut().enumerate() {
        *b ^= hash_bytes[i % hash_bytes.len()];
    }
    seed
}

pub(crate) struct FileRecord {
    pub(crate) size: u64,
    pub(crate) xattrs: XattrMap,
    pub(crate) mtime: SystemTime,
    pub(crate) generator: Generator,
}

impl FileRecord {
    fn rebuild_generator(
        &mut self,
        path: &str,
        seed: [u8; 32],
        default_max_random: u32,
        default_alpha_num_pool: usize,
    ) -> Result<()> {
        self.generator = build_generator(
            self.size,
            &self.xattrs,
            path,
            seed,
            default_max_random,
            default_alpha_num_pool,
        )?;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct DirectoryRecord {
    pub(crate) xattrs: XattrMap,
    pub(crate) mtime: Option<SystemTime>,
    pub(crate) files: BTreeMap<String, FileRecord>,
}

/// Select and construct the generator a file's current xattrs describe.
/// Unset or unrecognized `generator` values fall back to `ones`, logged.
/// `default_max_random`/`default_alpha_num_pool` are the namespace's own
/// construction-time defaults, used when a file's xattrs don't override
/// them.
fn build_generator(
    size: u64,
    xattrs: &XattrMap,
    path: &str,
    seed: [u8; 32],
    default_max_random: u32,
    default_alpha_num_pool: usize,
) -> Result<Generator> {
    let kind = match xattrs.get(KEY_GENERATOR) {
        Some("zeros") => GeneratorKind::Zeros,
        Some("ones") => GeneratorKind::Ones,
        Some("alpha_num") => GeneratorKind::AlphaNum,
        Some("regex") => GeneratorKind::Xeger,
        Some(other) => {
            tracing::warn!(path, generator = other, "unknown generator kind, falling back to ones");
            GeneratorKind::Ones
        }
        None => {
            tracing::warn!(path, "no generator xattr set, falling back to ones");
            GeneratorKind::Ones
        }
    };

    let max_random = xattrs
        .get(KEY_MAX_RANDOM)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default_max_random);

    let spec = GeneratorSpec {
        kind,
        size,
        filler: xattrs.get(KEY_FILLER).map(str::to_string),
        prefix: xattrs.get(KEY_PREFIX).map(str::to_string),
        suffix: xattrs.get(KEY_SUFFIX).map(str::to_string),
        padder: xattrs.get(KEY_PADDER).map(str::to_string),
        max_random: Some(max_random),
        alpha_num_pool: Some(default_alpha_num_pool),
    };

    Ok(Generator::build(&spec, derive_seed(seed, path))?)
}

/// Root of the mock filesystem: a flat map of top-level directory name to
/// [`DirectoryRecord`], plus the root's own xattr map (root has no content
/// to generate, but it is still a directory with its own attributes).
pub(crate) struct Namespace {
    pub(crate) directories: BTreeMap<String, DirectoryRecord>,
    pub(crate) root_xattrs: XattrMap,
    seed: [u8; 32],
    default_max_random: u32,
    default_alpha_num_pool: usize,
}

impl Namespace {
    pub(crate) fn new(seed: [u8; 32]) -> Self {
        Self::with_defaults(seed, DEFAULT_MAX_RANDOM, sizefs_xeger::DEFAULT_ALPHA_NUM_POOL)
    }

    pub(crate) fn with_defaults(seed: [u8; 32], default_max_random: u32, default_alpha_num_pool: usize) -> Self {
        Self {
            directories: BTreeMap::new(),
            root_xattrs: XattrMap::default(),
            seed,
            default_max_random,
            default_alpha_num_pool,
        }
    }

    pub(crate) fn mkdir(&mut self, name: &str) -> Result<()> {
        if self.directories.contains_key(name) {
            return Err(Error::PermissionDenied(format!(
                "directory {name:?} already exists"
            )));
        }
        self.directories.insert(name.to_string(), DirectoryRecord::default());
        Ok(())
    }

    pub(crate) fn rmdir(&mut self, name: &str) -> Result<()> {
        match self.directories.get(name) {
            None => Err(Error::NotFound(name.to_string())),
            Some(dir) if !dir.files.is_empty() => {
                Err(Error::NotEmpty(name.to_string()))
            }
            Some(_) => {
                self.directories.remove(name);
                Ok(())
            }
        }
    }

    pub(crate) fn rename_dir(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.directories.contains_key(old) {
            return Err(Error::NotFound(old.to_string()));
        }
        if self.directories.contains_key(new) {
            return Err(Error::PermissionDenied(format!(
                "directory {new:?} already exists"
            )));
        }

        let mut dir = self
            .directories
            .remove(old)
            .ok_or_else(|| Error::NotFound(old.to_string()))?;

        // A file's generator seed is derived from its full path, so moving
        // the directory requires rebuilding every child's generator against
        // its new path even though the file's own xattrs don't change.
        let names: Vec<String> = dir.files.keys().cloned().collect();
        for name in names {
            let new_path = format!("/{new}/{name}");
            dir.files
                .get_mut(&name)
                .expect("name came from this map")
                .rebuild_generator(&new_path, self.seed, self.default_max_random, self.default_alpha_num_pool)?;
        }
        self.directories.insert(new.to_string(), dir);
        Ok(())
    }

    /// Create a file with `size`, inheriting the directory's xattrs.
    pub(crate) fn create_file(&mut self, dir_name: &str, file_name: &str, size: u64) -> Result<()> {
        let dir = self
            .directories
            .get_mut(dir_name)
            .ok_or_else(|| Error::NotFound(dir_name.to_string()))?;

        let mut xattrs = XattrMap::default();
        xattrs.inherit_from(&dir.xattrs);

        let path = format!("/{dir_name}/{file_name}");
        let generator = build_generator(
            size,
            &xattrs,
            &path,
            self.seed,
            self.default_max_random,
            self.default_alpha_num_pool,
        )?;

        dir.files.insert(
            file_name.to_string(),
            FileRecord {
                size,
                xattrs,
                mtime: SystemTime::now(),
                generator,
            },
        );
        Ok(())
    }

    pub(crate) fn file(&self, dir_name: &str, file_name: &str) -> Result<&FileRecord> {
        self.directories
            .get(dir_name)
            .and_then(|dir| dir.files.get(file_name))
            .ok_or_else(|| Error::NotFound(format!("/{dir_name}/{file_name}")))
    }

    pub(crate) fn file_mut(&mut self, dir_name: &str, file_name: &str) -> Result<&mut FileRecord> {
        self.directories
            .get_mut(dir_name)
            .and_then(|dir| dir.files.get_mut(file_name))
            .ok_or_else(|| Error::NotFound(format!("/{dir_name}/{file_name}")))
    }

    pub(crate) fn unlink(&mut self, dir_name: &str, file_name: &str) -> Result<()> {
        let dir = self
            .directories
            .get_mut(dir_name)
            .ok_or_else(|| Error::NotFound(dir_name.to_string()))?;
        dir.files
            .remove(file_name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("/{dir_name}/{file_name}")))
    }

    /// `setxattr` on a directory: updates the directory's own map, then
    /// propagates to every direct-child file and rebuilds each one's
    /// generator. Idempotent sets don't bump `mtime` anywhere.
    pub(crate) fn setxattr_dir(&mut self, dir_name: &str, name: &str, value: &str) -> Result<()> {
        let dir = self
            .directories
            .get_mut(dir_name)
            .ok_or_else(|| Error::NotFound(dir_name.to_string()))?;

        let dir_changed = dir.xattrs.set(name, value);
        if dir_changed {
            dir.mtime = Some(SystemTime::now());
        }

        let file_names: Vec<String> = dir.files.keys().cloned().collect();
        for file_name in file_names {
            let dir = self.directories.get_mut(dir_name).expect("just read above");
            let file = dir.files.get_mut(&file_name).expect("name came from this map");
            if file.xattrs.set(name, value) {
                file.mtime = SystemTime::now();
                let path = format!("/{dir_name}/{file_name}");
                file.rebuild_generator(&path, self.seed, self.default_max_random, self.default_alpha_num_pool)?;
            }
        }
        Ok(())
    }

    pub(crate) fn setxattr_file(&mut self, dir_name: &str, file_name: &str, name: &str, value: &str) -> Result<()> {
        let path = format!("/{dir_name}/{file_name}");
        let default_max_random = self.default_max_random;
        let default_alpha_num_pool = self.default_alpha_num_pool;
        let seed = self.seed;
        let file = self.file_mut(dir_name, file_name)?;
        if file.xattrs.set(name, value) {
            file.mtime = SystemTime::now();
            file.rebuild_generator(&path, seed, default_max_random, default_alpha_num_pool)?;
        }
        Ok(())
    }

    pub(crate) fn removexattr_dir(&mut self, dir_name: &str, name: &str) -> Result<()> {
        let dir = self
            .directories
            .get_mut(dir_name)
            .ok_or_else(|| Error::NotFound(dir_name.to_string()))?;
        if dir.xattrs.remove(name).is_none() {
            return Err(Error::MissingXattr {
                path: format!("/{dir_name}"),
                name: name.to_string(),
            });
        }
        dir.mtime = Some(SystemTime::now());

        let file_names: Vec<String> = dir.files.keys().cloned().collect();
        for file_name in file_names {
            let dir = self.directories.get_mut(dir_name).expect("just read above");
            let file = dir.files.get_mut(&file_name).expect("name came from this map");
            if file.xattrs.remove(name).is_some() {
                file.mtime = SystemTime::now();
                let path = format!("/{dir_name}/{file_name}");
                file.rebuild_generator(&path, self.seed, self.default_max_random, self.default_alpha_num_pool)?;
            }
        }
        Ok(())
    }

    pub(crate) fn removexattr_file(&mut self, dir_name: &str, file_name: &str, name: &str) -> Result<()> {
        let path = format!("/{dir_name}/{file_name}");
        let default_max_random = self.default_max_random;
        let default_alpha_num_pool = self.default_alpha_num_pool;
        let seed = self.seed;
        let file = self.file_mut(dir_name, file_name)?;
        if file.xattrs.remove(name).is_none() {
            return Err(Error::MissingXattr {
                path,
                name: name.to_string(),
            });
        }
        file.mtime = SystemTime::now();
        file.rebuild_generator(&path, seed, default_max_random, default_alpha_num_pool)?;
        Ok(())
    }

    /// `getxattr`/`setxattr`/`listxattr`/`removexattr` on root (`/`): root
    /// is a directory like any other as far as its own attributes go, it
    /// just has no direct-child files to propagate changes to.
    pub(crate) fn root_xattrs(&self) -> &XattrMap {
        &self.root_xattrs
    }

    pub(crate) fn setxattr_root(&mut self, name: &str, value: &str) -> bool {
        self.root_xattrs.set(name, value)
    }

    pub(crate) fn removexattr_root(&mut self, name: &str) -> Option<String> {
        self.root_xattrs.remove(name)
    }
}
