//! The filesystem operations surface (C8): a path-addressed read/stat/
//! listing/xattr API consumed by an external bridge (never implemented
//! here).

use std::time::SystemTime;

use sizefs_xeger::parse_size;

use crate::{
    error::{Error, Result},
    namespace::Namespace,
};

/// Fixed fake block-device numbers `statfs` reports. The filesystem has no
/// backing store, so these are constants rather than anything computed.
const STATFS_BLOCK_SIZE: u64 = 512;
const STATFS_BLOCKS: u64 = 4096;
const STATFS_BLOCKS_AVAILABLE: u64 = 2048;

/// What kind of node a [`Stat`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// A stat-like record returned by `getattr`.
#[derive(Debug, Clone, Copy)]
pub struct Stat {
    pub kind: NodeKind,
    pub size: u64,
    pub nlink: u64,
    pub mtime: SystemTime,
}

/// Fixed fake statfs numbers.
#[derive(Debug, Clone, Copy)]
pub struct StatFs {
    pub block_size: u64,
    pub blocks: u64,
    pub blocks_available: u64,
}

/// A monotonically increasing file descriptor id. The core does not track
/// open handles beyond allocating this counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileHandle(pub u64);

/// Split `path` into its directory and (optional) file components. `path`
/// is expected to start with `/`; root is `("", None)`.
fn split_path(path: &str) -> (String, Option<String>) {
    let trimmed = path.trim_start_matches('/');
    match trimmed.split_once('/') {
        Some((dir, file)) if !file.is_empty() => (dir.to_string(), Some(file.to_string())),
        _ if trimmed.is_empty() => (String::new(), None),
        _ => (trimmed.to_string(), None),
    }
}

/// The mock filesystem: owns the namespace and exposes the path-addressed
/// operation surface.
pub struct SizeFs {
    namespace: Namespace,
    next_fd: u64,
    root_nlink: u64,
}

impl SizeFs {
    /// Build an empty filesystem (no seeded directories), with all
    /// generator randomness derived from `seed` and the crate's own
    /// built-in `max_random`/`alpha_num_pool` defaults.
    pub fn new(seed: [u8; 32]) -> Self {
        Self::with_defaults(seed, sizefs_xeger::DEFAULT_MAX_RANDOM, sizefs_xeger::DEFAULT_ALPHA_NUM_POOL)
    }

    /// Build an empty filesystem, overriding the `max_random`/
    /// `alpha_num_pool` fallbacks a file's xattrs use when it doesn't set
    /// them itself (see [`crate::Config`]).
    pub fn with_defaults(seed: [u8; 32], default_max_random: u32, default_alpha_num_pool: usize) -> Self {
        Self {
            namespace: Namespace::with_defaults(seed, default_max_random, default_alpha_num_pool),
            next_fd: 1,
            root_nlink: 0,
        }
    }

    /// Build a filesystem seeded with `/zeros`, `/ones`, `/alpha_num`, each
    /// pre-populated with the four default files `100K`, `4M`, `4M-1B`,
    /// `4M+1B`.
    pub fn seeded(seed: [u8; 32]) -> Result<Self> {
        Self::seeded_with_defaults(seed, sizefs_xeger::DEFAULT_MAX_RANDOM, sizefs_xeger::DEFAULT_ALPHA_NUM_POOL)
    }

    /// Same as [`SizeFs::seeded`], overriding the `max_random`/
    /// `alpha_num_pool` defaults.
    pub fn seeded_with_defaults(seed: [u8; 32], default_max_random: u32, default_alpha_num_pool: usize) -> Result<Self> {
        let mut fs = Self::with_defaults(seed, default_max_random, default_alpha_num_pool);
        for (dir, generator) in [("zeros", "zeros"), ("ones", "ones"), ("alpha_num", "alpha_num")] {
            fs.mkdir(&format!("/{dir}"))?;
            fs.setxattr(&format!("/{dir}"), "generator", generator)?;
            for name in ["100K", "4M", "4M-1B", "4M+1B"] {
                fs.create(&format!("/{dir}/{name}"))?;
            }
        }
        Ok(fs)
    }

    fn fresh_fd(&mut self) -> FileHandle {
        let fd = self.next_fd;
        self.next_fd += 1;
        FileHandle(fd)
    }

    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let (dir, file) = split_path(path);
        if file.is_some() || dir.is_empty() {
            return Err(Error::PermissionDenied(path.to_string()));
        }
        self.namespace.mkdir(&dir)?;
        self.root_nlink += 1;
        Ok(())
    }

    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let (dir, file) = split_path(path);
        if file.is_some() {
            return Err(Error::NotFound(path.to_string()));
        }
        self.namespace.rmdir(&dir)?;
        self.root_nlink = self.root_nlink.saturating_sub(1);
        Ok(())
    }

    /// Directory-only rename; see invariant 7 (renaming a file is
    /// forbidden because it would change its logical size).
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let (old_dir, old_file) = split_path(old);
        let (new_dir, new_file) = split_path(new);
        if old_file.is_some() || new_file.is_some() {
            return Err(Error::PermissionDenied(old.to_string()));
        }
        self.namespace.rename_dir(&old_dir, &new_dir)
    }

    /// Parent must be an existing directory; basename must match the size
    /// grammar. A bad basename is `PermissionDenied` here (maps to
    /// `EPERM`), unlike `read`'s lazy-create path, which treats the same
    /// condition as `NotFound`.
    pub fn create(&mut self, path: &str) -> Result<FileHandle> {
        let (dir, file) = split_path(path);
        let file = file.ok_or_else(|| Error::PermissionDenied(path.to_string()))?;
        let size = parse_size(&file).map_err(|_| Error::PermissionDenied(path.to_string()))?;
        self.namespace.create_file(&dir, &file, size)?;
        Ok(self.fresh_fd())
    }

    pub fn open(&mut self, path: &str) -> Result<FileHandle> {
        let (dir, file) = split_path(path);
        let file = file.ok_or_else(|| Error::NotFound(path.to_string()))?;
        self.namespace.file(&dir, &file)?;
        Ok(self.fresh_fd())
    }

    /// Delegates to the file's generator over `[offset, offset+size-1]`,
    /// clamped to `[0, L-1]`. May lazily `create` the path if its basename
    /// parses as a size and the parent directory exists; an unparsable
    /// basename in that lazy path is `NotFound`, not `PermissionDenied`.
    pub fn read(&mut self, path: &str, size: u64, offset: u64) -> Result<Vec<u8>> {
        let (dir, file) = split_path(path);
        let file = file.ok_or_else(|| Error::NotFound(path.to_string()))?;

        if self.namespace.file(&dir, &file).is_err() {
            let parsed_size = parse_size(&file).map_err(|_| Error::NotFound(path.to_string()))?;
            self.namespace.create_file(&dir, &file, parsed_size)?;
        }

        let record = self.namespace.file_mut(&dir, &file)?;
        if size == 0 {
            return Ok(Vec::new());
        }
        let end = offset.saturating_add(size).saturating_sub(1);
        Ok(record.generator.read(offset, end))
    }

    /// `.`, `..`, then direct children (directories under root, files
    /// under a directory).
    pub fn readdir(&self, path: &str) -> Result<Vec<String>> {
        let (dir, file) = split_path(path);
        let mut entries = vec![".".to_string(), "..".to_string()];

        if file.is_some() {
            return Err(Error::NotFound(path.to_string()));
        }
        if dir.is_empty() {
            entries.extend(self.namespace.directories.keys().cloned());
        } else {
            let record = self
                .namespace
                .directories
                .get(&dir)
                .ok_or_else(|| Error::NotFound(path.to_string()))?;
            entries.extend(record.files.keys().cloned());
        }
        Ok(entries)
    }

    pub fn getattr(&mut self, path: &str) -> Result<Stat> {
        let (dir, file) = split_path(path);

        match file.as_deref() {
            None if dir.is_empty() => Ok(Stat {
                kind: NodeKind::Directory,
                size: 0,
                nlink: self.root_nlink,
                mtime: SystemTime::now(),
            }),
            None => {
                let record = self
                    .namespace
                    .directories
                    .get(&dir)
                    .ok_or_else(|| Error::NotFound(path.to_string()))?;
                Ok(Stat {
                    kind: NodeKind::Directory,
                    size: 0,
                    nlink: 2,
                    mtime: record.mtime.unwrap_or(SystemTime::UNIX_EPOCH),
                })
            }
            Some(".") => self.getattr(&format!("/{dir}")),
            Some("..") => self.getattr("/"),
            Some(name) => {
                if let Ok(record) = self.namespace.file(&dir, name) {
                    return Ok(Stat {
                        kind: NodeKind::File,
                        size: record.size,
                        nlink: 1,
                        mtime: record.mtime,
                    });
                }
                // Lazy materialization, same rule as `read`.
                let size = parse_size(name).map_err(|_| Error::NotFound(path.to_string()))?;
                self.namespace.create_file(&dir, name, size)?;
                let record = self.namespace.file(&dir, name)?;
                Ok(Stat {
                    kind: NodeKind::File,
                    size: record.size,
                    nlink: 1,
                    mtime: record.mtime,
                })
            }
        }
    }

    pub fn getxattr(&self, path: &str, name: &str) -> Result<String> {
        let (dir, file) = split_path(path);
        let xattrs = self.xattrs_of(&dir, file.as_deref())?;
        xattrs
            .get(name)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingXattr {
                path: path.to_string(),
                name: name.to_string(),
            })
    }

    pub fn listxattr(&self, path: &str) -> Result<Vec<String>> {
        let (dir, file) = split_path(path);
        let xattrs = self.xattrs_of(&dir, file.as_deref())?;
        Ok(xattrs.names().map(str::to_string).collect())
    }

    pub fn setxattr(&mut self, path: &str, name: &str, value: &str) -> Result<()> {
        let (dir, file) = split_path(path);
        match file {
            None if dir.is_empty() => {
                self.namespace.setxattr_root(name, value);
                Ok(())
            }
            None => self.namespace.setxattr_dir(&dir, name, value),
            Some(file) => self.namespace.setxattr_file(&dir, &file, name, value),
        }
    }

    pub fn removexattr(&mut self, path: &str, name: &str) -> Result<()> {
        let (dir, file) = split_path(path);
        match file {
            None if dir.is_empty() => {
                self.namespace
                    .removexattr_root(name)
                    .map(|_| ())
                    .ok_or_else(|| Error::MissingXattr {
                        path: path.to_string(),
                        name: name.to_string(),
                    })
            }
            None => self.namespace.removexattr_dir(&dir, name),
            Some(file) => self.namespace.removexattr_file(&dir, &file, name),
        }
    }

    pub fn unlink(&mut self, path: &str) -> Result<()> {
        let (dir, file) = split_path(path);
        let file = file.ok_or_else(|| Error::NotFound(path.to_string()))?;
        self.namespace.unlink(&dir, &file)
    }

    pub fn statfs(&self) -> StatFs {
        StatFs {
            block_size: STATFS_BLOCK_SIZE,
            blocks: STATFS_BLOCKS,
            blocks_available: STATFS_BLOCKS_AVAILABLE,
        }
    }

    pub fn chmod(&self, path: &str) -> Result<()> {
        Err(Error::PermissionDenied(path.to_string()))
    }

    pub fn chown(&self, path: &str) -> Result<()> {
        Err(Error::PermissionDenied(path.to_string()))
    }

    pub fn truncate(&self, path: &str) -> Result<()> {
        Err(Error::PermissionDenied(path.to_string()))
    }

    pub fn write(&self, path: &str) -> Result<()> {
        Err(Error::PermissionDenied(path.to_string()))
    }

    pub fn symlink(&self, path: &str) -> Result<()> {
        Err(Error::PermissionDenied(path.to_string()))
    }

    fn xattrs_of(&self, dir: &str, file: Option<&str>) -> Result<&crate::xattr::XattrMap> {
        match file {
            None if dir.is_empty() => Ok(self.namespace.root_xattrs()),
            None => self
                .namespace
                .directories
                .get(dir)
                .map(|d| &d.xattrs)
                .ok_or_else(|| Error::NotFound(format!("/{dir}"))),
            Some(file) => self.namespace.file(dir, file).map(|f| &f.xattrs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_path_handles_root_dir_and_file() {
        assert_eq!(split_path("/"), (String::new(), None));
        assert_eq!(split_path("/zeros"), ("zeros".to_string(), None));
        assert_eq!(
            split_path("/zeros/5B"),
            ("zeros".to_string(), Some("5B".to_string()))
        );
    }

    #[test]
    fn seeded_namespace_lists_default_files() {
        let fs = SizeFs::seeded([1u8; 32]).unwrap();
        let entries = fs.readdir("/zeros").unwrap();
        for name in ["100K", "4M", "4M-1B", "4M+1B"] {
            assert!(entries.iter().any(|e| e == name), "missing {name}");
        }
    }

    #[test]
    fn read_scenario_zeros_and_ones() {
        let mut fs = SizeFs::seeded([1u8; 32]).unwrap();
        fs.create("/zeros/5B").ok();
        fs.setxattr("/zeros", "generator", "zeros").unwrap();
        assert_eq!(fs.read("/zeros/5B", 5, 0).unwrap(), b"00000".to_vec());

        fs.setxattr("/ones", "generator", "ones").unwrap();
        fs.create("/ones/5B").ok();
        assert_eq!(fs.read("/ones/5B", 5, 0).unwrap(), b"11111".to_vec());
    }

    #[test]
    fn regex_generator_via_xattrs_end_to_end() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/regex1").unwrap();
        fs.setxattr("/regex1", "generator", "regex").unwrap();
        fs.setxattr("/regex1", "filler", "a{2}b{2}c").unwrap();
        assert_eq!(fs.read("/regex1/5B", 5, 0).unwrap(), b"aabbc".to_vec());
    }

    #[test]
    fn read_lazily_creates_an_unknown_but_valid_path() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/plain").unwrap();
        fs.setxattr("/plain", "generator", "zeros").unwrap();
        let out = fs.read("/plain/4B", 4, 0).unwrap();
        assert_eq!(out, b"0000".to_vec());
    }

    #[test]
    fn read_of_bad_filename_is_not_found_not_permission_denied() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/plain").unwrap();
        assert!(matches!(
            fs.read("/plain/not-a-size", 4, 0),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn create_of_bad_filename_is_permission_denied() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/plain").unwrap();
        assert!(matches!(
            fs.create("/plain/not-a-size"),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn rmdir_and_rename_and_refusals() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/a").unwrap();
        fs.rename("/a", "/b").unwrap();
        assert!(fs.readdir("/b").is_ok());
        fs.rmdir("/b").unwrap();
        assert!(matches!(fs.readdir("/b"), Err(Error::NotFound(_))));

        assert!(matches!(fs.write("/anything"), Err(Error::PermissionDenied(_))));
        assert!(matches!(fs.truncate("/anything"), Err(Error::PermissionDenied(_))));
        assert!(matches!(fs.chmod("/anything"), Err(Error::PermissionDenied(_))));
        assert!(matches!(fs.chown("/anything"), Err(Error::PermissionDenied(_))));
        assert!(matches!(fs.symlink("/anything"), Err(Error::PermissionDenied(_))));
    }

    #[test]
    fn getattr_dot_and_dotdot() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/a").unwrap();
        let dot = fs.getattr("/a/.").unwrap();
        assert_eq!(dot.kind, NodeKind::Directory);
        let dotdot = fs.getattr("/a/..").unwrap();
        assert_eq!(dotdot.kind, NodeKind::Directory);
    }

    #[test]
    fn statfs_returns_fixed_numbers() {
        let fs = SizeFs::new([2u8; 32]);
        let stats = fs.statfs();
        assert_eq!(stats.block_size, 512);
        assert_eq!(stats.blocks, 4096);
        assert_eq!(stats.blocks_available, 2048);
    }

    #[test]
    fn root_xattrs_round_trip_through_the_surface() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.setxattr("/", "label", "top").unwrap();
        assert_eq!(fs.getxattr("/", "label").unwrap(), "top");
        assert!(fs.listxattr("/").unwrap().iter().any(|n| n == "user.label"));
        fs.removexattr("/", "label").unwrap();
        assert!(matches!(
            fs.getxattr("/", "label"),
            Err(Error::MissingXattr { .. })
        ));
    }

    #[test]
    fn rename_onto_an_existing_directory_is_refused() {
        let mut fs = SizeFs::new([2u8; 32]);
        fs.mkdir("/a").unwrap();
        fs.mkdir("/b").unwrap();
        assert!(matches!(
            fs.rename("/a", "/b"),
            Err(Error::PermissionDenied(_))
        ));
    }

    #[test]
    fn config_defaults_reach_the_generator() {
        let mut fs = SizeFs::with_defaults([2u8; 32], 1, 4);
        fs.mkdir("/plain").unwrap();
        fs.setxattr("/plain", "generator", "alpha_num").unwrap();
        fs.create("/plain/16B").unwrap();
        let out = fs.read("/plain/16B", 16, 0).unwrap();
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(u8::is_ascii_alphanumeric));
    }
}
