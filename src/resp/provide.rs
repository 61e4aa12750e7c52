//! Filesystem queries behind a trait so resolution can run against the real
//! disk or an in-memory tree.

use std::{
    cell::OnceCell,
    collections::{BTreeMap, BTreeSet},
    io,
    path::Path,
};

/// Blocking filesystem queries used during resolution.
///
/// Failures of individual queries are folded into "nothing there" by the
/// callers, so implementations report absence rather than raising.
pub trait Fs {
    fn path_exists(&self, path: &str) -> bool;

    /// Non-recursive listing of `dir`, names only. Directories when
    /// `directories_only`, plain files otherwise. Unreadable directories
    /// list as empty.
    fn list_dir(&self, dir: &str, directories_only: bool) -> Vec<String>;

    fn read_to_string(&self, path: &str) -> io::Result<String>;

    fn current_dir(&self) -> Option<String>;
}

impl<P> self::Fs for &P
where
    P: self::Fs,
{
    fn path_exists(&self, path: &str) -> bool {
        (*self).path_exists(path)
    }

    fn list_dir(&self, dir: &str, directories_only: bool) -> Vec<String> {
        (*self).list_dir(dir, directories_only)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        (*self).read_to_string(path)
    }

    fn current_dir(&self) -> Option<String> {
        (*self).current_dir()
    }
}

/// [Fs] backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFs;

impl self::Fs for OsFs {
    fn path_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn list_dir(&self, dir: &str, directories_only: bool) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let is_dir = entry.file_type().ok()?.is_dir();
                (is_dir == directories_only).then(|| entry.file_name().to_string_lossy().into_owned())
            })
            .collect()
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn current_dir(&self) -> Option<String> {
        std::env::current_dir()
            .ok()
            .map(|dir| dir.to_string_lossy().into_owned())
    }
}

/// [Fs] wrapper memoizing the working directory, so one resolution pass
/// queries it at most once however many lookups it performs.
#[derive(Debug)]
pub struct CwdCache<F> {
    inner: F,
    cwd: OnceCell<Option<String>>,
}

impl<F> CwdCache<F> {
    pub const fn new(inner: F) -> Self {
        Self {
            inner,
            cwd: OnceCell::new(),
        }
    }
}

impl<F> self::Fs for CwdCache<F>
where
    F: self::Fs,
{
    fn path_exists(&self, path: &str) -> bool {
        self.inner.path_exists(path)
    }

    fn list_dir(&self, dir: &str, directories_only: bool) -> Vec<String> {
        self.inner.list_dir(dir, directories_only)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.inner.read_to_string(path)
    }

    fn current_dir(&self) -> Option<String> {
        self.cwd.get_or_init(|| self.inner.current_dir()).clone()
    }
}

/// [Fs] over an in-memory file tree, directories implied by file paths.
///
/// Listing order is lexicographic, which stands in for directory order.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
    cwd: Option<String>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with contents, creating implied parent directories.
    #[must_use]
    pub fn file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Add an empty directory.
    #[must_use]
    pub fn dir(mut self, path: impl Into<String>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Set the reported working directory.
    #[must_use]
    pub fn cwd(mut self, path: impl Into<String>) -> Self {
        self.cwd = Some(path.into());
        self
    }

    fn children(&self, dir: &str, directories_only: bool) -> Vec<String> {
        let prefix = if dir.ends_with('/') {
            dir.to_owned()
        } else {
            format!("{dir}/")
        };

        let mut out = BTreeSet::new();
        for key in self.files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((head, _)) if directories_only && !head.is_empty() => {
                    out.insert(head.to_owned());
                }
                None if !directories_only && !rest.is_empty() => {
                    out.insert(rest.to_owned());
                }
                _ => {}
            }
        }
        if directories_only {
            for key in &self.dirs {
                if let Some(rest) = key.strip_prefix(&prefix)
                    && !rest.is_empty()
                {
                    let head = rest.split_once('/').map_or(rest, |(head, _)| head);
                    out.insert(head.to_owned());
                }
            }
        }
        out.into_iter().collect()
    }
}

impl self::Fs for MemoryFs {
    fn path_exists(&self, path: &str) -> bool {
        if path == "/" || self.files.contains_key(path) || self.dirs.contains(path) {
            return true;
        }
        let prefix = format!("{path}/");
        self.files.keys().any(|key| key.starts_with(&prefix))
            || self.dirs.iter().any(|key| key.starts_with(&prefix))
    }

    fn list_dir(&self, dir: &str, directories_only: bool) -> Vec<String> {
        self.children(dir, directories_only)
    }

    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn current_dir(&self) -> Option<String> {
        self.cwd.clone()
    }
}
