//! In-memory copy of a template tree.
//!
//! Every transformation stage works on a [`VirtualTree`] instead of the file system,
//! so the destination is only touched once the whole tree has been transformed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use globset::GlobSet;
use log::debug;
use walkdir::WalkDir;

use crate::constants::{BINARY_EXTENSIONS, BINARY_SNIFF_LEN};
use crate::error::{Error, Result};

/// A single node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Dir,
    File {
        contents: Vec<u8>,
        permissions: Option<fs::Permissions>,
    },
    /// A symbolic link, kept as a link with its target unchanged.
    Symlink { target: PathBuf },
}

impl Entry {
    pub fn file<C: Into<Vec<u8>>>(contents: C) -> Self {
        Entry::File { contents: contents.into(), permissions: None }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir)
    }
}

/// Ordered map of paths relative to the tree root.
///
/// Invariant: the parent of every entry is present as an [`Entry::Dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualTree {
    entries: BTreeMap<PathBuf, Entry>,
}

impl VirtualTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `root` recursively, skipping every path matched by `ignored`.
    ///
    /// # Arguments
    /// * `root` - Template directory
    /// * `ignored` - Glob patterns matched against paths relative to `root`
    ///
    /// # Errors
    /// * `Error::TemplateError` if the directory cannot be traversed
    /// * `Error::IoError` if a file or link cannot be read
    pub fn load<P: AsRef<Path>>(root: P, ignored: &GlobSet) -> Result<Self> {
        let root = root.as_ref();
        let mut tree = Self::new();

        let walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();
        let walker = walker.filter_entry(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let skip = ignored.is_match(relative);
            if skip {
                debug!("Skipping '{}' matched by ignore patterns", relative.display());
            }
            !skip
        });

        for dir_entry in walker {
            let dir_entry = dir_entry.map_err(|e| Error::TemplateError(e.to_string()))?;
            let relative = dir_entry
                .path()
                .strip_prefix(root)
                .map_err(|e| Error::TemplateError(e.to_string()))?
                .to_path_buf();

            if dir_entry.path_is_symlink() {
                let target = fs::read_link(dir_entry.path())?;
                debug!("Keeping link '{}' -> '{}'", relative.display(), target.display());
                tree.insert(relative, Entry::Symlink { target });
            } else if dir_entry.file_type().is_dir() {
                tree.insert(relative, Entry::Dir);
            } else {
                let contents = fs::read(dir_entry.path())?;
                let permissions = dir_entry.metadata().ok().map(|m| m.permissions());
                tree.insert(relative, Entry::File { contents, permissions });
            }
        }

        debug!("Loaded {} entries from '{}'", tree.len(), root.display());
        Ok(tree)
    }

    /// Inserts an entry, creating missing parent directories.
    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, entry: Entry) {
        let path = path.into();
        self.create_dir_all(path.parent().unwrap_or(Path::new("")));
        self.entries.insert(path, entry);
    }

    /// Creates `path` and all of its missing ancestors as directories.
    pub fn create_dir_all<P: AsRef<Path>>(&mut self, path: P) {
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.entries.entry(ancestor.to_path_buf()).or_insert(Entry::Dir);
        }
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&Entry> {
        self.entries.get(path.as_ref())
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(path.as_ref())
    }

    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        self.get(path).is_some_and(Entry::is_dir)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Entry)> {
        self.entries.iter()
    }

    /// Paths of every entry, in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.keys().cloned().collect()
    }

    /// Paths strictly below `dir`.
    pub fn descendants<P: AsRef<Path>>(&self, dir: P) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        self.entries
            .keys()
            .filter(|path| path.as_path() != dir && path.starts_with(dir))
            .cloned()
            .collect()
    }

    /// True when `dir` exists and has no children.
    pub fn is_empty_dir<P: AsRef<Path>>(&self, dir: P) -> bool {
        let dir = dir.as_ref();
        self.is_dir(dir) && self.descendants(dir).is_empty()
    }

    /// Removes `path` and everything below it. Returns the number of removed entries.
    pub fn remove_all<P: AsRef<Path>>(&mut self, path: P) -> usize {
        let path = path.as_ref();
        let before = self.entries.len();
        self.entries.retain(|p, _| !p.starts_with(path));
        before - self.entries.len()
    }

    pub fn remove<P: AsRef<Path>>(&mut self, path: P) -> Option<Entry> {
        self.entries.remove(path.as_ref())
    }

    /// Contents of a text file, or `None` if the entry is absent, a directory,
    /// or not valid UTF-8.
    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> Option<String> {
        match self.get(path) {
            Some(Entry::File { contents, .. }) => String::from_utf8(contents.clone()).ok(),
            _ => None,
        }
    }

    /// Replaces the contents of an existing file, keeping its permissions.
    pub fn write<P: AsRef<Path>, C: Into<Vec<u8>>>(&mut self, path: P, data: C) {
        let path = path.as_ref();
        match self.entries.get_mut(path) {
            Some(Entry::File { contents, .. }) => *contents = data.into(),
            _ => self.insert(path.to_path_buf(), Entry::file(data)),
        }
    }

    /// Mutable access to the contents of every file.
    pub fn files_mut(&mut self) -> impl Iterator<Item = (&PathBuf, &mut Vec<u8>)> {
        self.entries.iter_mut().filter_map(|(path, entry)| match entry {
            Entry::File { contents, .. } => Some((path, contents)),
            Entry::Dir | Entry::Symlink { .. } => None,
        })
    }

    /// Rebuilds the tree with every path passed through `map`.
    ///
    /// # Errors
    /// * `Error::RenameConflict` if two entries map to the same path and at least one
    ///   of them is a file
    pub fn remap<F>(&mut self, mut map: F) -> Result<()>
    where
        F: FnMut(&Path) -> PathBuf,
    {
        let mut remapped: BTreeMap<PathBuf, Entry> = BTreeMap::new();
        for (path, entry) in &self.entries {
            let target = map(path);
            match remapped.get(&target) {
                Some(existing) if !(existing.is_dir() && entry.is_dir()) => {
                    return Err(Error::RenameConflict {
                        source_path: path.display().to_string(),
                        target_path: target.display().to_string(),
                    });
                }
                _ => {
                    remapped.insert(target, entry.clone());
                }
            }
        }
        self.entries = remapped;
        Ok(())
    }
}

/// Checks whether file contents should be treated as binary.
///
/// A file is binary when its extension is a known binary format or when a NUL
/// byte appears in its first bytes.
pub fn is_binary(path: &Path, contents: &[u8]) -> bool {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        if BINARY_EXTENSIONS.contains(&ext.as_str()) {
            return true;
        }
    }
    let sniff_len = contents.len().min(BINARY_SNIFF_LEN);
    contents[..sniff_len].contains(&0)
}
