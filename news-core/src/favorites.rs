use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// Plain-text mirror of the favorites: one title per line, no escaping.
#[derive(Debug, Clone)]
pub struct FavoritesFile {
    path: PathBuf,
}

impl FavoritesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the file with exactly `titles`.
    pub fn write_all(&self, titles: &[String]) -> Result<(), PersistenceError> {
        self.rewrite(titles.iter().map(String::as_str))
    }

    /// Removes every line equal to `title`, reading the current file content
    /// rather than trusting the in-memory list. A missing file is left missing.
    pub fn remove_one(&self, title: &str) -> Result<(), PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(self.io_error(err)),
        };
        self.rewrite(content.lines().filter(|line| *line != title))
    }

    pub fn truncate(&self) -> Result<(), PersistenceError> {
        self.rewrite(std::iter::empty())
    }

    pub fn read_all(&self) -> Result<Vec<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(ToOwned::to_owned).collect()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn rewrite<'a>(&self, lines: impl Iterator<Item = &'a str>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        let mut file = fs::File::create(&self.path).map_err(|err| self.io_error(err))?;
        file.write_all(buf.as_bytes())
            .map_err(|err| self.io_error(err))
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Insertion-ordered set of starred titles, mirrored to an optional file.
///
/// Each public mutator takes the lock once; the file is written while it is
/// held so that memory and disk mutations are serialized together.
#[derive(Debug)]
pub struct Favorites {
    titles: Mutex<Vec<String>>,
    file: Option<FavoritesFile>,
}

impl Favorites {
    pub fn in_memory() -> Self {
        Self {
            titles: Mutex::new(Vec::new()),
            file: None,
        }
    }

    /// Mirrors to `file`. With `clear_on_start` the file is truncated first;
    /// otherwise whatever it holds is left on disk but not loaded.
    pub fn with_file(file: FavoritesFile, clear_on_start: bool) -> Self {
        if clear_on_start {
            match file.truncate() {
                Ok(()) => info!(path = %file.path().display(), "favorites file cleared"),
                Err(err) => warn!(%err, "failed to clear favorites file"),
            }
        }
        Self {
            titles: Mutex::new(Vec::new()),
            file: Some(file),
        }
    }

    pub fn file(&self) -> Option<&FavoritesFile> {
        self.file.as_ref()
    }

    /// Appends `title` unless already present. Returns whether it was added.
    pub fn add(&self, title: &str) -> bool {
        let mut titles = self.lock();
        if titles.iter().any(|existing| existing == title) {
            debug!(title, "already a favorite");
            return false;
        }
        titles.push(title.to_owned());
        self.mirror_all(&titles);
        true
    }

    /// Erases `title` from memory and reconciles the file from its own content.
    /// Returns whether the in-memory set changed.
    pub fn remove(&self, title: &str) -> bool {
        let mut titles = self.lock();
        let before = titles.len();
        titles.retain(|existing| existing != title);
        let removed = titles.len() != before;
        self.mirror_remove(title);
        removed
    }

    pub fn clear(&self) {
        let mut titles = self.lock();
        titles.clear();
        if let Some(file) = &self.file {
            if let Err(err) = file.truncate() {
                warn!(%err, "failed to clear favorites file");
            }
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.lock().iter().any(|existing| existing == title)
    }

    pub fn list(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mirror_all(&self, titles: &[String]) {
        if let Some(file) = &self.file {
            if let Err(err) = file.write_all(titles) {
                warn!(%err, "failed to persist favorites");
            }
        }
    }

    fn mirror_remove(&self, title: &str) {
        if let Some(file) = &self.file {
            if let Err(err) = file.remove_one(title) {
                warn!(%err, "failed to remove favorite from file");
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.titles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
