use std::path::Path;

use tracing::debug;

use crate::error::LookupError;
use crate::favorites::{Favorites, FavoritesFile};
use crate::store::RecordStore;

/// Process-wide shared state handed to the fetch worker and the presentation
/// client. Every method is safe to call from the render loop each frame.
///
/// Listing and search copy the titles under the record lock, which is O(n) per
/// call; fine for a single headline page.
#[derive(Debug)]
pub struct AppState {
    records: RecordStore,
    favorites: Favorites,
}

impl AppState {
    pub fn new(favorites: Favorites) -> Self {
        Self {
            records: RecordStore::new(),
            favorites,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Favorites::in_memory())
    }

    pub fn init(favorites_path: impl AsRef<Path>, clear_on_start: bool) -> Self {
        let file = FavoritesFile::new(favorites_path.as_ref());
        Self::new(Favorites::with_file(file, clear_on_start))
    }

    /// Ends the session. The favorites file is left as is for the next start.
    pub fn shutdown(&self) {
        debug!(favorites = self.favorites.len(), "shutting down app state");
        self.records.clear_selection();
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn favorites_store(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_ready(&self) -> bool {
        self.records.is_ready()
    }

    pub fn list_titles(&self) -> Vec<String> {
        self.records.titles()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn get_details(&self, title: &str) -> Result<String, LookupError> {
        self.records.details(title)
    }

    pub fn select(&self, title: &str) {
        self.records.select(title);
    }

    pub fn clear_selection(&self) {
        self.records.clear_selection();
    }

    pub fn selected(&self) -> Option<String> {
        self.records.selected()
    }

    /// Details of the current selection, if one is set and still present.
    pub fn selected_details(&self) -> Option<(String, String)> {
        let title = self.records.selected()?;
        let details = self.records.details(&title).ok()?;
        Some((title, details))
    }

    pub fn search(&self, query: &str) -> Vec<String> {
        self.records.search(query)
    }

    /// Stars `title` if it is in the store and not yet a favorite.
    /// Returns `Ok(true)` when newly added, `Ok(false)` when it already was.
    pub fn toggle_favorite(&self, title: &str) -> Result<bool, LookupError> {
        // Record lock is released before the favorites lock is taken.
        if !self.records.contains(title) {
            return Err(LookupError::NotFound(title.to_owned()));
        }
        let added = self.favorites.add(title);
        debug!(title, added, "toggle favorite");
        Ok(added)
    }

    /// Unstars `title`. Absent titles are a no-op in memory, the file is still
    /// reconciled. Returns whether the in-memory set changed.
    pub fn remove_favorite(&self, title: &str) -> bool {
        let removed = self.favorites.remove(title);
        debug!(title, removed, "remove favorite");
        removed
    }

    pub fn favorites(&self) -> Vec<String> {
        self.favorites.list()
    }

    pub fn is_favorite(&self, title: &str) -> bool {
        self.favorites.contains(title)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
