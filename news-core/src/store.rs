use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::error::{FetchError, LookupError};
use crate::feed::RecordMap;

#[derive(Debug, Default)]
struct RecordsInner {
    records: RecordMap,
    selected: Option<String>,
}

/// Decoded records keyed by title, plus the selection.
///
/// The readiness flag may be polled without locking. It is only ever set inside
/// the write section that installs the mapping, so a reader that saw `true`
/// and then takes the lock is guaranteed to see the full mapping.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: RwLock<RecordsInner>,
    ready: AtomicBool,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Replaces the whole mapping and flips readiness. Single shot: a second
    /// call is rejected and leaves the store untouched.
    pub fn publish(&self, records: RecordMap) -> Result<usize, FetchError> {
        let mut inner = self.write();
        if self.ready.load(Ordering::Acquire) {
            warn!("ignoring second publish into a ready record store");
            return Err(FetchError::AlreadyPublished);
        }
        let count = records.len();
        inner.records = records;
        self.ready.store(true, Ordering::Release);
        drop(inner);
        info!(records = count, "record store published");
        Ok(count)
    }

    pub fn titles(&self) -> Vec<String> {
        self.read().records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, title: &str) -> bool {
        self.read().records.contains_key(title)
    }

    pub fn details(&self, title: &str) -> Result<String, LookupError> {
        self.read()
            .records
            .get(title)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(title.to_owned()))
    }

    /// Case-insensitive substring match over titles. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.read()
            .records
            .keys()
            .filter(|title| title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn select(&self, title: &str) {
        self.write().selected = Some(title.to_owned());
    }

    pub fn clear_selection(&self) {
        self.write().selected = None;
    }

    pub fn selected(&self) -> Option<String> {
        self.read().selected.clone()
    }

    // Poisoning is recovered: every write section leaves `RecordsInner` whole.
    fn read(&self) -> RwLockReadGuard<'_, RecordsInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RecordsInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordMap {
        [
            ("World News".to_owned(), "global".to_owned()),
            ("Local Sports".to_owned(), "scores".to_owned()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn empty_store_answers_queries() {
        let store = RecordStore::new();
        assert!(!store.is_ready());
        assert!(store.titles().is_empty());
        assert!(store.search("news").is_empty());
        assert_eq!(
            store.details("World News"),
            Err(LookupError::NotFound("World News".into()))
        );
    }

    #[test]
    fn publish_flips_readiness_once() {
        let store = RecordStore::new();
        assert_eq!(store.publish(sample()).unwrap(), 2);
        assert!(store.is_ready());

        let again = store.publish(RecordMap::new());
        assert!(matches!(again, Err(FetchError::AlreadyPublished)));
        assert!(store.is_ready());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = RecordStore::new();
        store.publish(sample()).unwrap();
        assert_eq!(store.search("new"), vec!["World News".to_owned()]);
        assert_eq!(store.search("SPORT"), vec!["Local Sports".to_owned()]);
        assert_eq!(store.search("o").len(), 2);
        assert!(store.search("").is_empty());
        assert!(store.search("weather").is_empty());
    }

    #[test]
    fn selection_does_not_require_existence() {
        let store = RecordStore::new();
        store.select("Not yet fetched");
        assert_eq!(store.selected().as_deref(), Some("Not yet fetched"));
        store.clear_selection();
        assert_eq!(store.selected(), None);
    }
}
