use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::db::document;
use crate::db::storage::DocumentStorage;
use crate::error::StoreError;
use crate::models::{NewWriteupRequest, Writeup};

/// Whole-document store for writeups.
///
/// Every mutation reads the full collection, changes it in memory and writes
/// the full collection back. Callers must not run mutations concurrently.
#[derive(Clone)]
pub struct WriteupStore {
    storage: Arc<dyn DocumentStorage>,
}

impl WriteupStore {
    pub fn new(storage: Arc<dyn DocumentStorage>) -> Self {
        Self { storage }
    }

    /// Loads every record. Missing or unreadable documents load as empty.
    pub fn load_all(&self) -> Vec<Writeup> {
        match self.try_load_all() {
            Ok(writeups) => writeups,
            Err(e) => {
                warn!(
                    "Error loading writeups from {}: {}",
                    self.storage.describe(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Strict variant of [`load_all`](Self::load_all). An absent document is
    /// still an empty collection, but read and decode failures are returned.
    pub fn try_load_all(&self) -> Result<Vec<Writeup>, StoreError> {
        let Some(bytes) = self.storage.read()? else {
            debug!("no document at {}, starting empty", self.storage.describe());
            return Ok(Vec::new());
        };
        Ok(document::decode(&bytes)?)
    }

    pub fn append_one(&self, writeup: Writeup) -> Result<(), StoreError> {
        let mut writeups = self.load_all();
        writeups.push(writeup);
        self.replace_all(&writeups)
    }

    /// Applies the creation defaults and appends the result.
    pub fn create(&self, req: NewWriteupRequest) -> Result<Writeup, StoreError> {
        let writeup = req.into_writeup();
        self.append_one(writeup.clone())?;
        info!("New writeup: {} ({}) due {}", writeup.title, writeup.course, writeup.due);
        Ok(writeup)
    }

    pub fn replace_all(&self, writeups: &[Writeup]) -> Result<(), StoreError> {
        let bytes = document::encode(writeups).inspect_err(|e| {
            error!("Failed to encode writeups: {}", e);
        })?;
        self.storage.write(&bytes).inspect_err(|e| {
            error!("Failed to save writeups to {}: {}", self.storage.describe(), e);
        })?;
        debug!("Saved {} writeups to {}", writeups.len(), self.storage.describe());
        Ok(())
    }

    /// Marks the first record keyed by (title, course, due) as done.
    ///
    /// Returns `Ok(false)` and leaves the document untouched when nothing matches.
    pub fn mark_done(
        &self,
        title: &str,
        course: &str,
        due: &DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut writeups = self.load_all();

        let Some(target) = writeups.iter_mut().find(|w| w.matches(title, course, due)) else {
            debug!("mark done: no writeup matches {} / {} / {}", title, course, due);
            return Ok(false);
        };
        target.is_done = true;

        self.replace_all(&writeups)?;
        info!("Marked done: {} ({})", title, course);
        Ok(true)
    }

    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.replace_all(&[])?;
        info!("Cleared writeups at {}", self.storage.describe());
        Ok(())
    }

    /// Current document contents, pretty-printed when they parse as JSON.
    pub fn dump_document(&self) -> Result<Option<String>, StoreError> {
        Ok(self.storage.read()?.map(|bytes| document::render(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use chrono::TimeZone;

    use super::*;
    use crate::db::storage::MemoryStorage;
    use crate::models::Portal;

    fn setup_test_store() -> WriteupStore {
        WriteupStore::new(Arc::new(MemoryStorage::new()))
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn writeup(title: &str, course: &str, due: DateTime<Utc>, is_done: bool) -> Writeup {
        Writeup {
            title: title.to_string(),
            course: course.to_string(),
            notes: String::new(),
            portal: Portal::Lms,
            due,
            is_done,
        }
    }

    /// Reads fine, refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl DocumentStorage for ReadOnlyStorage {
        fn read(&self) -> io::Result<Option<Vec<u8>>> {
            self.0.read()
        }

        fn write(&self, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn describe(&self) -> String {
            "<read-only>".to_string()
        }
    }

    #[test]
    fn test_append_to_empty_store() {
        let store = setup_test_store();

        store
            .append_one(writeup("Essay", "ENG101", at(2025, 1, 10, 9), false))
            .expect("Failed to append writeup");

        let writeups = store.load_all();
        assert_eq!(writeups.len(), 1);
        assert_eq!(writeups[0].title, "Essay");
        assert_eq!(writeups[0].course, "ENG101");
        assert_eq!(writeups[0].due, at(2025, 1, 10, 9));
        assert!(!writeups[0].is_done);
    }

    #[test]
    fn test_append_keeps_order() {
        let store = setup_test_store();

        for title in ["first", "second", "third"] {
            store
                .append_one(writeup(title, "CS1", at(2025, 5, 1, 0), false))
                .expect("Failed to append writeup");
        }

        let titles: Vec<String> = store.load_all().into_iter().map(|w| w.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_replace_all_round_trip() {
        let store = setup_test_store();
        let writeups = vec![
            writeup("A", "X", at(2020, 1, 1, 0), false),
            writeup("B", "Y", at(2099, 1, 1, 0), true),
            writeup("A", "X", at(2020, 1, 1, 0), false),
        ];

        store.replace_all(&writeups).expect("Failed to replace writeups");
        assert_eq!(store.load_all(), writeups);
    }

    #[test]
    fn test_create_forces_not_done() {
        let store = setup_test_store();
        let req = NewWriteupRequest {
            title: Some("Essay".to_string()),
            course: Some("ENG101".to_string()),
            notes: Some(String::new()),
            portal: Portal::Lms,
            due: at(2025, 1, 10, 9),
        };

        let created = store.create(req).expect("Failed to create writeup");
        assert!(!created.is_done);
        assert_eq!(store.load_all(), vec![created]);
    }

    #[test]
    fn test_mark_done_only_touches_match() {
        let store = setup_test_store();
        let due = at(2025, 1, 10, 9);
        store
            .replace_all(&[
                writeup("Report", "BIO1", due, false),
                writeup("Essay", "ENG101", due, false),
                writeup("Essay", "ENG102", due, false),
            ])
            .unwrap();

        let matched = store.mark_done("Essay", "ENG101", &due).unwrap();
        assert!(matched);

        let done: Vec<bool> = store.load_all().iter().map(|w| w.is_done).collect();
        assert_eq!(done, vec![false, true, false]);
    }

    #[test]
    fn test_mark_done_is_idempotent() {
        let store = setup_test_store();
        let due = at(2025, 1, 10, 9);
        store.append_one(writeup("Essay", "ENG101", due, false)).unwrap();

        assert!(store.mark_done("Essay", "ENG101", &due).unwrap());
        assert!(store.mark_done("Essay", "ENG101", &due).unwrap());

        let writeups = store.load_all();
        assert_eq!(writeups.len(), 1);
        assert!(writeups[0].is_done);
    }

    #[test]
    fn test_mark_done_first_duplicate_only() {
        let store = setup_test_store();
        let due = at(2025, 1, 10, 9);
        store
            .replace_all(&[
                writeup("Essay", "ENG101", due, false),
                writeup("Essay", "ENG101", due, false),
            ])
            .unwrap();

        store.mark_done("Essay", "ENG101", &due).unwrap();

        let done: Vec<bool> = store.load_all().iter().map(|w| w.is_done).collect();
        assert_eq!(done, vec![true, false]);
    }

    #[test]
    fn test_mark_done_without_match_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let store = WriteupStore::new(storage.clone());
        store
            .append_one(writeup("Essay", "ENG101", at(2025, 1, 10, 9), false))
            .unwrap();
        let before = storage.read().unwrap();

        let matched = store
            .mark_done("Essay", "ENG101", &at(2025, 1, 10, 10))
            .unwrap();

        assert!(!matched);
        assert_eq!(storage.read().unwrap(), before);
    }

    #[test]
    fn test_corrupt_document_loads_empty() {
        let store = WriteupStore::new(Arc::new(MemoryStorage::with_document("{not json")));

        assert!(store.load_all().is_empty());
        assert!(store.try_load_all().is_err());
    }

    #[test]
    fn test_clear_all() {
        let store = setup_test_store();
        store
            .append_one(writeup("Essay", "ENG101", at(2025, 1, 10, 9), false))
            .unwrap();

        store.clear_all().expect("Failed to clear writeups");
        assert!(store.load_all().is_empty());
        assert_eq!(store.dump_document().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_write_keeps_previous_document() {
        let seeded = MemoryStorage::new();
        let original = vec![writeup("Essay", "ENG101", at(2025, 1, 10, 9), false)];
        seeded.write(&document::encode(&original).unwrap()).unwrap();
        let store = WriteupStore::new(Arc::new(ReadOnlyStorage(seeded)));

        let err = store
            .append_one(writeup("Quiz", "MATH1", at(2025, 2, 1, 0), false))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.mark_done("Essay", "ENG101", &at(2025, 1, 10, 9)).is_err());

        assert_eq!(store.load_all(), original);
    }

    #[test]
    fn test_dump_absent_document() {
        let store = setup_test_store();
        assert!(store.dump_document().unwrap().is_none());
    }
}
