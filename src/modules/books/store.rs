//! In-memory book collection with all CRUD and validation logic.
//!
//! The collection is an ordered `Vec` behind a single `RwLock`: every
//! operation is a fast, bounded, synchronous pass over the records and the
//! guard is never held across an await point. The store is owned by the
//! books module and injected into handlers as axum state, never reached
//! through a global.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use thiserror::Error;
use time::OffsetDateTime;

use super::models::{Book, BookFilters, BookPayload, BookSummary};

const BOOK_ID_LEN: usize = 16;

/// Domain errors surfaced by store operations.
///
/// Handlers map these onto the HTTP error taxonomy: the two validation
/// variants become 400, `NotFound` becomes 404, `InsertInconsistency`
/// becomes 500.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("name is required")]
    MissingName,

    #[error("readPage must not be greater than pageCount")]
    ReadPageExceedsPageCount,

    #[error("no book with the given id")]
    NotFound,

    #[error("insert consistency check failed")]
    InsertInconsistency,
}

/// The process-wide book collection.
pub struct BookStore {
    books: RwLock<Vec<Book>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Book>> {
        self.books.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Book>> {
        self.books.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate a payload, returning the required name on success.
    ///
    /// The page invariant only trips when both operands are present; an
    /// absent `readPage` or `pageCount` never fails the check.
    fn validate(payload: &BookPayload) -> Result<String, StoreError> {
        let name = payload.name.clone().ok_or(StoreError::MissingName)?;

        if let (Some(read_page), Some(page_count)) = (payload.read_page, payload.page_count) {
            if read_page > page_count {
                return Err(StoreError::ReadPageExceedsPageCount);
            }
        }

        Ok(name)
    }

    /// Create a new record, returning its generated id.
    pub fn create(&self, payload: BookPayload) -> Result<String, StoreError> {
        let name = Self::validate(&payload)?;

        let id = generate_id();
        let now = OffsetDateTime::now_utc();
        let book = Book {
            id: id.clone(),
            name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            // Option equality: two absent values count as equal, so a book
            // with neither page field is born finished.
            finished: payload.page_count == payload.read_page,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
            inserted_at: now,
            updated_at: now,
        };

        let mut books = self.write();
        books.push(book);

        // Post-insert membership check. Unreachable while the write guard
        // serializes mutations; kept as an invariant check.
        if !books.iter().any(|book| book.id == id) {
            return Err(StoreError::InsertInconsistency);
        }

        Ok(id)
    }

    /// List summaries, applying at most one filter.
    ///
    /// Filters are mutually exclusive by priority: `name`, then `reading`,
    /// then `finished`. Only the first one present applies; the rest are
    /// ignored even when also supplied.
    pub fn list(&self, filters: &BookFilters) -> Vec<BookSummary> {
        let books = self.read();

        if let Some(name) = &filters.name {
            let needle = name.to_lowercase();
            return books
                .iter()
                .filter(|book| book.name.to_lowercase().contains(&needle))
                .map(summarize)
                .collect();
        }

        if let Some(reading) = &filters.reading {
            // Truthiness coercion of the raw query value: any non-empty
            // string means true. A record with no `reading` field never
            // matches either way.
            let wanted = !reading.is_empty();
            return books
                .iter()
                .filter(|book| book.reading == Some(wanted))
                .map(summarize)
                .collect();
        }

        if let Some(finished) = &filters.finished {
            let wanted = finished == "1";
            return books
                .iter()
                .filter(|book| book.finished == wanted)
                .map(summarize)
                .collect();
        }

        books.iter().map(summarize).collect()
    }

    /// Fetch the full record for an id.
    pub fn get(&self, id: &str) -> Result<Book, StoreError> {
        self.read()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    /// Replace every mutable field on the matching record.
    ///
    /// Validation runs before the existence check, so an invalid payload
    /// against an unknown id reports the validation error, not not-found.
    pub fn update(&self, id: &str, payload: BookPayload) -> Result<(), StoreError> {
        let name = Self::validate(&payload)?;

        let mut books = self.write();
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;

        book.name = name;
        book.year = payload.year;
        book.author = payload.author;
        book.summary = payload.summary;
        book.publisher = payload.publisher;
        book.finished = payload.page_count == payload.read_page;
        book.page_count = payload.page_count;
        book.read_page = payload.read_page;
        book.reading = payload.reading;
        book.updated_at = OffsetDateTime::now_utc();

        Ok(())
    }

    /// Remove the matching record.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut books = self.write();
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;

        books.remove(index);
        Ok(())
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(book: &Book) -> BookSummary {
    BookSummary {
        id: book.id.clone(),
        name: book.name.clone(),
        publisher: book.publisher.clone(),
    }
}

/// Generate a 16-character alphanumeric id.
fn generate_id() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(BOOK_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn full_payload(name: &str, page_count: i64, read_page: i64) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            year: Some(2010),
            author: Some("Author".to_string()),
            summary: Some("Summary".to_string()),
            publisher: Some("Publisher".to_string()),
            page_count: Some(page_count),
            read_page: Some(read_page),
            reading: Some(false),
        }
    }

    #[test]
    fn generated_ids_are_sixteen_chars() {
        let id = generate_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn create_returns_id_and_appends() {
        let store = BookStore::new();
        let id = store.create(payload("Dune")).unwrap();

        assert_eq!(id.len(), 16);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().name, "Dune");
    }

    #[test]
    fn create_without_name_is_rejected() {
        let store = BookStore::new();
        let result = store.create(BookPayload::default());

        assert_eq!(result, Err(StoreError::MissingName));
        assert!(store.is_empty());
    }

    #[test]
    fn create_with_read_page_beyond_page_count_is_rejected() {
        let store = BookStore::new();
        let result = store.create(full_payload("Dune", 100, 101));

        assert_eq!(result, Err(StoreError::ReadPageExceedsPageCount));
        assert!(store.is_empty());
    }

    #[test]
    fn finished_derives_from_page_fields() {
        let store = BookStore::new();

        let done = store.create(full_payload("Done", 100, 100)).unwrap();
        let partway = store.create(full_payload("Partway", 100, 40)).unwrap();

        assert!(store.get(&done).unwrap().finished);
        assert!(!store.get(&partway).unwrap().finished);
    }

    #[test]
    fn finished_is_true_when_both_page_fields_absent() {
        let store = BookStore::new();
        let id = store.create(payload("Pageless")).unwrap();

        assert!(store.get(&id).unwrap().finished);
    }

    #[test]
    fn page_invariant_ignores_absent_operands() {
        let store = BookStore::new();
        let mut p = payload("Half");
        p.read_page = Some(50);

        // No pageCount to compare against, so the check never trips.
        let id = store.create(p).unwrap();
        assert!(!store.get(&id).unwrap().finished);
    }

    #[test]
    fn timestamps_are_equal_at_creation() {
        let store = BookStore::new();
        let id = store.create(payload("Fresh")).unwrap();
        let book = store.get(&id).unwrap();

        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[test]
    fn list_without_filters_returns_all_summaries() {
        let store = BookStore::new();
        for name in ["A", "B", "C"] {
            store.create(full_payload(name, 10, 0)).unwrap();
        }

        let books = store.list(&BookFilters::default());
        assert_eq!(books.len(), 3);
        assert_eq!(books[0].publisher.as_deref(), Some("Publisher"));
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let store = BookStore::new();
        store.create(payload("Abcdef")).unwrap();
        store.create(payload("Other")).unwrap();

        let filters = BookFilters {
            name: Some("ABC".to_string()),
            ..Default::default()
        };
        let books = store.list(&filters);

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Abcdef");
    }

    #[test]
    fn reading_filter_coerces_any_nonempty_value_to_true() {
        let store = BookStore::new();
        let mut reading = payload("Reading");
        reading.reading = Some(true);
        store.create(reading).unwrap();
        let mut shelved = payload("Shelved");
        shelved.reading = Some(false);
        store.create(shelved).unwrap();

        // "0" is a non-empty string, so it still selects reading books.
        for raw in ["1", "0", "true"] {
            let filters = BookFilters {
                reading: Some(raw.to_string()),
                ..Default::default()
            };
            let books = store.list(&filters);
            assert_eq!(books.len(), 1, "raw value {:?}", raw);
            assert_eq!(books[0].name, "Reading");
        }

        // Empty value coerces to false.
        let filters = BookFilters {
            reading: Some(String::new()),
            ..Default::default()
        };
        let books = store.list(&filters);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Shelved");
    }

    #[test]
    fn reading_filter_never_matches_records_without_the_field() {
        let store = BookStore::new();
        store.create(payload("NoFlag")).unwrap();

        let filters = BookFilters {
            reading: Some("1".to_string()),
            ..Default::default()
        };
        assert!(store.list(&filters).is_empty());

        let filters = BookFilters {
            reading: Some(String::new()),
            ..Default::default()
        };
        assert!(store.list(&filters).is_empty());
    }

    #[test]
    fn finished_filter_compares_against_literal_one() {
        let store = BookStore::new();
        store.create(full_payload("Done", 50, 50)).unwrap();
        store.create(full_payload("Partway", 50, 10)).unwrap();

        let filters = BookFilters {
            finished: Some("1".to_string()),
            ..Default::default()
        };
        let books = store.list(&filters);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Done");

        // Any other value means unfinished.
        let filters = BookFilters {
            finished: Some("true".to_string()),
            ..Default::default()
        };
        let books = store.list(&filters);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Partway");
    }

    #[test]
    fn filters_are_not_combinable_name_wins() {
        let store = BookStore::new();
        let mut reading = full_payload("Alpha", 10, 0);
        reading.reading = Some(true);
        store.create(reading).unwrap();
        store.create(full_payload("Beta", 10, 0)).unwrap();

        // Both name and reading supplied: only the name filter applies, so
        // Beta shows up even though it is not being read.
        let filters = BookFilters {
            name: Some("beta".to_string()),
            reading: Some("1".to_string()),
            ..Default::default()
        };
        let books = store.list(&filters);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Beta");
    }

    #[test]
    fn reading_outranks_finished() {
        let store = BookStore::new();
        let mut done = full_payload("Done", 10, 10);
        done.reading = Some(false);
        store.create(done).unwrap();
        let mut reading = full_payload("Reading", 10, 2);
        reading.reading = Some(true);
        store.create(reading).unwrap();

        let filters = BookFilters {
            reading: Some("1".to_string()),
            finished: Some("1".to_string()),
            ..Default::default()
        };
        let books = store.list(&filters);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Reading");
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = BookStore::new();
        assert_eq!(store.get("nope"), Err(StoreError::NotFound));
    }

    #[test]
    fn update_replaces_mutable_fields_and_preserves_identity() {
        let store = BookStore::new();
        let id = store.create(full_payload("Before", 100, 10)).unwrap();
        let original = store.get(&id).unwrap();

        store.update(&id, full_payload("After", 200, 200)).unwrap();
        let updated = store.get(&id).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.inserted_at, original.inserted_at);
        assert_eq!(updated.name, "After");
        assert_eq!(updated.page_count, Some(200));
        assert!(updated.finished);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let store = BookStore::new();
        let result = store.update("nope", payload("Anything"));
        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[test]
    fn update_validates_before_existence_check() {
        let store = BookStore::new();

        // Unknown id, but the missing name is reported first.
        let result = store.update("nope", BookPayload::default());
        assert_eq!(result, Err(StoreError::MissingName));

        let result = store.update("nope", full_payload("X", 10, 20));
        assert_eq!(result, Err(StoreError::ReadPageExceedsPageCount));
    }

    #[test]
    fn update_rejections_leave_record_untouched() {
        let store = BookStore::new();
        let id = store.create(full_payload("Keep", 100, 10)).unwrap();

        let result = store.update(&id, full_payload("Clobber", 10, 20));
        assert_eq!(result, Err(StoreError::ReadPageExceedsPageCount));
        assert_eq!(store.get(&id).unwrap().name, "Keep");
    }

    #[test]
    fn delete_removes_exactly_one_record() {
        let store = BookStore::new();
        let keep = store.create(payload("Keep")).unwrap();
        let gone = store.create(payload("Gone")).unwrap();

        store.delete(&gone).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&gone), Err(StoreError::NotFound));
        assert!(store.get(&keep).is_ok());
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let store = BookStore::new();
        assert_eq!(store.delete("nope"), Err(StoreError::NotFound));
    }
}
