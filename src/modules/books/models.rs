use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One book record as stored in the collection.
///
/// Wire field names are camelCase and absent optional fields are omitted
/// from the JSON body; both are part of the compatibility contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique 16-character identifier, generated server-side, immutable
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_page: Option<i64>,
    /// Derived: `read_page == page_count`; never caller-supplied
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<bool>,
    /// Set once at creation
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    /// Touched on every successful update
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Request payload for creating or updating a book.
///
/// Every field is optional at the boundary; validation decides which
/// absences are errors. Unknown extra fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: Option<i64>,
    pub read_page: Option<i64>,
    pub reading: Option<bool>,
}

/// The reduced projection of a record used in listings.
#[derive(Debug, Clone, Serialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

/// Raw query-string filters for the list operation.
///
/// All values arrive as strings; the store applies the documented
/// coercions (`reading` is truthy for any non-empty string, `finished`
/// compares against the literal `"1"`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilters {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}
