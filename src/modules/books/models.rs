use serde::{Deserialize, Serialize};

/// Identifier assigned to a book by the catalog. Assigned ids are positive;
/// any other value simply matches no book.
pub type BookId = i64;

/// A stored book. Only the catalog creates these, from validated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Unique identifier for the book
    pub id: BookId,
    /// Title of the book, at least 3 characters
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Short description, 1 to 100 characters
    pub description: String,
    /// Rating from 1 to 5
    pub rating: u8,
    /// Year of publication, 2000 to 2030
    pub published_date: u16,
}

/// Book data supplied by a caller for create and update.
///
/// Missing fields decode to empty values so they are reported together with
/// every other violation. Numbers stay wide so out-of-range values reach the
/// validator instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookInput {
    /// Ignored on create, identifies the target on update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub rating: i64,
    pub published_date: i64,
}

impl From<BookRecord> for BookInput {
    fn from(record: BookRecord) -> Self {
        Self {
            id: Some(record.id),
            title: record.title,
            author: record.author,
            description: record.description,
            rating: i64::from(record.rating),
            published_date: i64::from(record.published_date),
        }
    }
}
