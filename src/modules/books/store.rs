use thiserror::Error;

use super::models::{BookId, BookInput, BookRecord};
use super::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("book {id} not found")]
    NotFound { id: BookId },
}

/// Ordered, in-memory collection of validated books.
///
/// Callers sharing a store across tasks must serialize mutations themselves.
/// Failed operations never modify the store.
#[derive(Debug, Default)]
pub struct CatalogStore {
    books: Vec<BookRecord>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Every book, oldest first
    pub fn list_all(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn get_by_id(&self, id: BookId) -> Result<&BookRecord, CatalogError> {
        self.position(id)
            .map(|index| &self.books[index])
            .ok_or(CatalogError::NotFound { id })
    }

    /// Books with exactly this rating. Out-of-range ratings match nothing.
    pub fn list_by_rating(&self, rating: i64) -> Vec<&BookRecord> {
        self.search(Some(rating), None)
    }

    /// Books whose title equals `title`, ignoring case
    pub fn find_by_title(&self, title: &str) -> Vec<&BookRecord> {
        self.search(None, Some(title))
    }

    /// Books matching every filter given, in catalog order.
    ///
    /// With no filters this is the whole catalog.
    pub fn search(&self, rating: Option<i64>, title: Option<&str>) -> Vec<&BookRecord> {
        let title = title.map(str::to_lowercase);
        self.books
            .iter()
            .filter(|book| rating.map_or(true, |rating| i64::from(book.rating) == rating))
            .filter(|book| {
                title
                    .as_deref()
                    .map_or(true, |title| book.title.to_lowercase() == title)
            })
            .collect()
    }

    /// Validate and append a new book, assigning `max(id) + 1` (or 1).
    pub fn create(&mut self, input: BookInput) -> Result<BookRecord, CatalogError> {
        let book = validation::validate(input)?;
        let record = book.into_record(self.next_id());

        tracing::debug!(book_id = record.id, title = %record.title, "book created");
        self.books.push(record.clone());
        Ok(record)
    }

    /// Replace the book named by `input.id` in place.
    ///
    /// Validation runs before the lookup, so invalid input is reported even
    /// when the id is unknown.
    pub fn update(&mut self, input: BookInput) -> Result<BookRecord, CatalogError> {
        let (id, book) = validation::validate_update(input)?;
        let index = self.position(id).ok_or(CatalogError::NotFound { id })?;

        let record = book.into_record(id);
        self.books[index] = record.clone();

        tracing::debug!(book_id = id, "book replaced");
        Ok(record)
    }

    pub fn delete_by_id(&mut self, id: BookId) -> Result<(), CatalogError> {
        let index = self.position(id).ok_or(CatalogError::NotFound { id })?;
        self.books.remove(index);

        tracing::debug!(book_id = id, "book deleted");
        Ok(())
    }

    fn next_id(&self) -> BookId {
        self.books
            .iter()
            .map(|book| book.id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn position(&self, id: BookId) -> Option<usize> {
        let index = self.books.iter().position(|book| book.id == id);
        debug_assert!(
            index.map_or(true, |i| self.books[i + 1..].iter().all(|book| book.id != id)),
            "duplicate book id {id} in catalog"
        );
        index
    }
}
