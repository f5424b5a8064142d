//! Acceptance rules for caller-supplied book data.
//!
//! Every field is checked on its own and all violations are reported at once.
//! Lengths count characters, not bytes.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::models::{BookId, BookInput, BookRecord};

const TITLE: Constraint = Constraint::MinLength { min: 3 };
const AUTHOR: Constraint = Constraint::MinLength { min: 1 };
const DESCRIPTION: Constraint = Constraint::Length { min: 1, max: 100 };
const RATING: Constraint = Constraint::Range { min: 1, max: 5 };
const PUBLISHED_DATE: Constraint = Constraint::Range {
    min: 2000,
    max: 2030,
};

/// A rule a field failed to satisfy. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    Required,
    MinLength { min: usize },
    Length { min: usize, max: usize },
    Range { min: i64, max: i64 },
}

impl Constraint {
    fn admits_len(self, len: usize) -> bool {
        match self {
            Constraint::MinLength { min } => len >= min,
            Constraint::Length { min, max } => (min..=max).contains(&len),
            Constraint::Required | Constraint::Range { .. } => true,
        }
    }

    fn admits_value(self, value: i64) -> bool {
        match self {
            Constraint::Range { min, max } => (min..=max).contains(&value),
            _ => true,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required"),
            Constraint::MinLength { min } => write!(f, "must be at least {min} characters"),
            Constraint::Length { min, max } => {
                write!(f, "must be between {min} and {max} characters")
            }
            Constraint::Range { min, max } => write!(f, "must be between {min} and {max}"),
        }
    }
}

/// One rejected field: which field, the rule it broke, and the value given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub constraint: Constraint,
    pub value: Value,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (got {})", self.field, self.constraint, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid book: {}", summary(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Names of the rejected fields, in field order
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|violation| violation.field)
    }
}

fn summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Book fields that passed every rule. Only obtainable through [`validate`]
/// or [`validate_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBook {
    title: String,
    author: String,
    description: String,
    rating: u8,
    published_date: u16,
}

impl ValidBook {
    fn assemble(input: BookInput, rating: u8, published_date: u16) -> Self {
        Self {
            title: input.title,
            author: input.author,
            description: input.description,
            rating,
            published_date,
        }
    }

    pub fn into_record(self, id: BookId) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            rating: self.rating,
            published_date: self.published_date,
        }
    }
}

/// Validate input for a new book. Any `id` on the input is ignored.
pub fn validate(input: BookInput) -> Result<ValidBook, ValidationError> {
    let mut report = Report::default();

    match report.check_fields(&input) {
        Some((rating, published_date)) if report.is_clean() => {
            Ok(ValidBook::assemble(input, rating, published_date))
        }
        _ => Err(report.into_error()),
    }
}

/// Validate input replacing an existing book; `id` is required.
pub fn validate_update(input: BookInput) -> Result<(BookId, ValidBook), ValidationError> {
    let mut report = Report::default();
    if input.id.is_none() {
        report.reject("id", Constraint::Required, Value::Null);
    }

    match (input.id, report.check_fields(&input)) {
        (Some(id), Some((rating, published_date))) if report.is_clean() => {
            Ok((id, ValidBook::assemble(input, rating, published_date)))
        }
        _ => Err(report.into_error()),
    }
}

#[derive(Default)]
struct Report {
    violations: Vec<Violation>,
}

impl Report {
    /// Check every book field; numeric fields come back narrowed when valid.
    fn check_fields(&mut self, input: &BookInput) -> Option<(u8, u16)> {
        self.text("title", &input.title, TITLE);
        self.text("author", &input.author, AUTHOR);
        self.text("description", &input.description, DESCRIPTION);
        let rating = self.number("rating", input.rating, RATING);
        let published_date = self.number("publishedDate", input.published_date, PUBLISHED_DATE);

        Some((rating?, published_date?))
    }

    fn text(&mut self, field: &'static str, value: &str, constraint: Constraint) {
        if !constraint.admits_len(value.chars().count()) {
            self.reject(field, constraint, Value::from(value));
        }
    }

    fn number<T: TryFrom<i64>>(
        &mut self,
        field: &'static str,
        value: i64,
        constraint: Constraint,
    ) -> Option<T> {
        let narrowed = constraint
            .admits_value(value)
            .then(|| T::try_from(value).ok())
            .flatten();
        if narrowed.is_none() {
            self.reject(field, constraint, Value::from(value));
        }
        narrowed
    }

    fn reject(&mut self, field: &'static str, constraint: Constraint, value: Value) {
        self.violations.push(Violation {
            field,
            constraint,
            value,
        });
    }

    fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            violations: self.violations,
        }
    }
}
