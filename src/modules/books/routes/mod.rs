//! HTTP adapter for the catalog, mounted under `/api/books`.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use shelf_http::AppError;
use tokio::sync::RwLock;

use super::models::{BookId, BookInput, BookRecord};
use super::store::{CatalogError, CatalogStore};

/// Catalog handle shared by every request; mutations take the write lock.
pub type SharedCatalog = Arc<RwLock<CatalogStore>>;

pub fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(catalog)
}

/// Query filters for the listing endpoint; both may be combined.
#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    pub rating: Option<i64>,
    pub title: Option<String>,
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(err) => {
                let message = err.to_string();
                let details = err
                    .into_violations()
                    .into_iter()
                    .map(|violation| {
                        json!({
                            "field": violation.field,
                            "constraint": violation.constraint,
                            "message": format!("{} {}", violation.field, violation.constraint),
                            "value": violation.value,
                        })
                    })
                    .collect();
                AppError::validation(details, message)
            }
            CatalogError::NotFound { .. } => AppError::not_found(err.to_string()),
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(catalog): State<SharedCatalog>,
    filter: Result<Query<BookFilter>, QueryRejection>,
) -> Result<Json<Vec<BookRecord>>, AppError> {
    let Query(filter) = filter.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let catalog = catalog.read().await;

    let books = catalog
        .search(filter.rating, filter.title.as_deref())
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(books))
}

async fn get_book(
    State(catalog): State<SharedCatalog>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<BookRecord>, AppError> {
    let id = book_id(id)?;
    let catalog = catalog.read().await;
    Ok(Json(catalog.get_by_id(id)?.clone()))
}

async fn create_book(
    State(catalog): State<SharedCatalog>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<BookRecord>), AppError> {
    let Json(input) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let record = catalog.write().await.create(input)?;
    tracing::info!(book_id = record.id, "book added to catalog");

    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_book(
    State(catalog): State<SharedCatalog>,
    id: Result<Path<BookId>, PathRejection>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<BookRecord>, AppError> {
    let id = book_id(id)?;
    let Json(mut input) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    if let Some(body_id) = input.id.filter(|body_id| *body_id != id) {
        return Err(AppError::bad_request(format!(
            "body id {body_id} does not match path id {id}"
        )));
    }
    input.id = Some(id);

    let record = catalog.write().await.update(input)?;
    tracing::info!(book_id = record.id, "book updated");

    Ok(Json(record))
}

async fn delete_book(
    State(catalog): State<SharedCatalog>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = book_id(id)?;

    catalog.write().await.delete_by_id(id)?;
    tracing::info!(book_id = id, "book removed from catalog");

    Ok(StatusCode::NO_CONTENT)
}

fn book_id(path: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}
