pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};
use tokio::sync::RwLock;

use models::BookInput;
use routes::SharedCatalog;
use store::CatalogStore;

/// Books module: owns the catalog and exposes it over HTTP
pub struct BooksModule {
    catalog: SharedCatalog,
}

impl BooksModule {
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(RwLock::new(CatalogStore::new())))
    }

    pub fn with_catalog(catalog: SharedCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> SharedCatalog {
        Arc::clone(&self.catalog)
    }

    /// Replace the catalog with the books listed in a JSON seed file.
    ///
    /// All entries go through `create`; one bad entry rejects the whole file.
    async fn load_seed(&self, path: &Path) -> anyhow::Result<usize> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let inputs: Vec<BookInput> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        let mut seeded = CatalogStore::new();
        for (index, input) in inputs.into_iter().enumerate() {
            seeded
                .create(input)
                .with_context(|| format!("seed entry #{index} rejected"))?;
        }

        let count = seeded.len();
        *self.catalog.write().await = seeded;
        Ok(count)
    }
}

impl Default for BooksModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(seed_file) = &ctx.settings.catalog.seed_file {
            let count = self.load_seed(seed_file).await?;
            tracing::info!(
                module = self.name(),
                seed_file = %seed_file.display(),
                books = count,
                "catalog seeded"
            );
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book_ref = json!({ "$ref": "#/components/schemas/Book" });
        let error_ref = json!({ "$ref": "#/components/schemas/ErrorResponse" });
        let json_content = |schema: &serde_json::Value| {
            json!({ "application/json": { "schema": schema } })
        };
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });
        let input_body = json!({
            "required": true,
            "content": json_content(&json!({ "$ref": "#/components/schemas/BookInput" }))
        });
        let not_found = json!({ "description": "Book not found", "content": json_content(&error_ref) });
        let invalid = json!({ "description": "Validation error", "content": json_content(&error_ref) });
        let bad_request = json!({ "description": "Malformed request", "content": json_content(&error_ref) });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books, optionally filtered by rating or title",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "rating", "in": "query", "required": false, "schema": { "type": "integer" } },
                            { "name": "title", "in": "query", "required": false, "schema": { "type": "string" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "Books in insertion order",
                                "content": json_content(&json!({ "type": "array", "items": book_ref }))
                            },
                            "400": bad_request
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": input_body,
                        "responses": {
                            "201": { "description": "Book created", "content": json_content(&book_ref) },
                            "400": bad_request,
                            "422": invalid
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": { "text/plain": { "schema": { "type": "string" } } }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "200": { "description": "The book", "content": json_content(&book_ref) },
                            "404": not_found
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "requestBody": input_body,
                        "responses": {
                            "200": { "description": "Book replaced", "content": json_content(&book_ref) },
                            "400": bad_request,
                            "404": not_found,
                            "422": invalid
                        }
                    },
                    "delete": {
                        "summary": "Remove a book",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "responses": {
                            "204": { "description": "Book removed" },
                            "404": not_found
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64", "description": "Assigned by the catalog" },
                            "title": { "type": "string", "minLength": 3 },
                            "author": { "type": "string", "minLength": 1 },
                            "description": { "type": "string", "minLength": 1, "maxLength": 100 },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "publishedDate": { "type": "integer", "minimum": 2000, "maximum": 2030 }
                        },
                        "required": ["id", "title", "author", "description", "rating", "publishedDate"]
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64", "description": "Ignored on create; must match the path on update" },
                            "title": { "type": "string", "minLength": 3 },
                            "author": { "type": "string", "minLength": 1 },
                            "description": { "type": "string", "minLength": 1, "maxLength": 100 },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                            "publishedDate": { "type": "integer", "minimum": 2000, "maximum": 2030 }
                        },
                        "required": ["title", "author", "description", "rating", "publishedDate"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.catalog.read().await.len();
        tracing::info!(module = self.name(), books, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
