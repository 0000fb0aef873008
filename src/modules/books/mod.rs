pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use serde_json::json;

use bookshelf_kernel::{InitCtx, Module};

use store::BookStore;

/// Books module: owns the in-memory collection and the `/books` routes.
pub struct BooksModule {
    store: Arc<BookStore>,
}

impl BooksModule {
    pub fn new() -> Self {
        Self {
            store: Arc::new(BookStore::new()),
        }
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
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(routes::create_book).get(routes::list_books))
            .route(
                "/{book_id}",
                get(routes::get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
            .with_state(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookPayload"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book added",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string", "enum": ["success"] },
                                                "message": { "type": "string" },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "bookId": { "type": "string" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing name or readPage greater than pageCount",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            },
                            "500": {
                                "description": "Insert consistency check failed",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "name",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Case-insensitive substring match; outranks the other filters"
                            },
                            {
                                "name": "reading",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Any non-empty value selects books being read"
                            },
                            {
                                "name": "finished",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "\"1\" selects finished books, anything else unfinished"
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book summaries",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string", "enum": ["success"] },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "books": {
                                                            "type": "array",
                                                            "items": {
                                                                "$ref": "#/components/schemas/BookSummary"
                                                            }
                                                        }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{bookId}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "bookId",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Full book record",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string", "enum": ["success"] },
                                                "data": {
                                                    "type": "object",
                                                    "properties": {
                                                        "book": { "$ref": "#/components/schemas/Book" }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with the given id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Update a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "bookId",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/BookPayload"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Book updated",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string", "enum": ["success"] },
                                                "message": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing name or readPage greater than pageCount",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with the given id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "bookId",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "string" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "status": { "type": "string", "enum": ["success"] },
                                                "message": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with the given id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/FailResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "description": "Unique 16-character identifier"
                            },
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer" },
                            "readPage": { "type": "integer" },
                            "finished": {
                                "type": "boolean",
                                "description": "Derived: readPage equals pageCount"
                            },
                            "reading": { "type": "boolean" },
                            "insertedAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "name", "finished", "insertedAt", "updatedAt"]
                    },
                    "BookPayload": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "year": { "type": "integer" },
                            "author": { "type": "string" },
                            "summary": { "type": "string" },
                            "publisher": { "type": "string" },
                            "pageCount": { "type": "integer" },
                            "readPage": { "type": "integer" },
                            "reading": { "type": "boolean" }
                        },
                        "required": ["name"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "publisher": { "type": "string" }
                        },
                        "required": ["id", "name"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), books = self.store.len(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new())
}
