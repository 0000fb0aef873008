//! Axum handlers mapping store results onto the response envelope.
//!
//! Success bodies carry `status: "success"` plus the operation's data or
//! message; failures are shaped by `ApiError`. Message text distinguishes
//! every failure cause per operation.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use bookshelf_http::error::ApiError;

use super::models::{BookFilters, BookPayload};
use super::store::{BookStore, StoreError};

pub async fn create_book(
    State(store): State<Arc<BookStore>>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let book_id = store.create(payload).map_err(|err| match err {
        StoreError::MissingName => {
            ApiError::validation("Failed to add book. Please provide the book name")
        }
        StoreError::ReadPageExceedsPageCount => {
            ApiError::validation("Failed to add book. readPage must not be greater than pageCount")
        }
        _ => ApiError::internal("Failed to add book"),
    })?;

    tracing::debug!(%book_id, "book added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Book added successfully",
            "data": {
                "bookId": book_id,
            },
        })),
    ))
}

pub async fn list_books(
    State(store): State<Arc<BookStore>>,
    Query(filters): Query<BookFilters>,
) -> Json<Value> {
    let books = store.list(&filters);

    Json(json!({
        "status": "success",
        "data": {
            "books": books,
        },
    }))
}

pub async fn get_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let book = store
        .get(&book_id)
        .map_err(|_| ApiError::not_found("Book not found"))?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "book": book,
        },
    })))
}

pub async fn update_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Value>, ApiError> {
    store.update(&book_id, payload).map_err(|err| match err {
        StoreError::MissingName => {
            ApiError::validation("Failed to update book. Please provide the book name")
        }
        StoreError::ReadPageExceedsPageCount => ApiError::validation(
            "Failed to update book. readPage must not be greater than pageCount",
        ),
        _ => ApiError::not_found("Failed to update book. Id not found"),
    })?;

    tracing::debug!(%book_id, "book updated");

    Ok(Json(json!({
        "status": "success",
        "message": "Book updated successfully",
    })))
}

pub async fn delete_book(
    State(store): State<Arc<BookStore>>,
    Path(book_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    store
        .delete(&book_id)
        .map_err(|_| ApiError::not_found("Failed to delete book. Id not found"))?;

    tracing::debug!(%book_id, "book deleted");

    Ok(Json(json!({
        "status": "success",
        "message": "Book deleted successfully",
    })))
}
