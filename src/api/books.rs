//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{Query, WithRejection};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::BookDto,
    AppState,
};

use super::{params::BookQuery, AdminUser, AuthenticatedUser};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book with id {} does not exist", id))
}

/// Search books with pagination
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "One page of matching books", body = Vec<BookDto>),
        (status = 400, description = "Invalid search or sort parameter"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<Vec<BookDto>>> {
    let filter = query.filter()?;
    let page = query.page_request()?;

    let books = state.services.books.list_books(&filter, &page).await?;
    Ok(Json(books))
}

/// Count books matching the search criteria
#[utoipa::path(
    get,
    path = "/book/count",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "Number of matching books", body = i64),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn count_books(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<i64>> {
    let filter = query.filter()?;
    let total = state.services.books.count_books(&filter).await?;
    Ok(Json(total))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.get_book(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Json(book), _): WithRejection<Json<BookDto>, AppError>,
) -> AppResult<Json<BookDto>> {
    book.validate()?;

    let created = state.services.books.create_book(book).await?;
    Ok(Json(created))
}

/// Update a book; author and genre lists replace the stored ones
#[utoipa::path(
    put,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(book), _): WithRejection<Json<BookDto>, AppError>,
) -> AppResult<Json<BookDto>> {
    book.validate()?;

    let updated = state
        .services
        .books
        .update_book(id, book)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/book/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(id).await?;
    Ok(StatusCode::OK)
}
