//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{Query, WithRejection};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::AuthorDto,
    AppState,
};

use super::{params::PageQuery, AdminUser, AuthenticatedUser};

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Author with id {} does not exist", id))
}

/// List authors with pagination
#[utoipa::path(
    get,
    path = "/author",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = Vec<AuthorDto>),
        (status = 400, description = "Invalid sort parameter"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    WithRejection(Query(query), _): WithRejection<Query<PageQuery>, AppError>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let page = query.page_request()?;
    let authors = state.services.authors.list_authors(&page).await?;
    Ok(Json(authors))
}

/// Count all authors
#[utoipa::path(
    get,
    path = "/author/count",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of authors", body = i64),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn count_authors(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
) -> AppResult<Json<i64>> {
    Ok(Json(state.services.authors.count_authors().await?))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<AuthorDto>> {
    let author = state
        .services
        .authors
        .get_author(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/author",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Author created", body = AuthorDto),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Json(author), _): WithRejection<Json<AuthorDto>, AppError>,
) -> AppResult<Json<AuthorDto>> {
    author.validate()?;

    let created = state.services.authors.create_author(author).await?;
    Ok(Json(created))
}

/// Update an author's name and surname
#[utoipa::path(
    put,
    path = "/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Author updated", body = AuthorDto),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(author), _): WithRejection<Json<AuthorDto>, AppError>,
) -> AppResult<Json<AuthorDto>> {
    author.validate()?;

    let updated = state
        .services
        .authors
        .update_author(id, author)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// Delete an author that no book references
#[utoipa::path(
    delete,
    path = "/author/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 400, description = "Author is still referenced by a book"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_author(id).await?;
    Ok(StatusCode::OK)
}
