//! Genre reference data endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::GenreDto, AppState};

use super::AuthenticatedUser;

/// List all genres
#[utoipa::path(
    get,
    path = "/resources/genre",
    tag = "genres",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All genres ordered by id", body = Vec<GenreDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    AuthenticatedUser(_principal): AuthenticatedUser,
) -> AppResult<Json<Vec<GenreDto>>> {
    Ok(Json(state.services.genres.list_genres().await?))
}
