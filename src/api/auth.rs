//! Authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{JwtResponse, SignInRequest},
    AppState,
};

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = JwtResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<SignInRequest>, AppError>,
) -> AppResult<Json<JwtResponse>> {
    request.validate()?;

    let response = state.services.auth.sign_in(request).await?;
    Ok(Json(response))
}
