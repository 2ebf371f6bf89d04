//! Bearer token issuance and verification

use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::UserClaims,
};

#[derive(Clone)]
pub struct TokenService {
    secret: String,
    expiration_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_secs: config.jwt_expiration_hours as i64 * 3600,
        }
    }

    /// Sign a token for `username`, valid for the configured lifetime
    pub fn generate_access_token(&self, username: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: username.to_string(),
            username: username.to_string(),
            iat: now,
            exp: now + self.expiration_secs,
        };

        claims
            .create_token(&self.secret)
            .map_err(|e| AppError::TokenCreation(e.to_string()))
    }

    /// Recover the subject of a token whose signature and expiry check out.
    /// Every failure is reported the same way.
    pub fn validate_token(&self, token: &str) -> AppResult<String> {
        UserClaims::from_token(token, &self.secret)
            .map(|claims| claims.sub)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AppError::Authentication("Invalid or expired token".to_string())
            })
    }
}
