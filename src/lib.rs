//! Bookstore catalog server
//!
//! A REST JSON API for managing a bookstore catalog: books, their authors and
//! genres, with bearer-token authentication and role-gated mutations.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(auth: config::AuthConfig, repository: repository::Repository) -> Self {
        Self {
            services: Arc::new(services::Services::new(repository, auth)),
        }
    }
}
