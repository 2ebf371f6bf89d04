//! Genre reference data

use crate::{
    error::AppResult,
    models::{mapping::map_all, GenreDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres ordered by id
    pub async fn list_genres(&self) -> AppResult<Vec<GenreDto>> {
        let genres = self.repository.genres.find_all().await?;
        Ok(map_all(Some(genres)))
    }
}
