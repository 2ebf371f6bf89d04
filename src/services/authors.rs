//! Author management service

use crate::{
    error::{AppError, AppResult},
    models::{
        mapping::{map_all, map_one},
        page::{AuthorSort, PageRequest},
        Author, AuthorDto,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_author(&self, id: i64) -> AppResult<Option<AuthorDto>> {
        let author = self.repository.authors.find_by_id(id).await?;
        Ok(map_one(author))
    }

    pub async fn list_authors(&self, page: &PageRequest<AuthorSort>) -> AppResult<Vec<AuthorDto>> {
        let authors = self.repository.authors.find_all(page).await?;
        Ok(map_all(Some(authors)))
    }

    pub async fn count_authors(&self) -> AppResult<i64> {
        self.repository.authors.count().await
    }

    /// Create an author; the store always assigns the id
    pub async fn create_author(&self, dto: AuthorDto) -> AppResult<AuthorDto> {
        let mut author = Author::from(dto);
        author.id = None;

        let created = self.repository.authors.save(author).await?;
        tracing::info!("Created author {:?} '{}'", created.id, created.name);
        Ok(AuthorDto::from(created))
    }

    /// Overwrite name and surname; `None` when the author does not exist
    pub async fn update_author(&self, id: i64, dto: AuthorDto) -> AppResult<Option<AuthorDto>> {
        let Some(mut author) = self.repository.authors.find_by_id(id).await? else {
            return Ok(None);
        };

        author.name = dto.name;
        author.surname = dto.surname;

        let updated = self.repository.authors.save(author).await?;
        tracing::info!("Updated author {}", id);
        Ok(Some(AuthorDto::from(updated)))
    }

    pub async fn delete_author(&self, id: i64) -> AppResult<()> {
        if self.repository.authors.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Author with id {} does not exist", id)));
        }

        self.repository.authors.delete_by_id(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
