//! Authors repository for PostgreSQL

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::AuthorStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        page::{AuthorSort, PageRequest, SortKey},
        Author,
    },
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT a.id, a.name, a.surname FROM author a WHERE a.id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn find_all(&self, page: &PageRequest<AuthorSort>) -> AppResult<Vec<Author>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT a.id, a.name, a.surname FROM author a ORDER BY ");
        let mut separated = builder.separated(", ");
        for order in &page.sort {
            separated.push(format!("{} {}", order.key.column(), order.direction.as_sql()));
        }
        if !page.sorts_by_id() {
            separated.push("a.id ASC");
        }
        builder.push(" LIMIT ");
        builder.push_bind(page.size);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let authors = builder
            .build_query_as::<Author>()
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM author")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn save(&self, author: Author) -> AppResult<Author> {
        match author.id {
            None => {
                let created = sqlx::query_as::<_, Author>(
                    "INSERT INTO author (name, surname) VALUES ($1, $2) RETURNING id, name, surname",
                )
                .bind(&author.name)
                .bind(&author.surname)
                .fetch_one(&self.pool)
                .await?;
                Ok(created)
            }
            Some(id) => sqlx::query_as::<_, Author>(
                "UPDATE author SET name = $1, surname = $2 WHERE id = $3 RETURNING id, name, surname",
            )
            .bind(&author.name)
            .bind(&author.surname)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} does not exist", id))),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        // Fails with a foreign key violation while a book still references the author
        sqlx::query("DELETE FROM author WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
