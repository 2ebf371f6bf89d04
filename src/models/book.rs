//! Book model and related types

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::{Author, AuthorDto},
    genre::{Genre, GenreDto},
    mapping::map_set,
};
use crate::error::{AppError, AppResult};

/// Book with its author and genre associations
#[derive(Debug, Clone)]
pub struct Book {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub year: Option<i32>,
    /// Set once when the book is created
    pub creation_date: Option<DateTime<Utc>>,
    pub authors: IndexSet<Author>,
    pub genres: IndexSet<Genre>,
}

impl Book {
    /// Ids of the associated authors. Associations are made by id only, so a
    /// reference without an id cannot be stored.
    pub fn author_ids(&self) -> AppResult<Vec<i64>> {
        self.authors
            .iter()
            .map(|a| {
                a.id.ok_or_else(|| AppError::BadRequest("Author reference without id".to_string()))
            })
            .collect()
    }

    pub fn genre_ids(&self) -> AppResult<Vec<i32>> {
        self.genres
            .iter()
            .map(|g| {
                g.id.ok_or_else(|| AppError::BadRequest("Genre reference without id".to_string()))
            })
            .collect()
    }

    /// Assemble a book from its row and resolved associations
    pub fn from_row(row: BookRow, authors: IndexSet<Author>, genres: IndexSet<Genre>) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            year: row.year,
            creation_date: Some(row.creation_date),
            authors,
            genres,
        }
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Internal row structure for the `book` table
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub year: Option<i32>,
    pub creation_date: DateTime<Utc>,
}

/// Book as exchanged over the API
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Book title must be 1 to 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub year: Option<i32>,
    /// Server-assigned; ignored on create and update
    pub creation_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Vec<GenreDto>>)]
    pub list_of_genres: Option<IndexSet<GenreDto>>,
    #[schema(value_type = Option<Vec<AuthorDto>>)]
    pub list_of_authors: Option<IndexSet<AuthorDto>>,
}

impl PartialEq for BookDto {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BookDto {}

impl Hash for BookDto {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<Book> for BookDto {
    fn from(entity: Book) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            price: entity.price,
            year: entity.year,
            creation_date: entity.creation_date,
            list_of_genres: Some(map_set(Some(entity.genres))),
            list_of_authors: Some(map_set(Some(entity.authors))),
        }
    }
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            description: dto.description,
            price: dto.price,
            year: dto.year,
            creation_date: dto.creation_date,
            authors: map_set(dto.list_of_authors),
            genres: map_set(dto.list_of_genres),
        }
    }
}
