//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;
use validator::Validate;

/// Author row as persisted in the `author` table
#[derive(Debug, Clone, FromRow)]
pub struct Author {
    pub id: Option<i64>,
    pub name: String,
    pub surname: Option<String>,
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Author {}

impl Hash for Author {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Author as exchanged over the API
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Author name must be 1 to 255 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255, message = "Author surname is limited to 255 characters"))]
    pub surname: Option<String>,
}

impl PartialEq for AuthorDto {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AuthorDto {}

impl Hash for AuthorDto {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<Author> for AuthorDto {
    fn from(entity: Author) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            surname: entity.surname,
        }
    }
}

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            surname: dto.surname,
        }
    }
}
