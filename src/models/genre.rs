//! Genre reference data

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::hash::{Hash, Hasher};
use utoipa::ToSchema;

/// Genre row. Genres are seeded by migrations and never written through the API.
#[derive(Debug, Clone, FromRow)]
pub struct Genre {
    pub id: Option<i32>,
    pub name: String,
}

impl PartialEq for Genre {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Genre {}

impl Hash for Genre {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenreDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
}

impl PartialEq for GenreDto {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GenreDto {}

impl Hash for GenreDto {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl From<Genre> for GenreDto {
    fn from(entity: Genre) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

impl From<GenreDto> for Genre {
    fn from(dto: GenreDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
        }
    }
}
