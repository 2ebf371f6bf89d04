//! Query string parameters shared by the listing endpoints

use std::str::FromStr;

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    models::{
        page::{AuthorSort, BookSort, PageRequest},
        BookFilter,
    },
};

/// Book search and pagination
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive title substring; empty means no filter
    pub title: Option<String>,
    /// Author ids, repeated or comma-separated; a book matches any of them
    #[serde(default)]
    pub author_ids: Vec<String>,
    /// Genre ids, repeated or comma-separated; a book matches any of them
    #[serde(default)]
    pub genre_ids: Vec<String>,
    /// Zero-based page index (default 0)
    pub page: Option<i64>,
    /// Page size (default 20, at most 2000)
    pub size: Option<i64>,
    /// `property[,asc|desc]`, may be repeated
    #[serde(default)]
    pub sort: Vec<String>,
}

impl BookQuery {
    pub fn filter(&self) -> AppResult<BookFilter> {
        Ok(BookFilter::new(
            self.title.clone(),
            parse_ids(&self.author_ids)?,
            parse_ids(&self.genre_ids)?,
        ))
    }

    pub fn page_request(&self) -> AppResult<PageRequest<BookSort>> {
        PageRequest::parse(self.page, self.size, &self.sort)
    }
}

/// Pagination only
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Zero-based page index (default 0)
    pub page: Option<i64>,
    /// Page size (default 20, at most 2000)
    pub size: Option<i64>,
    /// `property[,asc|desc]`, may be repeated
    #[serde(default)]
    pub sort: Vec<String>,
}

impl PageQuery {
    pub fn page_request(&self) -> AppResult<PageRequest<AuthorSort>> {
        PageRequest::parse(self.page, self.size, &self.sort)
    }
}

/// Parse id lists given as repeated keys, comma-separated values, or both
pub fn parse_ids<T: FromStr>(values: &[String]) -> AppResult<Vec<T>> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid id '{}'", id)))
        })
        .collect()
}
