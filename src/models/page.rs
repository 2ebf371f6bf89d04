//! Pagination and sorting requests

use crate::error::{AppError, AppResult};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// A property a listing can be ordered by
pub trait SortKey: Sized + Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The identity column, used as default ordering and as tie-breaker
    const ID: Self;

    /// Parse an API property name
    fn parse(property: &str) -> Option<Self>;

    /// Fully qualified column name
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSort {
    Id,
    Title,
    Description,
    Price,
    Year,
    CreationDate,
}

impl SortKey for BookSort {
    const ID: Self = BookSort::Id;

    fn parse(property: &str) -> Option<Self> {
        match property {
            "id" => Some(BookSort::Id),
            "title" => Some(BookSort::Title),
            "description" => Some(BookSort::Description),
            "price" => Some(BookSort::Price),
            "year" => Some(BookSort::Year),
            "creationDate" => Some(BookSort::CreationDate),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            BookSort::Id => "b.id",
            BookSort::Title => "b.title",
            BookSort::Description => "b.description",
            BookSort::Price => "b.price",
            BookSort::Year => "b.year",
            BookSort::CreationDate => "b.creation_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorSort {
    Id,
    Name,
    Surname,
}

impl SortKey for AuthorSort {
    const ID: Self = AuthorSort::Id;

    fn parse(property: &str) -> Option<Self> {
        match property {
            "id" => Some(AuthorSort::Id),
            "name" => Some(AuthorSort::Name),
            "surname" => Some(AuthorSort::Surname),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            AuthorSort::Id => "a.id",
            AuthorSort::Name => "a.name",
            AuthorSort::Surname => "a.surname",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order<K> {
    pub key: K,
    pub direction: Direction,
}

/// Zero-based page request with ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    pub page: i64,
    pub size: i64,
    pub sort: Vec<Order<K>>,
}

impl<K: SortKey> PageRequest<K> {
    /// Page ordered ascending by id
    pub fn of(page: i64, size: i64) -> Self {
        Self::new(page, size, Vec::new())
    }

    /// Out-of-range values are corrected rather than rejected: a negative page
    /// becomes 0, a size below 1 the default, a size above the maximum the
    /// maximum. An empty ordering means ascending by id.
    pub fn new(page: i64, size: i64, sort: Vec<Order<K>>) -> Self {
        let size = if size < 1 { DEFAULT_PAGE_SIZE } else { size.min(MAX_PAGE_SIZE) };
        let sort = if sort.is_empty() {
            vec![Order { key: K::ID, direction: Direction::Asc }]
        } else {
            sort
        };
        Self {
            page: page.max(0),
            size,
            sort,
        }
    }

    /// Build from raw query values; each `sort` entry is `prop[,prop..][,asc|desc]`.
    pub fn parse(page: Option<i64>, size: Option<i64>, sort: &[String]) -> AppResult<Self> {
        let mut orders = Vec::new();
        for spec in sort {
            orders.extend(parse_sort_spec::<K>(spec)?);
        }
        Ok(Self::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE), orders))
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }

    /// Whether the ordering already includes the id column
    pub fn sorts_by_id(&self) -> bool {
        self.sort.iter().any(|o| o.key == K::ID)
    }
}

fn parse_sort_spec<K: SortKey>(spec: &str) -> AppResult<Vec<Order<K>>> {
    let mut tokens: Vec<&str> = spec
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let direction = match tokens.last().and_then(|t| Direction::parse(t)) {
        Some(direction) => {
            tokens.pop();
            direction
        }
        None => Direction::Asc,
    };

    tokens
        .into_iter()
        .map(|property| {
            K::parse(property)
                .map(|key| Order { key, direction })
                .ok_or_else(|| AppError::BadRequest(format!("Cannot sort by '{}'", property)))
        })
        .collect()
}
