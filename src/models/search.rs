//! Book search criteria.
//!
//! A [`BookFilter`] holds the optional criteria of a search; each supplied
//! criterion becomes one [`BookPredicate`]. Predicates are combined with AND,
//! while the ids inside a single predicate are alternatives (OR).

use super::book::Book;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive title substring
    pub title: Option<String>,
    pub author_ids: Vec<i64>,
    pub genre_ids: Vec<i32>,
}

/// One independently checkable search condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookPredicate {
    TitleContains(String),
    AnyAuthor(Vec<i64>),
    AnyGenre(Vec<i32>),
}

impl BookFilter {
    /// Build a filter; an empty title means "no title filter".
    pub fn new(title: Option<String>, author_ids: Vec<i64>, genre_ids: Vec<i32>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            author_ids,
            genre_ids,
        }
    }

    pub fn predicates(&self) -> Vec<BookPredicate> {
        let mut predicates = Vec::new();

        if let Some(ref title) = self.title {
            if !title.is_empty() {
                predicates.push(BookPredicate::TitleContains(title.clone()));
            }
        }

        if !self.author_ids.is_empty() {
            predicates.push(BookPredicate::AnyAuthor(self.author_ids.clone()));
        }

        if !self.genre_ids.is_empty() {
            predicates.push(BookPredicate::AnyGenre(self.genre_ids.clone()));
        }

        predicates
    }

    pub fn is_unfiltered(&self) -> bool {
        self.predicates().is_empty()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.predicates().iter().all(|p| p.matches(book))
    }
}

impl BookPredicate {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookPredicate::TitleContains(needle) => book
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            BookPredicate::AnyAuthor(ids) => book
                .authors
                .iter()
                .any(|a| a.id.is_some_and(|id| ids.contains(&id))),
            BookPredicate::AnyGenre(ids) => book
                .genres
                .iter()
                .any(|g| g.id.is_some_and(|id| ids.contains(&id))),
        }
    }
}
