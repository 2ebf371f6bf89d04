//! In-process store backend.
//!
//! Mirrors the PostgreSQL schema closely enough for the services not to notice:
//! generated ids, foreign-key checks on book associations and author deletion,
//! NOT NULL / CHECK constraints and VARCHAR widths, and PostgreSQL NULL ordering when
//! sorting (NULLS LAST ascending, NULLS FIRST descending).

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{AuthorStore, BookStore, GenreStore, UserStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        page::{AuthorSort, BookSort, Direction, PageRequest, SortKey},
        Author, Book, BookFilter, Genre, User,
    },
};

const REFERENCE_VIOLATION: &str = "Operation violates a reference between records";

/// Width of the VARCHAR columns holding titles and author names
const VARCHAR_LIMIT: usize = 255;

const SEED_GENRES: [(i32, &str); 5] = [
    (1, "horror"),
    (2, "novel"),
    (3, "thriller"),
    (4, "romance"),
    (5, "fantasy"),
];

const SEED_AUTHORS: [(&str, Option<&str>); 4] = [
    ("Stephen", Some("King")),
    ("Nicolas", Some("Sparks")),
    ("Dan", Some("Brown")),
    ("Lewis", None),
];

/// Demo books: title, description, price, year, author ids, genre ids
type SeedBook = (&'static str, Option<&'static str>, Option<f64>, Option<i32>, &'static [i64], &'static [i32]);

const SEED_BOOKS: [SeedBook; 3] = [
    (
        "The Da Vinci Code",
        Some("A symbologist is drawn into a murder at the Louvre"),
        Some(9.99),
        Some(2003),
        &[3],
        &[3],
    ),
    ("It", Some("Seven children face an evil that feeds on fear"), Some(12.5), Some(1986), &[1], &[2]),
    ("unknown", None, None, None, &[], &[]),
];

/// Stored form of a book: associations are kept as id lists, like the join tables
#[derive(Debug, Clone)]
struct BookRecord {
    id: i64,
    title: String,
    description: Option<String>,
    price: Option<f64>,
    year: Option<i32>,
    creation_date: DateTime<Utc>,
    author_ids: Vec<i64>,
    genre_ids: Vec<i32>,
}

#[derive(Debug, Default)]
struct Tables {
    books: BTreeMap<i64, BookRecord>,
    authors: BTreeMap<i64, Author>,
    genres: BTreeMap<i32, Genre>,
    users: BTreeMap<String, User>,
    book_seq: i64,
    author_seq: i64,
    user_seq: i64,
}

impl Tables {
    fn hydrate(&self, record: &BookRecord) -> Book {
        Book {
            id: Some(record.id),
            title: record.title.clone(),
            description: record.description.clone(),
            price: record.price,
            year: record.year,
            creation_date: Some(record.creation_date),
            authors: record
                .author_ids
                .iter()
                .filter_map(|id| self.authors.get(id).cloned())
                .collect(),
            genres: record
                .genre_ids
                .iter()
                .filter_map(|id| self.genres.get(id).cloned())
                .collect(),
        }
    }

    fn reference_data() -> Self {
        let mut tables = Tables::default();
        for (id, name) in SEED_GENRES {
            tables.genres.insert(id, Genre { id: Some(id), name: name.to_string() });
        }
        for (name, surname) in SEED_AUTHORS {
            tables.insert_author(name, surname);
        }
        tables
    }

    fn insert_author(&mut self, name: &str, surname: Option<&str>) -> Author {
        self.author_seq += 1;
        let author = Author {
            id: Some(self.author_seq),
            name: name.to_string(),
            surname: surname.map(str::to_string),
        };
        self.authors.insert(self.author_seq, author.clone());
        author
    }
}

/// Thread-safe in-memory implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store, no reference data
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the genre reference data and the four demo authors,
    /// but no books
    pub fn with_reference_data() -> Self {
        Self { tables: RwLock::new(Tables::reference_data()) }
    }

    /// Store seeded like a freshly migrated database, demo books included
    pub fn with_sample_books() -> Self {
        let mut tables = Tables::reference_data();
        let now = Utc::now();
        for (title, description, price, year, author_ids, genre_ids) in SEED_BOOKS {
            tables.book_seq += 1;
            let id = tables.book_seq;
            tables.books.insert(
                id,
                BookRecord {
                    id,
                    title: title.to_string(),
                    description: description.map(str::to_string),
                    price,
                    year,
                    creation_date: now,
                    author_ids: author_ids.to_vec(),
                    genre_ids: genre_ids.to_vec(),
                },
            );
        }
        Self { tables: RwLock::new(tables) }
    }
}

/// Compare optionals the way PostgreSQL does for ascending order: NULL sorts last
fn nulls_last<T: PartialOrd>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn check_width(value: &str) -> AppResult<()> {
    if value.chars().count() > VARCHAR_LIMIT {
        return Err(AppError::BadRequest(format!(
            "value too long for type character varying({})",
            VARCHAR_LIMIT
        )));
    }
    Ok(())
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

fn compare_books(a: &Book, b: &Book, key: BookSort) -> Ordering {
    match key {
        BookSort::Id => a.id.cmp(&b.id),
        BookSort::Title => a.title.cmp(&b.title),
        BookSort::Description => nulls_last(&a.description, &b.description),
        BookSort::Price => nulls_last(&a.price, &b.price),
        BookSort::Year => nulls_last(&a.year, &b.year),
        BookSort::CreationDate => nulls_last(&a.creation_date, &b.creation_date),
    }
}

fn compare_authors(a: &Author, b: &Author, key: AuthorSort) -> Ordering {
    match key {
        AuthorSort::Id => a.id.cmp(&b.id),
        AuthorSort::Name => a.name.cmp(&b.name),
        AuthorSort::Surname => nulls_last(&a.surname, &b.surname),
    }
}

/// Sort by the requested orders with an ascending id tie-breaker, then slice the page
fn paginate<T, K: SortKey>(
    mut items: Vec<T>,
    page: &PageRequest<K>,
    compare: impl Fn(&T, &T, K) -> Ordering,
) -> Vec<T> {
    items.sort_by(|a, b| {
        page.sort
            .iter()
            .map(|order| directed(compare(a, b, order.key), order.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| compare(a, b, K::ID))
    });

    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let size = usize::try_from(page.size).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(size).collect()
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.get(&id).map(|record| tables.hydrate(record)))
    }

    async fn find_all(&self, filter: &BookFilter, page: &PageRequest<BookSort>) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        let matching: Vec<Book> = tables
            .books
            .values()
            .map(|record| tables.hydrate(record))
            .filter(|book| filter.matches(book))
            .collect();
        Ok(paginate(matching, page, compare_books))
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let tables = self.tables.read().await;
        if filter.is_unfiltered() {
            return Ok(tables.books.len() as i64);
        }
        let total = tables
            .books
            .values()
            .filter(|record| filter.matches(&tables.hydrate(record)))
            .count();
        Ok(total as i64)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let author_ids = book.author_ids()?;
        let genre_ids = book.genre_ids()?;

        let mut tables = self.tables.write().await;

        if book.title.is_empty() {
            return Err(AppError::BadRequest("Book title must not be empty".to_string()));
        }
        check_width(&book.title)?;
        let references_exist = author_ids.iter().all(|id| tables.authors.contains_key(id))
            && genre_ids.iter().all(|id| tables.genres.contains_key(id));
        if !references_exist {
            return Err(AppError::BadRequest(REFERENCE_VIOLATION.to_string()));
        }

        let (id, creation_date) = match book.id {
            None => {
                let creation_date = book.creation_date.ok_or_else(|| {
                    AppError::BadRequest("Book creation date is required".to_string())
                })?;
                tables.book_seq += 1;
                (tables.book_seq, creation_date)
            }
            // creation_date is write-once
            Some(id) => match tables.books.get(&id) {
                Some(existing) => (id, existing.creation_date),
                None => {
                    return Err(AppError::NotFound(format!("Book with id {} does not exist", id)))
                }
            },
        };

        let record = BookRecord {
            id,
            title: book.title,
            description: book.description,
            price: book.price,
            year: book.year,
            creation_date,
            author_ids,
            genre_ids,
        };
        let saved = tables.hydrate(&record);
        tables.books.insert(id, record);

        tracing::debug!("Saved book {} in memory store", id);
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.tables.write().await.books.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_all(&self, page: &PageRequest<AuthorSort>) -> AppResult<Vec<Author>> {
        let authors = self.tables.read().await.authors.values().cloned().collect();
        Ok(paginate(authors, page, compare_authors))
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.authors.len() as i64)
    }

    async fn save(&self, author: Author) -> AppResult<Author> {
        check_width(&author.name)?;
        if let Some(ref surname) = author.surname {
            check_width(surname)?;
        }

        let mut tables = self.tables.write().await;
        match author.id {
            None => Ok(tables.insert_author(&author.name, author.surname.as_deref())),
            Some(id) => match tables.authors.get_mut(&id) {
                Some(stored) => {
                    stored.name = author.name;
                    stored.surname = author.surname;
                    Ok(stored.clone())
                }
                None => Err(AppError::NotFound(format!("Author with id {} does not exist", id))),
            },
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.books.values().any(|b| b.author_ids.contains(&id)) {
            return Err(AppError::BadRequest(REFERENCE_VIOLATION.to_string()));
        }
        tables.authors.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn find_all(&self) -> AppResult<Vec<Genre>> {
        Ok(self.tables.read().await.genres.values().cloned().collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(username).cloned())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.username) {
            return Err(AppError::BadRequest("Record already exists".to_string()));
        }
        tables.user_seq += 1;
        let created = User { id: Some(tables.user_seq), ..user };
        tables.users.insert(created.username.clone(), created.clone());
        Ok(created)
    }
}
