//! Repository layer: entity stores and their backends.
//!
//! Services only see the store traits. Two backends implement them: PostgreSQL
//! (one module per table family) and an in-process [`memory::MemoryStore`]
//! used by tests and local demos.

pub mod authors;
pub mod books;
pub mod genres;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        page::{AuthorSort, BookSort, PageRequest},
        Author, Book, BookFilter, Genre, User,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// One page of the books matching every criterion of `filter`
    async fn find_all(&self, filter: &BookFilter, page: &PageRequest<BookSort>) -> AppResult<Vec<Book>>;

    /// Number of matching books, ignoring pagination
    async fn count(&self, filter: &BookFilter) -> AppResult<i64>;

    /// Insert when `id` is absent, otherwise update. Author and genre
    /// associations are replaced by exactly the sets carried by `book`.
    async fn save(&self, book: Book) -> AppResult<Book>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>>;

    async fn find_all(&self, page: &PageRequest<AuthorSort>) -> AppResult<Vec<Author>>;

    async fn count(&self) -> AppResult<i64>;

    /// Insert when `id` is absent, otherwise update
    async fn save(&self, author: Author) -> AppResult<Author>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by id
    async fn find_all(&self) -> AppResult<Vec<Genre>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn insert(&self, user: User) -> AppResult<User>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub genres: Arc<dyn GenreStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            genres: Arc::new(genres::GenresRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Create a repository where every store shares one in-memory backend
    pub fn in_memory(store: memory::MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            books: store.clone(),
            authors: store.clone(),
            genres: store.clone(),
            users: store,
        }
    }
}

#[cfg(test)]
impl Repository {
    /// Repository over mock stores; unconfigured calls fail the test
    pub fn mocked(
        books: MockBookStore,
        authors: MockAuthorStore,
        genres: MockGenreStore,
        users: MockUserStore,
    ) -> Self {
        Self {
            books: Arc::new(books),
            authors: Arc::new(authors),
            genres: Arc::new(genres),
            users: Arc::new(users),
        }
    }
}
