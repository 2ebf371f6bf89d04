//! Data models for the bookstore catalog

pub mod author;
pub mod book;
pub mod genre;
pub mod mapping;
pub mod page;
pub mod search;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDto};
pub use book::{Book, BookDto};
pub use genre::{Genre, GenreDto};
pub use page::{AuthorSort, BookSort, PageRequest};
pub use search::BookFilter;
pub use user::{Principal, User, UserRole};
