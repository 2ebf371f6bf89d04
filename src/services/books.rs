//! Book catalog service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        mapping::{map_all, map_one, map_set},
        page::{BookSort, PageRequest},
        Book, BookDto, BookFilter,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get a book by id; `None` when it does not exist
    pub async fn get_book(&self, id: i64) -> AppResult<Option<BookDto>> {
        let book = self.repository.books.find_by_id(id).await?;
        Ok(map_one(book))
    }

    /// One page of the books matching `filter`
    pub async fn list_books(
        &self,
        filter: &BookFilter,
        page: &PageRequest<BookSort>,
    ) -> AppResult<Vec<BookDto>> {
        let books = self.repository.books.find_all(filter, page).await?;
        Ok(map_all(Some(books)))
    }

    pub async fn count_books(&self, filter: &BookFilter) -> AppResult<i64> {
        self.repository.books.count(filter).await
    }

    /// Create a book. Any id in the request is discarded and the creation
    /// date is stamped here.
    pub async fn create_book(&self, dto: BookDto) -> AppResult<BookDto> {
        let mut book = Book::from(dto);
        book.id = None;
        book.creation_date = Some(Utc::now());

        let created = self.repository.books.save(book).await?;
        tracing::info!("Created book {:?} '{}'", created.id, created.title);
        Ok(BookDto::from(created))
    }

    /// Overwrite the mutable fields of a book. Authors and genres are replaced
    /// by exactly the supplied lists; an omitted list clears the association.
    pub async fn update_book(&self, id: i64, dto: BookDto) -> AppResult<Option<BookDto>> {
        let Some(mut book) = self.repository.books.find_by_id(id).await? else {
            return Ok(None);
        };

        book.title = dto.title;
        book.description = dto.description;
        book.price = dto.price;
        book.year = dto.year;
        book.authors = map_set(dto.list_of_authors);
        book.genres = map_set(dto.list_of_genres);

        let updated = self.repository.books.save(book).await?;
        tracing::info!("Updated book {}", id);
        Ok(Some(BookDto::from(updated)))
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        if self.repository.books.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} does not exist", id)));
        }

        self.repository.books.delete_by_id(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
