//! Books repository for PostgreSQL.
//!
//! Searches are composed with a `QueryBuilder`: one SQL fragment per
//! [`BookPredicate`]. Author and genre criteria use `EXISTS` sub-queries on the
//! association tables, so a book linked to several matching authors or genres
//! still yields a single row.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexSet;
use sqlx::{Pool, Postgres, QueryBuilder, Row};

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookRow,
        page::{BookSort, PageRequest, SortKey},
        search::BookPredicate,
        Author, Book, BookFilter, Genre,
    },
};

const BOOK_COLUMNS: &str = "SELECT b.id, b.title, b.description, b.price, b.year, b.creation_date FROM book b";

/// Append the WHERE clause for `filter`; nothing when there are no criteria
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &BookFilter) {
    if filter.is_unfiltered() {
        return;
    }
    builder.push(" WHERE ");
    for (i, predicate) in filter.predicates().into_iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }
        push_predicate(builder, predicate);
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: BookPredicate) {
    match predicate {
        BookPredicate::TitleContains(title) => {
            builder.push("strpos(LOWER(b.title), LOWER(");
            builder.push_bind(title);
            builder.push(")) > 0");
        }
        BookPredicate::AnyAuthor(ids) => {
            builder.push(
                "EXISTS (SELECT 1 FROM book_author ba WHERE ba.book_id = b.id AND ba.author_id = ANY(",
            );
            builder.push_bind(ids);
            builder.push("))");
        }
        BookPredicate::AnyGenre(ids) => {
            builder.push(
                "EXISTS (SELECT 1 FROM book_genre bg WHERE bg.book_id = b.id AND bg.genre_id = ANY(",
            );
            builder.push_bind(ids);
            builder.push("))");
        }
    }
}

/// Append ORDER BY / LIMIT / OFFSET for `page`
pub fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: &PageRequest<BookSort>) {
    builder.push(" ORDER BY ");
    let mut separated = builder.separated(", ");
    for order in &page.sort {
        separated.push(format!("{} {}", order.key.column(), order.direction.as_sql()));
    }
    if !page.sorts_by_id() {
        separated.push("b.id ASC");
    }
    builder.push(" LIMIT ");
    builder.push_bind(page.size);
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Resolve the author and genre sets of the given books in two queries
    async fn load_relations(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

        let author_rows = sqlx::query(
            r#"
            SELECT ba.book_id, a.id, a.name, a.surname
            FROM book_author ba
            JOIN author a ON a.id = ba.author_id
            WHERE ba.book_id = ANY($1)
            ORDER BY a.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut authors: HashMap<i64, IndexSet<Author>> = HashMap::new();
        for r in &author_rows {
            authors.entry(r.get("book_id")).or_default().insert(Author {
                id: Some(r.get("id")),
                name: r.get("name"),
                surname: r.get("surname"),
            });
        }

        let genre_rows = sqlx::query(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genre bg
            JOIN genre g ON g.id = bg.genre_id
            WHERE bg.book_id = ANY($1)
            ORDER BY g.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i64, IndexSet<Genre>> = HashMap::new();
        for r in &genre_rows {
            genres.entry(r.get("book_id")).or_default().insert(Genre {
                id: Some(r.get("id")),
                name: r.get("name"),
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                Book::from_row(
                    row,
                    authors.remove(&id).unwrap_or_default(),
                    genres.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.load_relations(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self, filter: &BookFilter, page: &PageRequest<BookSort>) -> AppResult<Vec<Book>> {
        let mut builder = QueryBuilder::<Postgres>::new(BOOK_COLUMNS);
        push_filter(&mut builder, filter);
        push_page(&mut builder, page);

        let rows = builder
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await?;

        self.load_relations(rows).await
    }

    async fn count(&self, filter: &BookFilter) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM book b");
        push_filter(&mut builder, filter);

        let total = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let author_ids = book.author_ids()?;
        let genre_ids = book.genre_ids()?;

        let mut tx = self.pool.begin().await?;

        let id = match book.id {
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO book (title, description, price, year, creation_date)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&book.title)
                .bind(&book.description)
                .bind(book.price)
                .bind(book.year)
                .bind(book.creation_date)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => {
                // creation_date is write-once
                let result = sqlx::query(
                    r#"
                    UPDATE book SET
                        title = $1,
                        description = $2,
                        price = $3,
                        year = $4
                    WHERE id = $5
                    "#,
                )
                .bind(&book.title)
                .bind(&book.description)
                .bind(book.price)
                .bind(book.year)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound(format!("Book with id {} does not exist", id)));
                }
                id
            }
        };

        sqlx::query("DELETE FROM book_author WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO book_author (book_id, author_id) SELECT $1, UNNEST($2::bigint[])")
            .bind(id)
            .bind(&author_ids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM book_genre WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO book_genre (book_id, genre_id) SELECT $1, UNNEST($2::int[])")
            .bind(id)
            .bind(&genre_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Book {} vanished after save", id)))
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM book WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
