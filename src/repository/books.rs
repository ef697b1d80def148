//! Books repository for database operations
//!
//! Stock mutations tied to loans (decrement on issue, increment on return)
//! live in the loans repository so they stay inside the loan transaction;
//! this repository only touches stock when an admin resizes `total_copies`.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))
    }

    /// Search books with filters and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param = 0;

        if query.title.is_some() {
            param += 1;
            conditions.push(format!("title ILIKE ${}", param));
        }
        if query.author.is_some() {
            param += 1;
            conditions.push(format!(
                "EXISTS(SELECT 1 FROM unnest(authors) a WHERE a ILIKE ${})",
                param
            ));
        }
        if query.category.is_some() {
            param += 1;
            conditions.push(format!("category = ${}", param));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let count_sql = format!("SELECT COUNT(*) FROM books {}", where_clause);
        let list_sql = format!(
            "SELECT * FROM books {} ORDER BY title LIMIT ${} OFFSET ${}",
            where_clause,
            param + 1,
            param + 2
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut list_query = sqlx::query_as::<_, Book>(&list_sql);

        if let Some(ref title) = query.title {
            let pattern = format!("%{}%", title);
            count_query = count_query.bind(pattern.clone());
            list_query = list_query.bind(pattern);
        }
        if let Some(ref author) = query.author {
            let pattern = format!("%{}%", author);
            count_query = count_query.bind(pattern.clone());
            list_query = list_query.bind(pattern);
        }
        if let Some(ref category) = query.category {
            count_query = count_query.bind(category.clone());
            list_query = list_query.bind(category.clone());
        }

        let total = count_query.fetch_one(&self.pool).await?;
        let books = list_query
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Create a new book; all copies start available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, authors, isbn, category, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.authors)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update book metadata and/or stock size.
    ///
    /// Resizing `total_copies` by a delta moves `available_copies` by the
    /// same delta, clamped into `[0, total]` so the stock invariant holds
    /// even while copies are out on loan.
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))?;

        let title = update.title.clone().unwrap_or(current.title);
        let authors = update.authors.clone().unwrap_or(current.authors);
        let isbn = update.isbn.clone().or(current.isbn);
        let category = update.category.clone().or(current.category);
        let total = update.total_copies.unwrap_or(current.total_copies);

        let delta = total - current.total_copies;
        let available = (current.available_copies + delta).clamp(0, total);

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, authors = $2, isbn = $3, category = $4,
                total_copies = $5, available_copies = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(authors)
        .bind(isbn)
        .bind(category)
        .bind(total)
        .bind(available)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Delete a book. Refused while copies are out on loan; returned loans
    /// reference the book forever, so those block deletion too.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let has_loans: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if has_loans {
            return Err(AppError::Conflict(format!(
                "Book {} has loan history and cannot be deleted",
                id
            )));
        }

        let row = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if row.rows_affected() == 0 {
            return Err(AppError::book_not_found(id));
        }

        Ok(())
    }

    /// Count catalog entries and registered copies
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS titles, COALESCE(SUM(total_copies), 0)::bigint AS copies FROM books",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok((row.get("titles"), row.get("copies")))
    }
}
