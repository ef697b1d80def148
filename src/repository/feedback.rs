//! Feedback repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::feedback::{BookFeedback, CreateFeedback, Feedback, FeedbackDetails},
};

#[derive(Clone)]
pub struct FeedbackRepository {
    pool: Pool<Postgres>,
}

impl FeedbackRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Add feedback; the UNIQUE(user_id, book_id) constraint enforces one
    /// review per user per book.
    pub async fn create(&self, user_id: i32, feedback: &CreateFeedback) -> AppResult<Feedback> {
        let created = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (user_id, book_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(feedback.book_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict("You have already reviewed this book".to_string());
                }
                if db.is_foreign_key_violation() {
                    return AppError::book_not_found(feedback.book_id);
                }
            }
            AppError::Database(e)
        })?;

        Ok(created)
    }

    /// All feedback for a book with its average rating
    pub async fn get_for_book(&self, book_id: i32) -> AppResult<BookFeedback> {
        let feedbacks = sqlx::query_as::<_, FeedbackDetails>(
            r#"
            SELECT f.id, f.user_id, u.name AS user_name, f.book_id,
                   f.rating, f.comment, f.created_at
            FROM feedback f
            JOIN users u ON f.user_id = u.id
            WHERE f.book_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT COALESCE(AVG(rating), 0)::float8 AS average, COUNT(*) AS total \
             FROM feedback WHERE book_id = $1",
        )
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;

        let average: f64 = row.get("average");
        let total_reviews: i64 = row.get("total");

        Ok(BookFeedback {
            feedbacks,
            average_rating: (average * 10.0).round() / 10.0,
            total_reviews,
        })
    }
}
