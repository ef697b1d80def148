//! Feedback service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::feedback::{BookFeedback, CreateFeedback, Feedback},
    repository::Repository,
};

#[derive(Clone)]
pub struct FeedbackService {
    repository: Repository,
}

impl FeedbackService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add feedback for a book (one review per user per book)
    pub async fn add_feedback(&self, user_id: i32, feedback: CreateFeedback) -> AppResult<Feedback> {
        feedback
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.feedback.create(user_id, &feedback).await
    }

    /// Get feedback and average rating for a book
    pub async fn get_book_feedback(&self, book_id: i32) -> AppResult<BookFeedback> {
        // Verify book exists so unknown ids are a 404, not an empty list
        self.repository.books.get_by_id(book_id).await?;
        self.repository.feedback.get_for_book(book_id).await
    }
}
