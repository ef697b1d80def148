//! Feedback (book review) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Feedback record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Feedback {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Feedback with reviewer name for display
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FeedbackDetails {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create feedback request; one review per user per book
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedback {
    pub book_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    pub comment: Option<String>,
}

/// Per-book feedback summary
#[derive(Debug, Serialize, ToSchema)]
pub struct BookFeedback {
    pub feedbacks: Vec<FeedbackDetails>,
    /// Average rating rounded to one decimal, zero when unreviewed
    pub average_rating: f64,
    pub total_reviews: i64,
}
