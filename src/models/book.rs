//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database.
///
/// Copies are fungible: only the aggregate stock is tracked, and
/// `0 <= available_copies <= total_copies` holds at all times (also enforced
/// by a CHECK constraint).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub authors: Vec<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub total_copies: i32,
    /// Copies not currently loaned out
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "At least one author is required"))]
    pub authors: Vec<String>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: i32,
}

/// Update book request; all fields optional
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub isbn: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: Option<i32>,
}

/// Search/pagination query for book listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Search in title
    pub title: Option<String>,
    /// Search by author name
    pub author: Option<String>,
    /// Filter by category
    pub category: Option<String>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Books per page (default: 20)
    pub per_page: Option<i64>,
}
