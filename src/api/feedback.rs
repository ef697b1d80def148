//! Feedback endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::feedback::{BookFeedback, CreateFeedback, Feedback},
};

use super::AuthenticatedUser;

/// Add feedback for a book
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "feedback",
    security(("bearer_auth" = [])),
    request_body = CreateFeedback,
    responses(
        (status = 201, description = "Feedback added", body = Feedback),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Already reviewed")
    )
)]
pub async fn add_feedback(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    let feedback = state
        .services
        .feedback
        .add_feedback(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Get feedback for a book (public)
#[utoipa::path(
    get,
    path = "/books/{id}/feedback",
    tag = "feedback",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Feedback with average rating", body = BookFeedback),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_feedback(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookFeedback>> {
    let feedback = state.services.feedback.get_book_feedback(book_id).await?;
    Ok(Json(feedback))
}
