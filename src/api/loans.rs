//! Loan ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::loan::{Loan, LoanDetails, LoanFilter},
};

use super::AuthenticatedUser;

/// Issue (borrow) request
#[derive(Deserialize, ToSchema)]
pub struct IssueLoanRequest {
    /// Book to borrow
    pub book_id: i32,
    /// Borrower; admins only, defaults to the authenticated user
    pub user_id: Option<i32>,
    /// Loan duration in days; defaults to the configured policy
    pub duration_days: Option<i64>,
}

/// Issue response
#[derive(Serialize, ToSchema)]
pub struct IssueLoanResponse {
    pub loan_id: i32,
    pub due_date: DateTime<Utc>,
    pub message: String,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnLoanResponse {
    pub status: String,
    /// Fine assessed at return (zero when on time)
    pub fine: Decimal,
    pub loan: Loan,
}

/// Issue a book to a borrower
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = IssueLoanRequest,
    responses(
        (status = 201, description = "Book issued", body = IssueLoanResponse),
        (status = 400, description = "Invalid duration"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn issue_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<IssueLoanRequest>,
) -> AppResult<(StatusCode, Json<IssueLoanResponse>)> {
    let (loan_id, due_date) = state
        .services
        .loans
        .issue_loan(&claims, request.book_id, request.user_id, request.duration_days)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueLoanResponse {
            loan_id,
            due_date,
            message: "Book issued successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnLoanResponse),
        (status = 403, description = "Caller is neither the borrower nor an admin"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<ReturnLoanResponse>> {
    let loan = state.services.loans.return_loan(&claims, loan_id).await?;

    Ok(Json(ReturnLoanResponse {
        status: "returned".to_string(),
        fine: loan.fine,
        loan,
    }))
}

/// Settle the fine on a returned loan
#[utoipa::path(
    post,
    path = "/loans/{id}/fine/pay",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Loan ID")
    ),
    responses(
        (status = 200, description = "Fine settled", body = Loan),
        (status = 403, description = "Administrator rights required"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "No outstanding fine")
    )
)]
pub async fn pay_fine(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(loan_id): Path<i32>,
) -> AppResult<Json<Loan>> {
    claims.require_admin()?;

    let loan = state.services.loans.pay_fine(loan_id).await?;
    Ok(Json(loan))
}

/// List loans, filtered by borrower and/or status
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Option<i32>, Query, description = "Filter by borrower"),
        ("status" = Option<String>, Query, description = "active | overdue | history")
    ),
    responses(
        (status = 200, description = "Matching loans", body = Vec<LoanDetails>),
        (status = 403, description = "Administrator rights required")
    )
)]
pub async fn list_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(filter): Query<LoanFilter>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_admin()?;

    let loans = state.services.loans.list_loans(&filter).await?;
    Ok(Json(loans))
}

/// List loans currently past due
#[utoipa::path(
    get,
    path = "/loans/overdue",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue loans", body = Vec<LoanDetails>),
        (status = 403, description = "Administrator rights required")
    )
)]
pub async fn overdue_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_admin()?;

    let loans = state.services.loans.get_overdue(Utc::now()).await?;
    Ok(Json(loans))
}

/// Get loans for a specific user (self or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's loans", body = Vec<LoanDetails>),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<Vec<LoanDetails>>> {
    claims.require_self_or_admin(user_id)?;

    let loans = state.services.loans.get_user_loans(user_id).await?;
    Ok(Json(loans))
}
