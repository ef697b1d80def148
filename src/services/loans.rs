//! Loan ledger service
//!
//! Mediates every state transition affecting book availability and loan
//! status. No other component mutates `books.available_copies` or the
//! `loans` table.

use chrono::{DateTime, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{
        loan::{IssueLoan, Loan, LoanDetails, LoanFilter},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Issue a book to a borrower.
    ///
    /// Members borrow for themselves; admins may issue on behalf of another
    /// user. The loan duration defaults to the configured policy and must be
    /// a positive number of days.
    pub async fn issue_loan(
        &self,
        claims: &UserClaims,
        book_id: i32,
        for_user_id: Option<i32>,
        duration_days: Option<i64>,
    ) -> AppResult<(i32, DateTime<Utc>)> {
        let user_id = match for_user_id {
            Some(other) if other != claims.user_id => {
                claims.require_admin()?;
                // Verify the borrower exists before reserving a copy
                self.repository.users.get_by_id(other).await?;
                other
            }
            _ => claims.user_id,
        };

        let duration_days = duration_days.unwrap_or(self.config.default_duration_days);
        if duration_days <= 0 || duration_days > self.config.max_duration_days {
            return Err(AppError::Validation(format!(
                "Loan duration must be between 1 and {} days",
                self.config.max_duration_days
            )));
        }

        let event = IssueLoan {
            user_id,
            book_id,
            duration_days,
        };
        let (loan_id, due_date) = self.repository.loans.issue(&event).await?;

        tracing::info!(
            loan_id,
            book_id,
            user_id,
            due_date = %due_date,
            "Book issued"
        );

        Ok((loan_id, due_date))
    }

    /// Return a loan; only the owning borrower or an admin may return it
    pub async fn return_loan(&self, claims: &UserClaims, loan_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.get_by_id(loan_id).await?;
        claims.require_self_or_admin(loan.user_id)?;

        let returned = self
            .repository
            .loans
            .return_loan(loan_id, self.config.fine_per_day)
            .await?;

        tracing::info!(loan_id, fine = %returned.fine, "Book returned");

        Ok(returned)
    }

    /// Settle the fine on a returned loan
    pub async fn pay_fine(&self, loan_id: i32) -> AppResult<Loan> {
        self.repository.loans.pay_fine(loan_id).await
    }

    /// List loans matching the filter
    pub async fn list_loans(&self, filter: &LoanFilter) -> AppResult<Vec<LoanDetails>> {
        self.repository
            .loans
            .list(filter, Utc::now(), self.config.fine_per_day)
            .await
    }

    /// Get loans for a user
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<LoanDetails>> {
        // Verify user exists
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .loans
            .list(
                &LoanFilter {
                    user_id: Some(user_id),
                    status: None,
                },
                Utc::now(),
                self.config.fine_per_day,
            )
            .await
    }

    /// Loans past due as of `now`
    pub async fn get_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<LoanDetails>> {
        self.repository
            .loans
            .get_overdue(now, self.config.fine_per_day)
            .await
    }
}
