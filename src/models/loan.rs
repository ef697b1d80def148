//! Loan model and fine/overdue derivation
//!
//! A loan has exactly one real transition: `issued -> returned`. "Overdue" is
//! a view derived from `due_date`, never a stored status, so a loan's history
//! stays append-only and the projection is always consistent with the clock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Stored loan status. `overdue` is intentionally absent: it is recomputed
/// from `due_date` on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Issued,
    Returned,
}

/// Loan record from the database (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    /// Fine assessed at return; zero until then
    pub fine: Decimal,
    pub fine_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// A loan is overdue iff it is still out and its due date has passed.
    /// Returned loans are never overdue, no matter how late they came back.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Issued && self.due_date < now
    }

    /// Fine as of `now`: the persisted amount for returned loans, a
    /// projection for loans still out. Only the return operation persists.
    pub fn fine_as_of(&self, now: DateTime<Utc>, per_day_rate: Decimal) -> Decimal {
        match self.status {
            LoanStatus::Returned => self.fine,
            LoanStatus::Issued => fine_for(self.due_date, now, per_day_rate),
        }
    }
}

/// Whole calendar days a return lands past the due date, floored at zero.
pub fn overdue_days(due_date: DateTime<Utc>, returned_at: DateTime<Utc>) -> i64 {
    (returned_at.date_naive() - due_date.date_naive())
        .num_days()
        .max(0)
}

/// Fine owed for returning at `returned_at` a loan due at `due_date`.
pub fn fine_for(
    due_date: DateTime<Utc>,
    returned_at: DateTime<Utc>,
    per_day_rate: Decimal,
) -> Decimal {
    Decimal::from(overdue_days(due_date, returned_at)) * per_day_rate
}

/// Loan joined with book info for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub title: String,
    pub authors: Vec<String>,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    /// Persisted fine for returned loans, projected fine otherwise
    pub fine: Decimal,
    pub fine_paid: bool,
    pub is_overdue: bool,
}

/// Issue request after borrower resolution and duration defaulting
#[derive(Debug, Clone)]
pub struct IssueLoan {
    pub user_id: i32,
    pub book_id: i32,
    pub duration_days: i64,
}

/// Status filter for loan listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatusFilter {
    /// Still out, due date not necessarily passed
    Active,
    /// Still out and past due
    Overdue,
    /// Returned
    History,
}

/// Filter for loan listing queries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanFilter {
    pub user_id: Option<i32>,
    pub status: Option<LoanStatusFilter>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rate() -> Decimal {
        Decimal::new(100, 2) // 1.00/day
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn loan(due: DateTime<Utc>, status: LoanStatus) -> Loan {
        Loan {
            id: 1,
            user_id: 1,
            book_id: 1,
            issue_date: due - chrono::Duration::days(30),
            due_date: due,
            return_date: None,
            status,
            fine: Decimal::ZERO,
            fine_paid: false,
            created_at: due - chrono::Duration::days(30),
        }
    }

    #[test]
    fn return_before_due_date_owes_nothing() {
        let due = at(2025, 3, 31);
        assert_eq!(fine_for(due, at(2025, 3, 20), rate()), Decimal::ZERO);
        assert_eq!(fine_for(due, due, rate()), Decimal::ZERO);
    }

    #[test]
    fn return_n_days_late_owes_n_times_rate() {
        // Due day 0, returned day 3, $1/day -> 3.00
        let due = at(2025, 3, 1);
        assert_eq!(fine_for(due, at(2025, 3, 4), rate()), Decimal::new(300, 2));
    }

    #[test]
    fn fine_counts_calendar_days_not_hours() {
        let due = Utc.with_ymd_and_hms(2025, 3, 1, 23, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2025, 3, 2, 1, 0, 0).unwrap();
        assert_eq!(fine_for(due, returned, rate()), Decimal::new(100, 2));
    }

    #[test]
    fn scenario_thirty_day_loan_returned_five_days_late() {
        // Issue with duration 30, return 35 days later -> fine 5.00 at $1/day
        let issue = at(2025, 1, 1);
        let due = issue + chrono::Duration::days(30);
        let returned = issue + chrono::Duration::days(35);
        assert_eq!(fine_for(due, returned, rate()), Decimal::new(500, 2));
    }

    #[test]
    fn overdue_only_while_issued_and_past_due() {
        let due = at(2025, 3, 10);
        let out = loan(due, LoanStatus::Issued);
        assert!(!out.is_overdue(at(2025, 3, 5)));
        assert!(out.is_overdue(at(2025, 3, 15)));

        // A returned loan is excluded regardless of how late the return was
        let mut back = loan(due, LoanStatus::Returned);
        back.return_date = Some(at(2025, 4, 1));
        assert!(!back.is_overdue(at(2025, 4, 2)));
    }

    #[test]
    fn fine_as_of_projects_for_unreturned_loans() {
        let due = at(2025, 3, 10);
        let out = loan(due, LoanStatus::Issued);
        assert_eq!(out.fine_as_of(at(2025, 3, 13), rate()), Decimal::new(300, 2));

        let mut back = loan(due, LoanStatus::Returned);
        back.fine = Decimal::new(700, 2);
        // Persisted fine wins once returned; the clock no longer matters
        assert_eq!(back.fine_as_of(at(2026, 1, 1), rate()), Decimal::new(700, 2));
    }
}
