//! Loans repository: the only writer of book stock and loan records
//!
//! Every issue/return runs as a single transaction so the stock counter and
//! the loan set can never drift apart. The stock check-and-decrement is one
//! conditional UPDATE, so two concurrent issues of the last copy cannot both
//! succeed.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::loan::{fine_for, IssueLoan, Loan, LoanDetails, LoanFilter, LoanStatus, LoanStatusFilter},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::loan_not_found(id))
    }

    /// Issue a book: atomically reserve one copy and create the loan record.
    ///
    /// The decrement is guarded by `available_copies > 0` in the UPDATE
    /// itself; a zero row count is then split into `NotFound` and
    /// `Unavailable` inside the same transaction.
    pub async fn issue(&self, event: &IssueLoan) -> AppResult<(i32, DateTime<Utc>)> {
        let now = Utc::now();
        // Checked date math so an out-of-range duration fails before any
        // stock mutation is sent
        let due_date = Duration::try_days(event.duration_days)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                AppError::Validation("Loan duration is out of range".to_string())
            })?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 \
             WHERE id = $1 AND available_copies > 0",
        )
        .bind(event.book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                    .bind(event.book_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if exists {
                AppError::Unavailable(format!(
                    "No copies of book {} are currently available",
                    event.book_id
                ))
            } else {
                AppError::book_not_found(event.book_id)
            });
        }

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO loans (user_id, book_id, issue_date, due_date, status, fine)
            VALUES ($1, $2, $3, $4, 'issued', 0)
            RETURNING id
            "#,
        )
        .bind(event.user_id)
        .bind(event.book_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((loan_id, due_date))
    }

    /// Return a loan: assess the fine and release the reserved copy.
    ///
    /// The loan row is locked for the duration of the transaction, so a
    /// duplicate return racing this one fails the status check instead of
    /// double-incrementing stock. The increment is additionally clamped to
    /// `total_copies`.
    pub async fn return_loan(&self, loan_id: i32, per_day_rate: Decimal) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let mut loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::loan_not_found(loan_id))?;

        if loan.status == LoanStatus::Returned {
            return Err(AppError::InvalidState(format!(
                "Loan {} has already been returned",
                loan_id
            )));
        }

        let now = Utc::now();
        let fine = fine_for(loan.due_date, now, per_day_rate);

        sqlx::query(
            "UPDATE loans SET return_date = $1, status = 'returned', fine = $2 WHERE id = $3",
        )
        .bind(now)
        .bind(fine)
        .bind(loan_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE books SET available_copies = LEAST(available_copies + 1, total_copies) \
             WHERE id = $1",
        )
        .bind(loan.book_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        loan.return_date = Some(now);
        loan.status = LoanStatus::Returned;
        loan.fine = fine;
        Ok(loan)
    }

    /// Mark a returned loan's fine as settled
    pub async fn pay_fine(&self, loan_id: i32) -> AppResult<Loan> {
        let updated = sqlx::query(
            "UPDATE loans SET fine_paid = TRUE \
             WHERE id = $1 AND status = 'returned' AND fine > 0 AND fine_paid = FALSE",
        )
        .bind(loan_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            // Disambiguate: missing loan vs. nothing to settle
            let loan = self.get_by_id(loan_id).await?;
            return Err(AppError::InvalidState(format!(
                "Loan {} has no outstanding fine to settle",
                loan.id
            )));
        }

        self.get_by_id(loan_id).await
    }

    /// List loans joined with book info, optionally filtered by borrower
    /// and status. `overdue` is derived against the supplied clock.
    pub async fn list(
        &self,
        filter: &LoanFilter,
        now: DateTime<Utc>,
        per_day_rate: Decimal,
    ) -> AppResult<Vec<LoanDetails>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param = 0;
        let mut bind_now = false;

        if filter.user_id.is_some() {
            param += 1;
            conditions.push(format!("l.user_id = ${}", param));
        }
        match filter.status {
            Some(LoanStatusFilter::Active) => conditions.push("l.status = 'issued'".into()),
            Some(LoanStatusFilter::Overdue) => {
                param += 1;
                conditions.push(format!("l.status = 'issued' AND l.due_date < ${}", param));
                bind_now = true;
            }
            Some(LoanStatusFilter::History) => conditions.push("l.status = 'returned'".into()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT l.id, l.user_id, l.book_id, l.issue_date, l.due_date,
                   l.return_date, l.status, l.fine, l.fine_paid,
                   b.title, b.authors
            FROM loans l
            JOIN books b ON l.book_id = b.id
            {}
            ORDER BY l.issue_date DESC
            "#,
            where_clause
        );

        let mut query = sqlx::query(&sql);
        if let Some(user_id) = filter.user_id {
            query = query.bind(user_id);
        }
        if bind_now {
            query = query.bind(now);
        }

        let rows = query.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row| Self::details_from_row(&row, now, per_day_rate))
            .collect())
    }

    /// Loans that are still out and past their due date as of `now`
    pub async fn get_overdue(
        &self,
        now: DateTime<Utc>,
        per_day_rate: Decimal,
    ) -> AppResult<Vec<LoanDetails>> {
        self.list(
            &LoanFilter {
                user_id: None,
                status: Some(LoanStatusFilter::Overdue),
            },
            now,
            per_day_rate,
        )
        .await
    }

    fn details_from_row(
        row: &sqlx::postgres::PgRow,
        now: DateTime<Utc>,
        per_day_rate: Decimal,
    ) -> LoanDetails {
        let status: LoanStatus = row.get("status");
        let due_date: DateTime<Utc> = row.get("due_date");
        let persisted_fine: Decimal = row.get("fine");

        let (fine, is_overdue) = match status {
            LoanStatus::Returned => (persisted_fine, false),
            // Projection only; nothing is persisted until return
            LoanStatus::Issued => (fine_for(due_date, now, per_day_rate), due_date < now),
        };

        LoanDetails {
            id: row.get("id"),
            user_id: row.get("user_id"),
            book_id: row.get("book_id"),
            title: row.get("title"),
            authors: row.get("authors"),
            issue_date: row.get("issue_date"),
            due_date,
            return_date: row.get("return_date"),
            status,
            fine,
            fine_paid: row.get("fine_paid"),
            is_overdue,
        }
    }

    /// Count loans still out
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = 'issued'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count loans still out and past due as of `now`
    pub async fn count_overdue(&self, now: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status = 'issued' AND due_date < $1",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Total fines assessed at return
    pub async fn fines_assessed(&self) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(fine), 0) FROM loans WHERE status = 'returned'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    /// Assessed fines not yet settled
    pub async fn fines_outstanding(&self) -> AppResult<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(fine), 0) FROM loans \
             WHERE status = 'returned' AND fine_paid = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
