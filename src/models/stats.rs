//! Library-wide statistics

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// Snapshot of catalog, loan and fine counters for the admin dashboard
#[derive(Serialize, ToSchema)]
pub struct LibraryStats {
    /// Catalog entries
    pub total_books: i64,
    /// Registered physical copies
    pub total_copies: i64,
    pub total_users: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    /// Total fines assessed at return
    pub fines_assessed: Decimal,
    /// Assessed fines not yet settled
    pub fines_outstanding: Decimal,
}
