//! Dashboard statistics service

use chrono::Utc;

use crate::{error::AppResult, models::stats::LibraryStats, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get library statistics for the admin dashboard
    pub async fn get_stats(&self) -> AppResult<LibraryStats> {
        let (total_books, total_copies) = self.repository.books.counts().await?;
        let total_users = self.repository.users.count().await?;
        let active_loans = self.repository.loans.count_active().await?;
        let overdue_loans = self.repository.loans.count_overdue(Utc::now()).await?;
        let fines_assessed = self.repository.loans.fines_assessed().await?;
        let fines_outstanding = self.repository.loans.fines_outstanding().await?;

        Ok(LibraryStats {
            total_books,
            total_copies,
            total_users,
            active_loans,
            overdue_loans,
            fines_assessed,
            fines_outstanding,
        })
    }
}
