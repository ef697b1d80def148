//! Data models for Libris

pub mod book;
pub mod feedback;
pub mod loan;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use feedback::Feedback;
pub use loan::{Loan, LoanDetails, LoanStatus};
pub use stats::LibraryStats;
pub use user::{User, UserClaims, UserRole};
