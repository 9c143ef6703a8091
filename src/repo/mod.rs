/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for reading and writing users and sessions, the
/// worker and employer accounts, job postings, contracts and feedback.
///
/// The repository pattern abstracts away the details of database access
/// and provides a clean API for the rest of the application to use.

mod user_repo;
mod lookup_repo;
mod worker_account_repo;
mod employer_account_repo;
mod job_repo;
mod contract_repo;
mod feedback_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use lookup_repo::*;
pub use worker_account_repo::*;
pub use employer_account_repo::*;
pub use job_repo::*;
pub use contract_repo::*;
pub use feedback_repo::*;

/// Builds a `LIKE` pattern matching values that contain `text` literally
///
/// Backslashes, `%` and `_` are escaped with a backslash; queries pair it
/// with `.escape('\\')`.
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
