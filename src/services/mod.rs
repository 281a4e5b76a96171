use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::services::errors::ServiceError as CommonServiceError;
use thiserror::Error;

pub mod collections;
pub mod ingredients;
pub mod recipes;
pub mod shopping_list;
pub mod subscriptions;
pub mod tags;
pub mod users;

/// Result type returned by every service function.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures reported by the service layer to the HTTP handlers.
///
/// Repository failures are classified by the shared
/// [`CommonServiceError`] conversion; the remaining variants carry the field
/// name or membership message the JSON API reports.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The payload failed validation; `field` names the offending field.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    /// The caller lacks the role or ownership required for the operation.
    #[error("permission denied")]
    Forbidden,
    #[error("not found")]
    NotFound,
    /// A unique index rejected the write.
    #[error("such a record already exists")]
    Conflict,
    /// The membership row already exists.
    #[error("{0}")]
    DuplicateMembership(String),
    /// The membership row to remove does not exist.
    #[error("{0}")]
    MembershipNotFound(String),
    #[error("you cannot subscribe to yourself")]
    SelfSubscription,
    /// The repository call failed and its transaction was rolled back.
    #[error("transaction failed: {0}")]
    Transaction(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match CommonServiceError::from(value) {
            CommonServiceError::NotFound => ServiceError::NotFound,
            CommonServiceError::Conflict => ServiceError::Conflict,
            other => ServiceError::Transaction(other.to_string()),
        }
    }
}

/// Largest page number accepted from clients.
pub(crate) const MAX_PAGE: usize = 1_000_000;

/// Largest page size accepted from clients.
pub(crate) const MAX_PAGE_SIZE: usize = 1_000;

/// Page number and page size derived from the `page` and `limit` parameters.
pub(crate) fn page_window(page: Option<usize>, limit: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    let per_page = limit
        .filter(|limit| *limit > 0)
        .unwrap_or(pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE)
        .min(MAX_PAGE_SIZE);
    (page, per_page)
}
