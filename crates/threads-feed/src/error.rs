use thiserror::Error;
use threads_persist::PersistError;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: PersistError,
    },
}

pub type Result<T> = std::result::Result<T, FeedError>;

/// Wraps store failures with the operation that hit them
pub(crate) trait StoreContext<T> {
    fn store_context(self, context: &str) -> Result<T>;
}

impl<T> StoreContext<T> for threads_persist::Result<T> {
    fn store_context(self, context: &str) -> Result<T> {
        self.map_err(|source| match source {
            // A malformed id can never resolve to a record
            PersistError::InvalidObjectId(id) => {
                FeedError::Validation(format!("{}: invalid id {}", context, id))
            }
            source => FeedError::Store {
                context: context.to_string(),
                source,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_carry_context() {
        let failed: threads_persist::Result<()> =
            Err(PersistError::Connection("connection refused".to_string()));
        let err = failed.store_context("Failed to fetch user").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch user: Connection error: connection refused"
        );
    }

    #[test]
    fn test_invalid_ids_become_validation_errors() {
        let failed: threads_persist::Result<()> =
            Err(PersistError::InvalidObjectId("xyz".to_string()));
        let err = failed.store_context("Failed to follow user").unwrap_err();
        assert!(matches!(err, FeedError::Validation(_)));
    }
}
