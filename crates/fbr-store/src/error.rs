//! Error types for store operations

/// Infrastructure failures raised by a document store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Update targeted a document that does not exist
    #[error("no document {collection}/{id}")]
    NotFound {
        /// Collection name
        collection: String,
        /// Document id
        id: String,
    },

    /// Store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Write rejected before being applied
    #[error("write aborted: {0}")]
    Aborted(String),

    /// Caller lacks permission
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl StoreError {
    /// Create not-found error
    #[inline]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Whether this is a missing-document error
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether retrying the same call could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Aborted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::not_found("clubs", "7");
        assert_eq!(err.to_string(), "no document clubs/7");
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
        assert!(StoreError::Unavailable("offline".into()).is_retryable());
    }
}
