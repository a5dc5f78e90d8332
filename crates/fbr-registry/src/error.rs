//! Error types for the registry
//!
//! Distinguishes:
//! - Validation failures (expected, user-correctable, carry every violation)
//! - Store failures (infrastructure, surfaced unchanged)
//! - Malformed stored documents
//! - Caller-level business rules

use fbr_model::{Collection, ConversionError, ViolationKind, ViolationReport};
use fbr_store::StoreError;

/// Result alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Main registry error type
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// One or more constraint violations; the report is never empty
    #[error("validation failed: {0}")]
    Validation(ViolationReport),

    /// Backing store failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Stored document does not match its record shape
    #[error("malformed document: {0}")]
    Conversion(#[from] ConversionError),

    /// Record to update does not exist
    #[error("no {} record with id {id}", .collection.noun())]
    NotFound {
        /// Collection searched
        collection: Collection,
        /// Document id
        id: String,
    },

    /// National team below the minimum squad size
    #[error("a national team needs at least {required} players, got {actual}")]
    TooFewPlayers {
        /// Configured minimum
        required: usize,
        /// Players submitted
        actual: usize,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RegistryError {
    /// Check if error is a validation failure
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Violations, when this is a validation failure
    #[inline]
    #[must_use]
    pub fn violations(&self) -> Option<&ViolationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }

    /// Check if any violation is of `kind`
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations().is_some_and(|r| r.has_kind(kind))
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

impl From<ViolationReport> for RegistryError {
    fn from(report: ViolationReport) -> Self {
        Self::Validation(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbr_model::ConstraintViolation;

    #[test]
    fn classification() {
        let err = RegistryError::from(ViolationReport::single(
            "clubId",
            ConstraintViolation::uniqueness("taken"),
        ));
        assert!(err.is_validation());
        assert!(err.has_violation(ViolationKind::Uniqueness));
        assert!(!err.has_violation(ViolationKind::Range));
        assert!(!err.is_retryable());

        let err = RegistryError::from(StoreError::Unavailable("offline".into()));
        assert!(err.is_retryable());
        assert!(err.violations().is_none());
    }

    #[test]
    fn display() {
        let err = RegistryError::NotFound {
            collection: Collection::Clubs,
            id: "9".into(),
        };
        assert_eq!(err.to_string(), "no football club record with id 9");
        let err = RegistryError::TooFewPlayers {
            required: 11,
            actual: 3,
        };
        assert_eq!(err.to_string(), "a national team needs at least 11 players, got 3");
    }
}
