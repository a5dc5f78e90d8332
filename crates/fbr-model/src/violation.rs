//! Constraint-violation taxonomy
//!
//! Every validator returns a [`Validation`]: `Ok` is the "no violation"
//! outcome, `Err` carries exactly one [`ConstraintViolation`]. Callers branch
//! on [`ViolationKind`], never on message text.

use std::fmt;

/// Outcome of a single check
pub type Validation<T = ()> = Result<T, ConstraintViolation>;

/// A failed constraint with a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    /// Required value absent
    #[error("{0}")]
    MandatoryValue(String),

    /// Value outside its type's range or format
    #[error("{0}")]
    Range(String),

    /// Value outside an allowed interval
    #[error("{0}")]
    Interval(String),

    /// Identifier already taken
    #[error("{0}")]
    Uniqueness(String),

    /// Referenced record does not exist
    #[error("{0}")]
    ReferentialIntegrity(String),
}

/// Discriminant of a [`ConstraintViolation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// See [`ConstraintViolation::MandatoryValue`]
    MandatoryValue,
    /// See [`ConstraintViolation::Range`]
    Range,
    /// See [`ConstraintViolation::Interval`]
    Interval,
    /// See [`ConstraintViolation::Uniqueness`]
    Uniqueness,
    /// See [`ConstraintViolation::ReferentialIntegrity`]
    ReferentialIntegrity,
}

impl ConstraintViolation {
    /// Mandatory-value violation
    #[inline]
    pub fn mandatory(message: impl Into<String>) -> Self {
        Self::MandatoryValue(message.into())
    }

    /// Range violation
    #[inline]
    pub fn range(message: impl Into<String>) -> Self {
        Self::Range(message.into())
    }

    /// Interval violation
    #[inline]
    pub fn interval(message: impl Into<String>) -> Self {
        Self::Interval(message.into())
    }

    /// Uniqueness violation
    #[inline]
    pub fn uniqueness(message: impl Into<String>) -> Self {
        Self::Uniqueness(message.into())
    }

    /// Referential-integrity violation
    #[inline]
    pub fn referential_integrity(message: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(message.into())
    }

    /// Kind of violation
    #[must_use]
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MandatoryValue(_) => ViolationKind::MandatoryValue,
            Self::Range(_) => ViolationKind::Range,
            Self::Interval(_) => ViolationKind::Interval,
            Self::Uniqueness(_) => ViolationKind::Uniqueness,
            Self::ReferentialIntegrity(_) => ViolationKind::ReferentialIntegrity,
        }
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MandatoryValue(m)
            | Self::Range(m)
            | Self::Interval(m)
            | Self::Uniqueness(m)
            | Self::ReferentialIntegrity(m) => m,
        }
    }
}

/// A violation attributed to one input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as used by the caller's form
    pub field: &'static str,
    /// What went wrong
    pub violation: ConstraintViolation,
}

/// Every violation found while checking one record
///
/// A report returned as an error always holds at least one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViolationReport {
    violations: Vec<FieldViolation>,
}

impl ViolationReport {
    /// Create empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report with a single entry
    #[must_use]
    pub fn single(field: &'static str, violation: ConstraintViolation) -> Self {
        let mut report = Self::new();
        report.push(field, violation);
        report
    }

    /// Record a violation
    pub fn push(&mut self, field: &'static str, violation: ConstraintViolation) {
        self.violations.push(FieldViolation { field, violation });
    }

    /// Record the violation of a failed check, returning its value otherwise
    pub fn check<T>(&mut self, field: &'static str, outcome: Validation<T>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(field, violation);
                None
            }
        }
    }

    /// Whether nothing was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// All violations in check order
    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// First violation recorded for a field
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&ConstraintViolation> {
        self.violations
            .iter()
            .find(|v| v.field == field)
            .map(|v| &v.violation)
    }

    /// Whether any violation is of `kind`
    #[must_use]
    pub fn has_kind(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.violation.kind() == kind)
    }

    /// `Ok(value)` when empty, else `Err(self)`
    ///
    /// # Errors
    /// The report itself when it holds any violation
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ViolationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ViolationReport {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_messages() {
        let v = ConstraintViolation::interval("too early");
        assert_eq!(v.kind(), ViolationKind::Interval);
        assert_eq!(v.message(), "too early");
        assert_eq!(v.to_string(), "too early");
    }

    #[test]
    fn report_collects_and_displays() {
        let mut report = ViolationReport::new();
        assert_eq!(report.check("name", Ok::<_, ConstraintViolation>("x")), Some("x"));
        assert_eq!(
            report.check::<()>("gender", Err(ConstraintViolation::range("bad gender"))),
            None
        );
        report.push("clubId", ConstraintViolation::uniqueness("taken"));

        assert_eq!(report.len(), 2);
        assert!(report.has_kind(ViolationKind::Uniqueness));
        assert_eq!(
            report.for_field("gender").map(ConstraintViolation::kind),
            Some(ViolationKind::Range)
        );
        assert_eq!(report.to_string(), "gender: bad gender; clubId: taken");
        assert!(report.into_result(()).is_err());
        assert!(ViolationReport::new().into_result(1).is_ok());
    }
}
