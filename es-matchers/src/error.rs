use std::sync::Arc;

/// The single error type for all es-matchers operations.
///
/// A failing assertion is *not* an error: it is reported as
/// [`MatchResult::Unsatisfied`](crate::MatchResult::Unsatisfied). Errors are
/// reserved for expectations that cannot be built and for failures raised by
/// an injected [`Differ`](crate::Differ), which are passed through untouched.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("An expectation needs at least one expected event")]
    EmptyExpectation,

    #[error("Expected count must be positive, got {0}")]
    InvalidCount(usize),

    #[error("An exact count can only be checked for a single event, got {0} expected events")]
    CountRequiresSingleEvent(usize),

    #[error("Differ error: {0}")]
    Differ(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn differ(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Differ(Arc::new(e))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmptyExpectation, Self::EmptyExpectation) => true,
            (Self::InvalidCount(a), Self::InvalidCount(b)) => a == b,
            (Self::CountRequiresSingleEvent(a), Self::CountRequiresSingleEvent(b)) => a == b,
            (Self::Differ(a), Self::Differ(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn differ_error_keeps_source_message() {
        let err = Error::differ(Boom);
        assert_eq!(err.to_string(), "Differ error: boom");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn differ_errors_compare_by_identity() {
        let a = Error::differ(Boom);
        let b = Error::differ(Boom);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(Error::InvalidCount(0), Error::InvalidCount(0));
    }
}
