use std::fmt;

/// Outcome of checking an [`Expectation`](crate::Expectation) against
/// published events.
///
/// A failed assertion is an ordinary value, not an error: `Unsatisfied`
/// carries the message to show the person running the test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MatchResult {
    /// The expectation holds. No message was built.
    #[default]
    Satisfied,
    /// The expectation does not hold.
    Unsatisfied(String),
}

impl MatchResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, MatchResult::Satisfied)
    }

    /// Returns the failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            MatchResult::Satisfied => None,
            MatchResult::Unsatisfied(message) => Some(message),
        }
    }

    pub fn into_message(self) -> Option<String> {
        match self {
            MatchResult::Satisfied => None,
            MatchResult::Unsatisfied(message) => Some(message),
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Satisfied => write!(f, "Satisfied"),
            MatchResult::Unsatisfied(message) => write!(f, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let failed = MatchResult::Unsatisfied("expected A".into());
        assert!(!failed.is_satisfied());
        assert_eq!(failed.message(), Some("expected A"));
        assert_eq!(failed.to_string(), "expected A");
        assert_eq!(failed.into_message().as_deref(), Some("expected A"));

        assert!(MatchResult::default().is_satisfied());
        assert_eq!(MatchResult::Satisfied.message(), None);
    }
}
