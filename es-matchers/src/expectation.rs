use std::{fmt, num::NonZeroUsize};

use crate::{Error, ExpectedEvent, Published, Result};

/// What must have been published.
///
/// An ordered, non-empty list of [`ExpectedEvent`]s plus two modifiers:
///
/// - **strict**: the published events must be exactly the expected ones,
///   nothing more.
/// - **count**: each expected event must be published exactly that many
///   times. Only available with a single expected event.
///
/// # Example
///
/// ```
/// use es_matchers::{Event, Expectation, ExpectedEvent};
/// use serde_json::json;
///
/// let events = [
///     Event::new("OrderPlaced", json!({"order_id": 1})),
///     Event::new("OrderPaid", json!({"order_id": 1})),
/// ];
///
/// let placed = Expectation::new(["OrderPlaced"])?;
/// assert!(placed.is_satisfied_by(&events));
///
/// let paid_twice = Expectation::new(["OrderPaid"])?.times(2)?;
/// assert!(!paid_twice.is_satisfied_by(&events));
///
/// let only_placed = Expectation::new([ExpectedEvent::of_type("OrderPlaced")])?.strict();
/// assert!(!only_placed.is_satisfied_by(&events));
/// # Ok::<(), es_matchers::Error>(())
/// ```
#[derive(Clone)]
pub struct Expectation {
    events: Vec<ExpectedEvent>,
    strict: bool,
    count: Option<NonZeroUsize>,
}

impl Expectation {
    /// Build an expectation from the expected events, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyExpectation`] when `events` is empty.
    pub fn new<I>(events: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<ExpectedEvent>,
    {
        let events: Vec<ExpectedEvent> = events.into_iter().map(Into::into).collect();
        if events.is_empty() {
            return Err(Error::EmptyExpectation);
        }
        Ok(Self {
            events,
            strict: false,
            count: None,
        })
    }

    /// Require the published events to be exactly the expected ones.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Require the expected event to be published exactly `count` times.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCount`] for a count of zero and
    /// [`Error::CountRequiresSingleEvent`] when more than one event is expected.
    pub fn exactly(mut self, count: usize) -> Result<Self> {
        let count = NonZeroUsize::new(count).ok_or(Error::InvalidCount(count))?;
        if self.events.len() > 1 {
            return Err(Error::CountRequiresSingleEvent(self.events.len()));
        }
        self.count = Some(count);
        Ok(self)
    }

    /// Shorthand for [`exactly`](Self::exactly).
    pub fn times(self, count: usize) -> Result<Self> {
        self.exactly(count)
    }

    /// Shorthand for `exactly(1)`.
    pub fn once(self) -> Result<Self> {
        self.exactly(1)
    }

    pub fn events(&self) -> &[ExpectedEvent] {
        &self.events
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn count(&self) -> Option<NonZeroUsize> {
        self.count
    }

    /// Returns true if an exact count was requested.
    pub fn specified_count(&self) -> bool {
        self.count.is_some()
    }

    /// Decide whether `published` satisfies this expectation.
    ///
    /// - Non-strict: every expected event matches at least one published
    ///   event (exactly `count` of them when a count is set).
    /// - Strict: published events pair up one-to-one, in order, with the
    ///   expected events. With a count there must be exactly `count`
    ///   published events, each matching the expected one.
    pub fn is_satisfied_by<E: Published>(&self, published: &[E]) -> bool {
        match (self.strict, self.count) {
            (false, None) => self
                .events
                .iter()
                .all(|expected| published.iter().any(|event| expected.matches(event))),
            (false, Some(count)) => self
                .events
                .iter()
                .all(|expected| matching(expected, published) == count.get()),
            (true, None) => {
                published.len() == self.events.len()
                    && self
                        .events
                        .iter()
                        .zip(published)
                        .all(|(expected, event)| expected.matches(event))
            }
            (true, Some(count)) => {
                published.len() == count.get()
                    && self.events.iter().all(|expected| {
                        published.iter().all(|event| expected.matches(event))
                    })
            }
        }
    }
}

fn matching<E: Published>(expected: &ExpectedEvent, published: &[E]) -> usize {
    published
        .iter()
        .filter(|event| expected.matches(*event))
        .count()
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("events", &self.events)
            .field("strict", &self.strict)
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use serde_json::json;

    fn events(types: &[&'static str]) -> Vec<Event> {
        types.iter().map(|t| Event::new(*t, json!({}))).collect()
    }

    #[test]
    fn empty_expectation_is_rejected() {
        let err = Expectation::new(Vec::<ExpectedEvent>::new()).unwrap_err();
        assert_eq!(err, Error::EmptyExpectation);
    }

    #[test]
    fn count_validation() {
        assert_eq!(
            Expectation::new(["A"]).unwrap().exactly(0).unwrap_err(),
            Error::InvalidCount(0)
        );
        assert_eq!(
            Expectation::new(["A", "B"]).unwrap().times(2).unwrap_err(),
            Error::CountRequiresSingleEvent(2)
        );
        let once = Expectation::new(["A"]).unwrap().once().unwrap();
        assert!(once.specified_count());
        assert_eq!(once.count().map(NonZeroUsize::get), Some(1));
    }

    #[test]
    fn non_strict_is_containment() {
        let expectation = Expectation::new(["A", "C"]).unwrap();
        assert!(expectation.is_satisfied_by(&events(&["C", "B", "A"])));
        assert!(!expectation.is_satisfied_by(&events(&["A", "B"])));
        assert!(!expectation.is_satisfied_by(&Vec::<Event>::new()));
    }

    #[test]
    fn non_strict_with_count() {
        let twice = Expectation::new(["Paid"]).unwrap().times(2).unwrap();
        assert!(twice.is_satisfied_by(&events(&["Paid", "Other", "Paid"])));
        assert!(!twice.is_satisfied_by(&events(&["Paid"])));
        assert!(!twice.is_satisfied_by(&events(&["Paid", "Paid", "Paid"])));
    }

    #[test]
    fn strict_requires_exact_sequence() {
        let expectation = Expectation::new(["A", "B"]).unwrap().strict();
        assert!(expectation.is_satisfied_by(&events(&["A", "B"])));
        assert!(!expectation.is_satisfied_by(&events(&["B", "A"])));
        assert!(!expectation.is_satisfied_by(&events(&["A", "B", "C"])));

        let only_a = Expectation::new(["A"]).unwrap().strict();
        assert!(!only_a.is_satisfied_by(&events(&["A", "B"])));
    }

    #[test]
    fn strict_with_count() {
        let expectation = Expectation::new(["A"]).unwrap().strict().times(2).unwrap();
        assert!(expectation.is_satisfied_by(&events(&["A", "A"])));
        assert!(!expectation.is_satisfied_by(&events(&["A", "A", "B"])));
        assert!(!expectation.is_satisfied_by(&events(&["A"])));
    }

    #[test]
    fn payload_takes_part_in_satisfaction() {
        let expectation =
            Expectation::new([ExpectedEvent::of_type("Paid").with_data(json!({"amount": 1}))])
                .unwrap();
        assert!(!expectation.is_satisfied_by(&[Event::new("Paid", json!({"amount": 2}))]));
        assert!(expectation.is_satisfied_by(&[Event::new("Paid", json!({"amount": 1}))]));
    }
}
