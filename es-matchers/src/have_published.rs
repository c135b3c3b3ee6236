//! The published-events matcher and its failure diagnosis.

use std::fmt;

use crate::{
    Differ, Expectation, ExpectedEvent, MatchResult, Published, Result, StructuralDiffer,
    message::Message,
};

const INCORRECT_PAYLOAD: &str = "There are events of correct type but with incorrect payload:";

/// Checks published events against an [`Expectation`] and explains failures.
///
/// Deciding pass or fail ([`Expectation::is_satisfied_by`]) and building the
/// diagnosis ([`failure_message`](Self::failure_message)) are separate steps;
/// [`evaluate`](Self::evaluate) runs the second only when the first fails.
///
/// The diagnosis tells apart three situations for the first expected event
/// that is not satisfied:
///
/// 1. no published event has its type,
/// 2. events of that type exist but with a different payload or metadata,
///    each listed with a diff produced by the injected [`Differ`],
/// 3. matching events exist, but not as many times as requested.
///
/// # Example
///
/// ```
/// use es_matchers::{Event, Expectation, HavePublished, MatchResult};
/// use serde_json::json;
///
/// let published = [Event::new("OrderShipped", json!({"order_id": 1}))];
/// let expectation = Expectation::new(["OrderPlaced"])?;
///
/// let result = HavePublished::default().evaluate(&expectation, &published, None)?;
/// assert_eq!(
///     result,
///     MatchResult::Unsatisfied(
///         "expected [\n  OrderPlaced\n] to be published\n\n\
///          i.e. expected event\n  OrderPlaced\n\
///          to be published, but there is no event with such type\n"
///             .into()
///     )
/// );
/// # Ok::<(), es_matchers::Error>(())
/// ```
pub struct HavePublished<D = StructuralDiffer> {
    differ: D,
}

impl Default for HavePublished<StructuralDiffer> {
    fn default() -> Self {
        Self::new(StructuralDiffer::default())
    }
}

impl<D> fmt::Debug for HavePublished<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HavePublished").finish_non_exhaustive()
    }
}

impl<D: Differ> HavePublished<D> {
    pub fn new(differ: D) -> Self {
        Self { differ }
    }

    pub fn differ(&self) -> &D {
        &self.differ
    }

    /// Check `published` against `expectation`.
    ///
    /// `stream_name` is only used in the message.
    ///
    /// # Errors
    ///
    /// Returns whatever error the differ raises while the failure message is built.
    pub fn evaluate<E: Published>(
        &self,
        expectation: &Expectation,
        published: &[E],
        stream_name: Option<&str>,
    ) -> Result<MatchResult> {
        tracing::trace!(
            expected = expectation.events().len(),
            published = published.len(),
            stream = stream_name.unwrap_or("-"),
            strict = expectation.is_strict(),
            "evaluating expectation"
        );
        if expectation.is_satisfied_by(published) {
            return Ok(MatchResult::Satisfied);
        }
        // Unsatisfied expectations always get a diagnosis; the summary only
        // guards against a rule change leaving one without.
        let message = match self.failure_message(expectation, published, stream_name)? {
            Some(message) => message,
            None => summary(expectation, published, stream_name).render(),
        };
        Ok(MatchResult::Unsatisfied(message))
    }

    /// Check that `published` does *not* satisfy `expectation`.
    pub fn evaluate_negated<E: Published>(
        &self,
        expectation: &Expectation,
        published: &[E],
    ) -> MatchResult {
        if expectation.is_satisfied_by(published) {
            MatchResult::Unsatisfied(self.failure_message_when_negated(expectation, published))
        } else {
            MatchResult::Satisfied
        }
    }

    /// Check every stream in order; all of them must satisfy `expectation`.
    ///
    /// Returns the result for the first stream that does not.
    pub fn evaluate_streams<'a, E, S>(
        &self,
        expectation: &Expectation,
        streams: S,
    ) -> Result<MatchResult>
    where
        E: Published + 'a,
        S: IntoIterator<Item = (&'a str, &'a [E])>,
    {
        for (stream_name, published) in streams {
            let result = self.evaluate(expectation, published, Some(stream_name))?;
            if !result.is_satisfied() {
                return Ok(result);
            }
        }
        Ok(MatchResult::Satisfied)
    }

    /// Explain why `published` does not satisfy `expectation`.
    ///
    /// Expected events are examined in declared order, each against the
    /// whole `published` slice, and the first one producing a diagnosis wins.
    /// With a count, the first expected event always produces one, including
    /// "was published N times" when N equals the requested count; callers
    /// decide pass or fail with [`Expectation::is_satisfied_by`].
    ///
    /// Returns `None` when no count is set and every expected event was
    /// published.
    pub fn failure_message<E: Published>(
        &self,
        expectation: &Expectation,
        published: &[E],
        stream_name: Option<&str>,
    ) -> Result<Option<String>> {
        if expectation.is_strict() {
            return Ok(Some(failure_message_strict(expectation, published)));
        }

        for expected in expectation.events() {
            let mut correct_event_count = 0;
            let mut events_with_correct_type = Vec::new();
            for event in published {
                if expected.matches(event) {
                    correct_event_count += 1;
                } else if expected.matches_kind(event) {
                    events_with_correct_type.push(event);
                }
            }

            let expectations = expected_message(expectation, expected, stream_name);
            let message = match expectation.count() {
                Some(_) if correct_event_count >= 1 => self.incorrect_count(
                    expectations,
                    expected,
                    &events_with_correct_type,
                    correct_event_count,
                )?,
                None if correct_event_count >= 1 => continue,
                _ if !events_with_correct_type.is_empty() => self.incorrect_payload(
                    expectations,
                    expected,
                    &events_with_correct_type,
                )?,
                _ => expectations.append(", but there is no event with such type"),
            };

            tracing::debug!(
                expected = %expected.description(),
                matching = correct_event_count,
                correct_type = events_with_correct_type.len(),
                "expected event not published as expected"
            );
            return Ok(Some(message.render()));
        }
        Ok(None)
    }

    /// Message for a negated expectation that was satisfied after all.
    pub fn failure_message_when_negated<E: Published>(
        &self,
        expectation: &Expectation,
        published: &[E],
    ) -> String {
        let message = match expectation.count() {
            Some(count) => Message::new()
                .line("expected")
                .indented(first_description(expectation), 2)
                .line(format!("not to be published exactly {count} times")),
            None => {
                let exactly = if expectation.is_strict() { "exactly " } else { "" };
                Message::new()
                    .line("expected ")
                    .bracketed("[", descriptions(expectation))
                    .append(format!(" not to be {exactly}published"))
            }
        };
        actual_events(message.blank(), published).render()
    }

    fn incorrect_count<E: Published>(
        &self,
        expectations: Message,
        expected: &ExpectedEvent,
        events_with_correct_type: &[&E],
        correct_event_count: usize,
    ) -> Result<Message> {
        let message = expectations.line(format!("but was published {correct_event_count} times"));
        if events_with_correct_type.is_empty() {
            return Ok(message);
        }
        Ok(message
            .blank()
            .line(INCORRECT_PAYLOAD)
            .extend(self.event_diffs(expected, events_with_correct_type)?))
    }

    fn incorrect_payload<E: Published>(
        &self,
        expectations: Message,
        expected: &ExpectedEvent,
        events_with_correct_type: &[&E],
    ) -> Result<Message> {
        Ok(expectations
            .append(", but it was not published")
            .blank()
            .line(INCORRECT_PAYLOAD)
            .extend(self.event_diffs(expected, events_with_correct_type)?))
    }

    fn event_diffs<E: Published>(
        &self,
        expected: &ExpectedEvent,
        events_with_correct_type: &[&E],
    ) -> Result<Message> {
        let mut message = Message::new();
        for (index, event) in events_with_correct_type.iter().enumerate() {
            message = message
                .line(format!("{}) {}", index + 1, event.inspect()))
                .indented(self.data_diff(expected, *event)?.unwrap_or_default(), 4)
                .indented(self.metadata_diff(expected, *event)?.unwrap_or_default(), 4);
        }
        Ok(message)
    }

    fn data_diff<E: Published>(
        &self,
        expected: &ExpectedEvent,
        event: &E,
    ) -> Result<Option<String>> {
        expected
            .expected_data()
            .map(|data| {
                self.differ
                    .diff(data, event.data())
                    .map(|diff| format!("data diff:{diff}"))
            })
            .transpose()
    }

    fn metadata_diff<E: Published>(
        &self,
        expected: &ExpectedEvent,
        event: &E,
    ) -> Result<Option<String>> {
        expected
            .expected_metadata()
            .map(|metadata| {
                self.differ
                    .diff(metadata, &serde_json::Value::Object(event.metadata()))
                    .map(|diff| format!("metadata diff:{diff}"))
            })
            .transpose()
    }
}

fn expected_message(
    expectation: &Expectation,
    expected: &ExpectedEvent,
    stream_name: Option<&str>,
) -> Message {
    let stream = in_stream(stream_name);
    match expectation.count() {
        Some(count) => Message::new()
            .line("expected event")
            .indented(expected.description(), 2)
            .line(format!("to be published {count} times{stream}")),
        None => Message::new()
            .line("expected ")
            .bracketed("[", descriptions(expectation))
            .append(format!(" to be published{stream}"))
            .blank()
            .line("i.e. expected event")
            .indented(expected.description(), 2)
            .line("to be published"),
    }
}

fn failure_message_strict<E: Published>(expectation: &Expectation, published: &[E]) -> String {
    let message = match expectation.count() {
        Some(count) => Message::new()
            .line("expected only")
            .indented(first_description(expectation), 2)
            .line(format!("to be published {count} times")),
        None => Message::new()
            .line("expected only ")
            .bracketed("[", descriptions(expectation))
            .append(" to be published"),
    };
    actual_events(message.blank(), published).render()
}

fn summary<E: Published>(
    expectation: &Expectation,
    published: &[E],
    stream_name: Option<&str>,
) -> Message {
    let message = Message::new()
        .line("expected ")
        .bracketed("[", descriptions(expectation))
        .append(format!(" to be published{}", in_stream(stream_name)))
        .blank();
    actual_events(message, published)
}

/// Starts a new line with the list of published events.
fn actual_events<E: Published>(message: Message, published: &[E]) -> Message {
    message.line("").bracketed(
        "but the following was published: [",
        published.iter().map(Published::inspect),
    )
}

fn descriptions(expectation: &Expectation) -> Vec<String> {
    expectation
        .events()
        .iter()
        .map(ExpectedEvent::description)
        .collect()
}

fn first_description(expectation: &Expectation) -> String {
    expectation
        .events()
        .first()
        .map(ExpectedEvent::description)
        .unwrap_or_default()
}

fn in_stream(stream_name: Option<&str>) -> String {
    stream_name
        .map(|name| format!(" in stream {name}"))
        .unwrap_or_default()
}
