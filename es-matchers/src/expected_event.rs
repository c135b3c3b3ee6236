//! Declarative description of one published event.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::Published;

type TypeFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// What a test expects to find among the published events.
///
/// An `ExpectedEvent` combines:
/// - a type predicate, checked against [`Published::event_type`]
/// - an optional exact payload (`expected_data`)
/// - an optional exact metadata mapping (`expected_metadata`)
/// - a human-readable description used in failure messages
///
/// Payload and metadata are compared with deep equality. Leaving one of them
/// unset means "any value".
///
/// # Example
///
/// ```
/// use es_matchers::{Event, ExpectedEvent};
/// use serde_json::json;
///
/// let expected = ExpectedEvent::of_type("OrderPlaced").with_data(json!({"order_id": 1}));
///
/// assert!(expected.matches(&Event::new("OrderPlaced", json!({"order_id": 1}))));
/// assert!(expected.matches_kind(&Event::new("OrderPlaced", json!({"order_id": 2}))));
/// assert!(!expected.matches_kind(&Event::new("OrderShipped", json!({"order_id": 1}))));
/// ```
#[derive(Clone)]
pub struct ExpectedEvent {
    type_name: Cow<'static, str>,
    type_fn: TypeFn,
    expected_data: Option<Value>,
    expected_metadata: Option<Value>,
    description: Option<String>,
}

impl fmt::Debug for ExpectedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedEvent")
            .field("type", &self.type_name)
            .field("expected_data", &self.expected_data)
            .field("expected_metadata", &self.expected_metadata)
            .finish_non_exhaustive()
    }
}

impl ExpectedEvent {
    /// Expect an event whose type tag equals `name`.
    pub fn of_type(name: impl Into<Cow<'static, str>>) -> Self {
        let type_name: Cow<'static, str> = name.into();
        let wanted = type_name.clone();
        Self {
            type_name,
            type_fn: Arc::new(move |actual: &str| actual == wanted),
            expected_data: None,
            expected_metadata: None,
            description: None,
        }
    }

    /// Expect an event whose type tag satisfies `predicate`.
    ///
    /// `name` stands in for the type in descriptions.
    pub fn matching<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            type_name: name.into(),
            type_fn: Arc::new(predicate),
            expected_data: None,
            expected_metadata: None,
            description: None,
        }
    }

    /// Require the payload to equal `data`.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.expected_data = Some(data.into());
        self
    }

    /// Require the metadata mapping to equal `metadata`.
    pub fn with_metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.expected_metadata = Some(metadata.into());
        self
    }

    /// Replace the generated description.
    ///
    /// A description spanning several lines is indented line by line in
    /// failure messages, so continuation lines stay aligned with the first.
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn expected_data(&self) -> Option<&Value> {
        self.expected_data.as_ref()
    }

    pub fn expected_metadata(&self) -> Option<&Value> {
        self.expected_metadata.as_ref()
    }

    /// Text shown for this event in failure messages.
    pub fn description(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        let data = self
            .expected_data
            .as_ref()
            .map(|data| format!("with data {data}"));
        let metadata = self
            .expected_metadata
            .as_ref()
            .map(|metadata| format!("with metadata {metadata}"));
        match (data, metadata) {
            (None, None) => self.type_name.to_string(),
            (Some(one), None) | (None, Some(one)) => format!("{} ({one})", self.type_name),
            (Some(data), Some(metadata)) => {
                format!("{} ({data} and {metadata})", self.type_name)
            }
        }
    }

    /// Returns true if the type, payload and metadata all match.
    pub fn matches<E: Published + ?Sized>(&self, event: &E) -> bool {
        self.matches_kind(event) && self.data_matches(event) && self.metadata_matches(event)
    }

    /// Returns true if the type matches, whatever the payload and metadata.
    pub fn matches_kind<E: Published + ?Sized>(&self, event: &E) -> bool {
        (self.type_fn)(event.event_type())
    }

    fn data_matches<E: Published + ?Sized>(&self, event: &E) -> bool {
        self.expected_data
            .as_ref()
            .is_none_or(|expected| expected == event.data())
    }

    fn metadata_matches<E: Published + ?Sized>(&self, event: &E) -> bool {
        match &self.expected_metadata {
            None => true,
            Some(Value::Object(expected)) => *expected == event.metadata(),
            Some(_) => false,
        }
    }
}

impl From<&'static str> for ExpectedEvent {
    fn from(name: &'static str) -> Self {
        ExpectedEvent::of_type(name)
    }
}

impl From<String> for ExpectedEvent {
    fn from(name: String) -> Self {
        ExpectedEvent::of_type(name)
    }
}
