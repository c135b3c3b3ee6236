use std::{borrow::Cow, fmt, sync::Arc};

use serde_json::{Map, Value};

use crate::{EventId, Metadata};

/// Read-only view of an event that was published by the system under test.
///
/// Matchers only need the type tag, the payload and the metadata as a plain
/// mapping. Implement this for your own event records, or use [`Event`].
pub trait Published {
    /// Type tag used by [`ExpectedEvent::of_type`](crate::ExpectedEvent::of_type).
    fn event_type(&self) -> &str;

    /// Event payload.
    fn data(&self) -> &Value;

    /// Event metadata coerced to a plain key-value mapping.
    fn metadata(&self) -> Map<String, Value>;

    /// Human-readable form used in failure messages.
    fn inspect(&self) -> String {
        format!(
            "{} {{ data: {}, metadata: {} }}",
            self.event_type(),
            self.data(),
            Value::Object(self.metadata())
        )
    }
}

impl<T: Published + ?Sized> Published for &T {
    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn data(&self) -> &Value {
        (**self).data()
    }

    fn metadata(&self) -> Map<String, Value> {
        (**self).metadata()
    }

    fn inspect(&self) -> String {
        (**self).inspect()
    }
}

impl<T: Published + ?Sized> Published for Box<T> {
    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn data(&self) -> &Value {
        (**self).data()
    }

    fn metadata(&self) -> Map<String, Value> {
        (**self).metadata()
    }

    fn inspect(&self) -> String {
        (**self).inspect()
    }
}

impl<T: Published + ?Sized> Published for Arc<T> {
    fn event_type(&self) -> &str {
        (**self).event_type()
    }

    fn data(&self) -> &Value {
        (**self).data()
    }

    fn metadata(&self) -> Map<String, Value> {
        (**self).metadata()
    }

    fn inspect(&self) -> String {
        (**self).inspect()
    }
}

/// An event as read back from an event store.
///
/// Pairs a type tag and JSON payload with an [`EventId`] and [`Metadata`].
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    event_id: EventId,
    event_type: Cow<'static, str>,
    data: Value,
    metadata: Metadata,
}

impl Event {
    /// Create an event with a fresh ID and empty metadata.
    pub fn new(event_type: impl Into<Cow<'static, str>>, data: impl Into<Value>) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event_type.into(),
            data: data.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_event_id(mut self, event_id: impl Into<EventId>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<Metadata>) -> Self {
        self.metadata = metadata.into();
        self
    }

    #[inline]
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the metadata in its typed form.
    ///
    /// [`Published::metadata`] returns the coerced mapping instead.
    #[inline]
    pub fn meta(&self) -> &Metadata {
        &self.metadata
    }
}

impl Published for Event {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn data(&self) -> &Value {
        &self.data
    }

    fn metadata(&self) -> Map<String, Value> {
        self.metadata.to_map()
    }

    fn inspect(&self) -> String {
        format!(
            "{} {{ event_id: {}, data: {}, metadata: {} }}",
            self.event_type,
            self.event_id,
            self.data,
            Value::Object(self.metadata.to_map())
        )
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_id", &self.event_id)
            .field("event_type", &self.event_type)
            .field("data", &self.data)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
