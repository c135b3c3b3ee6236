#![cfg_attr(docsrs, feature(doc_cfg))]
//! # es-matchers
//!
//! Assertions on the events an event-sourced system has published.
//!
//! Build an [`Expectation`] out of [`ExpectedEvent`]s, hand it the events you
//! read back from your event store, and [`HavePublished`] tells you whether the
//! expectation holds. When it does not, you get a message that says *why*:
//! no event of that type, events of that type with another payload (with a
//! diff per event), or the right events published the wrong number of times.
//!
//! ## Quick Start
//!
//! ```rust
//! use es_matchers::*;
//! use serde_json::json;
//!
//! let published = vec![
//!     Event::new("OrderPlaced", json!({"order_id": 7, "total": 120})),
//!     Event::new("OrderPaid", json!({"order_id": 7})),
//! ];
//!
//! let expectation = Expectation::new([
//!     ExpectedEvent::of_type("OrderPlaced").with_data(json!({"order_id": 7, "total": 100})),
//! ])?;
//!
//! let result = HavePublished::default().evaluate(&expectation, &published, Some("Order$7"))?;
//! let message = result.message().unwrap_or_default();
//!
//! assert!(message.contains(", but it was not published"));
//! assert!(message.contains("-$.total = 100\n    +$.total = 120"));
//! # Ok::<(), es_matchers::Error>(())
//! ```
//!
//! ## Core Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Published`] | Read-only view of an event under test |
//! | [`Event`] | Ready-made [`Published`] with [`EventId`] and [`Metadata`] |
//! | [`ExpectedEvent`] | Type predicate plus optional exact data and metadata |
//! | [`Expectation`] | Ordered expected events, `strict` flag and optional count |
//! | [`HavePublished`] | Evaluates expectations and renders failure messages |
//! | [`Differ`] | Pluggable diff between expected and actual values |
//! | [`StructuralDiffer`] | Default [`Differ`], configured by [`DiffConfig`] |
//! | [`MatchResult`] | `Satisfied` or `Unsatisfied(message)` |
//!
//! ## Modes
//!
//! - **Default**: every expected event must have been published at least once.
//! - **Strict** ([`Expectation::strict`]): the published events must be exactly
//!   the expected ones, in order.
//! - **Count** ([`Expectation::exactly`]): the expected event must have been
//!   published exactly that many times.
//! - **Negated** ([`HavePublished::evaluate_negated`]): the expectation must *not* hold.
//!
//! ## Features
//!
//! - **`serde`** - `Serialize`/`Deserialize` for [`Event`], [`EventId`], [`Metadata`] and [`DiffConfig`]

mod config;
mod differ;
mod error;
mod event;
mod event_id;
mod expectation;
mod expected_event;
mod have_published;
mod match_result;
mod message;
mod metadata;

pub use config::DiffConfig;
pub use differ::{Differ, StructuralDiffer};
pub use error::Error;
pub use event::{Event, Published};
pub use event_id::EventId;
pub use expectation::Expectation;
pub use expected_event::ExpectedEvent;
pub use have_published::HavePublished;
pub use match_result::MatchResult;
pub use metadata::Metadata;

/// Convenience alias for `Result<T, es_matchers::Error>`.
pub type Result<T = ()> = std::result::Result<T, Error>;
