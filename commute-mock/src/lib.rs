//! Mock timetable API for CI-safe tests and examples.
//!
//! `DynamicMockApi` answers each endpoint path according to behaviors set through
//! its `DynamicMockController`; `fixtures` builds upstream-shaped payloads.

mod dynamic;
pub mod fixtures;

pub use dynamic::{DynamicMockApi, DynamicMockController, MockBehavior, RecordedCall};
pub use fixtures::{DepartureFixture, RunFixture, departures_payload, runs_payload};
