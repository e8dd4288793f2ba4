//! Commute monitors a rider's regular public-transport connections in real time.
//!
//! Overview
//! - Polls a signed timetable API (see `commute-ptv`) for live runs and upcoming
//!   departures of every connection in the catalog.
//! - Derives, per departure, the latest moment to leave (`get_going_by`) and the
//!   expected arrival (`arrive_by`) from walking times, average trip duration and a
//!   safety buffer.
//! - Scores every departure's reliability from three health signals: the run has
//!   ever reported a live vehicle position, the departure carries a real-time
//!   estimate, and the route has any live vehicle right now.
//! - Keeps the presented list current between polls with a fetch-free tick that
//!   hides missed services and re-sorts by arrival.
//!
//! Key behaviors and trade-offs
//! - Refresh is sequential: at most one request is outstanding, which keeps the API
//!   footprint small at the cost of a slower full pass on large catalogs.
//! - A failing connection keeps its previous services until the next successful
//!   refresh; failures are reported, never fatal.
//! - The ever-active run set only grows for the lifetime of the monitor.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use commute::{Monitor, TablePresenter};
//!
//! let api = Arc::new(commute_ptv::PtvClient::new("1000", "key")?);
//! let monitor = Monitor::builder()
//!     .with_api(api)
//!     .catalog(connections)
//!     .build()?;
//!
//! let report = monitor.refresh().await?;
//! for row in monitor.services().iter() {
//!     println!("{} leave by {}", row.route_number, row.get_going_by_local);
//! }
//!
//! let handle = monitor.start_with(TablePresenter::stdout());
//! // ... later
//! handle.stop().await;
//! ```
//!
//! See `commute/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

mod aggregator;
pub(crate) mod core;
mod presenter;
mod scheduler;
mod view;

pub use self::core::{Monitor, MonitorBuilder};
pub use presenter::{Presenter, TablePresenter, render};
pub use scheduler::MonitorHandle;
pub use view::{ServiceRow, visible_rows};

pub use commute_core::{
    CommuteError, Connection, Direction, DirectionId, DurationStats, Health, HealthLevel, Leg,
    MonitorConfig, Progress, RefreshReport, RouteId, Service, ServiceId, StopId, TransitApi,
    TransportType,
};
