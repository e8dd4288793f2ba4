//! Commute-specific data transfer objects, configuration primitives and errors.
#![warn(missing_docs)]

mod catalog;
mod config;
mod error;
mod reports;
mod service;

pub use catalog::{
    Connection, Direction, DirectionId, DurationStats, RouteId, StopId, TransportType,
    validate_catalog,
};
pub use config::{Leg, MonitorConfig};
pub use error::CommuteError;
pub use reports::{Progress, RefreshReport};
pub use service::{Health, HealthLevel, Service, ServiceId};
