use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;

use commute_core::{
    CommuteError, Connection, Leg, MonitorConfig, Progress, RefreshReport, RouteId, Service,
    TransitApi, validate_catalog,
};

use crate::aggregator::ServiceAggregator;
use crate::presenter::Presenter;
use crate::scheduler::{self, MonitorHandle};
use crate::view::{ServiceRow, visible_rows};

pub(crate) struct Inner {
    pub(crate) aggregator: ServiceAggregator,
    pub(crate) cfg: MonitorConfig,
    rows: watch::Sender<Arc<[ServiceRow]>>,
}

/// Commute monitor: keeps a table of upcoming departures fresh and publishes
/// the visible, ordered list.
///
/// Cheap to clone; clones share the same table and subscriptions.
#[derive(Clone)]
pub struct Monitor {
    pub(crate) inner: Arc<Inner>,
}

/// Builder for constructing a [`Monitor`].
pub struct MonitorBuilder {
    api: Option<Arc<dyn TransitApi>>,
    catalog: Vec<Connection>,
    cfg: MonitorConfig,
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorBuilder {
    /// Create a new builder with default configuration and an empty catalog.
    ///
    /// An API and at least one connection must be supplied before [`build`](Self::build).
    #[must_use]
    pub fn new() -> Self {
        Self {
            api: None,
            catalog: Vec::new(),
            cfg: MonitorConfig::default(),
        }
    }

    /// Set the timetable API used for every call.
    #[must_use]
    pub fn with_api(mut self, api: Arc<dyn TransitApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Append one connection to the catalog.
    ///
    /// Connections are refreshed in the order they are added.
    #[must_use]
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.catalog.push(connection);
        self
    }

    /// Replace the whole catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: impl IntoIterator<Item = Connection>) -> Self {
        self.catalog = catalog.into_iter().collect();
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: MonitorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the refresh loop period.
    #[must_use]
    pub const fn refresh_period(mut self, period: Duration) -> Self {
        self.cfg.refresh_period = period;
        self
    }

    /// Set the tick loop period.
    #[must_use]
    pub const fn tick_period(mut self, period: Duration) -> Self {
        self.cfg.tick_period = period;
        self
    }

    /// Set the safety buffer.
    ///
    /// It is subtracted from every get-going-by deadline and is also how long a
    /// missed service stays visible. Must be a whole number of seconds.
    #[must_use]
    pub const fn buffer(mut self, buffer: Duration) -> Self {
        self.cfg.buffer = buffer;
        self
    }

    /// Set how many departures are requested per connection.
    #[must_use]
    pub const fn max_results(mut self, n: usize) -> Self {
        self.cfg.max_results = n;
        self
    }

    /// Set the time zone used for `HH:MM` renderings.
    #[must_use]
    pub const fn timezone(mut self, tz: Tz) -> Self {
        self.cfg.timezone = tz;
        self
    }

    /// Follow the outbound or the return direction of each connection.
    #[must_use]
    pub const fn leg(mut self, leg: Leg) -> Self {
        self.cfg.leg = leg;
        self
    }

    /// Build the monitor.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no API is set, a period or `max_results` is
    /// zero, or the buffer is not a whole number of seconds that fits a `u32`, and `InvalidCatalog` when the catalog is empty, has duplicate route
    /// ids or an inconsistent connection.
    pub fn build(self) -> Result<Monitor, CommuteError> {
        let api = self
            .api
            .ok_or_else(|| CommuteError::InvalidArg("no TransitApi configured".into()))?;
        if self.cfg.refresh_period.is_zero() || self.cfg.tick_period.is_zero() {
            return Err(CommuteError::InvalidArg(
                "refresh and tick periods must be non-zero".into(),
            ));
        }
        if self.cfg.max_results == 0 {
            return Err(CommuteError::InvalidArg(
                "max_results must be at least 1".into(),
            ));
        }
        if self.cfg.buffer.subsec_nanos() != 0
            || u32::try_from(self.cfg.buffer.as_secs()).is_err()
        {
            return Err(CommuteError::InvalidArg(format!(
                "buffer must be whole seconds within u32, got {:?}",
                self.cfg.buffer
            )));
        }
        validate_catalog(&self.catalog)?;

        let (rows, _) = watch::channel(Arc::<[ServiceRow]>::from(Vec::new()));
        let aggregator = ServiceAggregator::new(api, self.catalog.into(), self.cfg.clone());
        Ok(Monitor {
            inner: Arc::new(Inner {
                aggregator,
                cfg: self.cfg,
                rows,
            }),
        })
    }
}

impl Monitor {
    /// Start building a new monitor.
    #[must_use]
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Configuration the monitor was built with.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.cfg
    }

    /// Connections being followed, in refresh order.
    #[must_use]
    pub fn catalog(&self) -> &[Connection] {
        self.inner.aggregator.catalog()
    }

    /// Refresh every connection, then republish the visible list.
    ///
    /// Failed connections keep their previous services and are listed in
    /// [`RefreshReport::warnings`].
    ///
    /// # Errors
    /// Returns `RefreshInFlight` if another refresh is already running.
    pub async fn refresh(&self) -> Result<RefreshReport, CommuteError> {
        let report = self.inner.aggregator.refresh().await?;
        self.tick().await;
        Ok(report)
    }

    /// Refresh one connection by route id, then republish the visible list.
    ///
    /// Returns the number of services written.
    ///
    /// # Errors
    /// Returns `RefreshInFlight` if a refresh is running, `InvalidArg` for an
    /// unknown route, or the tagged call failure.
    pub async fn refresh_route(&self, route_id: RouteId) -> Result<usize, CommuteError> {
        let written = self.inner.aggregator.refresh_route(route_id).await?;
        self.tick().await;
        Ok(written)
    }

    /// Recompute and publish the visible list for the current instant.
    pub async fn tick(&self) -> Arc<[ServiceRow]> {
        self.tick_at(Utc::now()).await
    }

    /// Recompute and publish the visible list as of `now`.
    ///
    /// Performs no network I/O.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Arc<[ServiceRow]> {
        let services = self.inner.aggregator.snapshot().await;
        let rows: Arc<[ServiceRow]> = visible_rows(
            services,
            self.catalog(),
            now,
            self.inner.cfg.buffer,
            self.inner.cfg.timezone,
        )
        .into();
        self.inner.rows.send_replace(Arc::clone(&rows));
        rows
    }

    /// Last published visible list.
    #[must_use]
    pub fn services(&self) -> Arc<[ServiceRow]> {
        self.inner.rows.borrow().clone()
    }

    /// Subscribe to published lists.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<[ServiceRow]>> {
        self.inner.rows.subscribe()
    }

    /// Progress of the current (or last) refresh pass.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.inner.aggregator.progress()
    }

    /// Subscribe to refresh progress updates.
    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<Progress> {
        self.inner.aggregator.subscribe_progress()
    }

    /// Returns `true` while a refresh pass is running.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.inner.aggregator.is_refreshing()
    }

    /// Every service held in the table, unfiltered, in slot order.
    pub async fn table_snapshot(&self) -> Vec<Service> {
        self.inner.aggregator.snapshot().await
    }

    /// Number of services held in the table, visible or not.
    pub async fn service_count(&self) -> usize {
        self.inner.aggregator.service_count().await
    }

    /// Whether a run has ever been seen with a live vehicle position.
    pub async fn was_ever_active(&self, run_ref: &str) -> bool {
        self.inner.aggregator.was_ever_active(run_ref).await
    }

    /// Spawn the refresh and tick loops.
    ///
    /// Both loops start immediately and run until the handle is stopped or dropped.
    #[must_use]
    pub fn start(&self) -> MonitorHandle {
        scheduler::spawn(self.clone(), None)
    }

    /// Like [`start`](Self::start), plus a task feeding every published list to `presenter`.
    #[must_use]
    pub fn start_with<P: Presenter>(&self, presenter: P) -> MonitorHandle {
        scheduler::spawn(self.clone(), Some(Box::new(presenter)))
    }
}
