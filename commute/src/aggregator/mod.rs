pub mod merge;
pub mod table;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock, watch};

use commute_core::{
    ActivityTracker, ApiRequest, CommuteError, Connection, Direction, MonitorConfig, Progress,
    RefreshReport, RouteId, Service, TransitApi, decode_departures, decode_runs,
};

use self::merge::{MergeInputs, active_runs, build_services};
use self::table::ServiceTable;

/// Call phases per connection: runs, then departures.
const PHASES_PER_CONNECTION: usize = 2;

/// Clears the in-flight flag when the refresh finishes or is dropped.
///
/// A guard dropped before [`InFlightGuard::finish`] also resets the published
/// progress.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    progress: &'a watch::Sender<Progress>,
    finished: bool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, progress: &'a watch::Sender<Progress>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                progress,
                finished: false,
            })
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.progress.send_replace(Progress::default());
        }
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the shared service table and the ever-active tracker.
///
/// All mutation goes through [`ServiceAggregator::refresh`] and
/// [`ServiceAggregator::refresh_route`]; readers only get snapshots.
pub struct ServiceAggregator {
    api: Arc<dyn TransitApi>,
    catalog: Arc<[Connection]>,
    cfg: MonitorConfig,
    table: RwLock<ServiceTable>,
    tracker: Mutex<ActivityTracker>,
    progress: watch::Sender<Progress>,
    in_flight: AtomicBool,
}

impl ServiceAggregator {
    pub fn new(api: Arc<dyn TransitApi>, catalog: Arc<[Connection]>, cfg: MonitorConfig) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            api,
            catalog,
            cfg,
            table: RwLock::new(ServiceTable::default()),
            tracker: Mutex::new(ActivityTracker::new()),
            progress,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &[Connection] {
        &self.catalog
    }

    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> Vec<Service> {
        self.table.read().await.snapshot()
    }

    pub async fn service_count(&self) -> usize {
        self.table.read().await.len()
    }

    pub async fn was_ever_active(&self, run_ref: &str) -> bool {
        self.tracker.lock().await.was_ever_active(run_ref)
    }

    fn advance(&self, steps: usize) {
        self.progress.send_modify(|p| p.completed += steps);
    }

    fn buffer_seconds(&self) -> u32 {
        u32::try_from(self.cfg.buffer.as_secs()).unwrap_or(u32::MAX)
    }

    /// Refresh every connection of the catalog, sequentially, in catalog order.
    ///
    /// A failing connection keeps its previous services and is reported in the
    /// returned warnings; later connections are still refreshed.
    ///
    /// # Errors
    /// Returns `RefreshInFlight` if another refresh is running.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "commute::aggregator::refresh",
            skip(self),
            fields(connections = self.catalog.len(), api = self.api.name()),
        )
    )]
    pub async fn refresh(&self) -> Result<RefreshReport, CommuteError> {
        let guard = InFlightGuard::acquire(&self.in_flight, &self.progress)
            .ok_or(CommuteError::RefreshInFlight)?;
        self.progress.send_replace(Progress {
            completed: 0,
            total: self.catalog.len() * PHASES_PER_CONNECTION,
        });

        let mut report = RefreshReport::default();
        for connection in self.catalog.iter() {
            let Some(direction) = connection.direction_for(self.cfg.leg).copied() else {
                #[cfg(feature = "tracing")]
                tracing::debug!(route_id = connection.id, leg = ?self.cfg.leg, "connection does not track leg; skipped");
                report.skipped += 1;
                self.advance(PHASES_PER_CONNECTION);
                continue;
            };
            match self.refresh_connection(connection, &direction).await {
                Ok(n) => {
                    report.refreshed += 1;
                    report.services += n;
                }
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(route_id = connection.id, error = %e, "connection refresh failed; keeping previous services");
                    report
                        .warnings
                        .push(CommuteError::connection(connection.id.to_string(), e));
                }
            }
        }
        guard.finish();
        Ok(report)
    }

    /// Refresh a single connection by route id.
    ///
    /// # Errors
    /// Returns `RefreshInFlight` if another refresh is running, `InvalidArg` for an
    /// unknown route or one that does not track the configured leg, and the call
    /// failure (tagged with the route) otherwise.
    pub async fn refresh_route(&self, route_id: RouteId) -> Result<usize, CommuteError> {
        let connection = self
            .catalog
            .iter()
            .find(|c| c.id == route_id)
            .ok_or_else(|| CommuteError::InvalidArg(format!("unknown route {route_id}")))?;
        let direction = connection.direction_for(self.cfg.leg).copied().ok_or_else(|| {
            CommuteError::InvalidArg(format!(
                "route {route_id} does not track the {:?} leg",
                self.cfg.leg
            ))
        })?;
        let guard = InFlightGuard::acquire(&self.in_flight, &self.progress)
            .ok_or(CommuteError::RefreshInFlight)?;
        self.progress.send_replace(Progress {
            completed: 0,
            total: PHASES_PER_CONNECTION,
        });
        let result = self
            .refresh_connection(connection, &direction)
            .await
            .map_err(|e| CommuteError::connection(route_id.to_string(), e));
        guard.finish();
        result
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "commute::aggregator::refresh_connection",
            skip(self, connection, direction),
            fields(route_id = connection.id, direction_id = direction.direction_id),
        )
    )]
    async fn refresh_connection(
        &self,
        connection: &Connection,
        direction: &Direction,
    ) -> Result<usize, CommuteError> {
        let runs = ApiRequest::runs(connection.id, connection.transport_type)
            .send(self.api.as_ref())
            .await;
        self.advance(1);
        let runs = match runs {
            Ok(v) => decode_runs(&v),
            Err(e) => {
                self.advance(1);
                return Err(e);
            }
        };

        let active = active_runs(&runs, direction.direction_id);
        let route_active = !active.is_empty();
        self.tracker
            .lock()
            .await
            .observe(direction.direction_id, active.iter().copied());

        let departures = ApiRequest::departures(
            connection.id,
            connection.transport_type,
            direction.origin_stop_id,
            direction.direction_id,
            self.cfg.max_results,
        )
        .send(self.api.as_ref())
        .await;
        self.advance(1);
        let batch = decode_departures(&departures?);

        let services = {
            let tracker = self.tracker.lock().await;
            build_services(
                &MergeInputs {
                    connection,
                    direction,
                    batch: &batch,
                    route_active,
                    buffer_seconds: self.buffer_seconds(),
                    max_results: self.cfg.max_results,
                },
                &tracker,
            )
        };
        let written = services.len();

        // One write guard per connection: readers never see a half-replaced range.
        self.table.write().await.replace_range(
            connection.id,
            direction.direction_id,
            direction.origin_stop_id,
            services,
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(written, route_active, "connection refreshed");
        Ok(written)
    }
}
