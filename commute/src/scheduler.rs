use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::Monitor;
use crate::presenter::Presenter;

/// Handle to the loops spawned by [`Monitor::start`].
///
/// Dropping the handle signals the loops to stop and aborts them.
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the loops to stop and wait for them to finish.
    ///
    /// A refresh in progress is abandoned; services already written stay in the table.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        let tasks = std::mem::take(&mut self.tasks);
        let results = futures::future::join_all(tasks).await;
        #[cfg(feature = "tracing")]
        for res in results {
            if let Err(e) = res {
                if e.is_panic() {
                    tracing::error!(error = %e, "monitor task panicked");
                }
            }
        }
        #[cfg(not(feature = "tracing"))]
        drop(results);
    }

    /// Returns `true` once every spawned loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(JoinHandle::is_finished)
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
        for t in &self.tasks {
            t.abort();
        }
    }
}

fn interval(period: Duration, missed: MissedTickBehavior) -> tokio::time::Interval {
    let mut iv = tokio::time::interval(period);
    iv.set_missed_tick_behavior(missed);
    iv
}

fn spawn_refresh_loop(monitor: Monitor, mut stop: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Missed ticks are delayed, never bunched: at most one refresh per period.
        let mut iv = interval(monitor.config().refresh_period, MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                _ = iv.tick() => {}
            }
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                res = monitor.refresh() => match res {
                    Ok(report) => {
                        #[cfg(feature = "tracing")]
                        tracing::info!(
                            refreshed = report.refreshed,
                            skipped = report.skipped,
                            services = report.services,
                            warnings = report.warnings.len(),
                            "refresh complete"
                        );
                        #[cfg(not(feature = "tracing"))]
                        let _ = report;
                    }
                    Err(e) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(error = %e, "refresh skipped");
                        #[cfg(not(feature = "tracing"))]
                        let _ = e;
                    }
                },
            }
        }
    })
}

fn spawn_tick_loop(monitor: Monitor, mut stop: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut iv = interval(monitor.config().tick_period, MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                _ = iv.tick() => {
                    monitor.tick().await;
                }
            }
        }
    })
}

fn spawn_presenter(
    monitor: Monitor,
    mut presenter: Box<dyn Presenter>,
    mut stop: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let mut rows_rx = monitor.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = stop.changed() => break,
                changed = rows_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            let rows = rows_rx.borrow_and_update().clone();
            if let Err(e) = presenter.present(&rows, monitor.progress()) {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, "presenter failed; stopping");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
                break;
            }
        }
    })
}

pub(crate) fn spawn(monitor: Monitor, presenter: Option<Box<dyn Presenter>>) -> MonitorHandle {
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut tasks = vec![
        spawn_refresh_loop(monitor.clone(), stop_rx.clone()),
        spawn_tick_loop(monitor.clone(), stop_rx.clone()),
    ];
    if let Some(p) = presenter {
        tasks.push(spawn_presenter(monitor, p, stop_rx));
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(tasks = tasks.len(), "monitor loops started");
    MonitorHandle { stop_tx, tasks }
}
