use std::fmt::Write as _;
use std::io::Write;

use commute_core::{CommuteError, Progress};

use crate::view::ServiceRow;

/// Sink for the published service list.
///
/// Called by the presenter task each time the tick loop publishes a new list.
pub trait Presenter: Send + 'static {
    /// Render one published list.
    ///
    /// # Errors
    /// Returns an error if the output cannot be written; the presenter task
    /// stops on the first error.
    fn present(&mut self, rows: &[ServiceRow], progress: Progress) -> Result<(), CommuteError>;
}

/// Plain-text table written to any `io::Write`.
pub struct TablePresenter<W> {
    out: W,
}

impl TablePresenter<std::io::Stdout> {
    /// Table presenter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> TablePresenter<W> {
    /// Wrap a writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the presenter and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn format_countdown(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let abs = seconds.unsigned_abs();
    format!("{sign}{}:{:02}", abs / 60, abs % 60)
}

/// Render rows as a fixed-width table.
#[must_use]
pub fn render(rows: &[ServiceRow], progress: Progress) -> String {
    let mut s = String::new();
    if !progress.is_done() && progress.total > 0 {
        let _ = writeln!(s, "refreshing {}/{}", progress.completed, progress.total);
    }
    if rows.is_empty() {
        s.push_str("no upcoming services\n");
        return s;
    }
    let _ = writeln!(
        s,
        "{:<6} {:<5} {:<28} {:>7} {:>5} {:>5}  {:<10} disruptions",
        "mode", "route", "name", "go in", "leave", "arrive", "health"
    );
    for r in rows {
        let _ = writeln!(
            s,
            "{:<6} {:<5} {:<28.28} {:>7} {:>5} {:>5}  {:<10} {}",
            r.transport.label(),
            r.route_number,
            r.route_name,
            format_countdown(r.time_to_go_seconds),
            r.get_going_by_local,
            r.arrive_by_local,
            r.level.label(),
            r.disruptions.join("; "),
        );
    }
    s
}

impl<W: Write + Send + 'static> Presenter for TablePresenter<W> {
    fn present(&mut self, rows: &[ServiceRow], progress: Progress) -> Result<(), CommuteError> {
        self.out
            .write_all(render(rows, progress).as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| CommuteError::Other(format!("presenter write failed: {e}")))
    }
}
