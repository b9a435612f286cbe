/*!
[`TracingHistoryObserver`]: the default [`dhparser_parse::HistoryObserver`]
this crate installs. `dhparser-parse` itself stays free of a logging
dependency (per its own ambient-stack note, only `tracing` for the single
CST debug line in `Grammar::parse_observed`); this is the one place the
workspace forwards per-parser-invocation history into `tracing`, so a
driver program only has to install a subscriber (`tracing_subscriber::fmt`)
to see it.
*/

use dhparser_parse::{HistoryEntry, HistoryObserver, Status};

/// Forwards every [`HistoryEntry`] to `tracing::trace!` instead of
/// collecting it in memory. Used as [`crate::parse`]'s observer so parser
/// history is visible in whatever subscriber the caller has installed,
/// without this crate having to expose its own log storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHistoryObserver;

impl HistoryObserver for TracingHistoryObserver {
    fn on_event(&mut self, entry: HistoryEntry) {
        let name = entry.name.as_deref().unwrap_or(entry.ptype);
        match entry.status {
            Status::Match => {
                tracing::trace!(parser = name, location = entry.location, excerpt = %entry.excerpt, "matched")
            }
            Status::Fail => {
                tracing::trace!(parser = name, location = entry.location, excerpt = %entry.excerpt, "failed")
            }
            Status::Error => {
                tracing::trace!(parser = name, location = entry.location, excerpt = %entry.excerpt, "recovered with error")
            }
        }
    }
}
