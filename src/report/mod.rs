//! Everything downstream of the parser: a finished session bundled with
//! its summaries, rendered as text and handed to sinks.
//!
//! ```no_run
//! use poker_session::SessionConfig;
//! use poker_session::report::{JsonLinesSummarySink, SessionReport};
//! use std::path::{Path, PathBuf};
//!
//! let config = SessionConfig::default();
//! let report = SessionReport::from_path(Path::new("HandHistory/"), &config)?;
//! println!("{}", report.markdown());
//!
//! let mut sink = JsonLinesSummarySink::new(PathBuf::from("summary.jsonl"));
//! report.export(&mut sink)?;
//! # Ok::<(), poker_session::SessionError>(())
//! ```
mod markdown;
mod sink;

use std::path::Path;

use tracing::info;

pub use markdown::render_markdown;
pub use sink::{
    Attachment, JsonLinesSummarySink, MemorySummarySink, Notification, NotificationSink,
    SummaryRow, SummarySink, export_rows,
};

use crate::config::SessionConfig;
use crate::errors::SessionError;
use crate::hand_history::{ParsedSession, parse_session};
use crate::io::{read_log_lines, resolve_log_path};
use crate::stats::{Reconciliation, SessionSummary, reconcile};

/// A parsed session together with everything derived from it.
///
/// Built fresh on every call; nothing is carried over from an earlier run.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub session: ParsedSession,
    pub summary: SessionSummary,
    pub reconciliation: Reconciliation,
    big_blind: u64,
}

impl SessionReport {
    pub fn from_lines<I, S>(lines: I, config: &SessionConfig) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        config.validate()?;
        let session = parse_session(lines, config)?;
        let summary = SessionSummary::from_session(&session);
        let reconciliation = reconcile(&summary, &config.aliases);
        Ok(Self {
            session,
            summary,
            reconciliation,
            big_blind: config.big_blind,
        })
    }

    /// Read and parse a log file, or the newest file of a directory.
    pub fn from_path(path: &Path, config: &SessionConfig) -> Result<Self, SessionError> {
        let path = resolve_log_path(path)?;
        info!(?path, "Parsing hand history");
        let lines = read_log_lines(&path)?;
        Self::from_lines(lines, config)
    }

    pub fn markdown(&self) -> String {
        let reconciliation = if self.reconciliation.identities.is_empty() {
            None
        } else {
            Some(&self.reconciliation)
        };
        render_markdown(&self.summary, reconciliation, self.big_blind)
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        SummaryRow::from_reconciliation(&self.reconciliation)
    }

    pub fn export(&self, sink: &mut dyn SummarySink) -> Result<usize, SessionError> {
        Ok(export_rows(&self.rows(), sink)?)
    }

    pub fn notification(&self, subject: &str, recipients: &[String]) -> Notification {
        Notification {
            subject: subject.to_string(),
            body: self.markdown(),
            recipients: recipients.to_vec(),
            attachment: None,
        }
    }

    pub fn notify(
        &self,
        subject: &str,
        recipients: &[String],
        attachment: Option<Attachment>,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), SessionError> {
        let mut notification = self.notification(subject, recipients);
        notification.attachment = attachment;
        info!(recipients = recipients.len(), "Sending session summary");
        Ok(sink.send(&notification)?)
    }
}
