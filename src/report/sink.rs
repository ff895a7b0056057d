use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::SinkError;
use crate::stats::Reconciliation;

/// One row of the persisted per-session tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub identity: String,
    pub buy_ins: usize,
    pub final_chips: u64,
}

impl SummaryRow {
    /// One row per identity, in alias table order.
    pub fn from_reconciliation(reconciliation: &Reconciliation) -> Vec<SummaryRow> {
        reconciliation
            .identities
            .iter()
            .map(|i| SummaryRow {
                identity: i.identity.clone(),
                buy_ins: i.buy_ins,
                final_chips: i.final_chips,
            })
            .collect()
    }
}

/// Where summary rows end up, e.g. a spreadsheet.
pub trait SummarySink {
    fn record(&mut self, row: &SummaryRow) -> Result<(), SinkError>;

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Record every row then flush. Stops at the first failure.
pub fn export_rows(rows: &[SummaryRow], sink: &mut dyn SummarySink) -> Result<usize, SinkError> {
    for row in rows {
        sink.record(row)?;
    }
    sink.flush()?;
    Ok(rows.len())
}

/// Appends rows to a file as JSON Lines, one object per line.
#[derive(Debug)]
pub struct JsonLinesSummarySink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonLinesSummarySink {
    pub fn new(path: PathBuf) -> Self {
        Self { path, writer: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>, SinkError> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                debug!(path = ?self.path, "Opening summary file");
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                BufWriter::new(file)
            }
        };
        Ok(self.writer.insert(writer))
    }
}

impl SummarySink for JsonLinesSummarySink {
    #[instrument(level = "trace", skip(self), fields(path = ?self.path))]
    fn record(&mut self, row: &SummaryRow) -> Result<(), SinkError> {
        let writer = self.writer()?;
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Keeps rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySummarySink {
    pub rows: Vec<SummaryRow>,
}

impl SummarySink for MemorySummarySink {
    fn record(&mut self, row: &SummaryRow) -> Result<(), SinkError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A text message for the people who played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub attachment: Option<Attachment>,
}

/// Delivers notifications, e.g. over email.
pub trait NotificationSink {
    fn send(&mut self, notification: &Notification) -> Result<(), SinkError>;
}
