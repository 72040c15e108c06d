//! JSONL file writer for step outcomes.
//!
//! Each [`StepOutcome`] is serialized as a single JSON line with a
//! `logged_at` timestamp, appended to the file via a buffered writer. The
//! file is opened in append mode so resumed runs extend the same log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use stepwise_application::OutcomeLog;
use stepwise_domain::StepOutcome;
use tracing::warn;

/// JSONL outcome log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every append and on
/// `Drop`: the log is for post-hoc diagnosis after a crash, so a line held
/// in the buffer is a line lost.
pub struct JsonlOutcomeLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlOutcomeLog {
    /// Create a new log appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create outcome log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open outcome log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutcomeLog for JsonlOutcomeLog {
    fn append(&self, outcome: &StepOutcome) {
        let logged_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let serde_json::Value::Object(mut record) =
            serde_json::to_value(outcome).unwrap_or(serde_json::Value::Null)
        else {
            return;
        };
        record.insert(
            "logged_at".to_string(),
            serde_json::Value::String(logged_at),
        );

        let Ok(line) = serde_json::to_string(&serde_json::Value::Object(record)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            // Flush each line for crash safety — JSONL is append-only
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlOutcomeLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
