//! JSONL file writer for run progress events.
//!
//! Each observer callback is serialized as a single JSON line with an
//! `event` field and `timestamp`, appended to the file via a buffered
//! writer. The resulting log replays the exact interleaving of stage
//! starts, item completions, and stage ends.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use swarm_application::{RunObserver, Stage};
use tracing::warn;

/// Run observer that writes one JSON object per event line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every event and
/// on `Drop`, so a crashed run still leaves a usable log.
pub struct JsonlRunObserver {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlRunObserver {
    /// Create a new observer writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create run log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create run log file {}: {}", path.display(), e);
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

    fn write_event(&self, record: serde_json::Value) {
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush per event for crash safety — JSONL is append-only
            let _ = writer.flush();
        }
    }

    fn timestamp() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

impl RunObserver for JsonlRunObserver {
    fn on_stage_start(&self, stage: Stage, total_items: usize) {
        self.write_event(serde_json::json!({
            "event": "stage_start",
            "timestamp": Self::timestamp(),
            "stage": stage.as_str(),
            "total_items": total_items,
        }));
    }

    fn on_item_complete(&self, stage: Stage, label: &str, success: bool) {
        self.write_event(serde_json::json!({
            "event": "item_complete",
            "timestamp": Self::timestamp(),
            "stage": stage.as_str(),
            "item": label,
            "success": success,
        }));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.write_event(serde_json::json!({
            "event": "stage_complete",
            "timestamp": Self::timestamp(),
            "stage": stage.as_str(),
        }));
    }
}

impl Drop for JsonlRunObserver {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
