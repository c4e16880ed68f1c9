use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use thiserror::Error;

use super::model::{Dataset, Row};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a dataset could not be published.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,

    #[error("loader stopped before delivering a result")]
    Interrupted,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read the whole file and parse it. Nothing is published until the
/// entire file has been buffered and parsed.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(&bytes)
}

/// Parse UTF-8 CSV text with header semantics.
///
/// * first record = field keys
/// * every later record = one [`Row`], in file order
/// * blank lines are ignored; a record of empty cells (`,`) is still a row
/// * records that fail to parse or whose field count differs from the
///   header are dropped and counted in [`Dataset::skipped_rows`]
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.trim().is_empty()) {
        return Err(LoadError::MissingHeader);
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (record_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = line_of(e.position(), record_no);
                log::warn!("Skipping CSV line {line}: {e}");
                skipped += 1;
                continue;
            }
        };

        if record.len() != columns.len() {
            let line = line_of(record.position(), record_no);
            log::warn!(
                "Skipping CSV line {line}: {} fields, header has {}",
                record.len(),
                columns.len()
            );
            skipped += 1;
            continue;
        }

        rows.push(
            columns
                .iter()
                .zip(record.iter())
                .map(|(key, value)| (key.as_str(), value))
                .collect::<Row>(),
        );
    }

    if skipped > 0 {
        log::warn!("{skipped} malformed CSV records were skipped");
    }

    let mut dataset = Dataset::new(columns, rows);
    dataset.skipped_rows = skipped;
    Ok(dataset)
}

/// 1-based file line of a record. Falls back to the record index when csv
/// reports no position (header is line 1).
fn line_of(position: Option<&csv::Position>, record_no: usize) -> u64 {
    position.map_or(record_no as u64 + 2, csv::Position::line)
}

// ---------------------------------------------------------------------------
// Background loading
// ---------------------------------------------------------------------------

/// Handle to a load running on a background thread.
///
/// [`PendingLoad::poll`] yields the outcome exactly once.
pub struct PendingLoad {
    path: PathBuf,
    rx: Option<Receiver<Result<Dataset, LoadError>>>,
}

impl PendingLoad {
    /// File being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for the outcome. Returns `Some` once, then `None`.
    pub fn poll(&mut self) -> Option<Result<Dataset, LoadError>> {
        let rx = self.rx.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(LoadError::Interrupted),
        };
        self.rx = None;
        Some(outcome)
    }
}

/// Start loading `path` on a background thread. `notify` runs after the
/// result has been sent, so the caller can wake its event loop.
pub fn spawn_load<F>(path: PathBuf, notify: F) -> PendingLoad
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let thread_path = path.clone();

    let spawned = thread::Builder::new()
        .name("csv-loader".into())
        .spawn(move || {
            let result = load_file(&thread_path);
            // The receiver may be gone if a newer load replaced this one.
            let _ = tx.send(result);
            notify();
        });

    // On spawn failure the sender is dropped with the closure, so `poll`
    // reports `Interrupted`.
    if let Err(e) = spawned {
        log::error!("Could not start loader thread: {e}");
    }

    PendingLoad {
        path,
        rx: Some(rx),
    }
}
