use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Terminal filter: `--debug` wins, then `RUST_LOG`, then warnings only.
pub fn terminal_filter(debug: bool) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(debug, rust_log.as_deref())
}

fn filter_from(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    if debug {
        return EnvFilter::new("fermyon=debug");
    }
    rust_log
        .filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("fermyon=warn"))
}

/// Install the global subscriber: stderr at the terminal filter plus a
/// file layer that stays silent until its handle is activated.
pub fn init(debug: bool) -> LogFileHandle {
    let terminal_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(terminal_filter(debug));

    let (file_writer, handle) = LogFileWriter::new();
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("fermyon=debug"));

    tracing_subscriber::registry()
        .with(terminal_layer)
        .with(file_layer)
        .init();
    handle
}

type Slot = Arc<Mutex<Option<File>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<File>> {
    // a panic mid-write leaves the file usable
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `MakeWriter` that discards until a log file is attached.
#[derive(Clone)]
pub struct LogFileWriter {
    slot: Slot,
}

/// Attaches the log file once the instance is known.
#[derive(Clone)]
pub struct LogFileHandle {
    slot: Slot,
}

impl std::fmt::Debug for LogFileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFileHandle")
            .field("active", &lock(&self.slot).is_some())
            .finish()
    }
}

impl LogFileWriter {
    pub fn new() -> (Self, LogFileHandle) {
        let slot: Slot = Arc::new(Mutex::new(None));
        (Self { slot: slot.clone() }, LogFileHandle { slot })
    }
}

impl LogFileHandle {
    /// Start appending to `path`, creating parent directories.
    pub fn activate(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *lock(&self.slot) = Some(file);
        Ok(())
    }
}

pub struct SlotWriter {
    slot: Slot,
}

impl Write for SlotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match lock(&self.slot).as_mut() {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match lock(&self.slot).as_mut() {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = SlotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter {
            slot: self.slot.clone(),
        }
    }
}
