//! Rotating file writer used as a `tracing-subscriber` sink.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use jiff::Timestamp;
use tracing_subscriber::fmt::MakeWriter;

use crate::logger::LoggerError;
use crate::logger::config::FileConfig;
use crate::logger::rotation::Rotator;

/// File sink that rolls over according to its [`Rotator`].
///
/// When the file cannot be written (full disk, removed directory) the
/// writer switches to stderr for the rest of the process rather than
/// dropping events.
#[derive(Clone)]
pub struct RotatingFileWriter {
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    path: PathBuf,
    /// `None` once we have fallen back to stderr
    file: Option<BufWriter<File>>,
    size: u64,
    rotator: Rotator,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = open(&config.path, config.append)?;
        let size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            state: Arc::new(Mutex::new(WriterState {
                path: config.path.clone(),
                file: Some(file),
                size,
                rotator: Rotator::new(config.rotation.clone()),
            })),
        })
    }

    pub fn is_fallback(&self) -> bool {
        self.state.lock().map(|s| s.file.is_none()).unwrap_or(true)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, WriterState>> {
        self.state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }
}

impl WriterState {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.file.is_none() {
            return io::stderr().write(buf);
        }

        let now = Timestamp::now();
        if self.rotator.should_rotate(self.size, now) {
            if let Err(e) = self.roll_over(now) {
                return self.fall_back(buf, e);
            }
        }

        let result = match self.file.as_mut() {
            Some(file) => file.write(buf),
            None => return io::stderr().write(buf),
        };
        match result {
            Ok(written) => {
                self.size += written as u64;
                Ok(written)
            }
            Err(e) => self.fall_back(buf, e),
        }
    }

    fn roll_over(&mut self, now: Timestamp) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        self.file = None;
        self.rotator
            .rotate(&self.path, now)
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.file = Some(open(&self.path, false)?);
        self.size = 0;
        Ok(())
    }

    fn fall_back(&mut self, buf: &[u8], error: io::Error) -> io::Result<usize> {
        self.file = None;
        eprintln!(
            "[logger] cannot write {}: {}; continuing on stderr",
            self.path.display(),
            error
        );
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => io::stderr().flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = WriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        WriterHandle {
            writer: self.clone(),
        }
    }
}

/// Per-event handle; flushes on drop so each event reaches the file.
pub struct WriterHandle {
    writer: RotatingFileWriter,
}

impl Write for WriterHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.lock()?.flush()
    }
}

impl Drop for WriterHandle {
    fn drop(&mut self) {
        if let Ok(mut state) = self.writer.lock() {
            let _ = state.flush();
        }
    }
}

fn open(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(BufWriter::new(file))
}
