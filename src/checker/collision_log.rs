//! Append-only collision log
//!
//! One line per collision: `<key1> <--@--> <key2> @===> <digest>`, where
//! `key1` is the input stored first and `key2` the one that collided with it.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

pub struct CollisionLog {
    writer: Mutex<Box<dyn Write + Send>>,
    lines: AtomicU64,
}

impl CollisionLog {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            lines: AtomicU64::new(0),
        }
    }

    /// Discard every line
    pub fn sink() -> Self {
        Self::from_writer(io::sink())
    }

    pub fn format_line(key1: &str, key2: &str, digest: &str) -> String {
        format!("{} <--@--> {} @===> {}", key1, key2, digest)
    }

    pub fn record(&self, key1: &str, key2: &str, digest: &str) -> io::Result<()> {
        let line = Self::format_line(key1, key2, digest);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        self.lines.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Lines written since the log was opened
    pub fn lines(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> io::Result<()> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
    }
}

impl Drop for CollisionLog {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
