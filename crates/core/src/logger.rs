// Session logging with retention of the newest log files.
// Library code logs unconditionally; nothing is recorded until a host calls init_logger.
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Warn,
    Error,
}

pub struct SessionLogger {
    log_buffer: Mutex<Vec<String>>,
    log_path: PathBuf,
    log_dir: PathBuf,
    retention_count: usize,
    app_name: String,
    stream: bool,
}

impl SessionLogger {
    /// With `stream` set, every line is appended immediately and mirrored to
    /// `tracing`; otherwise lines are buffered until `flush_to_disk`.
    pub fn new(log_dir: PathBuf, app_name: &str, retention_count: usize, stream: bool) -> Result<Self> {
        fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        let log_path = log_dir.join(format!("{}_{}.log", app_name, timestamp));

        let logger = Self {
            log_buffer: Mutex::new(Vec::new()),
            log_path,
            log_dir,
            retention_count,
            app_name: app_name.to_string(),
            stream,
        };

        logger.clean_old_logs();
        logger.info(format!("=== {} Session Started ===", app_name));

        Ok(logger)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write(&self, level: Level, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let line = match level {
            Level::Info => format!("[{}] {}", timestamp, message),
            Level::Warn => format!("[{}] WARN: {}", timestamp, message),
            Level::Error => format!("[{}] ERROR: {}", timestamp, message),
        };

        if self.stream {
            match level {
                Level::Info => tracing::info!(target: "chromakit", "{}", message),
                Level::Warn => tracing::warn!(target: "chromakit", "{}", message),
                Level::Error => tracing::error!(target: "chromakit", "{}", message),
            }
            if let Err(e) = self.append(std::slice::from_ref(&line)) {
                tracing::error!("Failed to append to {}: {}", self.log_path.display(), e);
            }
        } else {
            self.log_buffer.lock().push(line);
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.write(Level::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.write(Level::Warn, message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.write(Level::Error, message.as_ref());
    }

    fn clean_old_logs(&self) {
        let prefix = format!("{}_", self.app_name);
        let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();

        if let Ok(entries) = fs::read_dir(&self.log_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("log") {
                    continue;
                }
                let matches = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(&prefix))
                    .unwrap_or(false);
                if !matches {
                    continue;
                }
                if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
                    log_files.push((path, modified));
                }
            }
        }

        // Newest first; the session about to start takes one retention slot
        log_files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        let keep = self.retention_count.saturating_sub(1);
        for (path, _) in log_files.iter().skip(keep) {
            let _ = fs::remove_file(path);
        }
    }

    fn append(&self, lines: &[String]) -> Result<()> {
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file {}", self.log_path.display()))?;

        for line in lines {
            writeln!(file, "{}", line)?;
        }
        file.flush()?;
        Ok(())
    }

    pub fn flush_to_disk(&self) -> Result<()> {
        let mut buffer = self.log_buffer.lock();
        if buffer.is_empty() {
            return Ok(());
        }

        self.append(&buffer)?;
        buffer.clear();
        Ok(())
    }

    pub fn finalize(&self) -> Result<()> {
        self.info(format!("=== {} Session Ended ===", self.app_name));
        self.flush_to_disk()
    }
}

static LOGGER: once_cell::sync::OnceCell<SessionLogger> = once_cell::sync::OnceCell::new();

pub fn init_logger(log_dir: PathBuf, app_name: &str, retention_count: usize, stream: bool) -> Result<()> {
    let logger = SessionLogger::new(log_dir, app_name, retention_count, stream)?;
    LOGGER
        .set(logger)
        .map_err(|_| anyhow::anyhow!("Logger already initialized"))?;
    Ok(())
}

pub fn get_log_path() -> Option<PathBuf> {
    LOGGER.get().map(|l| l.log_path.clone())
}

pub fn log_info(message: impl AsRef<str>) {
    if let Some(logger) = LOGGER.get() {
        logger.info(message);
    }
}

pub fn log_warn(message: impl AsRef<str>) {
    if let Some(logger) = LOGGER.get() {
        logger.warn(message);
    }
}

pub fn log_error(message: impl AsRef<str>) {
    if let Some(logger) = LOGGER.get() {
        logger.error(message);
    }
}

pub fn finalize_logs() -> Result<()> {
    if let Some(logger) = LOGGER.get() {
        logger.finalize()?;
    }
    Ok(())
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::log_info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log_warn(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log_error(format!($($arg)*))
    };
}
