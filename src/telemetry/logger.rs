//! # Telemetry Logger
//!
//! Writes [`TelemetryEntry`] records to JSONL files, starting a new file
//! after a fixed number of records and deleting the oldest files it created
//! once more than the configured number exist.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::TelemetryEntry;
use crate::config::TelemetryConfig;
use crate::error::{ImuProtError, Result};

/// Rotating JSONL writer
#[derive(Debug)]
pub struct TelemetryLogger {
    log_dir: PathBuf,
    max_records_per_file: usize,
    max_files_to_keep: usize,
    writer: Option<BufWriter<File>>,
    records_in_file: usize,
    file_index: usize,
    files: VecDeque<PathBuf>,
}

impl TelemetryLogger {
    /// Create a logger writing into `config.log_dir`
    ///
    /// The directory is created if missing. No file is opened until the
    /// first record is logged.
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be created or the limits
    /// are zero
    pub fn new(config: &TelemetryConfig) -> Result<Self> {
        if config.max_records_per_file == 0 || config.max_files_to_keep == 0 {
            return Err(ImuProtError::Telemetry(
                "rotation limits must be greater than 0".to_string(),
            ));
        }

        fs::create_dir_all(&config.log_dir)?;
        info!("Telemetry logging to {}", config.log_dir);

        Ok(Self {
            log_dir: PathBuf::from(&config.log_dir),
            max_records_per_file: config.max_records_per_file,
            max_files_to_keep: config.max_files_to_keep,
            writer: None,
            records_in_file: 0,
            file_index: 0,
            files: VecDeque::new(),
        })
    }

    /// Append one entry as a JSON line
    pub fn log(&mut self, entry: &TelemetryEntry) -> Result<()> {
        if self.writer.is_none() || self.records_in_file >= self.max_records_per_file {
            self.rotate()?;
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ImuProtError::Telemetry("no open log file".to_string()))?;

        serde_json::to_writer(&mut *writer, entry)?;
        writer.write_all(b"\n")?;
        self.records_in_file += 1;

        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }

    /// File currently being written, if any
    pub fn current_file(&self) -> Option<&Path> {
        self.files.back().map(PathBuf::as_path)
    }

    /// Files created by this logger that still exist, oldest first
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }

    fn rotate(&mut self) -> Result<()> {
        self.flush()?;

        let name = format!(
            "imu_{}_{:04}.jsonl",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.file_index
        );
        let path = self.log_dir.join(name);
        let file = File::create(&path)?;

        debug!("Opened telemetry file {}", path.display());
        self.writer = Some(BufWriter::new(file));
        self.records_in_file = 0;
        self.file_index += 1;
        self.files.push_back(path);

        while self.files.len() > self.max_files_to_keep {
            if let Some(oldest) = self.files.pop_front() {
                match fs::remove_file(&oldest) {
                    Ok(()) => info!("Removed old telemetry file {}", oldest.display()),
                    Err(e) => warn!("Failed to remove {}: {}", oldest.display(), e),
                }
            }
        }

        Ok(())
    }
}

impl Drop for TelemetryLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("Failed to flush telemetry on shutdown: {}", e);
        }
    }
}
