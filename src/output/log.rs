//! Raw per-sample diagnostic log.
//!
//! One `<class> <delta>` line per sample, for offline reanalysis (histograms
//! per class and the like). The file is truncated when an evaluation starts
//! and every measured round of every session is appended, calibration rounds
//! included.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::HarnessError;
use crate::types::Class;

/// Writer for the diagnostic log.
#[derive(Debug)]
pub struct SampleLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SampleLog {
    /// Create (or truncate) the log at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, HarnessError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| HarnessError::LogIo {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Log location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one round.
    pub fn write_round(&mut self, classes: &[Class], deltas: &[i64]) -> Result<(), HarnessError> {
        for (class, delta) in classes.iter().zip(deltas) {
            writeln!(self.writer, "{} {}", class.index(), delta).map_err(|source| self.io_error(source))?;
        }
        Ok(())
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<(), HarnessError> {
        self.writer.flush().map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> HarnessError {
        HarnessError::LogIo {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_class_delta_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dudect.out");

        let mut log = SampleLog::create(&path).unwrap();
        assert_eq!(log.path(), path.as_path());
        log.write_round(&[Class::Fixed, Class::Random, Class::Fixed], &[120, -4, 0]).unwrap();
        log.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "0 120\n1 -4\n0 0\n");
    }

    #[test]
    fn test_create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dudect.out");
        std::fs::write(&path, "stale\n").unwrap();

        let mut log = SampleLog::create(&path).unwrap();
        log.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_unwritable_path_is_log_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dudect.out");

        let err = SampleLog::create(&path).unwrap_err();
        assert!(matches!(err, HarnessError::LogIo { .. }));
    }
}
