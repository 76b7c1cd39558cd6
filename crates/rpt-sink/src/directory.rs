//! Plain directory tree sink.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::ReportSink;
use crate::archive::parent_dir;
use crate::entry::EntryLedger;
use crate::error::SinkError;

/// Name of the previous report inside its set-aside directory.
const ASIDE_NAME: &str = "report";

/// Writes the bundle as a directory tree.
///
/// Entries are staged in a hidden sibling directory and renamed into place on
/// [`ReportSink::close`].
pub struct DirectorySink {
    destination: PathBuf,
    overwrite: bool,
    staging: Option<TempDir>,
    ledger: EntryLedger,
}

impl DirectorySink {
    /// Prepare a directory bundle at `destination`.
    ///
    /// An existing empty directory is replaced; anything else at
    /// `destination` requires `overwrite`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] if `destination` is occupied and
    /// `overwrite` is false, or if the staging directory cannot be created.
    pub fn create(destination: impl Into<PathBuf>, overwrite: bool) -> Result<Self, SinkError> {
        let destination = destination.into();
        if !overwrite && is_occupied(&destination) {
            return Err(SinkError::Open {
                path: destination,
                source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            });
        }

        let staging = tempfile::Builder::new()
            .prefix(".rpt-staging-")
            .tempdir_in(parent_dir(&destination))
            .map_err(|source| SinkError::Open {
                path: destination.clone(),
                source,
            })?;

        Ok(Self {
            destination,
            overwrite,
            staging: Some(staging),
            ledger: EntryLedger::default(),
        })
    }

    /// Move whatever sits at the destination into a sibling temp directory.
    ///
    /// The old report stays recoverable until the new tree is in place. An
    /// empty directory (the only thing allowed without `overwrite`) is just
    /// removed.
    fn set_aside_previous(&self) -> Result<Option<TempDir>, SinkError> {
        if !self.destination.exists() {
            return Ok(None);
        }
        if !self.overwrite {
            if !self.destination.is_dir() {
                return Err(SinkError::Persist {
                    path: self.destination.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
                });
            }
            fs::remove_dir(&self.destination).map_err(|e| SinkError::io(&self.destination, e))?;
            return Ok(None);
        }

        let aside = tempfile::Builder::new()
            .prefix(".rpt-previous-")
            .tempdir_in(parent_dir(&self.destination))
            .map_err(|e| SinkError::io(&self.destination, e))?;
        fs::rename(&self.destination, aside.path().join(ASIDE_NAME))
            .map_err(|e| SinkError::io(&self.destination, e))?;
        Ok(Some(aside))
    }

    fn staged_target(&mut self, path: &str) -> Result<PathBuf, SinkError> {
        let root = self.staging.as_ref().ok_or(SinkError::Closed)?.path();
        let target = path.split('/').fold(root.to_path_buf(), |acc, segment| acc.join(segment));
        self.ledger.register(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| SinkError::io(parent, e))?;
        }
        Ok(target)
    }
}

impl ReportSink for DirectorySink {
    fn add_file_content_entry(&mut self, path: &str, source: &Path) -> Result<(), SinkError> {
        let target = self.staged_target(path)?;
        let mut reader = File::open(source).map_err(|e| SinkError::io(source, e))?;
        let mut writer = File::create(&target).map_err(|e| SinkError::io(&target, e))?;
        std::io::copy(&mut reader, &mut writer).map_err(|e| SinkError::io(&target, e))?;
        Ok(())
    }

    fn add_bytes_entry(&mut self, path: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let target = self.staged_target(path)?;
        fs::write(&target, bytes).map_err(|e| SinkError::io(&target, e))
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let staging = self.staging.take().ok_or(SinkError::Closed)?;
        let previous = self.set_aside_previous()?;

        let staged = staging.keep();
        if let Err(source) = fs::rename(&staged, &self.destination) {
            if let Some(previous) = previous {
                if let Err(restore_error) =
                    fs::rename(previous.path().join(ASIDE_NAME), &self.destination)
                {
                    let kept = previous.keep();
                    tracing::warn!(
                        %restore_error,
                        kept = %kept.display(),
                        destination = %self.destination.display(),
                        "failed to restore previous report"
                    );
                }
            }
            if let Err(cleanup_error) = fs::remove_dir_all(&staged) {
                tracing::warn!(%cleanup_error, staged = %staged.display(), "failed to remove staged report");
            }
            return Err(SinkError::Persist {
                path: self.destination.clone(),
                source,
            });
        }

        if let Some(previous) = previous {
            let aside = previous.path().to_path_buf();
            if let Err(cleanup_error) = previous.close() {
                tracing::warn!(%cleanup_error, aside = %aside.display(), "failed to remove previous report");
            }
        }

        tracing::debug!(
            entries = self.ledger.len(),
            destination = %self.destination.display(),
            "report directory written"
        );
        Ok(())
    }

    fn discard(&mut self) -> Result<(), SinkError> {
        if let Some(staging) = self.staging.take() {
            staging
                .close()
                .map_err(|e| SinkError::io(&self.destination, e))?;
        }
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.destination
    }
}

fn is_occupied(path: &Path) -> bool {
    if path.is_dir() {
        fs::read_dir(path).map_or(true, |mut entries| entries.next().is_some())
    } else {
        path.exists()
    }
}
