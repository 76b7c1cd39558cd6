//! Gzip-compressed tar archive sink.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tar::{Builder, EntryType, Header, HeaderMode};
use tempfile::NamedTempFile;

use crate::ReportSink;
use crate::entry::EntryLedger;
use crate::error::SinkError;

type ArchiveBuilder = Builder<GzEncoder<NamedTempFile>>;

/// Writes the bundle into a single `.tar.gz` file.
///
/// The archive is built in a temporary file in the destination's directory
/// and atomically persisted on [`ReportSink::close`].
pub struct ArchiveSink {
    destination: PathBuf,
    overwrite: bool,
    builder: Option<ArchiveBuilder>,
    ledger: EntryLedger,
}

impl ArchiveSink {
    /// Prepare an archive at `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] if `destination` already exists and
    /// `overwrite` is false, or if its parent directory is not writable.
    pub fn create(destination: impl Into<PathBuf>, overwrite: bool) -> Result<Self, SinkError> {
        let destination = destination.into();
        if destination.exists() && !overwrite {
            return Err(SinkError::Open {
                path: destination,
                source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            });
        }

        let parent = parent_dir(&destination);
        let staged = tempfile::Builder::new()
            .prefix(".rpt-archive-")
            .suffix(".partial")
            .tempfile_in(parent)
            .map_err(|source| SinkError::Open {
                path: destination.clone(),
                source,
            })?;

        let mut builder = Builder::new(GzEncoder::new(staged, Compression::default()));
        builder.mode(HeaderMode::Deterministic);

        Ok(Self {
            destination,
            overwrite,
            builder: Some(builder),
            ledger: EntryLedger::default(),
        })
    }

    fn builder(&mut self) -> Result<&mut ArchiveBuilder, SinkError> {
        self.builder.as_mut().ok_or(SinkError::Closed)
    }
}

impl ReportSink for ArchiveSink {
    fn add_file_content_entry(&mut self, path: &str, source: &Path) -> Result<(), SinkError> {
        if self.builder.is_none() {
            return Err(SinkError::Closed);
        }
        self.ledger.register(path)?;
        let mut file = File::open(source).map_err(|e| SinkError::io(source, e))?;
        let destination = self.destination.clone();
        self.builder()?
            .append_file(path, &mut file)
            .map_err(|e| SinkError::io(destination, e))
    }

    fn add_bytes_entry(&mut self, path: &str, bytes: &[u8]) -> Result<(), SinkError> {
        if self.builder.is_none() {
            return Err(SinkError::Closed);
        }
        self.ledger.register(path)?;
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        let destination = self.destination.clone();
        self.builder()?
            .append_data(&mut header, path, bytes)
            .map_err(|e| SinkError::io(destination, e))
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let builder = self.builder.take().ok_or(SinkError::Closed)?;
        let encoder = builder
            .into_inner()
            .map_err(|e| SinkError::io(&self.destination, e))?;
        let staged = encoder
            .finish()
            .map_err(|e| SinkError::io(&self.destination, e))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| SinkError::io(&self.destination, e))?;

        let persisted = if self.overwrite {
            staged.persist(&self.destination)
        } else {
            staged.persist_noclobber(&self.destination)
        };
        persisted.map_err(|e| SinkError::Persist {
            path: self.destination.clone(),
            source: e.error,
        })?;

        tracing::debug!(
            entries = self.ledger.len(),
            destination = %self.destination.display(),
            "report archive written"
        );
        Ok(())
    }

    fn discard(&mut self) -> Result<(), SinkError> {
        if let Some(builder) = self.builder.take() {
            let staged = builder
                .into_inner()
                .and_then(GzEncoder::finish)
                .map_err(|e| SinkError::io(&self.destination, e))?;
            staged
                .close()
                .map_err(|e| SinkError::io(&self.destination, e))?;
        }
        Ok(())
    }

    fn destination(&self) -> &Path {
        &self.destination
    }
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
