//! # rpt-sink
//!
//! Persistence strategies for report bundles.
//!
//! A report is a tree of named entries (`overview.json`, `files/<id>/...`).
//! The exporter only talks to the [`ReportSink`] capability; the caller picks
//! the physical layout when constructing the sink:
//! - [`ArchiveSink`]: a single gzip-compressed tar file
//! - [`DirectorySink`]: a plain directory tree
//!
//! Both strategies stage their output next to the destination and only make
//! it visible on [`ReportSink::close`]. [`ReportSink::discard`] (or dropping
//! the sink) throws the staged output away, so a failed export never leaves a
//! half-written bundle behind.

mod archive;
mod directory;
mod entry;
mod error;

pub use archive::ArchiveSink;
pub use directory::DirectorySink;
pub use entry::validate_entry_path;
pub use error::SinkError;

use rpt_config::{OutputConfig, OutputFormat};
use serde::Serialize;
use std::path::Path;

/// Single-writer destination for report entries.
///
/// Entry paths are relative, `/`-separated and case-sensitive. Every entry
/// may be written at most once.
pub trait ReportSink: Send {
    /// Stream the contents of `source` into the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if `source` cannot be read or the entry
    /// cannot be written.
    fn add_file_content_entry(&mut self, path: &str, source: &Path) -> Result<(), SinkError>;

    /// Write raw bytes into the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the entry cannot be written.
    fn add_bytes_entry(&mut self, path: &str, bytes: &[u8]) -> Result<(), SinkError>;

    /// Write UTF-8 text into the entry at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`ReportSink::add_bytes_entry`].
    fn write_string_entry(&mut self, path: &str, content: &str) -> Result<(), SinkError> {
        self.add_bytes_entry(path, content.as_bytes())
    }

    /// Finalize the bundle and move it to its destination.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Persist`] if the staged output cannot be
    /// published, or [`SinkError::Closed`] if the sink was already closed.
    fn close(&mut self) -> Result<(), SinkError>;

    /// Release all resources and remove the staged output.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the staged output cannot be removed.
    fn discard(&mut self) -> Result<(), SinkError>;

    /// Final location of the bundle once closed.
    fn destination(&self) -> &Path;
}

/// JSON convenience for any sink, including `dyn ReportSink`.
pub trait JsonEntryExt: ReportSink {
    /// Serialize `value` as pretty-printed JSON into the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Serialize`] naming `path` if serialization fails,
    /// otherwise the errors of [`ReportSink::add_bytes_entry`].
    fn add_json_entry<T: Serialize + ?Sized>(
        &mut self,
        path: &str,
        value: &T,
    ) -> Result<(), SinkError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| SinkError::Serialize {
            path: path.to_string(),
            source,
        })?;
        self.add_bytes_entry(path, &bytes)
    }
}

impl<S: ReportSink + ?Sized> JsonEntryExt for S {}

/// Open the sink described by `config`.
///
/// # Errors
///
/// Returns [`SinkError::Open`] if the destination cannot be prepared.
pub fn open_sink(config: &OutputConfig) -> Result<Box<dyn ReportSink>, SinkError> {
    let sink: Box<dyn ReportSink> = match config.format {
        OutputFormat::Archive => Box::new(ArchiveSink::create(&config.path, config.overwrite)?),
        OutputFormat::Directory => {
            Box::new(DirectorySink::create(&config.path, config.overwrite)?)
        }
    };
    tracing::debug!(
        format = %config.format,
        destination = %config.path.display(),
        "opened report sink"
    );
    Ok(sink)
}
