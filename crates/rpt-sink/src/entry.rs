//! Entry path rules shared by all sinks.

use std::collections::BTreeSet;

use crate::error::SinkError;

/// Check that `path` is a relative, `/`-separated entry path that stays
/// inside the bundle.
///
/// # Errors
///
/// Returns [`SinkError::InvalidEntryPath`] describing the first violation.
pub fn validate_entry_path(path: &str) -> Result<(), SinkError> {
    let reason = if path.is_empty() {
        Some("path is empty")
    } else if path.starts_with('/') {
        Some("path is absolute")
    } else if path.contains('\\') {
        Some("path contains a backslash")
    } else if path.split('/').any(str::is_empty) {
        Some("path contains an empty segment")
    } else if path.split('/').any(|segment| segment == "." || segment == "..") {
        Some("path contains a relative segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SinkError::InvalidEntryPath {
            path: path.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Tracks written entries so each path is written exactly once.
#[derive(Debug, Default)]
pub(crate) struct EntryLedger {
    written: BTreeSet<String>,
}

impl EntryLedger {
    pub(crate) fn register(&mut self, path: &str) -> Result<(), SinkError> {
        validate_entry_path(path)?;
        if !self.written.insert(path.to_string()) {
            return Err(SinkError::DuplicateEntry(path.to_string()));
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.written.len()
    }
}
