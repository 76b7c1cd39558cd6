//! Entry names and the path rule shared by the file exporter and the index.
//!
//! A submission file's position in the bundle and its key in
//! `submissionFileIndex.json` are both computed by
//! [`relative_submission_path`], so the two always agree byte for byte.

use std::path::{Component, Path};

use rpt_core::Submission;

use crate::error::ExportError;

pub const OVERVIEW_ENTRY: &str = "overview.json";
pub const README_ENTRY: &str = "README.txt";
pub const OPTIONS_ENTRY: &str = "options.json";
pub const FILE_INDEX_ENTRY: &str = "submissionFileIndex.json";

/// Directory holding the copied submission files.
pub const SUBMISSIONS_ROOT: &str = "files";

/// Path of `file` relative to the submission root, `/`-separated.
///
/// Root and file are both made absolute first, so `./subs/a` and
/// `subs/a/X.java` (or a relative root with an absolute file) still line up.
/// When the submission root is the file itself the relative path would be
/// empty; the bare file name is used instead.
///
/// # Errors
///
/// Returns [`ExportError::FileOutsideRoot`] if `file` is not below the root
/// or contains `..` segments.
pub fn relative_submission_path(submission: &Submission, file: &Path) -> Result<String, ExportError> {
    let outside = || ExportError::FileOutsideRoot {
        submission: submission.name.clone(),
        path: file.to_path_buf(),
    };

    let root = std::path::absolute(&submission.root).map_err(|_| outside())?;
    let absolute_file = std::path::absolute(file).map_err(|_| outside())?;
    let relative = absolute_file.strip_prefix(&root).map_err(|_| outside())?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy()),
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }

    if segments.is_empty() {
        return file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(outside);
    }
    Ok(segments.join("/"))
}

/// Bundle entry for a submission file: `files/<id>/<relative path>`.
#[must_use]
pub fn submission_entry_path(id: &str, relative: &str) -> String {
    format!("{SUBMISSIONS_ROOT}/{id}/{relative}")
}
