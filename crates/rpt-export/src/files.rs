//! Copies the source files of every referenced submission into the bundle.

use rpt_core::LanguageDescriptor;
use rpt_sink::ReportSink;

use crate::error::ExportError;
use crate::identity::IdentityMap;
use crate::paths::{relative_submission_path, submission_entry_path};

/// Stream each file of each mapped submission to `files/<id>/<relative path>`.
///
/// With view files enabled, the file's view (`<path><suffix>`) is copied
/// instead, while the entry path stays derived from the original file.
/// Returns the number of files written.
///
/// # Errors
///
/// Returns [`ExportError::MissingSubmissionFile`] if a file (or its view) is
/// not a readable regular file, [`ExportError::FileOutsideRoot`] for files
/// outside their submission root, and sink errors as they occur.
pub fn export_submission_files(
    sink: &mut dyn ReportSink,
    ids: &IdentityMap,
    language: &LanguageDescriptor,
) -> Result<usize, ExportError> {
    let mut written = 0usize;
    for (id, submission) in ids.iter() {
        for file in &submission.files {
            let relative = relative_submission_path(submission, file)?;
            let source = language.source_for(file);
            if !source.is_file() {
                return Err(ExportError::MissingSubmissionFile {
                    submission: submission.name.clone(),
                    path: source,
                });
            }
            sink.add_file_content_entry(&submission_entry_path(id, &relative), &source)?;
            written += 1;
        }
        tracing::debug!(
            submission = %submission.name,
            id,
            files = submission.files.len(),
            "copied submission files"
        );
    }
    Ok(written)
}
