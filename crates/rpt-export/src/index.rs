//! `submissionFileIndex.json`: token counts per submission file.
//!
//! Per-submission maps are computed in parallel as pure functions of one
//! submission, then folded into the index on the calling thread.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rpt_core::Submission;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::identity::IdentityMap;
use crate::paths::relative_submission_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFile {
    pub token_count: usize,
}

/// Submission ID → relative file path → file info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFileIndex {
    pub file_indexes: BTreeMap<String, BTreeMap<String, SubmissionFile>>,
}

impl SubmissionFileIndex {
    /// Build the index for every submission in `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::FileOutsideRoot`] if a tokenized file is not
    /// below its submission root.
    pub fn build(ids: &IdentityMap) -> Result<Self, ExportError> {
        let per_submission: Vec<(String, BTreeMap<String, SubmissionFile>)> = ids
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(id, submission)| {
                index_submission(submission).map(|files| (id.to_string(), files))
            })
            .collect::<Result<_, ExportError>>()?;

        let mut index = Self::default();
        for (id, files) in per_submission {
            index.file_indexes.insert(id, files);
        }
        Ok(index)
    }

    #[must_use]
    pub fn token_count(&self, id: &str, relative_path: &str) -> Option<usize> {
        self.file_indexes
            .get(id)
            .and_then(|files| files.get(relative_path))
            .map(|file| file.token_count)
    }
}

fn index_submission(
    submission: &Submission,
) -> Result<BTreeMap<String, SubmissionFile>, ExportError> {
    submission
        .token_counts
        .iter()
        .map(|(file, &token_count)| {
            relative_submission_path(submission, file).map(|key| (key, SubmissionFile { token_count }))
        })
        .collect()
}
