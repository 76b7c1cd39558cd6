//! Comparisons and the analysis result that carries them.

use std::sync::Arc;

use crate::errors::CoreError;
use crate::options::RunOptions;
use crate::submission::Submission;

/// A scored pairing of two distinct submissions.
///
/// Submissions are shared with `Arc` because one submission usually takes
/// part in many comparisons.
#[derive(Debug, Clone)]
pub struct Comparison {
    first: Arc<Submission>,
    second: Arc<Submission>,
    similarity: f64,
}

impl Comparison {
    /// Pair two submissions.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if both sides carry the same name.
    pub fn new(
        first: Arc<Submission>,
        second: Arc<Submission>,
        similarity: f64,
    ) -> Result<Self, CoreError> {
        if first.name == second.name {
            return Err(CoreError::Validation(format!(
                "comparison pairs submission '{}' with itself",
                first.name
            )));
        }
        Ok(Self {
            first,
            second,
            similarity,
        })
    }

    #[must_use]
    pub fn first(&self) -> &Arc<Submission> {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> &Arc<Submission> {
        &self.second
    }

    #[must_use]
    pub const fn similarity(&self) -> f64 {
        self.similarity
    }

    /// Both endpoints, first then second.
    pub fn submissions(&self) -> impl Iterator<Item = &Arc<Submission>> {
        [&self.first, &self.second].into_iter()
    }
}

/// Full output of an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    comparisons: Vec<Comparison>,
    options: RunOptions,
    duration_ms: u64,
}

impl AnalysisResult {
    /// `comparisons` must already be ordered by descending relevance.
    #[must_use]
    pub const fn new(comparisons: Vec<Comparison>, options: RunOptions, duration_ms: u64) -> Self {
        Self {
            comparisons,
            options,
            duration_ms,
        }
    }

    /// The `limit` most relevant comparisons, or all of them if there are fewer.
    #[must_use]
    pub fn comparisons(&self, limit: usize) -> &[Comparison] {
        &self.comparisons[..limit.min(self.comparisons.len())]
    }

    /// Comparisons retained under the configured cap.
    #[must_use]
    pub fn truncated_comparisons(&self) -> &[Comparison] {
        self.comparisons(self.options.maximum_number_of_comparisons)
    }

    #[must_use]
    pub fn all_comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    #[must_use]
    pub const fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Wall-clock duration of the analysis in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
