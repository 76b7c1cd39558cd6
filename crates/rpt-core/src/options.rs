//! Snapshot of the options an analysis run was started with.
//!
//! The exporter persists this verbatim as `options.json` so a report can be
//! reproduced later, and reads a handful of fields for the overview.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::language::LanguageDescriptor;

/// Default cap on comparisons retained in a report.
pub const DEFAULT_MAXIMUM_NUMBER_OF_COMPARISONS: usize = 500;

/// Default minimum token match.
pub const DEFAULT_MINIMUM_TOKEN_MATCH: u32 = 9;

const fn default_maximum_number_of_comparisons() -> usize {
    DEFAULT_MAXIMUM_NUMBER_OF_COMPARISONS
}

const fn default_minimum_token_match() -> u32 {
    DEFAULT_MINIMUM_TOKEN_MATCH
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub language: LanguageDescriptor,

    /// Directories holding the submissions checked in this run.
    #[serde(default)]
    pub submission_directories: Vec<PathBuf>,

    /// Directories holding earlier submissions that are only compared against.
    #[serde(default)]
    pub old_submission_directories: Vec<PathBuf>,

    #[serde(default)]
    pub base_code_submission_directory: Option<PathBuf>,

    /// File name patterns excluded from analysis.
    #[serde(default)]
    pub excluded_files: Vec<String>,

    /// Explicit suffixes; empty means "use the language defaults".
    #[serde(default)]
    pub file_suffixes: Vec<String>,

    #[serde(default = "default_minimum_token_match")]
    pub minimum_token_match: u32,

    #[serde(default = "default_maximum_number_of_comparisons")]
    pub maximum_number_of_comparisons: usize,
}

impl RunOptions {
    #[must_use]
    pub fn new(language: LanguageDescriptor) -> Self {
        Self {
            language,
            submission_directories: Vec::new(),
            old_submission_directories: Vec::new(),
            base_code_submission_directory: None,
            excluded_files: Vec::new(),
            file_suffixes: Vec::new(),
            minimum_token_match: DEFAULT_MINIMUM_TOKEN_MATCH,
            maximum_number_of_comparisons: DEFAULT_MAXIMUM_NUMBER_OF_COMPARISONS,
        }
    }

    /// Suffixes in effect for this run.
    #[must_use]
    pub fn file_suffixes(&self) -> &[String] {
        if self.file_suffixes.is_empty() {
            &self.language.suffixes
        } else {
            &self.file_suffixes
        }
    }

    /// Final path segment of the base code directory, or `""` without one.
    #[must_use]
    pub fn base_code_name(&self) -> String {
        self.base_code_submission_directory
            .as_deref()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Current submission directories followed by the old ones.
    pub fn all_submission_directories(&self) -> impl Iterator<Item = &PathBuf> {
        self.submission_directories
            .iter()
            .chain(&self.old_submission_directories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn java() -> LanguageDescriptor {
        LanguageDescriptor::new("Java", "java").with_suffixes([".java", ".JAVA"])
    }

    #[test]
    fn file_suffixes_fall_back_to_language() {
        let mut options = RunOptions::new(java());
        assert_eq!(options.file_suffixes(), [".java", ".JAVA"]);

        options.file_suffixes = vec![".jav".into()];
        assert_eq!(options.file_suffixes(), [".jav"]);
    }

    #[test]
    fn base_code_name_is_last_segment() {
        let mut options = RunOptions::new(java());
        assert_eq!(options.base_code_name(), "");

        options.base_code_submission_directory = Some(PathBuf::from("/course/template"));
        assert_eq!(options.base_code_name(), "template");
    }

    #[test]
    fn directories_keep_current_before_old() {
        let mut options = RunOptions::new(java());
        options.submission_directories = vec!["/new".into()];
        options.old_submission_directories = vec!["/old".into()];
        let dirs: Vec<_> = options.all_submission_directories().collect();
        assert_eq!(dirs, [&PathBuf::from("/new"), &PathBuf::from("/old")]);
    }

    #[test]
    fn deserializes_with_defaults() {
        let options: RunOptions = serde_json::from_str(
            r#"{"language": {"name": "Java", "identifier": "java"}}"#,
        )
        .unwrap();
        assert_eq!(options.minimum_token_match, DEFAULT_MINIMUM_TOKEN_MATCH);
        assert_eq!(
            options.maximum_number_of_comparisons,
            DEFAULT_MAXIMUM_NUMBER_OF_COMPARISONS
        );
        assert!(options.submission_directories.is_empty());
    }
}
