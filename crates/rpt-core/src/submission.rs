//! A single participant's source tree.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One submission under analysis.
///
/// `name` is unique within a run. `files` keeps the order in which the
/// analysis engine discovered them; `token_counts` only holds files that were
/// successfully tokenized, so it may be a subset of `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub root: PathBuf,
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub token_counts: BTreeMap<PathBuf, usize>,
}

impl Submission {
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            files: Vec::new(),
            token_counts: BTreeMap::new(),
        }
    }

    /// Add a file along with its token count.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, tokens: usize) -> Self {
        let path = path.into();
        self.token_counts.insert(path.clone(), tokens);
        self.files.push(path);
        self
    }

    /// Add a file the analysis engine could not tokenize.
    #[must_use]
    pub fn with_untokenized_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }
}
