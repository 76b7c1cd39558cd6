//! Descriptor of the language module that produced the analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The parts of the active language the exporter needs.
///
/// Some languages render a prettified "view" next to each source file
/// (`Solution.java` → `Solution.java.html`). When `use_view_files` is set the
/// report ships the view instead of the raw file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    /// Human-readable name shown in the viewer, e.g. `"Java"`.
    pub name: String,
    /// Short machine identifier, e.g. `"java"`.
    pub identifier: String,
    /// Default file suffixes accepted by the language.
    #[serde(default)]
    pub suffixes: Vec<String>,
    #[serde(default)]
    pub use_view_files: bool,
    /// Suffix appended to a source path to locate its view file.
    #[serde(default)]
    pub view_file_suffix: String,
}

impl LanguageDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            suffixes: Vec::new(),
            use_view_files: false,
            view_file_suffix: String::new(),
        }
    }

    #[must_use]
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Enable view-file substitution with the given suffix.
    #[must_use]
    pub fn with_view_files(mut self, suffix: impl Into<String>) -> Self {
        self.use_view_files = true;
        self.view_file_suffix = suffix.into();
        self
    }

    /// Resolve the physical file to copy for `file`.
    ///
    /// Returns `<file><view_file_suffix>` when view files are enabled,
    /// otherwise `file` itself.
    #[must_use]
    pub fn source_for(&self, file: &Path) -> PathBuf {
        if self.use_view_files {
            let mut raw = file.as_os_str().to_os_string();
            raw.push(&self.view_file_suffix);
            PathBuf::from(raw)
        } else {
            file.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_for_returns_file_without_view_files() {
        let language = LanguageDescriptor::new("Java", "java");
        assert_eq!(
            language.source_for(Path::new("/subs/a/Solution.java")),
            PathBuf::from("/subs/a/Solution.java")
        );
    }

    #[test]
    fn source_for_appends_view_suffix() {
        let language = LanguageDescriptor::new("Java", "java").with_view_files(".html");
        assert_eq!(
            language.source_for(Path::new("/subs/a/Solution.java")),
            PathBuf::from("/subs/a/Solution.java.html")
        );
    }

    #[test]
    fn serializes_camel_case() {
        let language = LanguageDescriptor::new("C++", "cpp")
            .with_suffixes([".cpp", ".h"])
            .with_view_files(".view");
        let json = serde_json::to_value(&language).unwrap();
        assert_eq!(json["useViewFiles"], true);
        assert_eq!(json["viewFileSuffix"], ".view");
        assert_eq!(json["suffixes"][1], ".h");
    }
}
