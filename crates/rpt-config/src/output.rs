//! Where and how a report bundle is written.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Physical layout of the report bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// A single gzip-compressed tar archive.
    #[default]
    Archive,
    /// A plain directory tree.
    Directory,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("report.tar.gz")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Destination archive file or directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Replace an existing destination instead of refusing to write.
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: default_path(),
            overwrite: false,
        }
    }
}

impl OutputConfig {
    #[must_use]
    pub fn archive(path: impl Into<PathBuf>) -> Self {
        Self {
            format: OutputFormat::Archive,
            path: path.into(),
            overwrite: false,
        }
    }

    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            format: OutputFormat::Directory,
            path: path.into(),
            overwrite: false,
        }
    }
}
