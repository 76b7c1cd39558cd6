//! Shared fixtures for report export integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use rpt_core::{AnalysisResult, Comparison, LanguageDescriptor, RunOptions, Submission};
use rpt_export::{
    ClusteringMapper, ComparisonFileTable, ComparisonWriter, IdentityMap, MetricMapper,
};
use rpt_sink::{JsonEntryExt, ReportSink};
use serde_json::{Value, json};

static TRACING: Once = Once::new();

/// Route exporter logs to the test harness; `RPT_LOG=debug` shows them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_env("RPT_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Writes submission trees below a temporary directory.
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: tempfile::tempdir().expect("tempdir should create"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn submissions_dir(&self) -> PathBuf {
        self.path().join("submissions")
    }

    /// Create a directory submission from `(relative path, content, tokens)`.
    pub fn submission(&self, name: &str, files: &[(&str, &str, usize)]) -> Arc<Submission> {
        let root = self.submissions_dir().join(name);
        let mut submission = Submission::new(name, &root);
        for (relative, content, tokens) in files {
            let path = root.join(relative);
            write_file(&path, content);
            submission = submission.with_file(path, *tokens);
        }
        Arc::new(submission)
    }

    /// Create a submission whose root is a single file.
    pub fn single_file_submission(&self, name: &str, content: &str, tokens: usize) -> Arc<Submission> {
        let path = self.submissions_dir().join(name);
        write_file(&path, content);
        Arc::new(Submission::new(name, &path).with_file(&path, tokens))
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn java() -> LanguageDescriptor {
    LanguageDescriptor::new("Java", "java").with_suffixes([".java"])
}

pub fn options(cap: usize) -> RunOptions {
    let mut options = RunOptions::new(java());
    options.maximum_number_of_comparisons = cap;
    options.excluded_files = vec!["module-info.java".into()];
    options
}

pub fn compare(a: &Arc<Submission>, b: &Arc<Submission>, similarity: f64) -> Comparison {
    Comparison::new(Arc::clone(a), Arc::clone(b), similarity).unwrap()
}

pub fn result(comparisons: Vec<Comparison>, options: RunOptions) -> AnalysisResult {
    AnalysisResult::new(comparisons, options, 1500)
}

/// Writes `<id1>-<id2>.json` per comparison, referencing submissions by ID.
pub struct JsonComparisonWriter;

impl ComparisonWriter for JsonComparisonWriter {
    fn write_comparison_reports(
        &mut self,
        comparisons: &[Comparison],
        ids: &IdentityMap,
        sink: &mut dyn ReportSink,
    ) -> anyhow::Result<ComparisonFileTable> {
        let mut table = ComparisonFileTable::new();
        for comparison in comparisons {
            let first = ids
                .id_for(comparison.first())
                .ok_or_else(|| anyhow::anyhow!("unmapped submission"))?;
            let second = ids
                .id_for(comparison.second())
                .ok_or_else(|| anyhow::anyhow!("unmapped submission"))?;
            let file_name = format!("{first}-{second}.json");
            sink.add_json_entry(
                &file_name,
                &json!({
                    "firstSubmissionId": first,
                    "secondSubmissionId": second,
                    "similarity": comparison.similarity(),
                }),
            )?;
            for (a, b) in [
                (&comparison.first().name, &comparison.second().name),
                (&comparison.second().name, &comparison.first().name),
            ] {
                table
                    .entry(a.clone())
                    .or_default()
                    .insert(b.clone(), file_name.clone());
            }
        }
        Ok(table)
    }
}

/// Top comparisons by ID, and a single bucket distribution.
pub struct IdMetrics;

impl MetricMapper for IdMetrics {
    fn distributions(&self, result: &AnalysisResult) -> anyhow::Result<Value> {
        Ok(json!({ "AVG": [result.all_comparisons().len()] }))
    }

    fn top_comparisons(&self, result: &AnalysisResult, ids: &IdentityMap) -> anyhow::Result<Value> {
        let top: Vec<_> = result
            .truncated_comparisons()
            .iter()
            .map(|c| {
                json!({
                    "firstSubmission": ids.id_for(c.first()),
                    "secondSubmission": ids.id_for(c.second()),
                    "similarity": c.similarity(),
                })
            })
            .collect();
        Ok(Value::Array(top))
    }
}

/// Everything referenced goes into one cluster.
pub struct SingleCluster;

impl ClusteringMapper for SingleCluster {
    fn clusters(&self, _result: &AnalysisResult, ids: &IdentityMap) -> anyhow::Result<Value> {
        let members: Vec<_> = ids.iter().map(|(id, _)| id).collect();
        Ok(json!([{ "members": members }]))
    }
}

/// Read every entry of a `.tar.gz` bundle.
pub fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let file = fs::File::open(path).unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    let mut entries = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().replace('\\', "/");
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        entries.insert(name, bytes);
    }
    entries
}

/// Read every file of a directory bundle, keyed by `/`-separated path.
pub fn read_directory(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, entries: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, entries);
            } else {
                let relative = path.strip_prefix(root).unwrap();
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                entries.insert(key, fs::read(&path).unwrap());
            }
        }
    }

    let mut entries = BTreeMap::new();
    walk(root, root, &mut entries);
    entries
}

pub fn json_entry(entries: &BTreeMap<String, Vec<u8>>, name: &str) -> Value {
    let bytes = entries
        .get(name)
        .unwrap_or_else(|| panic!("bundle has no entry {name}"));
    serde_json::from_slice(bytes).unwrap()
}

/// `files/<id>/...` entries grouped by ID, as `(id, relative path)`.
pub fn file_entries(entries: &BTreeMap<String, Vec<u8>>) -> Vec<(String, String)> {
    entries
        .keys()
        .filter_map(|key| key.strip_prefix("files/"))
        .filter_map(|rest| rest.split_once('/'))
        .map(|(id, relative)| (id.to_string(), relative.to_string()))
        .collect()
}
