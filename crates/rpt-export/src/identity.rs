//! Submission name → report ID mapping.
//!
//! IDs double as directory names under `files/`, so they must be path-safe.
//! Names that already are path-safe keep their name as ID; everything else
//! gets a sanitized ID with a numeric suffix on collision.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rpt_core::{AnalysisResult, Comparison, Submission};

use crate::error::ExportError;

/// ID used for names that sanitize to nothing usable.
const FALLBACK_ID: &str = "submission";

/// Bijection between the names of referenced submissions and their IDs.
///
/// Built once per report from the retained comparisons and never mutated;
/// it is `Sync` and shared by reference with every step, including the
/// parallel file index workers.
#[derive(Debug, Clone)]
pub struct IdentityMap {
    name_to_id: BTreeMap<String, String>,
    id_to_name: BTreeMap<String, String>,
    submissions: BTreeMap<String, Arc<Submission>>,
}

impl IdentityMap {
    /// Map every submission referenced by the comparisons retained under
    /// the configured cap.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::DuplicateSubmissionName`] if two different
    /// submissions share a name.
    pub fn from_result(result: &AnalysisResult) -> Result<Self, ExportError> {
        Self::build(result.truncated_comparisons())
    }

    /// Map every endpoint of `comparisons`.
    ///
    /// # Errors
    ///
    /// Same as [`IdentityMap::from_result`].
    pub fn build(comparisons: &[Comparison]) -> Result<Self, ExportError> {
        let mut submissions: BTreeMap<String, Arc<Submission>> = BTreeMap::new();
        for submission in comparisons.iter().flat_map(Comparison::submissions) {
            match submissions.entry(submission.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(submission));
                }
                Entry::Occupied(slot) => {
                    let known = slot.get();
                    if !Arc::ptr_eq(known, submission) && **known != **submission {
                        return Err(ExportError::DuplicateSubmissionName {
                            name: submission.name.clone(),
                        });
                    }
                }
            }
        }

        let name_to_id = assign_ids(submissions.keys().map(String::as_str));
        let id_to_name = name_to_id
            .iter()
            .map(|(name, id)| (id.clone(), name.clone()))
            .collect();

        Ok(Self {
            name_to_id,
            id_to_name,
            submissions,
        })
    }

    #[must_use]
    pub fn id_for(&self, submission: &Submission) -> Option<&str> {
        self.id_for_name(&submission.name)
    }

    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    /// The inverse table (ID → name) written to the overview.
    #[must_use]
    pub const fn id_to_name(&self) -> &BTreeMap<String, String> {
        &self.id_to_name
    }

    /// Referenced submissions with their IDs, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Submission>)> {
        // Both maps are keyed by the same names, so they iterate in lockstep.
        self.name_to_id
            .values()
            .map(String::as_str)
            .zip(self.submissions.values())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}

/// Assign IDs to `names` (unique, in sorted order).
///
/// Path-safe names claim themselves first so that a sanitized name can never
/// take an ID that equals some other submission's verbatim name.
fn assign_ids<'a>(names: impl Iterator<Item = &'a str> + Clone) -> BTreeMap<String, String> {
    let mut ids = BTreeMap::new();
    let mut used = BTreeSet::new();

    for name in names.clone() {
        if sanitize(name) == name {
            used.insert(name.to_string());
            ids.insert(name.to_string(), name.to_string());
        }
    }

    for name in names {
        if ids.contains_key(name) {
            continue;
        }
        let base = sanitize(name);
        let mut candidate = base.clone();
        let mut counter = 2usize;
        while used.contains(&candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        used.insert(candidate.clone());
        ids.insert(name.to_string(), candidate);
    }

    ids
}

fn sanitize(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match sanitized.as_str() {
        "" | "." | ".." => FALLBACK_ID.to_string(),
        _ => sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rpt_core::{LanguageDescriptor, RunOptions};

    fn submission(name: &str) -> Arc<Submission> {
        Arc::new(Submission::new(name, format!("/subs/{name}")))
    }

    fn compare(a: &Arc<Submission>, b: &Arc<Submission>) -> Comparison {
        Comparison::new(Arc::clone(a), Arc::clone(b), 0.5).unwrap()
    }

    #[test]
    fn path_safe_names_keep_their_name() {
        let (a, b) = (submission("alice"), submission("bob-2.zip"));
        let ids = IdentityMap::build(&[compare(&a, &b)]).unwrap();
        assert_eq!(ids.id_for(&a), Some("alice"));
        assert_eq!(ids.id_for(&b), Some("bob-2.zip"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn unsafe_names_are_sanitized_without_collisions() {
        let subs = ["a b", "a_b", "a/b", "..", "", "ö"].map(submission);
        let comparisons: Vec<_> = subs.windows(2).map(|w| compare(&w[0], &w[1])).collect();
        let ids = IdentityMap::build(&comparisons).unwrap();

        assert_eq!(ids.id_for_name("a_b"), Some("a_b"));
        assert_eq!(ids.id_for_name("a b"), Some("a_b_2"));
        assert_eq!(ids.id_for_name("a/b"), Some("a_b_3"));
        assert_eq!(ids.id_for_name(""), Some("submission"));
        assert_eq!(ids.id_for_name(".."), Some("submission_2"));
        assert_eq!(ids.id_for_name("ö"), Some("_"));

        let distinct: BTreeSet<_> = ids.id_to_name().keys().collect();
        assert_eq!(distinct.len(), subs.len());
        for (id, name) in ids.id_to_name() {
            assert_eq!(ids.id_for_name(name), Some(id.as_str()));
            assert!(!id.contains('/'));
        }
    }

    #[test]
    fn same_submission_in_many_comparisons_is_mapped_once() {
        let (a, b, c) = (submission("a"), submission("b"), submission("c"));
        let ids = IdentityMap::build(&[compare(&a, &b), compare(&a, &c), compare(&b, &c)]).unwrap();
        assert_eq!(ids.len(), 3);
        let names: Vec<_> = ids.iter().map(|(_, s)| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_names_with_different_roots_are_fatal() {
        let a = submission("dup");
        let other = Arc::new(Submission::new("dup", "/elsewhere/dup"));
        let b = submission("b");
        let err = IdentityMap::build(&[compare(&a, &b), compare(&b, &other)]).unwrap_err();
        assert!(matches!(err, ExportError::DuplicateSubmissionName { name } if name == "dup"));
    }

    #[test]
    fn same_name_and_root_with_different_files_is_fatal() {
        let a = Arc::new(Submission::new("dup", "/subs/dup").with_file("/subs/dup/A.java", 3));
        let stale = Arc::new(Submission::new("dup", "/subs/dup").with_file("/subs/dup/B.java", 5));
        let b = submission("b");
        let err = IdentityMap::build(&[compare(&a, &b), compare(&b, &stale)]).unwrap_err();
        assert!(matches!(err, ExportError::DuplicateSubmissionName { name } if name == "dup"));
    }

    #[test]
    fn equal_copies_of_a_submission_share_one_id() {
        let a = submission("a");
        let copy = Arc::new(Submission::new("a", "/subs/a"));
        let b = submission("b");
        let ids = IdentityMap::build(&[compare(&a, &b), compare(&b, &copy)]).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.id_for(&copy), Some("a"));
    }

    #[test]
    fn only_retained_comparisons_are_mapped() {
        let (a, b, c) = (submission("a"), submission("b"), submission("c"));
        let mut options = RunOptions::new(LanguageDescriptor::new("Java", "java"));
        options.maximum_number_of_comparisons = 1;
        let result = AnalysisResult::new(vec![compare(&a, &b), compare(&b, &c)], options, 0);

        let ids = IdentityMap::from_result(&result).unwrap();
        assert!(ids.contains_name("a"));
        assert!(ids.contains_name("b"));
        assert!(!ids.contains_name("c"));
    }

    #[test]
    fn empty_result_gives_empty_map() {
        let ids = IdentityMap::build(&[]).unwrap();
        assert!(ids.is_empty());
        assert_eq!(ids.iter().count(), 0);
    }
}
