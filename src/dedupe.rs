//! Near-duplicate title detection.
//!
//! An advisory pass over normalized entries that flags pairs whose titles
//! look like the same work entered twice. Titles are normalized (lowercase,
//! punctuation stripped, whitespace collapsed) and compared pairwise with
//! Jaro-Winkler similarity; matches are reported as warnings and the entry
//! set is never modified.
//!
//! # Usage
//!
//! ```rust
//! use bibnorm::{DedupAdvisor, Normalizer, Report};
//!
//! let mut report = Report::new();
//! let entries = Normalizer::new()
//!     .normalize(
//!         "@misc{a, title = {Parsing BibTeX}} @misc{b, title = {Parsing BibTex}}",
//!         &mut report,
//!     )
//!     .unwrap();
//!
//! DedupAdvisor::new().advise(&entries, &mut report);
//! assert!(report.warnings().any(|d| d.message.contains("duplicates")));
//! ```

use itertools::Itertools;
use strsim::jaro_winkler;

use crate::{Entry, Report};

const TITLE_SIMILARITY_THRESHOLD: f64 = 0.95;

/// Advisory detector for near-duplicate titles.
#[derive(Debug, Clone)]
pub struct DedupAdvisor {
    threshold: f64,
}

impl Default for DedupAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupAdvisor {
    /// Creates an advisor with the default similarity threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: TITLE_SIMILARITY_THRESHOLD,
        }
    }

    /// Override the Jaro-Winkler similarity threshold (0.0 to 1.0).
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Compare every pair of titled entries and record one warning per
    /// suspicious pair. Entries without a title are skipped.
    pub fn advise(&self, entries: &[Entry], report: &mut Report) {
        let titled: Vec<(&str, String)> = entries
            .iter()
            .filter_map(|entry| {
                entry
                    .title()
                    .map(|title| (entry.anchor.as_str(), normalize_title(title)))
            })
            .filter(|(_, title)| !title.is_empty())
            .collect();

        for (a, b) in titled.iter().tuple_combinations() {
            let similarity = jaro_winkler(&a.1, &b.1);
            if similarity >= self.threshold {
                report.warn(
                    Some(a.0),
                    format!(
                        "titles of {} and {} look like duplicates (similarity {similarity:.2})",
                        a.0, b.0
                    ),
                );
            }
        }
    }
}

/// Reduce a title to its comparable core: lowercase alphanumerics with
/// single spaces.
fn normalize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Normalizer, Report};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn entries(input: &str) -> Vec<Entry> {
        Normalizer::new()
            .normalize(input, &mut Report::new())
            .unwrap()
    }

    #[rstest]
    #[case("The Art of Computer Programming!", "the art of computer programming")]
    #[case("  Spaced   out\ttitle ", "spaced out title")]
    #[case("C++: A Language", "c a language")]
    fn test_normalize_title(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_title(raw), expected);
    }

    #[test]
    fn test_near_duplicate_titles_warn() {
        let entries = entries(
            "@misc{a, title = {Intrusion Detection via Static Analysis}}
             @misc{b, title = {Intrusion Detection via Static Analyses}}",
        );
        let mut report = Report::new();
        DedupAdvisor::new().advise(&entries, &mut report);
        assert_eq!(report.warnings().count(), 1);
        let warning = report.warnings().next().unwrap();
        assert!(warning.message.contains("a"));
        assert!(warning.message.contains("b"));
    }

    #[test]
    fn test_identical_titles_warn() {
        let entries = entries(
            "@misc{a, title = {Parsing BibTeX}} @misc{b, title = {Parsing BibTeX!}}",
        );
        let mut report = Report::new();
        DedupAdvisor::new().advise(&entries, &mut report);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_distinct_titles_stay_silent() {
        let entries = entries(
            "@misc{a, title = {Parsing BibTeX}} @misc{b, title = {A Theory of Timed Automata}}",
        );
        let mut report = Report::new();
        DedupAdvisor::new().advise(&entries, &mut report);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_untitled_entries_are_skipped() {
        let mut report = Report::new();
        let entries = Normalizer::new()
            .normalize("@misc{a, year = 2014} @misc{b, year = 2014}", &mut report)
            .unwrap();
        let before = report.len();
        DedupAdvisor::new().advise(&entries, &mut report);
        assert_eq!(report.len(), before);
    }

    #[test]
    fn test_entries_are_not_modified() {
        let entries = entries(
            "@misc{a, title = {Parsing BibTeX}} @misc{b, title = {Parsing BibTeX}}",
        );
        let mut report = Report::new();
        DedupAdvisor::new().advise(&entries, &mut report);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title(), entries[1].title());
    }
}
