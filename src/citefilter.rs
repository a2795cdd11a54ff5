//! Citation-list filtering.
//!
//! A companion citation-list file records which anchors a document
//! actually referenced, one `\bibcite{anchor}` marker per citation.
//! Entries whose anchor never appears are routed to a secondary output
//! instead of the primary one.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::Entry;

static BIBCITE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\bibcite\{([^{}]+)\}").unwrap());

/// The set of anchors cited by a companion document.
///
/// Membership testing is unordered; the first-seen order of anchors is
/// retained for informational listing only.
#[derive(Debug, Clone, Default)]
pub struct CitationSet {
    anchors: HashSet<String>,
    order: Vec<String>,
}

impl CitationSet {
    /// Collect every `\bibcite{anchor}` marker in a citation-list file.
    ///
    /// Only the first braced group after the marker counts; lines without
    /// the marker are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut set = Self::default();
        for line in text.lines() {
            for caps in BIBCITE.captures_iter(line) {
                let anchor = caps[1].to_string();
                if set.anchors.insert(anchor.clone()) {
                    set.order.push(anchor);
                }
            }
        }
        set
    }

    /// Whether `anchor` was cited.
    pub fn contains(&self, anchor: &str) -> bool {
        self.anchors.contains(anchor)
    }

    /// Cited anchors, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Partition entries into (cited, not cited), preserving source order in
/// both halves.
///
/// With no citation set supplied, filtering is a no-op and every entry is
/// cited.
pub fn partition(entries: Vec<Entry>, citations: Option<&CitationSet>) -> (Vec<Entry>, Vec<Entry>) {
    match citations {
        Some(set) => entries
            .into_iter()
            .partition(|entry| set.contains(&entry.anchor)),
        None => (entries, Vec::new()),
    }
}
