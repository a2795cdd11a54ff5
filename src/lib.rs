//! A library and command-line tool for normalizing BibTeX bibliographies.
//!
//! `bibnorm` ingests raw BibTeX source, splits it into entries while
//! respecting arbitrarily nested braces and quoted strings, rewrites each
//! entry's attribute set according to category rules, and re-serializes
//! everything into one canonical textual form. It is aimed at bibliography
//! maintainers who want a consistent, lint-free `.bib` file.
//!
//! # Key Features
//!
//! - **Entry scanning**: brace-depth aware splitting of a whole `.bib` blob
//!   into entry spans, failing fast on structurally corrupt input.
//! - **Attribute normalization**: category-conditioned field filtering,
//!   value unwrapping, whitespace collapsing, case correction, and
//!   field-specific rewrites (page ranges, month names, URL notes).
//! - **Citation filtering**: restrict output to entries actually cited by a
//!   companion document, routing the rest to a secondary artifact.
//! - **Near-duplicate detection**: advisory warnings for entries whose
//!   titles look suspiciously similar.
//!
//! # Basic Usage
//!
//! ```rust
//! use bibnorm::{Attribute, Normalizer, Report};
//!
//! let input = r#"@article{greenwade93,
//!     author = "George D. Greenwade",
//!     title = "The Comprehensive Tex Archive Network (CTAN)",
//!     year = 1993,
//!     pages = 342-351,
//! }"#;
//!
//! let mut report = Report::new();
//! let normalizer = Normalizer::new();
//! let entries = normalizer.normalize(input, &mut report).unwrap();
//!
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].anchor, "greenwade93");
//! assert_eq!(entries[0].get(Attribute::Pages), Some("342--351"));
//!
//! let text = normalizer.render_all(&entries);
//! assert!(text.starts_with("@article{greenwade93,"));
//! ```
//!
//! # Citation Filtering
//!
//! ```rust
//! use bibnorm::{citefilter, CitationSet, Normalizer, Report};
//!
//! let mut report = Report::new();
//! let entries = Normalizer::new()
//!     .normalize("@misc{a, title={A}} @misc{b, title={B}}", &mut report)
//!     .unwrap();
//!
//! let citations = CitationSet::parse(r"\bibcite{a}{1}");
//! let (cited, not_cited) = citefilter::partition(entries, Some(&citations));
//! assert_eq!(cited.len(), 1);
//! assert_eq!(not_cited.len(), 1);
//! ```
//!
//! # Diagnostics
//!
//! Every non-fatal finding (dropped attributes, format oddities, case
//! corrections) is appended to an injectable [`Report`] sink rather than
//! logged globally, so callers decide how to surface them. Diagnostics are
//! advisory and never block output.
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type that wraps [`BibError`].
//! Structural errors (broken brace nesting, malformed entry spans) abort
//! the whole run; everything recoverable is a [`Diagnostic`] instead.
//!
//! ```rust
//! use bibnorm::{BibError, Normalizer, Report};
//!
//! // A second entry opens while the first is still unclosed.
//! let result = Normalizer::new().normalize("@book{x, @book{y,}}", &mut Report::new());
//! assert!(matches!(result, Err(BibError::Structure { .. })));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub mod bibtex;
pub mod citefilter;
pub mod clock;
pub mod dedupe;

// Reexports
pub use bibtex::{Normalizer, RuleSet};
pub use citefilter::CitationSet;
pub use clock::{Clock, FixedClock, SystemClock};
pub use dedupe::DedupAdvisor;

/// A specialized Result type for bibliography operations.
pub type Result<T> = std::result::Result<T, BibError>;

/// Represents fatal errors that can occur while processing a bibliography.
///
/// Recoverable findings are reported as [`Diagnostic`]s instead; every
/// variant here aborts the run before any output is committed.
#[derive(Error, Debug)]
pub enum BibError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message} at byte {offset}")]
    Structure { message: String, offset: usize },

    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    #[error("invalid value for {field}: {message}")]
    InvalidFieldValue { field: String, message: String },
}

/// The closed set of entry categories.
///
/// A span whose leading identifier parses to none of these is treated as a
/// non-entry comment and dropped before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Article,
    Book,
    Booklet,
    Inbook,
    Incollection,
    Inproceedings,
    Manual,
    Mastersthesis,
    Phdthesis,
    Misc,
    Techreport,
    Unpublished,
}

impl Category {
    /// Parse a category name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "article" => Some(Self::Article),
            "book" => Some(Self::Book),
            "booklet" => Some(Self::Booklet),
            "inbook" => Some(Self::Inbook),
            "incollection" => Some(Self::Incollection),
            "inproceedings" => Some(Self::Inproceedings),
            "manual" => Some(Self::Manual),
            "mastersthesis" => Some(Self::Mastersthesis),
            "phdthesis" => Some(Self::Phdthesis),
            "misc" => Some(Self::Misc),
            "techreport" => Some(Self::Techreport),
            "unpublished" => Some(Self::Unpublished),
            _ => None,
        }
    }

    /// The canonical lowercase name used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::Inbook => "inbook",
            Self::Incollection => "incollection",
            Self::Inproceedings => "inproceedings",
            Self::Manual => "manual",
            Self::Mastersthesis => "mastersthesis",
            Self::Phdthesis => "phdthesis",
            Self::Misc => "misc",
            Self::Techreport => "techreport",
            Self::Unpublished => "unpublished",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical attribute vocabulary, in serialization order.
///
/// Attribute names outside this vocabulary never survive normalization;
/// they are dropped with a diagnostic before reaching an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Author,
    Title,
    Journal,
    Booktitle,
    Institution,
    School,
    Key,
    Year,
    Month,
    Series,
    Volume,
    Number,
    Pages,
    Publisher,
    Edition,
    Note,
    Howpublished,
    Url,
}

impl Attribute {
    /// Every attribute, in canonical serialization order.
    pub const ALL: [Attribute; 18] = [
        Self::Author,
        Self::Title,
        Self::Journal,
        Self::Booktitle,
        Self::Institution,
        Self::School,
        Self::Key,
        Self::Year,
        Self::Month,
        Self::Series,
        Self::Volume,
        Self::Number,
        Self::Pages,
        Self::Publisher,
        Self::Edition,
        Self::Note,
        Self::Howpublished,
        Self::Url,
    ];

    /// Look up an attribute by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "author" => Some(Self::Author),
            "title" => Some(Self::Title),
            "journal" => Some(Self::Journal),
            "booktitle" => Some(Self::Booktitle),
            "institution" => Some(Self::Institution),
            "school" => Some(Self::School),
            "key" => Some(Self::Key),
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "series" => Some(Self::Series),
            "volume" => Some(Self::Volume),
            "number" => Some(Self::Number),
            "pages" => Some(Self::Pages),
            "publisher" => Some(Self::Publisher),
            "edition" => Some(Self::Edition),
            "note" => Some(Self::Note),
            "howpublished" => Some(Self::Howpublished),
            "url" => Some(Self::Url),
            _ => None,
        }
    }

    /// The lowercase name used in serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Title => "title",
            Self::Journal => "journal",
            Self::Booktitle => "booktitle",
            Self::Institution => "institution",
            Self::School => "school",
            Self::Key => "key",
            Self::Year => "year",
            Self::Month => "month",
            Self::Series => "series",
            Self::Volume => "volume",
            Self::Number => "number",
            Self::Pages => "pages",
            Self::Publisher => "publisher",
            Self::Edition => "edition",
            Self::Note => "note",
            Self::Howpublished => "howpublished",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized bibliography record.
///
/// Entries are produced by [`Normalizer`] and immutable afterwards; the
/// attribute mapping only ever contains names from the canonical
/// vocabulary, and never any from the drop list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// The entry category (article, book, ...).
    pub category: Category,
    /// The citation key naming this entry.
    pub anchor: String,
    attributes: HashMap<Attribute, String>,
}

impl Entry {
    pub(crate) fn new(
        category: Category,
        anchor: String,
        attributes: HashMap<Attribute, String>,
    ) -> Self {
        Self {
            category,
            anchor,
            attributes,
        }
    }

    /// The value of `attribute`, if present.
    pub fn get(&self, attribute: Attribute) -> Option<&str> {
        self.attributes.get(&attribute).map(String::as_str)
    }

    /// The entry title, if present.
    pub fn title(&self) -> Option<&str> {
        self.get(Attribute::Title)
    }

    /// Present attributes with their values, in canonical order.
    pub fn attributes(&self) -> impl Iterator<Item = (Attribute, &str)> {
        Attribute::ALL
            .iter()
            .filter_map(|attr| self.get(*attr).map(|value| (*attr, value)))
    }
}

/// The outcome of normalizing one raw entry span.
///
/// "Not an entry" is a legitimate result, not an error: spans whose
/// category falls outside the closed set are comments and must be handled
/// explicitly by the caller.
#[derive(Debug, Clone)]
pub enum EntryOutcome {
    /// The span was a real entry and normalized successfully.
    Entry(Entry),
    /// The span is a non-entry comment and was skipped.
    Comment,
}

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// One non-fatal finding collected during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The anchor of the entry the finding belongs to, when known.
    pub anchor: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Some(anchor) => write!(f, "[{anchor}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// An append-only sink for [`Diagnostic`]s.
///
/// Passed into the pipeline explicitly so callers choose how findings are
/// surfaced; the library itself never logs.
#[derive(Debug, Default, Clone)]
pub struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append an informational diagnostic.
    pub fn info(&mut self, anchor: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Info,
            anchor: anchor.map(str::to_string),
            message: message.into(),
        });
    }

    /// Append a warning diagnostic.
    pub fn warn(&mut self, anchor: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            anchor: anchor.map(str::to_string),
            message: message.into(),
        });
    }

    /// All collected diagnostics, in the order they were recorded.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Only the warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
