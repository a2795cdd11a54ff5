//! BibTeX normalization pipeline.
//!
//! Ties together the entry scanner, the attribute splitter, the
//! normalization passes, and the canonical serializer.
//!
//! # Example
//!
//! ```
//! use bibnorm::{Normalizer, Report};
//!
//! let input = "@book{knuth73, title = {The Art of Computer Programming}, year = 1973}";
//! let mut report = Report::new();
//! let entries = Normalizer::new().normalize(input, &mut report).unwrap();
//! assert_eq!(entries[0].title(), Some("The Art of Computer Programming"));
//! ```

mod normalize;
mod render;
mod rules;
mod scan;
mod split;

pub use rules::RuleSet;
pub use scan::EntrySpans;

use crate::clock::{Clock, SystemClock};
use crate::{Category, Entry, EntryOutcome, Report, Result};

/// Normalizer for BibTeX bibliographies.
///
/// Holds the rule configuration, the rendering options, and the clock used
/// for "accessed" stamps. Processing is strictly sequential and in source
/// order; the whole input is scanned from one in-memory string.
pub struct Normalizer {
    rules: RuleSet,
    shorten_months: bool,
    clock: Box<dyn Clock>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Creates a normalizer with the default rule set, full month names,
    /// and the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::default(),
            shorten_months: false,
            clock: Box::new(SystemClock),
        }
    }

    /// Render months as three-letter abbreviations instead of full names.
    #[must_use]
    pub fn with_short_months(mut self, shorten: bool) -> Self {
        self.shorten_months = shorten;
        self
    }

    /// Replace the clock used for "accessed" stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// The rule set driving this normalizer.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Normalize a whole bibliography, returning its entries in source
    /// order.
    ///
    /// Spans whose category is outside the closed set are skipped as
    /// comments (with an informational diagnostic). Structural errors and
    /// unparseable month values abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BibError`] if the input is structurally corrupt or
    /// an entry is malformed.
    pub fn normalize(&self, input: &str, report: &mut Report) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        for span in EntrySpans::new(input) {
            match self.normalize_entry(span?, report)? {
                EntryOutcome::Entry(entry) => entries.push(entry),
                EntryOutcome::Comment => {}
            }
        }
        Ok(entries)
    }

    /// Normalize one raw entry span.
    pub fn normalize_entry(&self, span: &str, report: &mut Report) -> Result<EntryOutcome> {
        let span = span.trim();
        let (category_raw, inner) = split::split_wrapper(span)?;
        let Some(category) = Category::from_name(category_raw) else {
            report.info(None, format!("dropping comment: {span}"));
            return Ok(EntryOutcome::Comment);
        };
        let (anchor, assignments) = split::split_assignments(inner, report);
        let entry = normalize::normalize_attributes(
            &self.rules,
            category,
            anchor,
            &assignments,
            self.shorten_months,
            self.clock.as_ref(),
            report,
        )?;
        Ok(EntryOutcome::Entry(entry))
    }

    /// Render one entry in canonical form.
    #[must_use]
    pub fn render(&self, entry: &Entry) -> String {
        render::render_entry(&self.rules, entry)
    }

    /// Render a sequence of entries, blank-line separated.
    #[must_use]
    pub fn render_all(&self, entries: &[Entry]) -> String {
        render::render_all(&self.rules, entries)
    }
}
