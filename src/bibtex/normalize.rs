//! Per-entry attribute normalization.
//!
//! Raw `name = value` segments are filtered against the rule tables,
//! unwrapped, whitespace-collapsed and case-corrected, then run through the
//! field-specific corrections (title fallback, URL notes, page ranges,
//! month names, integer checks). The mutable [`AttributeSet`] builder only
//! exists inside this pipeline; it finishes into an immutable [`Entry`].

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Month;
use itertools::Itertools;
use regex::Regex;

use crate::clock::Clock;
use crate::{Attribute, BibError, Category, Entry, Report, Result};

use super::rules::RuleSet;

static PAGE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*-+\s*(\d+)$").unwrap());

/// Mutable attribute mapping used while an entry is being normalized.
#[derive(Debug, Default)]
struct AttributeSet {
    values: HashMap<Attribute, String>,
}

impl AttributeSet {
    fn insert(&mut self, attribute: Attribute, value: String) {
        self.values.insert(attribute, value);
    }

    fn get(&self, attribute: Attribute) -> Option<&str> {
        self.values.get(&attribute).map(String::as_str)
    }

    fn contains(&self, attribute: Attribute) -> bool {
        self.values.contains_key(&attribute)
    }

    fn remove(&mut self, attribute: Attribute) -> Option<String> {
        self.values.remove(&attribute)
    }

    fn finish(self, category: Category, anchor: String) -> Entry {
        Entry::new(category, anchor, self.values)
    }
}

/// Normalize the raw attribute segments of one entry.
pub(crate) fn normalize_attributes(
    rules: &RuleSet,
    category: Category,
    anchor: &str,
    segments: &[&str],
    shorten_months: bool,
    clock: &dyn Clock,
    report: &mut Report,
) -> Result<Entry> {
    let mut set = AttributeSet::default();

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((name_raw, value_raw)) = segment.split_once('=') else {
            report.info(Some(anchor), format!("dropping unknown attribute: {segment}"));
            continue;
        };
        let name = name_raw.trim().to_ascii_lowercase();
        if rules.is_dropped(&name) {
            continue;
        }
        let Some(attribute) = Attribute::from_name(&name) else {
            report.info(Some(anchor), format!("dropping unknown attribute: {segment}"));
            continue;
        };
        if !rules.allowed_for(attribute, category) {
            continue;
        }

        let value = collapse_whitespace(unwrap_value(value_raw.trim()));
        if value.is_empty() {
            report.info(Some(anchor), format!("dropping empty value for \"{name}\""));
            continue;
        }
        let value = if is_all_caps(&value) && value.split_whitespace().count() > 2 {
            let corrected = capwords(&value);
            report.warn(
                Some(anchor),
                format!("all-caps value converted to title case: {corrected}"),
            );
            corrected
        } else {
            value
        };
        // Last assignment wins when a name repeats.
        set.insert(attribute, value);
    }

    correct_title(category, anchor, &mut set, report);
    correct_note(anchor, clock, &mut set, report);
    correct_pages(anchor, &mut set, report);
    correct_month(rules, anchor, shorten_months, &mut set)?;
    check_integer_fields(anchor, &set, report);

    Ok(set.finish(category, anchor.to_string()))
}

/// Strip a `"..."` or `{...}` wrapper from a value.
///
/// Only the first character is inspected to decide whether both ends are
/// stripped; trailing characters are not checked. Some values (notably
/// bare years) carry no wrapper at all and pass through unchanged.
fn unwrap_value(value: &str) -> &str {
    if value.starts_with('"') || value.starts_with('{') {
        let mut chars = value.chars();
        chars.next();
        chars.next_back();
        chars.as_str()
    } else {
        value
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().join(" ")
}

fn is_all_caps(value: &str) -> bool {
    value.chars().any(char::is_uppercase) && !value.chars().any(char::is_lowercase)
}

/// Capitalize the first letter of every word, lower-casing the rest.
fn capwords(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .join(" ")
}

fn correct_title(category: Category, anchor: &str, set: &mut AttributeSet, report: &mut Report) {
    if set.contains(Attribute::Title) {
        return;
    }
    if category == Category::Misc {
        if let Some(note) = set.remove(Attribute::Note) {
            set.insert(Attribute::Title, note);
            return;
        }
    }
    report.warn(Some(anchor), "entry has no title");
}

fn correct_note(anchor: &str, clock: &dyn Clock, set: &mut AttributeSet, report: &mut Report) {
    if !set.contains(Attribute::Url) && !set.contains(Attribute::Howpublished) {
        return;
    }
    if set.contains(Attribute::Note) {
        report.warn(Some(anchor), "entry has \"note\", replacing it with url");
    }
    let moved = set
        .remove(Attribute::Url)
        .or_else(|| set.remove(Attribute::Howpublished));
    if let Some(value) = moved {
        let (month, year) = clock.month_year();
        set.insert(
            Attribute::Note,
            format!("\\url{{{value}}}, accessed {} {year}", month.name()),
        );
    }
}

fn correct_pages(anchor: &str, set: &mut AttributeSet, report: &mut Report) {
    let Some(pages) = set.get(Attribute::Pages).map(str::to_string) else {
        return;
    };
    if pages.parse::<u64>().is_ok() {
        return;
    }
    if let Some(caps) = PAGE_RANGE.captures(&pages) {
        set.insert(Attribute::Pages, format!("{}--{}", &caps[1], &caps[2]));
    } else {
        report.warn(
            Some(anchor),
            format!("format error in \"pages\" for entry {anchor}"),
        );
    }
}

fn correct_month(
    rules: &RuleSet,
    anchor: &str,
    shorten_months: bool,
    set: &mut AttributeSet,
) -> Result<()> {
    let Some(raw) = set.get(Attribute::Month).map(str::to_string) else {
        return Ok(());
    };
    let prefix: String = raw.chars().take(3).collect();
    let Some(month) = parse_month_abbr(rules.correct_month(&prefix)) else {
        return Err(BibError::InvalidFieldValue {
            field: "month".to_string(),
            message: format!("cannot parse {raw:?} in entry {anchor}"),
        });
    };
    let name = month.name();
    let rendered = if shorten_months {
        name[..3].to_string()
    } else {
        name.to_string()
    };
    set.insert(Attribute::Month, rendered);
    Ok(())
}

fn parse_month_abbr(abbr: &str) -> Option<Month> {
    match abbr.to_ascii_lowercase().as_str() {
        "jan" => Some(Month::January),
        "feb" => Some(Month::February),
        "mar" => Some(Month::March),
        "apr" => Some(Month::April),
        "may" => Some(Month::May),
        "jun" => Some(Month::June),
        "jul" => Some(Month::July),
        "aug" => Some(Month::August),
        "sep" => Some(Month::September),
        "oct" => Some(Month::October),
        "nov" => Some(Month::November),
        "dec" => Some(Month::December),
        _ => None,
    }
}

fn check_integer_fields(anchor: &str, set: &AttributeSet, report: &mut Report) {
    for attribute in [Attribute::Number, Attribute::Volume, Attribute::Edition] {
        if let Some(value) = set.get(attribute) {
            if value.parse::<i64>().is_err() {
                report.warn(
                    Some(anchor),
                    format!("format error in \"{attribute}\" for entry {anchor}"),
                );
            }
        }
    }
}
