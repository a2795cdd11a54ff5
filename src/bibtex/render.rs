//! Canonical serialization of normalized entries.

use itertools::Itertools;

use crate::Entry;

use super::rules::RuleSet;

/// Render one entry in canonical multi-line form.
///
/// Attributes are emitted strictly in the rule set's canonical order,
/// independent of input order, one per line with the name padded to a
/// fixed column.
pub(crate) fn render_entry(rules: &RuleSet, entry: &Entry) -> String {
    let mut lines = Vec::new();
    lines.push(format!("@{}{{{},", entry.category, entry.anchor));
    for attribute in rules.order() {
        if let Some(value) = entry.get(*attribute) {
            lines.push(format!("    {:<10} = {{{value}}},", attribute.as_str()));
        }
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Render a sequence of entries, blank-line separated, with a trailing
/// newline.
pub(crate) fn render_all(rules: &RuleSet, entries: &[Entry]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let mut text = entries
        .iter()
        .map(|entry| render_entry(rules, entry))
        .join("\n\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attribute, Category};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn entry(category: Category, anchor: &str, attrs: &[(Attribute, &str)]) -> Entry {
        let attributes: HashMap<Attribute, String> = attrs
            .iter()
            .map(|(attr, value)| (*attr, value.to_string()))
            .collect();
        Entry::new(category, anchor.to_string(), attributes)
    }

    #[test]
    fn test_render_entry_canonical_order() {
        let entry = entry(
            Category::Article,
            "greenwade93",
            &[
                (Attribute::Year, "1993"),
                (Attribute::Author, "George D. Greenwade"),
                (Attribute::Pages, "342--351"),
                (Attribute::Title, "CTAN"),
            ],
        );
        let expected = "\
@article{greenwade93,
    author     = {George D. Greenwade},
    title      = {CTAN},
    year       = {1993},
    pages      = {342--351},
}";
        assert_eq!(render_entry(&RuleSet::default(), &entry), expected);
    }

    #[test]
    fn test_long_attribute_names_are_not_truncated() {
        let entry = entry(
            Category::Misc,
            "x",
            &[
                (Attribute::Title, "T"),
                (Attribute::Howpublished, "preprint"),
            ],
        );
        let rendered = render_entry(&RuleSet::default(), &entry);
        assert!(rendered.contains("    howpublished = {preprint},"));
    }

    #[test]
    fn test_render_all_blank_line_separated() {
        let rules = RuleSet::default();
        let a = entry(Category::Misc, "a", &[(Attribute::Title, "A")]);
        let b = entry(Category::Misc, "b", &[(Attribute::Title, "B")]);
        let text = render_all(&rules, &[a, b]);
        assert_eq!(
            text,
            "@misc{a,\n    title      = {A},\n}\n\n@misc{b,\n    title      = {B},\n}\n"
        );
    }
}
