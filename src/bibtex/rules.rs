//! Attribute rules: what is kept, for which categories, and how month
//! names are corrected.
//!
//! All tables live in one immutable [`RuleSet`] value constructed once and
//! passed explicitly into the normalizer.

use std::collections::HashMap;

use crate::{Attribute, Category};

/// Attributes silently discarded regardless of category.
const DROP_ALWAYS: [&str; 13] = [
    "location",
    "address",
    "organization",
    "ee",
    "doi",
    "crossref",
    "bibsource",
    "isbn",
    "issn",
    "acmid",
    "numpages",
    "issue_date",
    "keywords",
];

/// Categories for which a `publisher` field is meaningful.
const PUBLISHER_CATEGORIES: [Category; 3] =
    [Category::Book, Category::Inbook, Category::Incollection];

/// Known month misspellings, keyed on the first three characters of the
/// raw value.
const MONTH_CORRECTIONS: [(&str, &str); 4] =
    [("Jnu", "Jun"), ("Agu", "Aug"), ("Spe", "Sep"), ("Otc", "Oct")];

/// The static rule configuration driving normalization.
#[derive(Debug, Clone)]
pub struct RuleSet {
    order: &'static [Attribute],
    restrictions: HashMap<Attribute, &'static [Category]>,
    month_corrections: HashMap<&'static str, &'static str>,
}

impl Default for RuleSet {
    fn default() -> Self {
        let mut restrictions: HashMap<Attribute, &'static [Category]> = HashMap::new();
        restrictions.insert(Attribute::Publisher, &PUBLISHER_CATEGORIES);
        Self {
            order: &Attribute::ALL,
            restrictions,
            month_corrections: MONTH_CORRECTIONS.into_iter().collect(),
        }
    }
}

impl RuleSet {
    /// The canonical attribute serialization order.
    pub fn order(&self) -> &[Attribute] {
        self.order
    }

    /// Whether `name` is on the drop-always list.
    pub fn is_dropped(&self, name: &str) -> bool {
        DROP_ALWAYS.contains(&name)
    }

    /// Whether `attribute` is allowed for entries of `category`.
    pub fn allowed_for(&self, attribute: Attribute, category: Category) -> bool {
        match self.restrictions.get(&attribute) {
            Some(categories) => categories.contains(&category),
            None => true,
        }
    }

    /// Correct a known month misspelling, passing unknown prefixes through.
    pub fn correct_month<'a>(&self, prefix: &'a str) -> &'a str {
        self.month_corrections
            .get(prefix)
            .copied()
            .unwrap_or(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_drop_list() {
        let rules = RuleSet::default();
        assert!(rules.is_dropped("address"));
        assert!(rules.is_dropped("doi"));
        assert!(!rules.is_dropped("author"));
        // Drop-list names are matched after lower-casing, so the table
        // itself only holds lowercase names.
        assert!(!rules.is_dropped("ADDRESS"));
    }

    #[rstest]
    #[case(Category::Book, true)]
    #[case(Category::Inbook, true)]
    #[case(Category::Incollection, true)]
    #[case(Category::Article, false)]
    #[case(Category::Misc, false)]
    fn test_publisher_restriction(#[case] category: Category, #[case] allowed: bool) {
        let rules = RuleSet::default();
        assert_eq!(rules.allowed_for(Attribute::Publisher, category), allowed);
    }

    #[test]
    fn test_unrestricted_attributes() {
        let rules = RuleSet::default();
        for category in [Category::Article, Category::Misc, Category::Phdthesis] {
            assert!(rules.allowed_for(Attribute::Url, category));
            assert!(rules.allowed_for(Attribute::Title, category));
        }
    }

    #[rstest]
    #[case("Jnu", "Jun")]
    #[case("Agu", "Aug")]
    #[case("Jun", "Jun")]
    #[case("Xyz", "Xyz")]
    fn test_month_correction(#[case] prefix: &str, #[case] expected: &str) {
        let rules = RuleSet::default();
        assert_eq!(rules.correct_month(prefix), expected);
    }

    #[test]
    fn test_order_matches_vocabulary() {
        let rules = RuleSet::default();
        assert_eq!(rules.order(), &Attribute::ALL);
        assert_eq!(rules.order().first(), Some(&Attribute::Author));
        assert_eq!(rules.order().last(), Some(&Attribute::Url));
    }
}
