//! Splitting one entry span into its anchor and raw attribute segments.

use crate::{BibError, Report, Result};

/// Check the basic shape of an entry span and strip the outer
/// `@category{ ... }` wrapper, returning the raw category name and the
/// inner content.
pub(crate) fn split_wrapper(span: &str) -> Result<(&str, &str)> {
    if !span.starts_with('@') {
        return Err(BibError::MalformedEntry(
            "span does not start with '@'".to_string(),
        ));
    }
    let Some(open) = span.find('{') else {
        return Err(BibError::MalformedEntry(
            "span has no opening brace".to_string(),
        ));
    };
    if !span.ends_with('}') {
        return Err(BibError::MalformedEntry(
            "span does not end with '}'".to_string(),
        ));
    }
    if span.matches('{').count() != span.matches('}').count() {
        return Err(BibError::MalformedEntry(
            "unequal brace counts in span".to_string(),
        ));
    }
    let category = span[1..open].trim();
    let inner = &span[open + 1..span.len() - 1];
    Ok((category, inner))
}

/// Split the inner content of an entry on commas, returning the anchor and
/// the raw `name = value` segments.
///
/// A comma only separates segments when, over the text accumulated since
/// the previous separator, braces are balanced and the number of unescaped
/// quotes is even. A quote preceded by a backslash does not count toward
/// parity. A non-empty tail that never reaches balance is dropped with a
/// warning.
pub(crate) fn split_assignments<'a>(inner: &'a str, report: &mut Report) -> (&'a str, Vec<&'a str>) {
    let mut segments: Vec<&'a str> = Vec::new();
    let mut depth = 0i32;
    let mut quotes_even = true;
    let mut escaped = false;
    let mut seg_start = 0usize;

    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            '"' if !escaped => quotes_even = !quotes_even,
            ',' if depth == 0 && quotes_even => {
                segments.push(&inner[seg_start..i]);
                seg_start = i + 1;
            }
            _ => {}
        }
        escaped = c == '\\';
    }

    let tail = &inner[seg_start..];
    if depth == 0 && quotes_even {
        segments.push(tail);
    } else if !tail.trim().is_empty() {
        report.warn(None, "unbalanced braces or quotes, segment dropped");
    }

    match segments.split_first() {
        Some((anchor, assignments)) => (anchor.trim(), assignments.to_vec()),
        None => ("", Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_split_wrapper() {
        let (category, inner) = split_wrapper("@article{x, year = 1993}").unwrap();
        assert_eq!(category, "article");
        assert_eq!(inner, "x, year = 1993");
    }

    #[test]
    fn test_split_wrapper_trims_category() {
        let (category, _) = split_wrapper("@ARTICLE {x}").unwrap();
        assert_eq!(category, "ARTICLE");
    }

    #[rstest]
    #[case("article{x}", "span does not start with '@'")]
    #[case("@article x", "span has no opening brace")]
    #[case("@article{x, year = 1993", "span does not end with '}'")]
    #[case("@article{x, title = {a}, year = {{1993}}", "unequal brace counts in span")]
    fn test_split_wrapper_shape_errors(#[case] span: &str, #[case] message: &str) {
        let err = split_wrapper(span).unwrap_err();
        assert_eq!(err.to_string(), format!("malformed entry: {message}"));
    }

    #[test]
    fn test_split_wrapper_brace_count_error() {
        let err = split_wrapper("@article{x, title = {a}").unwrap_err();
        assert!(matches!(err, BibError::MalformedEntry(_)));
    }

    fn assignments<'a>(inner: &'a str) -> (&'a str, Vec<&'a str>) {
        split_assignments(inner, &mut Report::new())
    }

    #[test]
    fn test_anchor_only() {
        let (anchor, rest) = assignments("greenwade93");
        assert_eq!(anchor, "greenwade93");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_plain_split() {
        let (anchor, rest) = assignments("x, author = {Knuth}, year = 1973");
        assert_eq!(anchor, "x");
        assert_eq!(rest, vec![" author = {Knuth}", " year = 1973"]);
    }

    #[test]
    fn test_commas_inside_braces_do_not_split() {
        let (_, rest) = assignments("x, author = {Knuth, Donald E.}, year = 1973");
        assert_eq!(rest, vec![" author = {Knuth, Donald E.}", " year = 1973"]);
    }

    #[test]
    fn test_commas_inside_quotes_do_not_split() {
        let (_, rest) = assignments(r#"x, author = "Knuth, Donald E.", year = 1973"#);
        assert_eq!(rest, vec![r#" author = "Knuth, Donald E.""#, " year = 1973"]);
    }

    #[test]
    fn test_escaped_quote_does_not_flip_parity() {
        let (_, rest) = assignments(r#"x, title = "a \"quoted\" word, kept whole", year = 1"#);
        assert_eq!(
            rest,
            vec![r#" title = "a \"quoted\" word, kept whole""#, " year = 1"]
        );
    }

    #[test]
    fn test_braces_inside_quotes_still_count() {
        // Brace depth and quote parity are tracked independently; both must
        // be balanced at a separator.
        let (_, rest) = assignments(r#"x, title = "brace {pair, inside}", year = 1"#);
        assert_eq!(
            rest,
            vec![r#" title = "brace {pair, inside}""#, " year = 1"]
        );
    }

    #[test]
    fn test_trailing_comma_yields_empty_segment() {
        let (_, rest) = assignments("x, year = 1973,");
        assert_eq!(rest, vec![" year = 1973", ""]);
    }

    #[test]
    fn test_unbalanced_tail_is_dropped_with_warning() {
        let mut report = Report::new();
        let (anchor, rest) = split_assignments("x, title = {open, year = 1", &mut report);
        assert_eq!(anchor, "x");
        assert!(rest.is_empty());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_empty_inner() {
        let (anchor, rest) = assignments("");
        assert_eq!(anchor, "");
        assert!(rest.is_empty());
    }
}
