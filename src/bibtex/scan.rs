//! Splitting a bibliography blob into top-level entry spans.

use crate::{BibError, Result};

/// An [Iterator] over the top-level `@category{...}` spans of a
/// bibliography, in source order.
///
/// The scanner walks the text once with a signed brace-depth counter. An
/// `@` seen at depth zero marks a pending entry start; the `}` that brings
/// the depth back to zero closes the span, which is yielded inclusively.
/// Text outside any span (prose between entries) is skipped.
///
/// An `@` at non-zero depth means an entry opened inside another one, and
/// the scan fails immediately. After the first error the iterator is
/// exhausted; no further spans are produced.
pub struct EntrySpans<'a> {
    text: &'a str,
    chars: std::str::CharIndices<'a>,
    depth: i32,
    start: Option<usize>,
    failed: bool,
}

impl<'a> EntrySpans<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            depth: 0,
            start: None,
            failed: false,
        }
    }

    fn fail(&mut self, message: &str, offset: usize) -> Option<Result<&'a str>> {
        self.failed = true;
        Some(Err(BibError::Structure {
            message: message.to_string(),
            offset,
        }))
    }
}

impl<'a> Iterator for EntrySpans<'a> {
    type Item = Result<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some((i, c)) = self.chars.next() {
            match c {
                '@' => {
                    if self.depth != 0 {
                        return self.fail("entry starts inside an unclosed entry", i);
                    }
                    self.start = Some(i);
                }
                '{' => self.depth += 1,
                '}' => {
                    self.depth -= 1;
                    if self.depth < 0 {
                        return self.fail("unmatched closing brace", i);
                    }
                    if self.depth == 0 {
                        if let Some(start) = self.start.take() {
                            return Some(Ok(&self.text[start..=i]));
                        }
                    }
                }
                _ => {}
            }
        }
        if self.depth != 0 || self.start.is_some() {
            return self.fail("unterminated entry at end of input", self.text.len());
        }
        None
    }
}
