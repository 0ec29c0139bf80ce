//! Inline tokenizer.
//!
//! A run of block text is rewritten into [`InlineToken`]s by five passes,
//! applied in this order and each touching only tokens still marked
//! [`TextKind::Text`]:
//!
//! 1. bold, delimited by `**`
//! 2. italic, delimited by `_`
//! 3. code, delimited by `` ` ``
//! 4. images, `![alt](url)`
//! 5. links, `[text](url)` not preceded by `!`
//!
//! Before the first pass the url portion of every well-formed image and link
//! in the whole text is located. Delimiters inside those spans are neither
//! counted nor split on, so urls such as `https://a.com/some_file` survive
//! the italic pass intact.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::{InlineToken, TextKind};
use crate::error::ParseError;

/// Non-empty, no whitespace, and at most one level of `( )` groups.
const URL_PATTERN: &str = r"[^()\s]+(?:\([^()\s]*\)[^()\s]*)*";

static IMAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^!\[([^\[\]]*)\]\(({URL_PATTERN})\)")).unwrap());

static LINK_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\[([^\[\]]*)\]\(({URL_PATTERN})\)")).unwrap());

const SNIPPET_CHARS: usize = 24;

/// Delimiter passes, in the order they run.
const DELIMITER_PASSES: [(&str, TextKind); 3] = [
    ("**", TextKind::Bold),
    ("_", TextKind::Italic),
    ("`", TextKind::Code),
];

/// Tokenize a run of inline markdown.
pub fn text_to_tokens(text: &str) -> Result<Vec<InlineToken>, ParseError> {
    let protected = protected_spans(text);

    let mut pieces = vec![Piece {
        kind: TextKind::Text,
        range: 0..text.len(),
    }];
    for (delimiter, kind) in DELIMITER_PASSES {
        pieces = split_delimiter(text, &pieces, &protected, delimiter, kind)?;
    }

    let tokens: Vec<InlineToken> = pieces
        .into_iter()
        .map(|piece| InlineToken::new(&text[piece.range], piece.kind))
        .collect();
    let tokens = split_references(tokens, Reference::Image)?;
    split_references(tokens, Reference::Link)
}

/// `(alt, url)` for every well-formed image in `text`.
pub fn extract_images(text: &str) -> Vec<(&str, &str)> {
    find_references(text, Reference::Image)
        .into_iter()
        .map(|m| (m.label, m.url))
        .collect()
}

/// `(text, url)` for every well-formed link in `text`. Images are not links.
pub fn extract_links(text: &str) -> Vec<(&str, &str)> {
    find_references(text, Reference::Link)
        .into_iter()
        .map(|m| (m.label, m.url))
        .collect()
}

/// A slice of the source text tagged with the kind it was split into.
#[derive(Debug, Clone)]
struct Piece {
    kind: TextKind,
    range: Range<usize>,
}

fn protected_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = find_references(text, Reference::Image)
        .into_iter()
        .chain(find_references(text, Reference::Link))
        .map(|m| m.url_span)
        .collect();
    spans.sort_by_key(|span| span.start);
    spans
}

fn is_protected(at: Range<usize>, protected: &[Range<usize>]) -> bool {
    protected
        .iter()
        .any(|span| at.start < span.end && span.start < at.end)
}

fn split_delimiter(
    source: &str,
    pieces: &[Piece],
    protected: &[Range<usize>],
    delimiter: &str,
    kind: TextKind,
) -> Result<Vec<Piece>, ParseError> {
    let mut out = Vec::with_capacity(pieces.len());

    for piece in pieces {
        if piece.kind != TextKind::Text {
            out.push(piece.clone());
            continue;
        }

        let start = piece.range.start;
        let occurrences: Vec<usize> = source[piece.range.clone()]
            .match_indices(delimiter)
            .map(|(offset, _)| start + offset)
            .filter(|&at| !is_protected(at..at + delimiter.len(), protected))
            .collect();

        if occurrences.len() % 2 != 0 {
            return Err(ParseError::UnbalancedDelimiter(delimiter.to_string()));
        }

        let mut cursor = start;
        let mut inside = false;
        for at in occurrences {
            // Typed segments survive even when empty, plain ones do not.
            if inside || at > cursor {
                out.push(Piece {
                    kind: if inside { kind } else { TextKind::Text },
                    range: cursor..at,
                });
            }
            inside = !inside;
            cursor = at + delimiter.len();
        }
        if cursor < piece.range.end {
            out.push(Piece {
                kind: TextKind::Text,
                range: cursor..piece.range.end,
            });
        }
    }

    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reference {
    Image,
    Link,
}

/// A well-formed image or link found in a text run.
#[derive(Debug)]
struct ReferenceMatch<'a> {
    span: Range<usize>,
    url_span: Range<usize>,
    label: &'a str,
    url: &'a str,
}

impl Reference {
    fn pattern(self) -> &'static Regex {
        match self {
            Reference::Image => &*IMAGE_TOKEN,
            Reference::Link => &*LINK_TOKEN,
        }
    }

    /// Position of the next opening marker at or after `from`.
    fn next_opener(self, text: &str, from: usize) -> Option<usize> {
        match self {
            Reference::Image => text[from..].find("![").map(|offset| from + offset),
            Reference::Link => {
                let mut from = from;
                loop {
                    let at = from + text[from..].find('[')?;
                    if at == 0 || text.as_bytes()[at - 1] != b'!' {
                        return Some(at);
                    }
                    from = at + 1;
                }
            }
        }
    }

    fn token(self, label: &str, url: &str) -> InlineToken {
        match self {
            Reference::Image => InlineToken::image(label, url),
            Reference::Link => InlineToken::link(label, url),
        }
    }

    fn invalid(self, snippet: String) -> ParseError {
        match self {
            Reference::Image => ParseError::InvalidImageMarkdown(snippet),
            Reference::Link => ParseError::InvalidLinkMarkdown(snippet),
        }
    }
}

/// Left-to-right, non-overlapping scan for well-formed references.
fn find_references(text: &str, reference: Reference) -> Vec<ReferenceMatch<'_>> {
    let mut found = Vec::new();
    let mut from = 0;

    while let Some(start) = reference.next_opener(text, from) {
        let Some(caps) = reference.pattern().captures(&text[start..]) else {
            // Openers are ASCII, so this stays on a char boundary.
            from = start + 1;
            continue;
        };
        let (Some(whole), Some(label), Some(url)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            from = start + 1;
            continue;
        };
        found.push(ReferenceMatch {
            span: start..start + whole.end(),
            url_span: start + url.start()..start + url.end(),
            label: label.as_str(),
            url: url.as_str(),
        });
        from = start + whole.end();
    }

    found
}

/// Every opener in `text` must sit inside one of `found`.
fn check_openers(
    text: &str,
    reference: Reference,
    found: &[ReferenceMatch<'_>],
) -> Result<(), ParseError> {
    let mut from = 0;
    while let Some(opener) = reference.next_opener(text, from) {
        if !found
            .iter()
            .any(|m| m.span.start <= opener && opener < m.span.end)
        {
            let snippet = text[opener..].chars().take(SNIPPET_CHARS).collect();
            return Err(reference.invalid(snippet));
        }
        from = opener + 1;
    }
    Ok(())
}

fn split_references(
    tokens: Vec<InlineToken>,
    reference: Reference,
) -> Result<Vec<InlineToken>, ParseError> {
    let mut out = Vec::with_capacity(tokens.len());

    for token in tokens {
        if token.kind() != TextKind::Text {
            out.push(token);
            continue;
        }

        let text = token.as_str();
        let found = find_references(text, reference);
        check_openers(text, reference, &found)?;
        if found.is_empty() {
            out.push(token);
            continue;
        }

        let mut cursor = 0;
        for m in &found {
            if m.span.start > cursor {
                out.push(InlineToken::text(&text[cursor..m.span.start]));
            }
            out.push(reference.token(m.label, m.url));
            cursor = m.span.end;
        }
        if cursor < text.len() {
            out.push(InlineToken::text(&text[cursor..]));
        }
    }

    Ok(out)
}
