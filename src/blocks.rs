use once_cell::sync::Lazy;
use regex::Regex;

use crate::block::BlockType;

/// One or more blank (or whitespace-only) lines.
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").unwrap());

const CODE_FENCE: &str = "```";

/// A classified block, carrying whatever the rule matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape<'a> {
    Heading { level: usize, text: &'a str },
    Code { body: &'a str },
    Quote,
    UnorderedList,
    OrderedList,
    Paragraph,
}

impl Shape<'_> {
    pub(crate) fn block_type(&self) -> BlockType {
        match self {
            Shape::Heading { .. } => BlockType::Heading,
            Shape::Code { .. } => BlockType::Code,
            Shape::Quote => BlockType::Quote,
            Shape::UnorderedList => BlockType::UnorderedList,
            Shape::OrderedList => BlockType::OrderedList,
            Shape::Paragraph => BlockType::Paragraph,
        }
    }
}

type Rule = for<'a> fn(&'a str) -> Option<Shape<'a>>;

/// Classification rules, tried top to bottom. The first match wins and
/// anything left over is a paragraph.
const RULES: &[Rule] = &[heading, code, quote, unordered_list, ordered_list];

/// Split a document into trimmed, non-empty blocks in document order.
pub fn segment(document: &str) -> Vec<&str> {
    BLANK_LINES
        .split(document)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Structural type of a single block.
pub fn classify(block: &str) -> BlockType {
    shape(block).block_type()
}

pub(crate) fn shape(block: &str) -> Shape<'_> {
    RULES
        .iter()
        .find_map(|rule| rule(block))
        .unwrap_or(Shape::Paragraph)
}

/// 1 to 6 leading `#`, then a space.
fn heading(block: &str) -> Option<Shape<'_>> {
    let level = block.bytes().take_while(|&b| b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let text = block[level..].strip_prefix(' ')?;
    Some(Shape::Heading {
        level,
        text: text.trim_start_matches(' '),
    })
}

/// Body of a fenced code block, without the fence lines.
fn code(block: &str) -> Option<Shape<'_>> {
    let open = format!("{CODE_FENCE}\n");
    let close = format!("\n{CODE_FENCE}");
    if block.len() < open.len() + close.len() {
        return None;
    }
    let body = block
        .strip_prefix(open.as_str())
        .and_then(|rest| rest.strip_suffix(close.as_str()))?;
    Some(Shape::Code { body })
}

fn every_line(block: &str, shape: Shape<'static>, prefix: &str) -> Option<Shape<'static>> {
    block
        .lines()
        .all(|line| line.starts_with(prefix))
        .then_some(shape)
}

fn quote(block: &str) -> Option<Shape<'_>> {
    every_line(block, Shape::Quote, "> ")
}

fn unordered_list(block: &str) -> Option<Shape<'_>> {
    every_line(block, Shape::UnorderedList, "- ")
}

fn ordered_list(block: &str) -> Option<Shape<'_>> {
    block
        .lines()
        .enumerate()
        .all(|(i, line)| line.starts_with(&format!("{}. ", i + 1)))
        .then_some(Shape::OrderedList)
}
