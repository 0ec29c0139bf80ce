use crate::block::{InlineToken, TextKind};
use crate::blocks::{Shape, segment, shape};
use crate::error::ParseError;
use crate::html::{HtmlNode, LeafNode, ParentNode};
use crate::inline::text_to_tokens;

/// Parse a markdown document into a `div` holding one node per block.
pub fn parse(markdown: &str) -> Result<HtmlNode, ParseError> {
    let children = segment(markdown)
        .into_iter()
        .map(block_to_node)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParentNode::new("div", children).into())
}

/// Map one inline token to its leaf element.
pub fn token_to_leaf(token: &InlineToken) -> LeafNode {
    let text = token.as_str();
    let url = token.url().unwrap_or_default();

    match token.kind() {
        TextKind::Text => LeafNode::raw(text),
        TextKind::Bold => LeafNode::new(Some("b"), text),
        TextKind::Italic => LeafNode::new(Some("i"), text),
        TextKind::Code => LeafNode::new(Some("code"), text),
        TextKind::Link => LeafNode::new(Some("a"), text).with_attribute("href", url),
        TextKind::Image => LeafNode::new(Some("img"), "")
            .with_attribute("src", url)
            .with_attribute("alt", text),
    }
}

fn block_to_node(block: &str) -> Result<HtmlNode, ParseError> {
    let node = match shape(block) {
        Shape::Heading { level, text } => {
            ParentNode::new(&format!("h{level}"), text_to_children(text)?)
        }
        Shape::Code { body } => code_to_node(body),
        Shape::Quote => quote_to_node(block)?,
        Shape::UnorderedList => list_to_node("ul", block.lines().map(strip_bullet))?,
        Shape::OrderedList => list_to_node("ol", block.lines().map(strip_number))?,
        Shape::Paragraph => {
            let text = block.lines().collect::<Vec<_>>().join(" ");
            ParentNode::new("p", text_to_children(&text)?)
        }
    };
    Ok(node.into())
}

fn text_to_children(text: &str) -> Result<Vec<HtmlNode>, ParseError> {
    Ok(text_to_tokens(text)?
        .iter()
        .map(|token| token_to_leaf(token).into())
        .collect())
}

fn code_to_node(body: &str) -> ParentNode {
    let code = token_to_leaf(&InlineToken::new(body, TextKind::Code));
    ParentNode::new("pre", vec![code.into()])
}

fn quote_to_node(block: &str) -> Result<ParentNode, ParseError> {
    let text = block
        .lines()
        .map(|line| line.strip_prefix("> ").unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n");
    let paragraph = ParentNode::new("p", text_to_children(&text)?);
    Ok(ParentNode::new("blockquote", vec![paragraph.into()]))
}

fn list_to_node<'a>(
    tag: &str,
    items: impl Iterator<Item = &'a str>,
) -> Result<ParentNode, ParseError> {
    let items = items
        .map(|item| -> Result<HtmlNode, ParseError> {
            Ok(ParentNode::new("li", text_to_children(item)?).into())
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParentNode::new(tag, items))
}

fn strip_bullet(line: &str) -> &str {
    line.strip_prefix("- ").unwrap_or(line)
}

fn strip_number(line: &str) -> &str {
    line.split_once(". ").map_or(line, |(_, rest)| rest)
}
