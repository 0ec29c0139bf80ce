mod block;
mod blocks;
mod config;
mod error;
mod html;
mod inline;
mod parser;
pub mod site;

pub use block::{BlockType, InlineToken, TextKind};
pub use blocks::{classify, segment};
pub use config::{Config, ConfigError};
pub use error::{Error, ParseError, RenderError};
pub use html::{Attributes, HtmlNode, LeafNode, ParentNode, render_attributes};
pub use inline::{extract_images, extract_links, text_to_tokens};
pub use parser::token_to_leaf;

/// Parse markdown text into a `div` node tree.
pub fn parse(markdown: &str) -> Result<HtmlNode, ParseError> {
    parser::parse(markdown)
}

/// Convert markdown to an HTML string.
pub fn markdown_to_html(markdown: &str) -> Result<String, Error> {
    let root = parse(markdown)?;
    Ok(root.render()?)
}
