use thiserror::Error;

/// Failures raised while turning markdown text into an HTML node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unbalanced delimiter `{0}`: every opening marker needs a closing one")]
    UnbalancedDelimiter(String),

    #[error("invalid image markdown near `{0}`")]
    InvalidImageMarkdown(String),

    #[error("invalid link markdown near `{0}`")]
    InvalidLinkMarkdown(String),
}

/// Failures raised while serializing an HTML node tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("leaf node <{}> has no value", tag.as_deref().unwrap_or("text"))]
    EmptyValue { tag: Option<String> },

    #[error("parent node has no tag")]
    MissingTag,

    #[error("parent node <{tag}> has no children")]
    NoChildren { tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
