/// Kind of an inline text fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Text,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

/// A typed fragment of text within a block.
///
/// `url` is only ever set for [`TextKind::Link`] and [`TextKind::Image`];
/// the constructors keep that pairing intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineToken {
    text: String,
    kind: TextKind,
    url: Option<String>,
}

impl InlineToken {
    /// A token without a url. Use [`InlineToken::link`] or
    /// [`InlineToken::image`] for the url-bearing kinds.
    pub fn new(text: impl Into<String>, kind: TextKind) -> Self {
        debug_assert!(!matches!(kind, TextKind::Link | TextKind::Image));
        Self {
            text: text.into(),
            kind,
            url: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, TextKind::Text)
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: TextKind::Link,
            url: Some(url.into()),
        }
    }

    pub fn image(alt: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: alt.into(),
            kind: TextKind::Image,
            url: Some(url.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TextKind {
        self.kind
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Structural type of a block, derived from its raw text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading,
    Code,
    Quote,
    UnorderedList,
    OrderedList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_compare_structurally() {
        assert_eq!(
            InlineToken::new("same", TextKind::Bold),
            InlineToken::new("same", TextKind::Bold)
        );
        assert_ne!(
            InlineToken::new("same", TextKind::Bold),
            InlineToken::new("same", TextKind::Italic)
        );
        assert_ne!(
            InlineToken::link("x", "https://a.com"),
            InlineToken::link("x", "https://b.com")
        );
    }

    #[test]
    fn url_only_on_links_and_images() {
        assert_eq!(InlineToken::text("plain").url(), None);
        assert_eq!(InlineToken::new("c", TextKind::Code).url(), None);
        assert_eq!(InlineToken::link("l", "www.test.com").url(), Some("www.test.com"));
        assert_eq!(InlineToken::image("i", "www.test.com").url(), Some("www.test.com"));
    }
}
