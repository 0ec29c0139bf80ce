use crate::error::RenderError;

/// Elements that never carry a body and render as a lone open tag.
const VOID_ELEMENTS: &[&str] = &["img", "br", "hr"];

/// Ordered `key="value"` pairs. Insertion order is the render order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, keeping its original position if it was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

/// Render attributes as ` key="value"` pairs, in insertion order.
///
/// Values are written as given; no escaping is applied.
pub fn render_attributes(attrs: &Attributes) -> String {
    let mut out = String::new();
    write_attributes(attrs, &mut out);
    out
}

fn write_attributes(attrs: &Attributes, out: &mut String) {
    for (key, value) in attrs.iter() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}

/// A childless node. Without a tag it renders as its raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub tag: Option<String>,
    pub value: String,
    pub attributes: Attributes,
}

impl LeafNode {
    pub fn new(tag: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.map(str::to_string),
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    /// Untagged leaf, rendered as plain text.
    pub fn raw(value: impl Into<String>) -> Self {
        Self::new(None, value)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<(), RenderError> {
        if let Some(tag) = self.tag.as_deref().filter(|t| VOID_ELEMENTS.contains(t)) {
            out.push('<');
            out.push_str(tag);
            write_attributes(&self.attributes, out);
            out.push('>');
            return Ok(());
        }

        if self.value.is_empty() {
            return Err(RenderError::EmptyValue {
                tag: self.tag.clone(),
            });
        }

        match &self.tag {
            None => out.push_str(&self.value),
            Some(tag) => {
                out.push('<');
                out.push_str(tag);
                write_attributes(&self.attributes, out);
                out.push('>');
                out.push_str(&self.value);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
        Ok(())
    }
}

/// A tagged container of child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentNode {
    pub tag: Option<String>,
    pub children: Vec<HtmlNode>,
    pub attributes: Attributes,
}

impl ParentNode {
    pub fn new(tag: &str, children: Vec<HtmlNode>) -> Self {
        Self {
            tag: Some(tag.to_string()),
            children,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    fn write_html(&self, out: &mut String) -> Result<(), RenderError> {
        let tag = self.tag.as_deref().ok_or(RenderError::MissingTag)?;
        if self.children.is_empty() {
            return Err(RenderError::NoChildren {
                tag: tag.to_string(),
            });
        }

        out.push('<');
        out.push_str(tag);
        write_attributes(&self.attributes, out);
        out.push('>');
        for child in &self.children {
            child.write_html(out)?;
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        Ok(())
    }
}

/// An element of the HTML tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Leaf(LeafNode),
    Parent(ParentNode),
}

impl HtmlNode {
    /// Serialize this node and its subtree to an HTML string.
    pub fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        self.write_html(&mut out)?;
        Ok(out)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.tag.as_deref(),
            HtmlNode::Parent(parent) => parent.tag.as_deref(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            HtmlNode::Leaf(leaf) => &leaf.attributes,
            HtmlNode::Parent(parent) => &parent.attributes,
        }
    }

    /// Children of a parent node; leaves have none.
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            HtmlNode::Leaf(_) => &[],
            HtmlNode::Parent(parent) => &parent.children,
        }
    }

    fn write_html(&self, out: &mut String) -> Result<(), RenderError> {
        match self {
            HtmlNode::Leaf(leaf) => leaf.write_html(out),
            HtmlNode::Parent(parent) => parent.write_html(out),
        }
    }
}

impl From<LeafNode> for HtmlNode {
    fn from(leaf: LeafNode) -> Self {
        HtmlNode::Leaf(leaf)
    }
}

impl From<ParentNode> for HtmlNode {
    fn from(parent: ParentNode) -> Self {
        HtmlNode::Parent(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn attributes_keep_insertion_order() {
        let attrs: Attributes = [
            ("href", "https://www.google.com"),
            ("target", "_blank"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render_attributes(&attrs),
            r#" href="https://www.google.com" target="_blank""#
        );
    }

    #[test]
    fn empty_attributes_render_nothing() {
        assert_eq!(render_attributes(&Attributes::new()), "");
    }

    #[test]
    fn reinserting_a_key_keeps_its_position() {
        let mut attrs = Attributes::new();
        attrs.insert("a", "1");
        attrs.insert("b", "2");
        attrs.insert("a", "3");
        assert_eq!(render_attributes(&attrs), r#" a="3" b="2""#);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn attribute_values_are_not_escaped() {
        let attrs: Attributes = [("title", "a \"quoted\" <value>")].into_iter().collect();
        assert_eq!(render_attributes(&attrs), r#" title="a "quoted" <value>""#);
    }

    #[test]
    fn leaf_with_tag() {
        assert_eq!(
            LeafNode::new(Some("p"), "Hello, world!").render().unwrap(),
            "<p>Hello, world!</p>"
        );
    }

    #[test]
    fn leaf_with_attributes() {
        let node = LeafNode::new(Some("a"), "Click me!").with_attribute("href", "https://www.google.com");
        assert_eq!(
            node.render().unwrap(),
            r#"<a href="https://www.google.com">Click me!</a>"#
        );
    }

    #[test]
    fn leaf_without_tag_is_raw_text() {
        assert_eq!(LeafNode::raw("Just text").render().unwrap(), "Just text");
    }

    #[test]
    fn leaf_without_value_fails() {
        assert_eq!(
            LeafNode::new(Some("p"), "").render(),
            Err(RenderError::EmptyValue {
                tag: Some("p".to_string())
            })
        );
    }

    #[test]
    fn void_leaf_renders_attributes_only() {
        let node = LeafNode::new(Some("img"), "")
            .with_attribute("src", "/a.png")
            .with_attribute("alt", "an image");
        assert_eq!(node.render().unwrap(), r#"<img src="/a.png" alt="an image">"#);
    }

    #[test]
    fn parent_renders_children_in_order() {
        let node = ParentNode::new(
            "p",
            vec![
                LeafNode::new(Some("b"), "Bold text").into(),
                LeafNode::raw("Normal text").into(),
                LeafNode::new(Some("i"), "italic text").into(),
                LeafNode::raw("Normal text").into(),
            ],
        );
        assert_eq!(
            node.render().unwrap(),
            "<p><b>Bold text</b>Normal text<i>italic text</i>Normal text</p>"
        );
    }

    #[test]
    fn nested_parents() {
        let node = ParentNode::new(
            "div",
            vec![ParentNode::new("span", vec![LeafNode::new(Some("b"), "grandchild").into()]).into()],
        )
        .with_attribute("class", "outer");
        assert_eq!(
            node.render().unwrap(),
            r#"<div class="outer"><span><b>grandchild</b></span></div>"#
        );
    }

    #[test]
    fn parent_without_tag_fails() {
        let node = ParentNode {
            tag: None,
            children: vec![LeafNode::raw("x").into()],
            attributes: Attributes::new(),
        };
        assert_eq!(node.render(), Err(RenderError::MissingTag));
    }

    #[test]
    fn parent_without_children_fails() {
        assert_eq!(
            ParentNode::new("ul", Vec::new()).render(),
            Err(RenderError::NoChildren {
                tag: "ul".to_string()
            })
        );
    }

    #[test]
    fn child_failure_aborts_whole_render() {
        let node = ParentNode::new(
            "p",
            vec![LeafNode::raw("fine").into(), LeafNode::new(Some("code"), "").into()],
        );
        assert!(matches!(node.render(), Err(RenderError::EmptyValue { .. })));
    }

    #[test]
    fn rendering_twice_is_identical() {
        let node: HtmlNode = ParentNode::new("p", vec![LeafNode::raw("same").into()]).into();
        assert_eq!(node.render().unwrap(), node.render().unwrap());
    }
}
