//! Structural element nodes handed to record population

use super::tag;

/// A parsed element: tag, attributes, text and ordered children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Tag in Clark notation (`{namespace}local` or bare `local`)
    pub tag: String,
    /// Attributes in document order, namespace declarations excluded
    pub attributes: Vec<(String, String)>,
    /// Character data directly inside the element
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn local_name(&self) -> &str {
        tag::local_name(&self.tag)
    }

    /// Element text, `None` when the element has no character data.
    pub fn text(&self) -> Option<&str> {
        if self.text.is_empty() {
            None
        } else {
            Some(&self.text)
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_accessors() {
        let node = Node::new("{urn:kismet}essid")
            .with_attribute("cloaked", "false")
            .with_text("HomeNet");

        assert_eq!(node.local_name(), "essid");
        assert_eq!(node.attribute("cloaked"), Some("false"));
        assert_eq!(node.attribute("missing"), None);
        assert_eq!(node.text(), Some("HomeNet"));
    }

    #[test]
    fn test_empty_text_is_absent() {
        assert_eq!(Node::new("essid").text(), None);
    }
}
