use std::collections::BTreeMap;

use ipp_core::{ErrorKind, IppError};
use roxmltree::{Document, Node, NodeType};

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlElementNode>,
    /// Concatenated text and CDATA content; `None` when the element has no text at all.
    pub text: Option<String>,
    pub line: u32,
}

impl XmlElementNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, IppError> {
    let document = Document::parse(source)
        .map_err(|error| IppError::new(ErrorKind::XmlParse, error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(IppError::new(
            ErrorKind::XmlParse,
            "XML document must contain a root element.",
        ));
    };

    Ok(XmlDocument {
        root: parse_element(&document, root),
    })
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let mut attributes = BTreeMap::new();
    for attribute in node.attributes() {
        attributes.insert(attribute.name().to_string(), attribute.value().to_string());
    }

    let mut children = Vec::new();
    let mut text: Option<String> = None;
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(parse_element(document, child)),
            NodeType::Text => {
                let value = child.text().unwrap_or_default();
                text.get_or_insert_with(String::new).push_str(value);
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        text,
        line: document.text_pos_at(node.range().start).row,
    }
}
