use std::borrow::Cow;

use common_utils::errors::CustomResult;
use domain_types::errors::ConnectorError;
use error_stack::{report, ResultExt};
use once_cell::sync::Lazy;
use quick_xml::{events::Event, Reader};
use regex::Regex;
use serde_json::{Map, Value};

#[allow(clippy::expect_used)]
static SOAP_NAMESPACE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)SOAP(-ENV)?:").expect("SOAP prefix pattern is valid"));

/// An element of a parsed response: local name, concatenated text and
/// children in document order. Attributes are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Follows `names` one level at a time starting from the children of `self`.
    pub fn path(&self, names: &[&str]) -> Option<&Self> {
        names
            .iter()
            .try_fold(self, |node, name| node.child(name))
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text.as_str())
    }

    /// Leaves become strings, everything else an object keyed by child name;
    /// repeated names collapse into an array.
    pub fn to_json(&self) -> Value {
        if self.children.is_empty() {
            Value::String(self.text.clone())
        } else {
            Value::Object(self.fields())
        }
    }

    pub fn fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        for child in &self.children {
            let value = child.to_json();
            match fields.get_mut(&child.name) {
                Some(Value::Array(values)) => values.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    fields.insert(child.name.clone(), value);
                }
            }
        }
        fields
    }
}

/// Drops `SOAP-ENV:` and `SOAP:` prefixes, in any letter case, so that the
/// envelope elements read the same whatever prefix the server picked.
pub fn strip_soap_prefixes(raw: &str) -> Cow<'_, str> {
    SOAP_NAMESPACE_PREFIX.replace_all(raw, "")
}

/// Cleans the SOAP prefixes off `raw` and parses what remains.
pub fn parse_soap_response(raw: &str) -> CustomResult<XmlNode, ConnectorError> {
    let cleaned = strip_soap_prefixes(raw);
    parse_xml(&cleaned)
}

/// Parses a complete document into its root element.
///
/// Empty input, text outside the root, a second root and unbalanced tags are
/// all rejected. The tree is built from reader events rather than through
/// `quick_xml::de`, which accepts several of those documents.
pub fn parse_xml(xml: &str) -> CustomResult<XmlNode, ConnectorError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut open: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(error=?error, "Failed to parse XML response");
                return Err(report!(ConnectorError::ResponseDeserializationFailed)
                    .attach_printable(format!(
                        "malformed XML at position {}: {error}",
                        reader.buffer_position()
                    )));
            }
        };

        match event {
            Event::Start(start) => {
                let name = element_name(start.local_name().as_ref())?;
                if root.is_some() {
                    return Err(malformed("element after the root element"));
                }
                open.push(XmlNode::named(name));
            }
            Event::Empty(start) => {
                let name = element_name(start.local_name().as_ref())?;
                attach(&mut open, &mut root, XmlNode::named(name))?;
            }
            Event::End(_) => {
                let node = open
                    .pop()
                    .ok_or_else(|| malformed("closing tag without an opening tag"))?;
                attach(&mut open, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .change_context(ConnectorError::ResponseDeserializationFailed)?;
                append_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let data = data.into_inner();
                let text = std::str::from_utf8(&data)
                    .change_context(ConnectorError::ResponseDeserializationFailed)?;
                append_text(&mut open, text)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if !open.is_empty() {
        return Err(malformed("document ends inside an element"));
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn element_name(raw: &[u8]) -> CustomResult<String, ConnectorError> {
    std::str::from_utf8(raw)
        .map(ToString::to_string)
        .change_context(ConnectorError::ResponseDeserializationFailed)
}

fn attach(
    open: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> CustomResult<(), ConnectorError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => return Err(malformed("more than one root element")),
        None => *root = Some(node),
    }
    Ok(())
}

fn append_text(open: &mut [XmlNode], text: &str) -> CustomResult<(), ConnectorError> {
    let node = open
        .last_mut()
        .ok_or_else(|| malformed("text outside the root element"))?;
    node.text.push_str(text);
    Ok(())
}

fn malformed(reason: &'static str) -> error_stack::Report<ConnectorError> {
    report!(ConnectorError::ResponseDeserializationFailed).attach_printable(reason)
}
