//! # Registry Payload Tree
//!
//! A tolerant intermediate tree that both XML and JSON registry payloads are
//! parsed into. The rules that make shape variation irrelevant downstream:
//!
//! - Namespace prefixes are stripped from element names (`ns2:Fornamn` and
//!   `Fornamn` are the same element).
//! - A JSON array becomes repeated children with the same name, so a field
//!   that is sometimes a scalar and sometimes a one-element list looks the
//!   same either way.
//! - JSON scalars (strings, numbers, booleans) become element text. JSON
//!   `null` becomes an element with no text.
//! - Text is trimmed; whitespace-only text counts as absent.

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;

use crate::error::PayloadError;

/// JSON key carrying element text when a JSON object also has children.
const JSON_TEXT_KEY: &str = "#text";

/// One element of a registry payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryNode {
    name: String,
    text: String,
    children: Vec<RegistryNode>,
}

impl RegistryNode {
    /// Create an element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: local_name(&name.into()).to_string(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set element text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: RegistryNode) -> Self {
        self.children.push(child);
        self
    }

    /// Local element name. The document root has an empty name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed element text, or `None` when absent or whitespace-only.
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// All child elements in document order.
    pub fn children(&self) -> &[RegistryNode] {
        &self.children
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&RegistryNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Every child with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RegistryNode> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Follow a path of child names, taking the first match at each step.
    pub fn at(&self, path: &[&str]) -> Option<&RegistryNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Text of the element at `path`.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).and_then(RegistryNode::text)
    }

    /// Depth-first search for the first descendant (or self) with `name`.
    pub fn find(&self, name: &str) -> Option<&RegistryNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Number of descendant elements with `name`, including self.
    pub fn count(&self, name: &str) -> usize {
        let own = usize::from(self.name == name);
        own + self.children.iter().map(|child| child.count(name)).sum::<usize>()
    }

    // -- Parsing ------------------------------------------------------------

    /// Parse an XML document.
    ///
    /// The returned node is an unnamed document root whose children are the
    /// top-level elements. Entity and character references in text are
    /// resolved; CDATA is taken verbatim.
    pub fn from_xml(xml: &str) -> Result<Self, PayloadError> {
        if xml.trim().is_empty() {
            return Err(PayloadError::Empty);
        }

        let mut reader = Reader::from_str(xml);
        let mut stack = vec![RegistryNode::default()];

        loop {
            let event = reader.read_event().map_err(|err| PayloadError::Xml {
                reason: format!("at byte {}: {err}", reader.buffer_position()),
            })?;

            match event {
                Event::Start(start) => {
                    reject_after_root(&stack)?;
                    let local = start.local_name();
                    stack.push(RegistryNode::new(element_name(local.as_ref())?));
                }
                Event::Empty(start) => {
                    reject_after_root(&stack)?;
                    let local = start.local_name();
                    attach(&mut stack, RegistryNode::new(element_name(local.as_ref())?))?;
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or_else(|| xml_error("unbalanced end tag"))?;
                    attach(&mut stack, node)?;
                }
                Event::Text(text) => {
                    let raw = std::str::from_utf8(&text).map_err(xml_error)?;
                    let unescaped =
                        quick_xml::escape::unescape(raw).map_err(xml_error)?;
                    if !unescaped.trim().is_empty() {
                        reject_after_root(&stack)?;
                    }
                    push_text(&mut stack, &unescaped);
                }
                Event::CData(data) => {
                    let raw = std::str::from_utf8(&data).map_err(xml_error)?;
                    if !raw.trim().is_empty() {
                        reject_after_root(&stack)?;
                    }
                    push_text(&mut stack, raw);
                }
                Event::GeneralRef(reference) => {
                    let name = std::str::from_utf8(&reference).map_err(xml_error)?;
                    reject_after_root(&stack)?;
                    let entity = format!("&{name};");
                    let resolved = quick_xml::escape::unescape(&entity).map_err(xml_error)?;
                    push_text(&mut stack, &resolved);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(xml_error("document ended with unclosed elements"));
        }
        let root = stack.pop().unwrap_or_default();
        if root.children.is_empty() {
            return Err(xml_error("no root element"));
        }
        Ok(root)
    }

    /// Convert a JSON document.
    ///
    /// The top-level value must be an object; its keys become the children
    /// of an unnamed document root. Attribute-style keys (`@...`, `$...`)
    /// and namespace declarations (`xmlns`, `xmlns:*`) are skipped.
    pub fn from_json(value: &Value) -> Result<Self, PayloadError> {
        match value {
            Value::Object(map) if map.is_empty() => Err(PayloadError::Empty),
            Value::Object(_) => {
                let mut root = RegistryNode::default();
                fill_from_json(&mut root, value);
                Ok(root)
            }
            Value::Null => Err(PayloadError::Empty),
            other => Err(PayloadError::Json {
                reason: format!("top-level value must be an object, got {}", json_kind(other)),
            }),
        }
    }
}

/// Strip a namespace prefix: everything up to and including the last `:`.
pub fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

// -- XML helpers --------------------------------------------------------------

/// A document has exactly one root element; nothing but whitespace may
/// follow it.
fn reject_after_root(stack: &[RegistryNode]) -> Result<(), PayloadError> {
    match stack {
        [root] if !root.children.is_empty() => Err(xml_error("content after the root element")),
        _ => Ok(()),
    }
}

fn xml_error(err: impl std::fmt::Display) -> PayloadError {
    PayloadError::Xml {
        reason: err.to_string(),
    }
}

fn element_name(bytes: &[u8]) -> Result<&str, PayloadError> {
    std::str::from_utf8(bytes).map_err(xml_error)
}

fn attach(stack: &mut [RegistryNode], node: RegistryNode) -> Result<(), PayloadError> {
    let parent = stack
        .last_mut()
        .ok_or_else(|| xml_error("element outside of document"))?;
    parent.children.push(node);
    Ok(())
}

fn push_text(stack: &mut [RegistryNode], text: &str) {
    if let Some(node) = stack.last_mut() {
        node.text.push_str(text);
    }
}

// -- JSON helpers -------------------------------------------------------------

fn fill_from_json(node: &mut RegistryNode, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                if key == JSON_TEXT_KEY {
                    node.text = scalar_text(item).unwrap_or_default();
                } else if !is_attribute_key(key) {
                    push_json_children(node, key, item);
                }
            }
        }
        other => node.text = scalar_text(other).unwrap_or_default(),
    }
}

fn push_json_children(parent: &mut RegistryNode, key: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_json_children(parent, key, item);
            }
        }
        other => {
            let mut child = RegistryNode::new(key);
            fill_from_json(&mut child, other);
            parent.children.push(child);
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_attribute_key(key: &str) -> bool {
    key.starts_with('@') || key.starts_with('$') || key == "xmlns" || key.starts_with("xmlns:")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
