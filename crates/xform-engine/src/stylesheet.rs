//! Stylesheet document wrapper over xot

use std::io::{Read, Write};

use xform_engine_traits::error::{Error, Result};

pub use xot::Node;

/// Kind of a node in the stylesheet document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
    Namespace,
}

/// A stylesheet document with its private xot arena.
///
/// Each `Stylesheet` owns its own [`xot::Xot`], so node handles from one
/// document are meaningless in another. Preprocessors receive a shared
/// reference and can therefore only observe the tree; the mutating
/// operations ([`remove_if_attached`](Stylesheet::remove_if_attached))
/// are reserved for the pipeline, which applies registered deletions
/// after all preprocessors have finished.
#[derive(Debug)]
pub struct Stylesheet {
    xot: xot::Xot,
    root: Node,
    // Ids of nodes whose subtree was removed. Removed ids must never be
    // handed back to the arena, so detachment checks consult this first.
    removed: Vec<Node>,
}

impl Stylesheet {
    /// Parse a stylesheet from a string
    pub fn parse(xml: &str) -> Result<Self> {
        let mut xot = xot::Xot::new();
        let root = xot.parse(xml).map_err(|e| Error::xml_parse(e.to_string()))?;
        Ok(Self {
            xot,
            root,
            removed: Vec::new(),
        })
    }

    /// Read and parse a stylesheet from a readable source
    pub fn from_reader(reader: &mut dyn Read) -> Result<Self> {
        let mut xml = String::new();
        reader
            .read_to_string(&mut xml)
            .map_err(|e| Error::argument(format!("unreadable stylesheet source: {e}")))?;
        Self::parse(&xml)
    }

    /// Deep-copy the document into a fresh arena.
    ///
    /// Implemented as a serialize/reparse round trip, which preserves all
    /// element, attribute and text content while discarding nothing but
    /// insignificant serialization details.
    pub fn deep_copy(&self) -> Result<Self> {
        Self::parse(&self.to_xml()?)
    }

    /// Serialize the document to an XML string
    pub fn to_xml(&self) -> Result<String> {
        self.xot
            .to_string(self.root)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Serialize the document to a writable stream
    pub fn write_to(&self, output: &mut dyn Write) -> Result<()> {
        output.write_all(self.to_xml()?.as_bytes())?;
        Ok(())
    }

    /// The document root node
    pub fn root(&self) -> Node {
        self.root
    }

    /// The document element, if the document has one
    pub fn document_element(&self) -> Option<Node> {
        self.xot
            .children(self.root)
            .find(|n| self.node_kind(*n) == NodeKind::Element)
    }

    /// Parent of a node, if it has one
    pub fn parent(&self, node: Node) -> Option<Node> {
        self.xot.parent(node)
    }

    /// Children of a node, in document order
    pub fn children(&self, node: Node) -> Vec<Node> {
        self.xot.children(node).collect()
    }

    /// All descendants of the document root (including the root), in
    /// document order
    pub fn descendants(&self) -> Vec<Node> {
        self.xot.descendants(self.root).collect()
    }

    /// Kind of a node
    pub fn node_kind(&self, node: Node) -> NodeKind {
        match self.xot.value_type(node) {
            xot::ValueType::Document => NodeKind::Document,
            xot::ValueType::Element => NodeKind::Element,
            xot::ValueType::Text => NodeKind::Text,
            xot::ValueType::Comment => NodeKind::Comment,
            xot::ValueType::ProcessingInstruction => NodeKind::ProcessingInstruction,
            xot::ValueType::Attribute => NodeKind::Attribute,
            xot::ValueType::Namespace => NodeKind::Namespace,
        }
    }

    /// Local name of an element node
    pub fn element_local_name(&self, node: Node) -> Option<String> {
        if self.node_kind(node) != NodeKind::Element {
            return None;
        }
        self.xot
            .node_name(node)
            .map(|n| self.xot.name_ns_str(n).0.to_string())
    }

    /// Namespace URI of an element node (empty string when unqualified)
    pub fn element_namespace(&self, node: Node) -> Option<String> {
        if self.node_kind(node) != NodeKind::Element {
            return None;
        }
        self.xot
            .node_name(node)
            .map(|n| self.xot.name_ns_str(n).1.to_string())
    }

    /// Concatenated text content beneath a node
    pub fn text_content(&self, node: Node) -> String {
        let mut content = String::new();
        for n in self.xot.descendants(node) {
            if let xot::Value::Text(text) = self.xot.value(n) {
                content.push_str(text.get());
            }
        }
        content
    }

    /// All elements in document order whose local name matches
    pub fn find_elements(&self, local_name: &str) -> Vec<Node> {
        self.descendants()
            .into_iter()
            .filter(|n| self.element_local_name(*n).as_deref() == Some(local_name))
            .collect()
    }

    /// Remove a node from its parent if it is still attached.
    ///
    /// Returns `true` if the node was removed, `false` if it was already
    /// detached (a silent no-op, not an error).
    pub fn remove_if_attached(&mut self, node: Node) -> Result<bool> {
        if self.removed.contains(&node) {
            return Ok(false);
        }
        if self.xot.parent(node).is_none() {
            return Ok(false);
        }
        let subtree: Vec<Node> = self.xot.descendants(node).collect();
        self.xot
            .remove(node)
            .map_err(|e| Error::argument(format!("cannot remove node: {e}")))?;
        self.removed.extend(subtree);
        Ok(true)
    }

    /// Whether two documents serialize to the same XML.
    ///
    /// Used by tests to assert that a document was not structurally
    /// mutated.
    pub fn same_shape(&self, other: &Stylesheet) -> Result<bool> {
        Ok(self.to_xml()? == other.to_xml()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "<root><item id=\"1\">First</item><item id=\"2\">Second</item></root>";

    #[test]
    fn parse_and_serialize() {
        let doc = Stylesheet::parse(SIMPLE).unwrap();
        let xml = doc.to_xml().unwrap();
        assert!(xml.contains("<root>"));
        assert!(xml.contains("Second"));
    }

    #[test]
    fn parse_rejects_malformed_xml() {
        let err = Stylesheet::parse("<root><unclosed></root>").unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }

    #[test]
    fn deep_copy_is_independent() {
        let original = Stylesheet::parse(SIMPLE).unwrap();
        let mut copy = original.deep_copy().unwrap();
        assert!(original.same_shape(&copy).unwrap());

        let item = copy.find_elements("item")[0];
        assert!(copy.remove_if_attached(item).unwrap());
        assert!(!original.same_shape(&copy).unwrap());
        assert_eq!(original.find_elements("item").len(), 2);
    }

    #[test]
    fn find_elements_in_document_order() {
        let doc = Stylesheet::parse(SIMPLE).unwrap();
        let items = doc.find_elements("item");
        assert_eq!(items.len(), 2);
        assert_eq!(doc.text_content(items[0]), "First");
        assert_eq!(doc.text_content(items[1]), "Second");
    }

    #[test]
    fn remove_detached_node_is_noop() {
        let mut doc = Stylesheet::parse("<root><a><b/></a></root>").unwrap();
        let a = doc.find_elements("a")[0];
        let b = doc.find_elements("b")[0];

        assert!(doc.remove_if_attached(a).unwrap());
        // b went with its parent; a second removal attempt is a no-op
        assert!(!doc.remove_if_attached(b).unwrap());
        assert_eq!(doc.find_elements("b").len(), 0);
    }

    #[test]
    fn from_reader_reads_source() {
        let mut source = std::io::Cursor::new(SIMPLE.as_bytes().to_vec());
        let doc = Stylesheet::from_reader(&mut source).unwrap();
        assert_eq!(doc.find_elements("item").len(), 2);
    }
}
