//! Wrapper instances bound to document nodes.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use xylem_dom::{Document, NodeId};

use crate::children::Children;
use crate::error::BindError;
use crate::schema::{Model, Schema};
use crate::value::{typecast, Value};

/// A wrapper bound to exactly one document node.
///
/// Attributes (the node's own plus declared attribute-children) are
/// materialized at construction and read-only thereafter. Relations resolve
/// lazily through the accessors in `resolve` and are cached per instance.
pub struct Element {
    doc: Rc<Document>,
    node: NodeId,
    schema: &'static Schema,
    attributes: IndexMap<String, Value>,
    pub(crate) children_cache: RefCell<HashMap<String, Rc<Children>>>,
    pub(crate) singleton_cache: RefCell<HashMap<String, Option<Rc<Element>>>>,
    pub(crate) parent_cache: OnceCell<Rc<Element>>,
}

impl Element {
    /// Bind `node` as an `M` wrapper.
    pub fn bind<M: Model>(doc: Rc<Document>, node: NodeId) -> Result<Element, BindError> {
        Element::with_schema(doc, node, Schema::of::<M>())
    }

    /// Bind `node` with an explicit schema.
    pub fn with_schema(
        doc: Rc<Document>,
        node: NodeId,
        schema: &'static Schema,
    ) -> Result<Element, BindError> {
        if !doc.contains(node) {
            return Err(BindError::InvalidArgument(format!(
                "node {node:?} does not belong to the bound document"
            )));
        }
        let mut attributes = IndexMap::new();
        for (name, raw) in doc.attributes(node) {
            attributes.insert(name.clone(), typecast(Some(raw.as_str())));
        }
        for decl in schema.attributes() {
            let value = match doc.child_named(node, &decl.name) {
                // a structured value: keep the raw node
                Some(child) if !doc.children(child).is_empty() => Value::Node(child),
                Some(child) => typecast(doc.text(child)),
                None if decl.required => {
                    return Err(BindError::MissingStructure {
                        parent: doc.name(node).to_owned(),
                        child: decl.name.clone(),
                    });
                }
                None => Value::Absent,
            };
            attributes.insert(decl.name.clone(), value);
        }
        Ok(Element {
            doc,
            node,
            schema,
            attributes,
            children_cache: RefCell::new(HashMap::new()),
            singleton_cache: RefCell::new(HashMap::new()),
            parent_cache: OnceCell::new(),
        })
    }

    /// The bound node. Never reassigned after construction.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The document the bound node belongs to.
    pub fn document(&self) -> &Rc<Document> {
        &self.doc
    }

    /// The effective schema of this wrapper.
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// A materialized attribute value, covering the node's own attributes
    /// and declared attribute-children alike.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All materialized attributes: the node's own first, then declared
    /// attribute-children in declaration order.
    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }
}

/// Two wrappers are equal when they bind the same node of the same
/// document, whatever their schemas.
impl PartialEq for Element {
    fn eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc) && self.node == other.node
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("node", &self.node)
            .field("name", &self.doc.name(self.node))
            .field("schema", &self.schema.node_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    struct Company;
    impl Model for Company {
        fn declare(schema: &mut SchemaBuilder) {
            schema
                .attributes(&["name"])
                .optional_attributes(&["nickname", "profile"]);
        }
    }

    fn doc() -> Rc<Document> {
        Rc::new(
            Document::parse_str(
                r#"<companies>
                     <company reality="real" rank="1">
                       <name>37Signals</name>
                       <profile><bio>small</bio></profile>
                     </company>
                     <company><name>Milliways</name></company>
                   </companies>"#,
            )
            .unwrap(),
        )
    }

    fn first_company(doc: &Rc<Document>) -> NodeId {
        doc.child_named(doc.root(), "company").unwrap()
    }

    #[test]
    fn test_bind_copies_node_attributes_with_typecast() {
        let doc = doc();
        let company = Element::bind::<Company>(doc.clone(), first_company(&doc)).unwrap();
        assert_eq!(company.attr("reality"), Some(&Value::text("real")));
        assert_eq!(company.attr("rank"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_bind_materializes_declared_attribute_children() {
        let doc = doc();
        let company = Element::bind::<Company>(doc.clone(), first_company(&doc)).unwrap();
        assert_eq!(company.attr("name"), Some(&Value::text("37Signals")));
    }

    #[test]
    fn test_optional_attribute_absent() {
        let doc = doc();
        let company = Element::bind::<Company>(doc.clone(), first_company(&doc)).unwrap();
        assert_eq!(company.attr("nickname"), Some(&Value::Absent));
    }

    #[test]
    fn test_structured_attribute_child_stays_a_node() {
        let doc = doc();
        let node = first_company(&doc);
        let company = Element::bind::<Company>(doc.clone(), node).unwrap();
        let profile = company.attr("profile").and_then(Value::as_node).unwrap();
        assert_eq!(doc.name(profile), "profile");
        assert_eq!(doc.parent(profile), Some(node));
    }

    #[test]
    fn test_required_attribute_missing_fails() {
        struct Strict;
        impl Model for Strict {
            fn node_name() -> String {
                "company".to_owned()
            }
            fn declare(schema: &mut SchemaBuilder) {
                schema.attributes(&["industry"]);
            }
        }
        let doc = doc();
        let err = Element::bind::<Strict>(doc.clone(), first_company(&doc)).unwrap_err();
        match err {
            BindError::MissingStructure { parent, child } => {
                assert_eq!(parent, "company");
                assert_eq!(child, "industry");
            }
            other => panic!("expected MissingStructure, got {other}"),
        }
    }

    #[test]
    fn test_foreign_node_is_invalid() {
        let doc = doc();
        let small = Rc::new(Document::parse_str("<a/>").unwrap());
        let foreign = first_company(&doc);
        assert!(matches!(
            Element::bind::<Company>(small, foreign),
            Err(BindError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_equality_is_by_node_not_instance() {
        let doc = doc();
        let node = first_company(&doc);
        let a = Element::bind::<Company>(doc.clone(), node).unwrap();
        let b = Element::bind::<Company>(doc.clone(), node).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.node(), node);

        let other = doc.children(doc.root())[1];
        let c = Element::bind::<Company>(doc.clone(), other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_requires_same_document() {
        let first = doc();
        let second = doc();
        let a = Element::bind::<Company>(first.clone(), first_company(&first)).unwrap();
        let b = Element::bind::<Company>(second.clone(), first_company(&second)).unwrap();
        assert_ne!(a, b);
    }
}
