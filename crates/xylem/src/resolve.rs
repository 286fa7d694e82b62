//! Accessor resolution.
//!
//! One resolver owns the fixed precedence order: declared attribute, then
//! singleton child, then children collection, then parent, then native node
//! operations, then failure. [`Element::capability`] answers "would this
//! resolve?" by mirroring the same order without resolving anything.

use std::rc::Rc;

use xylem_dom::NodeId;

use crate::children::Children;
use crate::element::Element;
use crate::error::BindError;
use crate::value::Value;

/// Accessor names resolvable against the bound node itself when no
/// declaration matches.
const NATIVE_OPS: &[&str] = &["name", "text", "node", "parent_node", "child_nodes"];

/// Outcome of resolving an accessor on an [`Element`].
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A materialized attribute value.
    Attribute(Value),
    /// A singleton child; `None` when the child is not present.
    Child(Option<Rc<Element>>),
    /// A children collection proxy.
    Children(Rc<Children>),
    /// The declared parent wrapper.
    Parent(Rc<Element>),
    /// A native node operation result.
    Native(NativeValue),
}

/// Result of a native node operation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Name(String),
    Text(Option<String>),
    Node(NodeId),
    ParentNode(Option<NodeId>),
    ChildNodes(Vec<NodeId>),
}

/// What an accessor would resolve to, mirroring [`Element::get`] without
/// performing the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Attribute,
    Child,
    Children,
    Parent,
    Native,
    Unknown,
}

impl Element {
    /// Resolve `accessor` with the fixed precedence order.
    pub fn get(&self, accessor: &str) -> Result<Resolved, BindError> {
        if let Some(value) = self.attr(accessor) {
            return Ok(Resolved::Attribute(value.clone()));
        }
        if self.schema().singleton(accessor).is_some() {
            return Ok(Resolved::Child(self.child(accessor)?));
        }
        if self.schema().collection(accessor).is_some() {
            return Ok(Resolved::Children(self.children(accessor)?));
        }
        if self.parent_accessor() == Some(accessor) {
            return Ok(Resolved::Parent(self.parent(accessor)?));
        }
        if let Some(native) = self.native(accessor) {
            return Ok(Resolved::Native(native));
        }
        Err(BindError::UnknownAccessor(accessor.to_owned()))
    }

    /// Whether and how `accessor` would resolve. [`Capability::Unknown`]
    /// exactly when [`Element::get`] would fail with `UnknownAccessor`.
    pub fn capability(&self, accessor: &str) -> Capability {
        if self.attr(accessor).is_some() {
            Capability::Attribute
        } else if self.schema().singleton(accessor).is_some() {
            Capability::Child
        } else if self.schema().collection(accessor).is_some() {
            Capability::Children
        } else if self.parent_accessor() == Some(accessor) {
            Capability::Parent
        } else if NATIVE_OPS.contains(&accessor) {
            Capability::Native
        } else {
            Capability::Unknown
        }
    }

    fn parent_accessor(&self) -> Option<&str> {
        self.schema().parent().map(|(accessor, _)| accessor)
    }

    /// The declared singleton child. Absence is `Ok(None)`, never an
    /// error; the result is cached per accessor.
    pub fn child(&self, accessor: &str) -> Result<Option<Rc<Element>>, BindError> {
        {
            let cache = self.singleton_cache.borrow();
            if let Some(hit) = cache.get(accessor) {
                return Ok(hit.clone());
            }
        }
        let decl = self
            .schema()
            .singleton(accessor)
            .ok_or_else(|| BindError::UnknownAccessor(accessor.to_owned()))?;
        let resolved = match self.document().child_named(self.node(), &decl.node_name) {
            Some(child) => Some(Rc::new(Element::with_schema(
                self.document().clone(),
                child,
                (decl.wrapper)(),
            )?)),
            None => None,
        };
        self.singleton_cache
            .borrow_mut()
            .insert(accessor.to_owned(), resolved.clone());
        Ok(resolved)
    }

    /// The declared children collection, as a lazily-materialized proxy.
    /// The proxy itself is cached per accessor.
    pub fn children(&self, accessor: &str) -> Result<Rc<Children>, BindError> {
        {
            let cache = self.children_cache.borrow();
            if let Some(hit) = cache.get(accessor) {
                return Ok(hit.clone());
            }
        }
        let decl = self
            .schema()
            .collection(accessor)
            .ok_or_else(|| BindError::UnknownAccessor(accessor.to_owned()))?;
        let proxy = Rc::new(Children::new(
            self.document().clone(),
            self.node(),
            decl.clone(),
        ));
        self.children_cache
            .borrow_mut()
            .insert(accessor.to_owned(), proxy.clone());
        Ok(proxy)
    }

    /// The declared parent, found by walking ancestors of the bound node
    /// until one carries the declared node name. Works uniformly whether or
    /// not the child sits inside a collection node.
    pub fn parent(&self, accessor: &str) -> Result<Rc<Element>, BindError> {
        let Some((declared, decl)) = self.schema().parent() else {
            return Err(BindError::UnknownAccessor(accessor.to_owned()));
        };
        if declared != accessor {
            return Err(BindError::UnknownAccessor(accessor.to_owned()));
        }
        if let Some(hit) = self.parent_cache.get() {
            return Ok(hit.clone());
        }
        let doc = self.document();
        let mut cursor = doc.parent(self.node());
        while let Some(ancestor) = cursor {
            if doc.name(ancestor) == decl.node_name {
                let bound = Rc::new(Element::with_schema(
                    doc.clone(),
                    ancestor,
                    (decl.wrapper)(),
                )?);
                return Ok(self.parent_cache.get_or_init(|| bound).clone());
            }
            cursor = doc.parent(ancestor);
        }
        Err(BindError::MissingStructure {
            parent: decl.node_name.clone(),
            child: doc.name(self.node()).to_owned(),
        })
    }

    fn native(&self, accessor: &str) -> Option<NativeValue> {
        let doc = self.document();
        match accessor {
            "name" => Some(NativeValue::Name(doc.name(self.node()).to_owned())),
            "text" => Some(NativeValue::Text(
                doc.text(self.node()).map(str::to_owned),
            )),
            "node" => Some(NativeValue::Node(self.node())),
            "parent_node" => Some(NativeValue::ParentNode(doc.parent(self.node()))),
            "child_nodes" => Some(NativeValue::ChildNodes(doc.children(self.node()).to_vec())),
            _ => None,
        }
    }
}
