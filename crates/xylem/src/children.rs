//! Lazily-materialized child collection proxies.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use xylem_dom::{Document, NodeId};
use xylem_xpath::PathParser;

use crate::element::Element;
use crate::error::BindError;
use crate::schema::{ChildrenDecl, Scope};

/// Ordered, cached view of a declared children collection.
///
/// The member list is computed at first enumeration and never re-queried;
/// every accessor reads that one cached materialization, so the view stays
/// stable for the proxy's lifetime.
pub struct Children {
    doc: Rc<Document>,
    parent: NodeId,
    decl: ChildrenDecl,
    items: OnceCell<Vec<Rc<Element>>>,
}

impl Children {
    pub(crate) fn new(doc: Rc<Document>, parent: NodeId, decl: ChildrenDecl) -> Children {
        Children {
            doc,
            parent,
            decl,
            items: OnceCell::new(),
        }
    }

    /// The element name this collection selects.
    pub fn element_name(&self) -> &str {
        &self.decl.element_name
    }

    /// The resolved collection scope: the named collection node, or the
    /// parent's own node for direct collections. `None` when a named
    /// collection node is absent from the document.
    pub fn scope_node(&self) -> Option<NodeId> {
        match &self.decl.scope {
            Scope::Named(name) => self.doc.child_named(self.parent, name),
            Scope::Direct => Some(self.parent),
        }
    }

    /// The cached member list, materializing it on first call. An absent
    /// collection scope yields an empty list, not an error.
    pub fn items(&self) -> Result<&[Rc<Element>], BindError> {
        if let Some(items) = self.items.get() {
            return Ok(items.as_slice());
        }
        let mut members = Vec::new();
        if let Some(scope) = self.scope_node() {
            let schema = (self.decl.wrapper)();
            for &child in self.doc.children(scope) {
                if self.doc.name(child) == self.decl.element_name {
                    members.push(Rc::new(Element::with_schema(
                        self.doc.clone(),
                        child,
                        schema,
                    )?));
                }
            }
        }
        Ok(self.items.get_or_init(|| members).as_slice())
    }

    pub fn len(&self) -> Result<usize, BindError> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, BindError> {
        Ok(self.items()?.is_empty())
    }

    pub fn first(&self) -> Result<Option<Rc<Element>>, BindError> {
        Ok(self.items()?.first().cloned())
    }

    pub fn last(&self) -> Result<Option<Rc<Element>>, BindError> {
        Ok(self.items()?.last().cloned())
    }

    pub fn get(&self, index: usize) -> Result<Option<Rc<Element>>, BindError> {
        Ok(self.items()?.get(index).cloned())
    }

    /// Iterate the cached members in document order.
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Rc<Element>>, BindError> {
        Ok(self.items()?.iter())
    }

    /// Evaluate a path expression relative to the collection scope and wrap
    /// the matches. Computed per call; the cached member list is not
    /// consulted or touched.
    pub fn filtered(&self, path: &str) -> Result<Vec<Rc<Element>>, BindError> {
        let Some(scope) = self.scope_node() else {
            return Ok(Vec::new());
        };
        let expr = PathParser::parse(path).map_err(|err| {
            BindError::InvalidArgument(format!("invalid path expression '{path}': {err}"))
        })?;
        let schema = (self.decl.wrapper)();
        xylem_xpath::eval_from(&expr, &self.doc, scope)
            .into_iter()
            .map(|node| Element::with_schema(self.doc.clone(), node, schema).map(Rc::new))
            .collect()
    }
}

impl fmt::Debug for Children {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("element_name", &self.decl.element_name)
            .field("materialized", &self.items.get().map(Vec::len))
            .finish_non_exhaustive()
    }
}
