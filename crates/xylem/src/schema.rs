//! Declarative schema registry.
//!
//! Each model type resolves to one immutable [`Schema`] describing the
//! attributes and relations its wrappers expose. Schemas are computed once
//! per type, on first use, and kept for the life of the process in a
//! registry keyed by `TypeId`.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use indexmap::IndexMap;

use crate::util::snake_case;

/// Resolver for the schema of a declared wrapper type, captured as a plain
/// function pointer at declaration time. Calling it is deferred until
/// navigation needs the related schema, which keeps mutually-referential
/// models (parent declares child, child declares parent) well-defined.
pub type SchemaRef = fn() -> &'static Schema;

/// A wrapper type: binds tree nodes named [`Model::node_name`] and runs its
/// declarations in [`Model::declare`].
pub trait Model: 'static {
    /// The node name this type binds to. Defaults to the snake_case form of
    /// the type name; override for names that differ from the type.
    fn node_name() -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        let last = base.rsplit("::").next().unwrap_or(base);
        snake_case(last)
    }

    /// Run the type's declarations against a fresh builder.
    fn declare(schema: &mut SchemaBuilder);
}

/// Declared attribute-child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDecl {
    pub name: String,
    pub required: bool,
}

/// Declared singleton child relation.
#[derive(Debug, Clone)]
pub struct ChildDecl {
    pub node_name: String,
    pub wrapper: SchemaRef,
}

/// Declared children collection relation.
#[derive(Debug, Clone)]
pub struct ChildrenDecl {
    pub element_name: String,
    pub scope: Scope,
    pub wrapper: SchemaRef,
}

/// Where the members of a children collection live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Members are grouped under a dedicated collection node of this name.
    Named(String),
    /// Members are direct children of the bound node itself.
    Direct,
}

impl Scope {
    pub fn named(name: impl Into<String>) -> Scope {
        Scope::Named(name.into())
    }
}

/// Declared parent relation.
#[derive(Debug, Clone)]
pub struct ParentDecl {
    pub node_name: String,
    pub wrapper: SchemaRef,
}

/// The effective, merged declaration set of one wrapper type. Immutable
/// once resolved.
#[derive(Debug)]
pub struct Schema {
    node_name: String,
    attributes: Vec<AttrDecl>,
    singletons: IndexMap<String, ChildDecl>,
    collections: IndexMap<String, ChildrenDecl>,
    parent: Option<(String, ParentDecl)>,
}

impl Schema {
    /// Resolve the schema of `M`, computing and caching it on first use.
    /// Repeated calls return the same `&'static` value.
    pub fn of<M: Model>() -> &'static Schema {
        let key = TypeId::of::<M>();
        if let Some(schema) = registry()
            .read()
            .expect("schema registry poisoned")
            .get(&key)
            .copied()
        {
            return schema;
        }
        // build outside the lock: declare() may resolve other schemas
        let mut builder = SchemaBuilder::new(M::node_name());
        M::declare(&mut builder);
        let built: &'static Schema = Box::leak(Box::new(builder.build()));
        let mut registry = registry().write().expect("schema registry poisoned");
        *registry.entry(key).or_insert(built)
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Declared attribute-children, in declaration order.
    pub fn attributes(&self) -> &[AttrDecl] {
        &self.attributes
    }

    pub fn singleton(&self, accessor: &str) -> Option<&ChildDecl> {
        self.singletons.get(accessor)
    }

    pub fn singletons(&self) -> &IndexMap<String, ChildDecl> {
        &self.singletons
    }

    pub fn collection(&self, accessor: &str) -> Option<&ChildrenDecl> {
        self.collections.get(accessor)
    }

    pub fn collections(&self) -> &IndexMap<String, ChildrenDecl> {
        &self.collections
    }

    /// The declared parent accessor and declaration, if any.
    pub fn parent(&self) -> Option<(&str, &ParentDecl)> {
        self.parent.as_ref().map(|(accessor, decl)| (accessor.as_str(), decl))
    }
}

fn registry() -> &'static RwLock<HashMap<TypeId, &'static Schema>> {
    static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static Schema>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Accumulates declarations for one type.
///
/// Declarations are additive and order-preserving; redeclaring an accessor
/// overwrites it in place. [`SchemaBuilder::inherit`] copies an ancestor's
/// declarations without displacing anything already declared here, so the
/// most specific declaration always wins regardless of call order.
#[derive(Debug)]
pub struct SchemaBuilder {
    node_name: String,
    attributes: Vec<AttrDecl>,
    singletons: IndexMap<String, ChildDecl>,
    collections: IndexMap<String, ChildrenDecl>,
    parent: Option<(String, ParentDecl)>,
}

impl SchemaBuilder {
    fn new(node_name: String) -> SchemaBuilder {
        SchemaBuilder {
            node_name,
            attributes: Vec::new(),
            singletons: IndexMap::new(),
            collections: IndexMap::new(),
            parent: None,
        }
    }

    /// Override the node name this type binds to.
    pub fn node_name(&mut self, name: &str) -> &mut Self {
        self.node_name = name.to_owned();
        self
    }

    /// Declare required attribute-children. Construction fails when one is
    /// missing from the bound node.
    pub fn attributes(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.push_attr(name, true);
        }
        self
    }

    /// Declare optional attribute-children. A missing child materializes as
    /// [`crate::Value::Absent`].
    pub fn optional_attributes(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.push_attr(name, false);
        }
        self
    }

    fn push_attr(&mut self, name: &str, required: bool) {
        match self.attributes.iter_mut().find(|attr| attr.name == *name) {
            Some(existing) => existing.required = required,
            None => self.attributes.push(AttrDecl {
                name: (*name).to_owned(),
                required,
            }),
        }
    }

    /// Declare a singleton child found under `M`'s own node name.
    pub fn child<M: Model>(&mut self, accessor: &str) -> &mut Self {
        let node_name = M::node_name();
        self.child_named::<M>(accessor, &node_name)
    }

    /// Declare a singleton child found under an explicit node name.
    pub fn child_named<M: Model>(&mut self, accessor: &str, node_name: &str) -> &mut Self {
        self.singletons.insert(
            accessor.to_owned(),
            ChildDecl {
                node_name: node_name.to_owned(),
                wrapper: Schema::of::<M>,
            },
        );
        self
    }

    /// Declare a children collection: `element_name` nodes under the given
    /// [`Scope`], each wrapped as `M`.
    pub fn children<M: Model>(
        &mut self,
        accessor: &str,
        element_name: &str,
        scope: Scope,
    ) -> &mut Self {
        self.collections.insert(
            accessor.to_owned(),
            ChildrenDecl {
                element_name: element_name.to_owned(),
                scope,
                wrapper: Schema::of::<M>,
            },
        );
        self
    }

    /// Declare the parent relation, found by walking ancestors for `M`'s
    /// own node name.
    pub fn parent<M: Model>(&mut self, accessor: &str) -> &mut Self {
        let node_name = M::node_name();
        self.parent_named::<M>(accessor, &node_name)
    }

    /// Declare the parent relation with an explicit ancestor node name.
    pub fn parent_named<M: Model>(&mut self, accessor: &str, node_name: &str) -> &mut Self {
        self.parent = Some((
            accessor.to_owned(),
            ParentDecl {
                node_name: node_name.to_owned(),
                wrapper: Schema::of::<M>,
            },
        ));
        self
    }

    /// Copy `P`'s resolved declarations into this builder. Entries already
    /// declared here are kept untouched; nothing is ever removed.
    pub fn inherit<P: Model>(&mut self) -> &mut Self {
        let ancestor = Schema::of::<P>();
        for attr in ancestor.attributes() {
            if !self.attributes.iter().any(|own| own.name == attr.name) {
                self.attributes.push(attr.clone());
            }
        }
        for (accessor, decl) in ancestor.singletons() {
            if !self.singletons.contains_key(accessor) {
                self.singletons.insert(accessor.clone(), decl.clone());
            }
        }
        for (accessor, decl) in ancestor.collections() {
            if !self.collections.contains_key(accessor) {
                self.collections.insert(accessor.clone(), decl.clone());
            }
        }
        if self.parent.is_none() {
            self.parent = ancestor
                .parent()
                .map(|(accessor, decl)| (accessor.to_owned(), decl.clone()));
        }
        self
    }

    fn build(self) -> Schema {
        Schema {
            node_name: self.node_name,
            attributes: self.attributes,
            singletons: self.singletons,
            collections: self.collections,
            parent: self.parent,
        }
    }
}
