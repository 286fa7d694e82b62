//! Type-level queries over a loaded document.

use std::rc::Rc;

use xylem_dom::{Document, NodeId};
use xylem_xpath::PathParser;

use crate::element::Element;
use crate::error::BindError;
use crate::schema::{Model, Schema};

/// How many results a query yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    First,
    Last,
    All,
}

/// Options for [`Binder::find`]. Without an explicit path, the query is
/// "any node named like the model, anywhere in the document".
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub path: Option<String>,
}

impl FindOptions {
    pub fn path(path: impl Into<String>) -> FindOptions {
        FindOptions {
            path: Some(path.into()),
        }
    }
}

/// Result of [`Binder::find`]: a single optional wrapper for `First`/`Last`,
/// an ordered list for `All`. Zero matches are valid results, not errors.
#[derive(Debug, Clone)]
pub enum FindResult {
    One(Option<Rc<Element>>),
    All(Vec<Rc<Element>>),
}

impl FindResult {
    /// The single result; for an `All` result, its first element.
    pub fn into_one(self) -> Option<Rc<Element>> {
        match self {
            FindResult::One(element) => element,
            FindResult::All(all) => all.into_iter().next(),
        }
    }

    /// All results; a `First`/`Last` result becomes a 0- or 1-element list.
    pub fn into_all(self) -> Vec<Rc<Element>> {
        match self {
            FindResult::One(Some(element)) => vec![element],
            FindResult::One(None) => Vec::new(),
            FindResult::All(all) => all,
        }
    }
}

/// Binds wrapper types to one loaded document and answers type-level
/// queries: the entry point external code uses to obtain wrappers from a
/// freshly loaded document.
#[derive(Debug, Clone)]
pub struct Binder {
    doc: Rc<Document>,
}

impl Binder {
    pub fn new(doc: Document) -> Binder {
        Binder { doc: Rc::new(doc) }
    }

    /// Parse and wrap in one step. Malformed input surfaces the provider
    /// error unchanged.
    pub fn parse(bytes: &[u8]) -> Result<Binder, BindError> {
        Ok(Binder::new(Document::parse(bytes)?))
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.doc
    }

    /// Explicitly bind one node as an `M` wrapper.
    pub fn bind<M: Model>(&self, node: NodeId) -> Result<Rc<Element>, BindError> {
        Element::bind::<M>(self.doc.clone(), node).map(Rc::new)
    }

    /// Query the whole document for `M` wrappers.
    pub fn find<M: Model>(
        &self,
        quantifier: Quantifier,
        options: &FindOptions,
    ) -> Result<FindResult, BindError> {
        let schema = Schema::of::<M>();
        let default_path;
        let path = match &options.path {
            Some(path) => path.as_str(),
            None => {
                default_path = format!("//{}", schema.node_name());
                default_path.as_str()
            }
        };
        let expr = PathParser::parse(path).map_err(|err| {
            BindError::InvalidArgument(format!("invalid path expression '{path}': {err}"))
        })?;
        let matches = xylem_xpath::eval(&expr, &self.doc);
        match quantifier {
            Quantifier::All => {
                let all = matches
                    .into_iter()
                    .map(|node| {
                        Element::with_schema(self.doc.clone(), node, schema).map(Rc::new)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FindResult::All(all))
            }
            Quantifier::First => Ok(FindResult::One(
                self.wrap_optional(matches.first().copied(), schema)?,
            )),
            Quantifier::Last => Ok(FindResult::One(
                self.wrap_optional(matches.last().copied(), schema)?,
            )),
        }
    }

    fn wrap_optional(
        &self,
        node: Option<NodeId>,
        schema: &'static Schema,
    ) -> Result<Option<Rc<Element>>, BindError> {
        match node {
            Some(node) => Ok(Some(Rc::new(Element::with_schema(
                self.doc.clone(),
                node,
                schema,
            )?))),
            None => Ok(None),
        }
    }

    /// All matches of `path` (or of the model's default path), in document
    /// order.
    pub fn find_all<M: Model>(&self, path: Option<&str>) -> Result<Vec<Rc<Element>>, BindError> {
        Ok(self
            .find::<M>(Quantifier::All, &self.options_for(path))?
            .into_all())
    }

    /// First match, or `None` when nothing matches.
    pub fn find_first<M: Model>(
        &self,
        path: Option<&str>,
    ) -> Result<Option<Rc<Element>>, BindError> {
        Ok(self
            .find::<M>(Quantifier::First, &self.options_for(path))?
            .into_one())
    }

    /// Last match, or `None` when nothing matches.
    pub fn find_last<M: Model>(
        &self,
        path: Option<&str>,
    ) -> Result<Option<Rc<Element>>, BindError> {
        Ok(self
            .find::<M>(Quantifier::Last, &self.options_for(path))?
            .into_one())
    }

    fn options_for(&self, path: Option<&str>) -> FindOptions {
        match path {
            Some(path) => FindOptions::path(path),
            None => FindOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaBuilder;

    struct Company;
    impl Model for Company {
        fn declare(schema: &mut SchemaBuilder) {
            schema.attributes(&["name"]);
        }
    }

    fn binder() -> Binder {
        Binder::parse(
            br#"<companies>
                  <company reality="real"><name>37Signals</name></company>
                  <company><name>Initech</name></company>
                  <company><name>Milliways</name></company>
                </companies>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_find_all_with_default_path() {
        let binder = binder();
        let companies = binder.find_all::<Company>(None).unwrap();
        assert_eq!(companies.len(), 3);
    }

    #[test]
    fn test_find_first_and_last() {
        let binder = binder();
        let first = binder.find_first::<Company>(None).unwrap().unwrap();
        assert_eq!(first.attr("name"), Some(&crate::Value::text("37Signals")));
        let last = binder.find_last::<Company>(None).unwrap().unwrap();
        assert_eq!(last.attr("name"), Some(&crate::Value::text("Milliways")));
    }

    #[test]
    fn test_find_with_explicit_path() {
        let binder = binder();
        let real = binder
            .find_all::<Company>(Some("companies/company[@reality='real']"))
            .unwrap();
        assert_eq!(real.len(), 1);
    }

    #[test]
    fn test_zero_matches_are_not_errors() {
        let binder = binder();
        let none = binder
            .find_all::<Company>(Some("companies/company[name='Hooli']"))
            .unwrap();
        assert!(none.is_empty());
        assert!(binder
            .find_first::<Company>(Some("companies/company[name='Hooli']"))
            .unwrap()
            .is_none());
        assert!(binder
            .find_last::<Company>(Some("companies/company[name='Hooli']"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_malformed_path_is_invalid_argument() {
        let binder = binder();
        assert!(matches!(
            binder.find_all::<Company>(Some("company[name=")),
            Err(BindError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_malformed_document_propagates() {
        assert!(matches!(
            Binder::parse(b"<a><b></a>"),
            Err(BindError::Document(_))
        ));
    }

    #[test]
    fn test_find_result_conversions() {
        let binder = binder();
        let all = binder
            .find::<Company>(Quantifier::All, &FindOptions::default())
            .unwrap();
        assert_eq!(all.into_all().len(), 3);
        let first = binder
            .find::<Company>(Quantifier::First, &FindOptions::default())
            .unwrap();
        assert!(first.into_one().is_some());
    }
}
