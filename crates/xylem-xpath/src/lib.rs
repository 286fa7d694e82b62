//! Path expressions over xylem documents.
//!
//! This crate provides parsing and evaluation of the location-path subset
//! used for document queries: named steps, `*`, `//` descendant search,
//! and predicates over attributes, child text, node text, and position.
//!
//! # Example
//!
//! ```
//! use xylem_dom::Document;
//! use xylem_xpath::{query, PathParser};
//!
//! let doc = Document::parse_str(
//!     "<companies>\
//!        <company reality=\"real\"><name>37Signals</name></company>\
//!        <company><name>Milliways</name></company>\
//!      </companies>",
//! )
//! .unwrap();
//!
//! let real = query(&doc, "//company[@reality='real']").unwrap();
//! assert_eq!(real.len(), 1);
//!
//! // expressions can also be parsed once and evaluated many times
//! let path = PathParser::parse("companies/company[name='Milliways']").unwrap();
//! assert_eq!(xylem_xpath::eval(&path, &doc).len(), 1);
//! ```

mod ast;
pub use ast::{CompareOp, CompareTarget, NameTest, PathExpr, Predicate, Step};

mod parser;
pub use parser::{ParseError, PathParser};

mod eval;
pub use eval::{eval, eval_from};

use xylem_dom::{Document, NodeId};

/// Parse and evaluate `path` with the document as the context.
pub fn query(doc: &Document, path: &str) -> Result<Vec<NodeId>, ParseError> {
    Ok(eval(&PathParser::parse(path)?, doc))
}

/// Parse and evaluate `path` relative to `scope`.
pub fn query_from(doc: &Document, scope: NodeId, path: &str) -> Result<Vec<NodeId>, ParseError> {
    Ok(eval_from(&PathParser::parse(path)?, doc, scope))
}
