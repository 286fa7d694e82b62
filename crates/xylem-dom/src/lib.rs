//! xylem-dom — arena-backed XML document model.
//!
//! Parses a serialized XML document into an addressable node graph: named
//! nodes with ordered attributes, character data, parent links, and ordered
//! children. Consumers address nodes through [`NodeId`] handles; the
//! document itself is read-only after the parse.
//!
//! # Example
//!
//! ```
//! use xylem_dom::Document;
//!
//! let doc = Document::parse_str(
//!     "<company reality=\"real\"><name>37Signals</name></company>",
//! )
//! .unwrap();
//!
//! let root = doc.root();
//! assert_eq!(doc.name(root), "company");
//! assert_eq!(doc.attribute(root, "reality"), Some("real"));
//!
//! let name = doc.child_named(root, "name").unwrap();
//! assert_eq!(doc.text(name), Some("37Signals"));
//! assert_eq!(doc.parent(name), Some(root));
//! ```

mod document;
pub use document::{Document, NodeId};

mod parse;
pub use parse::DomError;
