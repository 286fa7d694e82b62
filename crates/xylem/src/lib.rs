//! xylem — schema-declared binding of XML documents to typed wrappers.
//!
//! Each model type declares, once, which node attributes and child
//! structures its wrappers expose ([`Model::declare`]). The runtime uses
//! that declaration to materialize [`Element`] wrappers on demand, navigate
//! between related wrappers (parent and children), and run path queries
//! over the whole document.
//!
//! # Example
//!
//! ```
//! use xylem::{Binder, Model, SchemaBuilder, Scope, Value};
//!
//! struct Company;
//! struct Employee;
//!
//! impl Model for Company {
//!     fn declare(schema: &mut SchemaBuilder) {
//!         schema
//!             .attributes(&["name"])
//!             .children::<Employee>("employees", "employee", Scope::named("employees"));
//!     }
//! }
//!
//! impl Model for Employee {
//!     fn declare(schema: &mut SchemaBuilder) {
//!         schema.attributes(&["name"]).parent::<Company>("company");
//!     }
//! }
//!
//! let binder = Binder::parse(
//!     br#"<companies>
//!           <company reality="real">
//!             <name>37Signals</name>
//!             <employees>
//!               <employee><name>David</name></employee>
//!               <employee><name>Jason</name></employee>
//!             </employees>
//!           </company>
//!         </companies>"#,
//! )
//! .unwrap();
//!
//! let company = binder.find_first::<Company>(None).unwrap().unwrap();
//! assert_eq!(company.attr("name"), Some(&Value::text("37Signals")));
//! assert_eq!(company.attr("reality"), Some(&Value::text("real")));
//!
//! let employees = company.children("employees").unwrap();
//! assert_eq!(employees.len().unwrap(), 2);
//!
//! let david = employees.first().unwrap().unwrap();
//! assert!(*david.parent("company").unwrap() == *company);
//! ```

mod error;
pub use error::BindError;

mod schema;
pub use schema::{
    AttrDecl, ChildDecl, ChildrenDecl, Model, ParentDecl, Schema, SchemaBuilder, SchemaRef, Scope,
};

mod value;
pub use value::{typecast, Value};

mod element;
pub use element::Element;

mod resolve;
pub use resolve::{Capability, NativeValue, Resolved};

mod children;
pub use children::Children;

mod find;
pub use find::{Binder, FindOptions, FindResult, Quantifier};

mod util;

pub use xylem_dom::{Document, DomError, NodeId};
