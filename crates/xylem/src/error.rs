//! Error taxonomy of the binding layer.

use thiserror::Error;
use xylem_dom::DomError;

/// Failures surfaced by schema binding, navigation, and queries.
///
/// Absent singleton children, empty collections, and zero query matches are
/// not errors; they are ordinary `None`/empty results.
#[derive(Debug, Error)]
pub enum BindError {
    /// The caller passed a value of the wrong shape: a node handle that is
    /// not part of the bound document, or a malformed path expression.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A required attribute-child, or a declared parent ancestor, could not
    /// be found where the schema demands one.
    #[error("expected <{parent}> to contain <{child}>")]
    MissingStructure { parent: String, child: String },
    /// The accessor matches no declaration and no native node operation.
    #[error("unknown accessor '{0}'")]
    UnknownAccessor(String),
    /// Document provider failure, propagated unchanged.
    #[error(transparent)]
    Document(#[from] DomError),
}
