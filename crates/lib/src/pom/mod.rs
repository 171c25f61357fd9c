//! Typed document model for POM manifests.
//!
//! The manifest is parsed once into an owned [`Element`] tree. Elements keep
//! their local (namespace-stripped) tag name, their text content and their
//! children in document order. Extractors query the tree by structural path
//! instead of indexing into an untyped object.
//!
//! # Example
//!
//! ```
//! use pomfetch_lib::pom;
//!
//! let root = pom::parse(b"<project><parent><version>2.0</version></parent></project>").unwrap();
//! assert_eq!(root.path(&["parent", "version"]).map(|v| v.text()), Some("2.0"));
//! ```

mod element;
mod parser;

pub use element::Element;
pub use parser::{ParseError, parse};
