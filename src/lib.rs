//! # xsdgen
//!
//! Extension resolution for classes derived from XML Schema documents.
//!
//! Schema ingestion produces a graph of classes whose inheritance edges
//! mirror the schema: multiple extension, enumerations over enumerations,
//! circular references. Single-inheritance targets cannot express all of
//! that, so before rendering every edge is kept, flattened into copied
//! fields, rewritten into a synthetic field or dropped.
//!
//! ## Example
//!
//! ```rust
//! use xsdgen::datatypes::DataType;
//! use xsdgen::models::{AttrType, Class, Extension, Tag};
//! use xsdgen::namespaces::QName;
//! use xsdgen::{resolve_extensions, ClassContainer};
//!
//! let mut container = ClassContainer::new();
//! let id = container.add(
//!     Class::new(QName::namespaced("urn:books", "isbn"), Tag::ComplexType)
//!         .with_extension(Extension::new(AttrType::native(DataType::String))),
//! );
//!
//! resolve_extensions(&mut container).unwrap();
//!
//! assert!(container[id].extensions.is_empty());
//! assert!(container[id].find_attr("@value").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod datatypes;
pub mod error;
pub mod handlers;
pub mod models;
pub mod namespaces;
pub mod utils;

// Re-exports for convenience
pub use config::{ExtensionOrder, GeneratorConfig};
pub use container::{ClassContainer, ContainerDump};
pub use error::{Error, Result};
pub use handlers::{resolve_extensions, resolve_extensions_with, ClassExtensionHandler, ResolveSummary};

/// Version of the xsdgen library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
