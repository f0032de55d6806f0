//! Class model shared by every code generation pass
//!
//! Upstream ingestion creates these values once; each pass mutates them in
//! place through the [`ClassContainer`](crate::container::ClassContainer).

pub mod attrs;
pub mod classes;
pub mod restrictions;

pub use attrs::{Attr, AttrType, Tag, XmlType};
pub use classes::{Class, ClassId, Extension};
pub use restrictions::{Restrictions, UNBOUNDED};
