//! Classes and their extension edges

use serde::{Deserialize, Serialize};
use std::fmt;

use super::attrs::{Attr, AttrType, Tag};
use super::restrictions::Restrictions;
use crate::namespaces::QName;

/// Stable handle of a class inside a [`ClassContainer`](crate::container::ClassContainer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(pub usize);

impl ClassId {
    /// Arena position of the class
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An inheritance edge from a class to a base type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    /// The base type
    #[serde(rename = "type")]
    pub type_: AttrType,
    /// Restrictions the edge applies to inherited fields
    #[serde(default)]
    pub restrictions: Restrictions,
}

impl Extension {
    /// Create an extension without restrictions
    pub fn new(type_: AttrType) -> Self {
        Self {
            type_,
            restrictions: Restrictions::default(),
        }
    }

    /// Builder: set the restrictions
    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }
}

/// A schema-derived type that will become one generated class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Qualified name
    pub qname: QName,
    /// Schema component the class came from
    pub tag: Tag,
    /// Whether the type is abstract
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Whether mixed content is allowed
    #[serde(default)]
    pub mixed: bool,
    /// Ordered fields
    #[serde(default)]
    pub attrs: Vec<Attr>,
    /// Ordered base types
    #[serde(default)]
    pub extensions: Vec<Extension>,
    /// Nested anonymous classes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<ClassId>,
    /// Schema location the class was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Class {
    /// Create an empty class
    pub fn new(qname: QName, tag: Tag) -> Self {
        Self {
            qname,
            tag,
            is_abstract: false,
            mixed: false,
            attrs: Vec::new(),
            extensions: Vec::new(),
            inner: Vec::new(),
            location: None,
        }
    }

    /// Builder: append an attribute
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    /// Builder: append an extension
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Local name of the class
    pub fn name(&self) -> &str {
        &self.qname.local_name
    }

    /// Every field is an enumeration member
    pub fn is_enumeration(&self) -> bool {
        !self.attrs.is_empty() && self.attrs.iter().all(Attr::is_enumeration)
    }

    /// Derived from a component that produces a structured class and not a
    /// flat value holder
    pub fn is_complex(&self) -> bool {
        matches!(self.tag, Tag::ComplexType | Tag::Element | Tag::Group) && !self.is_simple_type()
    }

    /// A flat holder of a single text value
    pub fn is_simple_type(&self) -> bool {
        self.attrs.len() == 1 && self.attrs[0].tag.is_text_value()
    }

    /// Has a catch-all text or wildcard field
    pub fn has_suffix_attr(&self) -> bool {
        self.attrs.iter().any(Attr::is_suffix)
    }

    /// Find a field by name
    pub fn find_attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|attr| attr.is_named(name))
    }

    /// Position of an extension equal to the given one
    pub fn extension_position(&self, extension: &Extension) -> Option<usize> {
        self.extensions.iter().position(|ext| ext == extension)
    }

    /// Remove the first extension equal to the given one
    pub fn remove_extension(&mut self, extension: &Extension) -> bool {
        match self.extension_position(extension) {
            Some(index) => {
                self.extensions.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DataType;

    fn qname(name: &str) -> QName {
        QName::namespaced("urn:test", name)
    }

    #[test]
    fn test_is_enumeration() {
        let class = Class::new(qname("Color"), Tag::SimpleType)
            .with_attr(Attr::enumeration("red", "red"))
            .with_attr(Attr::enumeration("green", "green"));
        assert!(class.is_enumeration());

        let mixed = class.clone().with_attr(Attr::new("x", Tag::Element));
        assert!(!mixed.is_enumeration());

        assert!(!Class::new(qname("Empty"), Tag::SimpleType).is_enumeration());
    }

    #[test]
    fn test_is_simple_type() {
        let class = Class::new(qname("Code"), Tag::SimpleType)
            .with_attr(Attr::new("value", Tag::Restriction).with_type(AttrType::native(DataType::String)));
        assert!(class.is_simple_type());
        assert!(class.has_suffix_attr());
        assert!(!class.is_complex());

        let complex = Class::new(qname("Book"), Tag::ComplexType)
            .with_attr(Attr::new("title", Tag::Element));
        assert!(!complex.is_simple_type());
        assert!(!complex.has_suffix_attr());
        assert!(complex.is_complex());

        let text = Class::new(qname("Text"), Tag::ComplexType)
            .with_attr(Attr::new("@value", Tag::Extension).with_type(AttrType::native(DataType::String)));
        assert!(text.is_simple_type());
        assert!(!text.is_complex());
    }

    #[test]
    fn test_remove_extension() {
        let ext = Extension::new(AttrType::class(qname("Base")));
        let mut class = Class::new(qname("Child"), Tag::ComplexType)
            .with_extension(ext.clone())
            .with_extension(Extension::new(AttrType::native(DataType::String)));

        assert!(class.remove_extension(&ext));
        assert!(!class.remove_extension(&ext));
        assert_eq!(class.extensions.len(), 1);
    }

    #[test]
    fn test_serde_field_names() {
        let class = Class::new(qname("Child"), Tag::ComplexType)
            .with_extension(Extension::new(AttrType::class(qname("Base"))));
        let json = serde_json::to_value(&class).unwrap();

        assert_eq!(json["qname"], "{urn:test}Child");
        assert_eq!(json["tag"], "complexType");
        assert_eq!(json["extensions"][0]["type"]["qname"], "{urn:test}Base");
        assert!(json.get("inner").is_none());
    }
}
