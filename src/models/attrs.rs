//! Attributes and their type references

use serde::{Deserialize, Serialize};
use std::fmt;

use super::classes::ClassId;
use super::restrictions::Restrictions;
use crate::datatypes::DataType;
use crate::namespaces::QName;

/// The schema component a class or attribute was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tag {
    /// xs:all
    All,
    /// xs:any
    Any,
    /// xs:anyAttribute
    AnyAttribute,
    /// xs:attribute
    Attribute,
    /// xs:attributeGroup
    AttributeGroup,
    /// xs:choice
    Choice,
    /// xs:complexType
    ComplexType,
    /// xs:element
    Element,
    /// xs:enumeration
    Enumeration,
    /// xs:extension
    Extension,
    /// xs:group
    Group,
    /// xs:list
    List,
    /// xs:restriction
    Restriction,
    /// xs:sequence
    Sequence,
    /// xs:simpleType
    SimpleType,
    /// xs:union
    Union,
}

impl Tag {
    /// The field role an attribute with this tag plays in the generated class.
    ///
    /// `None` means a plain text value.
    pub fn xml_type(&self) -> Option<XmlType> {
        match self {
            Tag::Element => Some(XmlType::Element),
            Tag::Attribute => Some(XmlType::Attribute),
            Tag::Any => Some(XmlType::Wildcard),
            Tag::AnyAttribute => Some(XmlType::Attributes),
            _ => None,
        }
    }

    /// Tags of attributes that hold the text value of a simple type
    pub fn is_text_value(&self) -> bool {
        matches!(self, Tag::Extension | Tag::Restriction | Tag::SimpleType)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::All => "All",
            Tag::Any => "Any",
            Tag::AnyAttribute => "AnyAttribute",
            Tag::Attribute => "Attribute",
            Tag::AttributeGroup => "AttributeGroup",
            Tag::Choice => "Choice",
            Tag::ComplexType => "ComplexType",
            Tag::Element => "Element",
            Tag::Enumeration => "Enumeration",
            Tag::Extension => "Extension",
            Tag::Group => "Group",
            Tag::List => "List",
            Tag::Restriction => "Restriction",
            Tag::Sequence => "Sequence",
            Tag::SimpleType => "SimpleType",
            Tag::Union => "Union",
        };
        write!(f, "{}", name)
    }
}

/// Field role of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XmlType {
    /// Child element
    Element,
    /// XML attribute
    Attribute,
    /// Element wildcard
    Wildcard,
    /// Attribute wildcard
    Attributes,
}

/// A reference to the type of an attribute or extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrType {
    /// Qualified name of the referenced type
    pub qname: QName,
    /// Whether this is a built-in datatype
    #[serde(default)]
    pub native: bool,
    /// The datatype of a native type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<DataType>,
    /// Alias chosen by an earlier pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Points at an inner class of the owner
    #[serde(default)]
    pub forward: bool,
    /// Points back at the owner
    #[serde(default)]
    pub circular: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<ClassId>,
}

impl AttrType {
    /// A reference to a built-in datatype
    pub fn native(datatype: DataType) -> Self {
        Self {
            qname: datatype.qname(),
            native: true,
            datatype: Some(datatype),
            alias: None,
            forward: false,
            circular: false,
            reference: None,
        }
    }

    /// A reference to a class by qualified name
    pub fn class(qname: QName) -> Self {
        Self {
            qname,
            native: false,
            datatype: None,
            alias: None,
            forward: false,
            circular: false,
            reference: None,
        }
    }

    /// A forward reference to an inner class
    pub fn forward(qname: QName) -> Self {
        Self {
            forward: true,
            ..Self::class(qname)
        }
    }

    /// Local part of the referenced name
    pub fn name(&self) -> &str {
        &self.qname.local_name
    }

    /// The class this type was resolved to, if any
    pub fn reference(&self) -> Option<ClassId> {
        self.reference
    }

    /// Stamp the resolved class. Native types never carry a reference.
    pub fn set_reference(&mut self, id: ClassId) -> bool {
        if self.native {
            return false;
        }
        self.reference = Some(id);
        true
    }

    /// Check whether this is the universal `anyType`
    pub fn is_any_type(&self) -> bool {
        self.datatype == Some(DataType::AnyType)
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qname)
    }
}

/// A named field of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    /// Field name; nameless attributes never match by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name as it appears in the schema
    #[serde(default)]
    pub local_name: String,
    /// Schema component the field came from
    pub tag: Tag,
    /// Type union
    #[serde(default)]
    pub types: Vec<AttrType>,
    /// Facets and cardinality
    #[serde(default)]
    pub restrictions: Restrictions,
    /// Default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Whether the default is the only allowed value
    #[serde(default)]
    pub fixed: bool,
    /// Whether mixed content is allowed
    #[serde(default)]
    pub mixed: bool,
    /// Members of a compound field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Attr>,
    /// Namespace or wildcard namespace constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Attr {
    /// Create a named attribute
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        Self {
            local_name: name.clone(),
            name: Some(name),
            tag,
            types: Vec::new(),
            restrictions: Restrictions::default(),
            default: None,
            fixed: false,
            mixed: false,
            choices: Vec::new(),
            namespace: None,
        }
    }

    /// Create an attribute without a name
    pub fn nameless(tag: Tag) -> Self {
        Self {
            name: None,
            local_name: String::new(),
            ..Self::new("", tag)
        }
    }

    /// An enumeration member
    pub fn enumeration(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            fixed: true,
            ..Self::new(name, Tag::Enumeration)
        }
    }

    /// Builder: append a type to the union
    pub fn with_type(mut self, tp: AttrType) -> Self {
        self.push_type(tp);
        self
    }

    /// Builder: set the restrictions
    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Builder: set the default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The field name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name match; nameless attributes never match
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    /// Append a type unless an equal one is already in the union
    pub fn push_type(&mut self, tp: AttrType) {
        if !self.types.contains(&tp) {
            self.types.push(tp);
        }
    }

    /// Check if this is an enumeration member
    pub fn is_enumeration(&self) -> bool {
        self.tag == Tag::Enumeration
    }

    /// Check if this attribute can only be the last field of a class
    pub fn is_suffix(&self) -> bool {
        self.tag.is_text_value() || self.tag == Tag::Any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_type() {
        assert_eq!(Tag::Element.xml_type(), Some(XmlType::Element));
        assert_eq!(Tag::Any.xml_type(), Some(XmlType::Wildcard));
        assert_eq!(Tag::Extension.xml_type(), None);
        assert_eq!(Tag::Enumeration.xml_type(), None);
    }

    #[test]
    fn test_native_type_refuses_reference() {
        let mut tp = AttrType::native(DataType::String);
        assert!(!tp.set_reference(ClassId(3)));
        assert_eq!(tp.reference(), None);

        let mut tp = AttrType::class(QName::local("Base"));
        assert!(tp.set_reference(ClassId(3)));
        assert_eq!(tp.reference(), Some(ClassId(3)));
    }

    #[test]
    fn test_type_union_is_a_set() {
        let mut attr = Attr::new("x", Tag::Element)
            .with_type(AttrType::native(DataType::String))
            .with_type(AttrType::native(DataType::String));
        assert_eq!(attr.types.len(), 1);

        attr.push_type(AttrType::native(DataType::Int));
        assert_eq!(attr.types.len(), 2);
    }

    #[test]
    fn test_nameless_never_matches() {
        let attr = Attr::nameless(Tag::Any);
        assert!(!attr.is_named(""));
        assert_eq!(attr.name(), None);

        assert!(Attr::new("x", Tag::Element).is_named("x"));
    }

    #[test]
    fn test_suffix_attrs() {
        assert!(Attr::new("@value", Tag::Extension).is_suffix());
        assert!(Attr::new("@any_element", Tag::Any).is_suffix());
        assert!(!Attr::new("x", Tag::Element).is_suffix());
        assert!(!Attr::new("x", Tag::AnyAttribute).is_suffix());
    }
}
