//! XSD built-in datatypes
//!
//! A native attribute type points at one of these instead of a class in the
//! container.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::namespaces::QName;

/// Built-in XSD datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DataType {
    // String types
    /// xs:string
    String,
    /// xs:normalizedString
    NormalizedString,
    /// xs:token
    Token,
    /// xs:language
    Language,
    /// xs:Name
    Name,
    /// xs:NCName
    NcName,
    /// xs:ID
    Id,
    /// xs:IDREF
    IdRef,
    /// xs:IDREFS
    IdRefs,
    /// xs:ENTITY
    Entity,
    /// xs:ENTITIES
    Entities,
    /// xs:NMTOKEN
    NmToken,
    /// xs:NMTOKENS
    NmTokens,

    /// xs:boolean
    Boolean,

    // Numeric types
    /// xs:decimal
    Decimal,
    /// xs:integer
    Integer,
    /// xs:long
    Long,
    /// xs:int
    Int,
    /// xs:short
    Short,
    /// xs:byte
    Byte,
    /// xs:nonNegativeInteger
    NonNegativeInteger,
    /// xs:positiveInteger
    PositiveInteger,
    /// xs:unsignedLong
    UnsignedLong,
    /// xs:unsignedInt
    UnsignedInt,
    /// xs:unsignedShort
    UnsignedShort,
    /// xs:unsignedByte
    UnsignedByte,
    /// xs:nonPositiveInteger
    NonPositiveInteger,
    /// xs:negativeInteger
    NegativeInteger,
    /// xs:float
    Float,
    /// xs:double
    Double,

    // Date/time types
    /// xs:duration
    Duration,
    /// xs:dateTime
    DateTime,
    /// xs:time
    Time,
    /// xs:date
    Date,
    /// xs:gYearMonth
    GYearMonth,
    /// xs:gYear
    GYear,
    /// xs:gMonthDay
    GMonthDay,
    /// xs:gDay
    GDay,
    /// xs:gMonth
    GMonth,

    // Binary types
    /// xs:hexBinary
    HexBinary,
    /// xs:base64Binary
    Base64Binary,

    // Other types
    /// xs:anyURI
    AnyUri,
    /// xs:QName
    QName,
    /// xs:NOTATION
    Notation,

    // Special types
    /// xs:anyType, the universal type
    AnyType,
    /// xs:anySimpleType
    AnySimpleType,
    /// xs:anyAtomicType (XSD 1.1)
    AnyAtomicType,
}

const ALL: &[DataType] = &[
    DataType::String,
    DataType::NormalizedString,
    DataType::Token,
    DataType::Language,
    DataType::Name,
    DataType::NcName,
    DataType::Id,
    DataType::IdRef,
    DataType::IdRefs,
    DataType::Entity,
    DataType::Entities,
    DataType::NmToken,
    DataType::NmTokens,
    DataType::Boolean,
    DataType::Decimal,
    DataType::Integer,
    DataType::Long,
    DataType::Int,
    DataType::Short,
    DataType::Byte,
    DataType::NonNegativeInteger,
    DataType::PositiveInteger,
    DataType::UnsignedLong,
    DataType::UnsignedInt,
    DataType::UnsignedShort,
    DataType::UnsignedByte,
    DataType::NonPositiveInteger,
    DataType::NegativeInteger,
    DataType::Float,
    DataType::Double,
    DataType::Duration,
    DataType::DateTime,
    DataType::Time,
    DataType::Date,
    DataType::GYearMonth,
    DataType::GYear,
    DataType::GMonthDay,
    DataType::GDay,
    DataType::GMonth,
    DataType::HexBinary,
    DataType::Base64Binary,
    DataType::AnyUri,
    DataType::QName,
    DataType::Notation,
    DataType::AnyType,
    DataType::AnySimpleType,
    DataType::AnyAtomicType,
];

static BY_CODE: Lazy<HashMap<&'static str, DataType>> =
    Lazy::new(|| ALL.iter().map(|dt| (dt.code(), *dt)).collect());

impl DataType {
    /// The XSD local name of this datatype
    pub fn code(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::NormalizedString => "normalizedString",
            DataType::Token => "token",
            DataType::Language => "language",
            DataType::Name => "Name",
            DataType::NcName => "NCName",
            DataType::Id => "ID",
            DataType::IdRef => "IDREF",
            DataType::IdRefs => "IDREFS",
            DataType::Entity => "ENTITY",
            DataType::Entities => "ENTITIES",
            DataType::NmToken => "NMTOKEN",
            DataType::NmTokens => "NMTOKENS",
            DataType::Boolean => "boolean",
            DataType::Decimal => "decimal",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Int => "int",
            DataType::Short => "short",
            DataType::Byte => "byte",
            DataType::NonNegativeInteger => "nonNegativeInteger",
            DataType::PositiveInteger => "positiveInteger",
            DataType::UnsignedLong => "unsignedLong",
            DataType::UnsignedInt => "unsignedInt",
            DataType::UnsignedShort => "unsignedShort",
            DataType::UnsignedByte => "unsignedByte",
            DataType::NonPositiveInteger => "nonPositiveInteger",
            DataType::NegativeInteger => "negativeInteger",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Duration => "duration",
            DataType::DateTime => "dateTime",
            DataType::Time => "time",
            DataType::Date => "date",
            DataType::GYearMonth => "gYearMonth",
            DataType::GYear => "gYear",
            DataType::GMonthDay => "gMonthDay",
            DataType::GDay => "gDay",
            DataType::GMonth => "gMonth",
            DataType::HexBinary => "hexBinary",
            DataType::Base64Binary => "base64Binary",
            DataType::AnyUri => "anyURI",
            DataType::QName => "QName",
            DataType::Notation => "NOTATION",
            DataType::AnyType => "anyType",
            DataType::AnySimpleType => "anySimpleType",
            DataType::AnyAtomicType => "anyAtomicType",
        }
    }

    /// Look up a datatype by its XSD local name
    pub fn from_code(code: &str) -> Option<Self> {
        BY_CODE.get(code).copied()
    }

    /// Look up a datatype by qualified name; only names in the XSD namespace match
    pub fn from_qname(qname: &QName) -> Option<Self> {
        if qname.is_xsd() {
            Self::from_code(&qname.local_name)
        } else {
            None
        }
    }

    /// The qualified name of this datatype
    pub fn qname(&self) -> QName {
        QName::xsd(self.code())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<DataType> for String {
    fn from(dt: DataType) -> Self {
        dt.code().to_string()
    }
}

impl TryFrom<String> for DataType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DataType::from_code(&value).ok_or_else(|| format!("unknown datatype '{}'", value))
    }
}
