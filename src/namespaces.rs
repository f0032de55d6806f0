//! Qualified names and namespace helpers
//!
//! Class and type references are keyed by qualified names written in
//! Clark notation, `{namespace}local`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// XML Namespace URI
pub type NamespaceUri = String;

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Wildcard namespace constraint values
pub struct NamespaceType;

impl NamespaceType {
    /// Any namespace (##any)
    pub const ANY_NS: &'static str = "##any";
    /// Any namespace except the target one (##other)
    pub const OTHER_NS: &'static str = "##other";
    /// No namespace (##local)
    pub const LOCAL_NS: &'static str = "##local";
    /// The schema target namespace (##targetNamespace)
    pub const TARGET_NS: &'static str = "##targetNamespace";
}

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName in the XSD namespace
    pub fn xsd(local_name: impl Into<String>) -> Self {
        Self::namespaced(XSD_NAMESPACE, local_name)
    }

    /// Check whether the name lives in the XSD namespace
    pub fn is_xsd(&self) -> bool {
        self.namespace.as_deref() == Some(XSD_NAMESPACE)
    }

    /// Parse Clark notation, `{namespace}local` or a bare `local`
    pub fn parse(text: &str) -> Result<Self, String> {
        let qname = match text.strip_prefix('{') {
            Some(rest) => {
                let (namespace, local) = rest
                    .split_once('}')
                    .ok_or_else(|| format!("unterminated namespace in '{}'", text))?;
                let namespace = (!namespace.is_empty()).then(|| namespace.to_string());
                QName::new(namespace, local)
            }
            None => QName::local(text),
        };

        if qname.local_name.is_empty() {
            return Err(format!("missing local name in '{}'", text));
        }

        Ok(qname)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

impl FromStr for QName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QName::parse(s)
    }
}

impl From<QName> for String {
    fn from(qname: QName) -> Self {
        qname.to_string()
    }
}

impl TryFrom<String> for QName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QName::parse(&value)
    }
}
