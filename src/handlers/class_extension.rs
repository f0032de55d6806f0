//! Class extension resolution
//!
//! Every extension edge is either kept as real inheritance, flattened into
//! copied fields, rewritten into a synthetic field, or dropped. Edges that
//! survive are stamped with the id of their base class.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

use super::ClassHandler;
use crate::config::ExtensionOrder;
use crate::container::ClassContainer;
use crate::error::{Error, HierarchyError, Result};
use crate::models::{Attr, Class, ClassId, Extension, Tag};
use crate::namespaces::{NamespaceType, QName};
use crate::utils;

/// How an extension edge is handled, decided before anything is mutated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    /// The base is a built-in datatype
    Native,
    /// The base class is not in the container
    Missing,
    /// The target is an enumeration
    Enumeration(ClassId),
    /// The base is a simple type or an enumeration
    Simple(ClassId),
    /// The base is a complex type
    Complex(ClassId),
}

/// Outcome of a simple extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleAction {
    /// Drop the edge
    Drop,
    /// Store the base as the type of a synthetic value field
    DefaultAttribute,
    /// Copy the base fields
    Copy,
}

/// Outcome of a complex extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexAction {
    /// Drop the edge without copying anything
    Remove,
    /// Copy the base fields and drop the edge
    Flatten,
    /// Keep the edge as real inheritance
    Retain,
}

/// Edge counts of a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveSummary {
    /// Edges kept as inheritance
    pub retained: usize,
    /// Edges replaced by copied or merged fields
    pub flattened: usize,
    /// Edges dropped without copying
    pub removed: usize,
    /// Edges turned into synthetic value fields or member types
    pub native: usize,
    /// Edges whose base could not be found
    pub missing: usize,
}

/// Reduces class extensions by copying or creating attributes
#[derive(Debug, Default)]
pub struct ClassExtensionHandler {
    order: ExtensionOrder,
    summary: ResolveSummary,
}

impl ClassHandler for ClassExtensionHandler {
    fn process(&mut self, container: &mut ClassContainer, target: ClassId) -> Result<()> {
        let mut snapshot = container[target].extensions.clone();
        if self.order == ExtensionOrder::Reverse {
            snapshot.reverse();
        }

        for ext in &snapshot {
            // an earlier edge may have replaced the whole list
            if container[target].extension_position(ext).is_some() {
                self.process_extension(container, target, ext)?;
            }
        }

        // edges adopted from a base while converting an enumeration
        while let Some(ext) = Self::next_adopted(container, target, &snapshot) {
            self.process_extension(container, target, &ext)?;
        }

        // a later edge may have added fields that rule out an earlier retain
        while let Some((source, ext)) = Self::next_unstable(container, target) {
            debug!("Flatten extension: {} of {}", ext.type_.qname, container[target].qname);
            self.summary.retained = self.summary.retained.saturating_sub(1);
            self.summary.flattened += 1;
            utils::copy_attributes(container, source, target, &ext)?;
        }

        Ok(())
    }
}

impl ClassExtensionHandler {
    /// Create a handler processing edges in declared order
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the order a class's edges are processed in
    pub fn with_order(mut self, order: ExtensionOrder) -> Self {
        self.order = order;
        self
    }

    /// Counts of everything processed so far
    pub fn summary(&self) -> ResolveSummary {
        self.summary
    }

    fn next_adopted(
        container: &ClassContainer,
        target: ClassId,
        snapshot: &[Extension],
    ) -> Option<Extension> {
        container[target]
            .extensions
            .iter()
            .find(|ext| ext.type_.reference().is_none() && !snapshot.contains(ext))
            .cloned()
    }

    fn next_unstable(container: &ClassContainer, target: ClassId) -> Option<(ClassId, Extension)> {
        container[target].extensions.iter().find_map(|ext| {
            let source = ext.type_.reference()?;
            Self::should_flatten_extension(&container[source], &container[target])
                .then(|| (source, ext.clone()))
        })
    }

    /// Decide which case an edge falls in
    pub fn classify(container: &ClassContainer, target: ClassId, ext: &Extension) -> ExtensionKind {
        if ext.type_.native {
            return ExtensionKind::Native;
        }

        match container.find_type(&ext.type_.qname) {
            None => ExtensionKind::Missing,
            Some(source) if container[target].is_enumeration() => {
                ExtensionKind::Enumeration(source)
            }
            Some(source) => {
                let base = &container[source];
                if !base.is_complex() || base.is_enumeration() {
                    ExtensionKind::Simple(source)
                } else {
                    ExtensionKind::Complex(source)
                }
            }
        }
    }

    fn process_extension(
        &mut self,
        container: &mut ClassContainer,
        target: ClassId,
        ext: &Extension,
    ) -> Result<()> {
        match Self::classify(container, target, ext) {
            ExtensionKind::Native => {
                self.summary.native += 1;
                Self::process_native_extension(&mut container[target], ext);
            }
            ExtensionKind::Missing => {
                warn!("Missing extension type: {}", ext.type_.qname);
                self.summary.missing += 1;
                container[target].remove_extension(ext);
            }
            ExtensionKind::Enumeration(source) => {
                self.summary.flattened += 1;
                container[target].remove_extension(ext);
                Self::process_enum_extension(container, source, target, &mut HashSet::new())?;
            }
            ExtensionKind::Simple(source) => {
                self.process_simple_extension(container, source, target, ext)?;
            }
            ExtensionKind::Complex(source) => {
                self.process_complex_extension(container, source, target, ext)?;
            }
        }

        Ok(())
    }

    /// Enumerations take the datatype as every member's type, other classes
    /// get a default value field.
    fn process_native_extension(target: &mut Class, ext: &Extension) {
        if target.is_enumeration() {
            Self::replace_attributes_type(target, ext);
        } else {
            Self::add_default_attribute(target, ext);
        }
    }

    /// Resolve an enumeration against a base. The edge is already gone.
    ///
    /// 1. Enumeration: adopt the base members
    /// 2. Single field: adopt its types, following class references
    /// 3. Target has one member: it is really a complex type
    /// 4. Anything else cannot be generated
    fn process_enum_extension(
        container: &mut ClassContainer,
        source: ClassId,
        target: ClassId,
        visited: &mut HashSet<ClassId>,
    ) -> Result<()> {
        if !visited.insert(source) {
            debug!("Enumeration base cycle at: {}", container[source].qname);
            return Ok(());
        }

        if container[source].is_enumeration() {
            Self::merge_enumerations(container, source, target);
        } else if container[source].attrs.len() == 1 {
            Self::merge_enumeration_types(container, source, target, visited)?;
        } else if container[target].attrs.len() == 1 {
            Self::convert_to_complex_type(container, source, target);
        } else {
            return Err(HierarchyError::new("Enumeration class with a complex extension.")
                .with_class(container[target].qname.to_string())
                .with_base(container[source].qname.to_string())
                .into());
        }

        Ok(())
    }

    fn merge_enumerations(container: &mut ClassContainer, source: ClassId, target: ClassId) {
        let members = container[source].attrs.clone();
        for attr in &mut container[target].attrs {
            let member = attr
                .name()
                .and_then(|name| members.iter().find(|member| member.is_named(name)));
            if let Some(member) = member {
                *attr = member.clone();
            }
        }
    }

    fn merge_enumeration_types(
        container: &mut ClassContainer,
        source: ClassId,
        target: ClassId,
        visited: &mut HashSet<ClassId>,
    ) -> Result<()> {
        let source_attr = container[source].attrs[0].clone();

        for tp in &source_attr.types {
            if tp.native {
                for attr in &mut container[target].attrs {
                    attr.push_type(tp.clone());
                    attr.restrictions.merge(&source_attr.restrictions);
                }
            } else {
                // unresolved types were reset by the type pass
                let base = container.find_type(&tp.qname).ok_or_else(|| {
                    Error::Invariant(format!(
                        "type '{}' of enumeration base '{}' is not resolvable",
                        tp.qname, container[source].qname
                    ))
                })?;
                Self::process_enum_extension(container, base, target, visited)?;
            }
        }

        Ok(())
    }

    fn convert_to_complex_type(container: &mut ClassContainer, source: ClassId, target: ClassId) {
        let attrs = container[source].attrs.clone();
        let extensions = container[source].extensions.clone();

        let class = &mut container[target];
        let default = class.attrs.first().and_then(|attr| attr.default.clone());
        class.attrs = attrs;
        class.extensions = extensions;

        for attr in &mut class.attrs {
            if attr.tag.xml_type().is_none() {
                attr.default = default.clone();
                attr.fixed = true;
            }
        }
    }

    /// Decide a simple extension
    pub fn simple_action(source: &Class, target: &Class, same: bool) -> SimpleAction {
        if same {
            SimpleAction::Drop
        } else if source.is_enumeration() && !target.is_enumeration() {
            SimpleAction::DefaultAttribute
        } else if source.is_enumeration() == target.is_enumeration() {
            SimpleAction::Copy
        } else {
            SimpleAction::Drop
        }
    }

    fn process_simple_extension(
        &mut self,
        container: &mut ClassContainer,
        source: ClassId,
        target: ClassId,
        ext: &Extension,
    ) -> Result<()> {
        match Self::simple_action(&container[source], &container[target], source == target) {
            SimpleAction::Drop => {
                self.summary.removed += 1;
                container[target].remove_extension(ext);
            }
            SimpleAction::DefaultAttribute => {
                self.summary.native += 1;
                Self::add_default_attribute(&mut container[target], ext);
            }
            SimpleAction::Copy => {
                self.summary.flattened += 1;
                utils::copy_attributes(container, source, target, ext)?;
            }
        }

        Ok(())
    }

    /// Decide a complex extension
    pub fn complex_action(
        container: &ClassContainer,
        source: ClassId,
        target: ClassId,
        ext: &Extension,
    ) -> ComplexAction {
        if Self::should_remove_extension(container, source, target, ext) {
            ComplexAction::Remove
        } else if Self::should_flatten_extension(&container[source], &container[target]) {
            ComplexAction::Flatten
        } else {
            ComplexAction::Retain
        }
    }

    fn process_complex_extension(
        &mut self,
        container: &mut ClassContainer,
        source: ClassId,
        target: ClassId,
        ext: &Extension,
    ) -> Result<()> {
        match Self::complex_action(container, source, target, ext) {
            ComplexAction::Remove => {
                debug!("Remove extension: {} of {}", ext.type_.qname, container[target].qname);
                self.summary.removed += 1;
                container[target].remove_extension(ext);
            }
            ComplexAction::Flatten => {
                debug!("Flatten extension: {} of {}", ext.type_.qname, container[target].qname);
                self.summary.flattened += 1;
                utils::copy_attributes(container, source, target, ext)?;
            }
            ComplexAction::Retain => {
                debug!("Ignore extension: {}", ext.type_.qname);
                self.summary.retained += 1;
                let class = &mut container[target];
                if let Some(index) = class.extension_position(ext) {
                    class.extensions[index].type_.set_reference(source);
                }
            }
        }

        Ok(())
    }

    /// Violations: self reference, the target is nested in the source, or
    /// the source's bases collide with the target's other bases.
    fn should_remove_extension(
        container: &ClassContainer,
        source: ClassId,
        target: ClassId,
        ext: &Extension,
    ) -> bool {
        if source == target || container[source].inner.contains(&target) {
            return true;
        }

        let collision = Self::collision_names(container, target, ext);
        container[source]
            .extensions
            .iter()
            .any(|base| collision.contains(&base.type_.qname))
    }

    /// Names of the target's other bases, plus every ancestor of the ones
    /// already retained.
    fn collision_names(container: &ClassContainer, target: ClassId, ext: &Extension) -> HashSet<QName> {
        let mut names = HashSet::new();
        let mut pending = Vec::new();
        let mut skipped = false;

        for other in &container[target].extensions {
            if !skipped && other == ext {
                skipped = true;
                continue;
            }
            names.insert(other.type_.qname.clone());
            pending.extend(other.type_.reference());
        }

        let mut visited = HashSet::new();
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            for base in &container[id].extensions {
                names.insert(base.type_.qname.clone());
                if base.type_.native {
                    continue;
                }
                pending.extend(
                    base.type_
                        .reference()
                        .or_else(|| container.find_type(&base.type_.qname)),
                );
            }
        }

        names
    }

    /// Rules, only when the source has no bases of its own:
    /// 1. Source is a simple type
    /// 2. Target has a suffix attr
    /// 3. Source has a suffix attr and target has attrs of its own
    /// 4. Target overrides a source attr with a type the source does not allow
    /// 5. Target lists sequential attrs in a different order than the source
    fn should_flatten_extension(source: &Class, target: &Class) -> bool {
        source.extensions.is_empty()
            && (source.is_simple_type()
                || target.has_suffix_attr()
                || (source.has_suffix_attr() && !target.attrs.is_empty())
                || !Self::validate_type_overrides(source, target)
                || !Self::validate_sequential_order(source, target))
    }

    /// Every override uses a subset of the source attr types
    pub fn validate_type_overrides(source: &Class, target: &Class) -> bool {
        target.attrs.iter().all(|attr| {
            match attr.name().and_then(|name| source.find_attr(name)) {
                Some(src_attr) => attr.types.iter().all(|tp| src_attr.types.contains(tp)),
                None => true,
            }
        })
    }

    /// Sequential attrs shared with the source keep the source's relative
    /// order; inherited fields always come first in the generated class.
    pub fn validate_sequential_order(source: &Class, target: &Class) -> bool {
        let sequence: Vec<&str> = target
            .attrs
            .iter()
            .filter(|attr| attr.restrictions.is_sequential())
            .filter_map(Attr::name)
            .collect();
        if sequence.len() <= 1 {
            return true;
        }

        let inherited: Vec<&str> = source
            .attrs
            .iter()
            .filter_map(Attr::name)
            .filter(|name| sequence.contains(name))
            .collect();
        let expected: Vec<&str> = sequence
            .iter()
            .copied()
            .filter(|name| inherited.contains(name))
            .collect();

        inherited == expected
    }

    fn replace_attributes_type(target: &mut Class, ext: &Extension) {
        for attr in &mut target.attrs {
            attr.types.clear();
            attr.types.push(ext.type_.clone());
        }
        target.remove_extension(ext);
    }

    fn add_default_attribute(target: &mut Class, ext: &Extension) {
        let (name, tag, namespace) = if ext.type_.is_any_type() {
            ("@any_element", Tag::Any, Some(NamespaceType::ANY_NS.to_string()))
        } else {
            ("@value", Tag::Extension, None)
        };

        let attr = Self::get_or_create_attribute(target, name, tag);
        attr.push_type(ext.type_.clone());
        attr.restrictions.merge(&ext.restrictions);
        attr.namespace = namespace;
        target.remove_extension(ext);
    }

    fn get_or_create_attribute<'a>(target: &'a mut Class, name: &str, tag: Tag) -> &'a mut Attr {
        let index = match target.attrs.iter().position(|attr| attr.is_named(name)) {
            Some(index) => index,
            None => {
                let mut attr = Attr::new(name, tag);
                attr.restrictions.min_occurs = Some(1);
                attr.restrictions.max_occurs = Some(1);
                target.attrs.insert(0, attr);
                0
            }
        };

        &mut target.attrs[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DataType;
    use crate::models::{AttrType, Restrictions};

    fn qname(name: &str) -> QName {
        QName::namespaced("urn:test", name)
    }

    fn element(name: &str, datatype: DataType) -> Attr {
        Attr::new(name, Tag::Element).with_type(AttrType::native(datatype))
    }

    fn extends(name: &str) -> Extension {
        Extension::new(AttrType::class(qname(name)))
    }

    fn enumeration(name: &str) -> Class {
        Class::new(qname(name), Tag::SimpleType).with_attr(Attr::enumeration("a", "a"))
    }

    #[test]
    fn test_classify() {
        let mut container = ClassContainer::new();
        let complex = container.add(Class::new(qname("Complex"), Tag::ComplexType));
        let simple = container.add(
            Class::new(qname("Simple"), Tag::SimpleType).with_attr(Attr::new("value", Tag::Restriction)),
        );
        let enumerated = container.add(enumeration("Enum"));
        let target = container.add(Class::new(qname("Target"), Tag::ComplexType));

        let native = Extension::new(AttrType::native(DataType::String));
        assert_eq!(ClassExtensionHandler::classify(&container, target, &native), ExtensionKind::Native);
        assert_eq!(
            ClassExtensionHandler::classify(&container, target, &extends("Nowhere")),
            ExtensionKind::Missing
        );
        assert_eq!(
            ClassExtensionHandler::classify(&container, target, &extends("Complex")),
            ExtensionKind::Complex(complex)
        );
        assert_eq!(
            ClassExtensionHandler::classify(&container, target, &extends("Simple")),
            ExtensionKind::Simple(simple)
        );
        assert_eq!(
            ClassExtensionHandler::classify(&container, target, &extends("Enum")),
            ExtensionKind::Simple(enumerated)
        );
        assert_eq!(
            ClassExtensionHandler::classify(&container, enumerated, &extends("Complex")),
            ExtensionKind::Enumeration(complex)
        );
    }

    #[test]
    fn test_simple_action() {
        let plain = Class::new(qname("Plain"), Tag::ComplexType).with_attr(element("x", DataType::String));
        let enumerated = enumeration("Enum");

        assert_eq!(ClassExtensionHandler::simple_action(&plain, &plain, true), SimpleAction::Drop);
        assert_eq!(
            ClassExtensionHandler::simple_action(&enumerated, &plain, false),
            SimpleAction::DefaultAttribute
        );
        assert_eq!(ClassExtensionHandler::simple_action(&plain, &plain, false), SimpleAction::Copy);
        assert_eq!(
            ClassExtensionHandler::simple_action(&enumerated, &enumerated, false),
            SimpleAction::Copy
        );
        assert_eq!(ClassExtensionHandler::simple_action(&plain, &enumerated, false), SimpleAction::Drop);
    }

    #[test]
    fn test_complex_action() {
        let mut container = ClassContainer::new();
        let base = container.add(Class::new(qname("Base"), Tag::ComplexType).with_attr(element("a", DataType::String)));
        let child = container.add(
            Class::new(qname("Child"), Tag::ComplexType)
                .with_attr(element("b", DataType::String))
                .with_extension(extends("Base")),
        );
        let wide = container.add(
            Class::new(qname("Wide"), Tag::ComplexType)
                .with_attr(element("a", DataType::Int))
                .with_extension(extends("Base")),
        );

        assert_eq!(
            ClassExtensionHandler::complex_action(&container, base, child, &extends("Base")),
            ComplexAction::Retain
        );
        assert_eq!(
            ClassExtensionHandler::complex_action(&container, base, wide, &extends("Base")),
            ComplexAction::Flatten
        );
        assert_eq!(
            ClassExtensionHandler::complex_action(&container, base, base, &extends("Base")),
            ComplexAction::Remove
        );
    }

    #[test]
    fn test_validate_type_overrides() {
        let source = Class::new(qname("Base"), Tag::ComplexType).with_attr(
            element("x", DataType::String).with_type(AttrType::native(DataType::Int)),
        );
        let narrow = Class::new(qname("Narrow"), Tag::ComplexType).with_attr(element("x", DataType::Int));
        let other = Class::new(qname("Other"), Tag::ComplexType).with_attr(element("x", DataType::Boolean));
        let unrelated = Class::new(qname("Unrelated"), Tag::ComplexType).with_attr(element("y", DataType::Boolean));

        assert!(ClassExtensionHandler::validate_type_overrides(&source, &narrow));
        assert!(!ClassExtensionHandler::validate_type_overrides(&source, &other));
        assert!(ClassExtensionHandler::validate_type_overrides(&source, &unrelated));
    }

    #[test]
    fn test_validate_sequential_order() {
        let seq = |name: &str| Attr::new(name, Tag::Element).with_restrictions(Restrictions::sequential());
        let source = Class::new(qname("Base"), Tag::ComplexType)
            .with_attr(seq("a"))
            .with_attr(seq("b"))
            .with_attr(seq("c"));

        let same = Class::new(qname("Same"), Tag::ComplexType)
            .with_attr(seq("a"))
            .with_attr(seq("new"))
            .with_attr(seq("c"));
        let swapped = Class::new(qname("Swapped"), Tag::ComplexType)
            .with_attr(seq("c"))
            .with_attr(seq("a"));
        let single = Class::new(qname("Single"), Tag::ComplexType).with_attr(seq("c"));
        let loose = Class::new(qname("Loose"), Tag::ComplexType)
            .with_attr(Attr::new("c", Tag::Element))
            .with_attr(Attr::new("a", Tag::Element));

        assert!(ClassExtensionHandler::validate_sequential_order(&source, &same));
        assert!(!ClassExtensionHandler::validate_sequential_order(&source, &swapped));
        assert!(ClassExtensionHandler::validate_sequential_order(&source, &single));
        assert!(ClassExtensionHandler::validate_sequential_order(&source, &loose));
    }

    #[test]
    fn test_summary_counts_every_edge() {
        let mut container = ClassContainer::new();
        container.add(Class::new(qname("Base"), Tag::ComplexType).with_attr(element("a", DataType::String)));
        container.add(Class::new(qname("Child"), Tag::ComplexType).with_extension(extends("Base")));
        container.add(
            Class::new(qname("Value"), Tag::ComplexType)
                .with_extension(Extension::new(AttrType::native(DataType::String))),
        );
        container.add(Class::new(qname("Orphan"), Tag::ComplexType).with_extension(extends("Nowhere")));

        let mut handler = ClassExtensionHandler::new();
        container.process(&mut handler).unwrap();

        let summary = handler.summary();
        assert_eq!(summary.retained, 1);
        assert_eq!(summary.native, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.flattened + summary.removed, 0);
    }
}
