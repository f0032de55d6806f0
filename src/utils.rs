//! Class manipulation helpers shared by the handlers

use crate::container::ClassContainer;
use crate::error::{Error, Result};
use crate::models::{Attr, ClassId, Extension};

/// Copy the source fields into the target and drop the extension.
///
/// The result lists the source fields in their declared order, with target
/// fields of the same name taking the source slot, followed by the
/// target-only fields. Copied fields pick up the extension restrictions.
pub fn copy_attributes(
    container: &mut ClassContainer,
    source: ClassId,
    target: ClassId,
    extension: &Extension,
) -> Result<()> {
    container[target].remove_extension(extension);

    enum Slot {
        Copied(Attr),
        Overridden(String),
    }

    let source_attrs = container[source].attrs.clone();
    let mut slots = Vec::with_capacity(source_attrs.len());
    for attr in source_attrs {
        if let Some(name) = attr.name() {
            if container[target].find_attr(name).is_some() {
                slots.push(Slot::Overridden(name.to_string()));
                continue;
            }
        }

        let mut clone = attr;
        clone.restrictions.merge(&extension.restrictions);
        copy_inner_classes(container, source, target, &mut clone)?;
        slots.push(Slot::Copied(clone));
    }

    let mut own = std::mem::take(&mut container[target].attrs);
    let mut attrs = Vec::with_capacity(slots.len() + own.len());
    for slot in slots {
        match slot {
            Slot::Copied(clone) => attrs.push(clone),
            Slot::Overridden(name) => {
                if let Some(index) = own.iter().position(|attr| attr.is_named(&name)) {
                    attrs.push(own.remove(index));
                }
            }
        }
    }
    attrs.extend(own);
    container[target].attrs = attrs;

    Ok(())
}

/// Copy the inner classes a cloned field forward-references into the target.
///
/// A reference to the target itself is marked circular instead.
pub fn copy_inner_classes(
    container: &mut ClassContainer,
    source: ClassId,
    target: ClassId,
    attr: &mut Attr,
) -> Result<()> {
    for tp in attr.types.iter_mut().filter(|tp| tp.forward) {
        let inner = container[source]
            .inner
            .iter()
            .copied()
            .find(|id| container[*id].qname == tp.qname)
            .ok_or_else(|| {
                Error::Invariant(format!(
                    "missing inner class '{}' in '{}'",
                    tp.qname, container[source].qname
                ))
            })?;

        if inner == target {
            tp.circular = true;
            continue;
        }

        let existing = container[target]
            .inner
            .iter()
            .copied()
            .find(|id| container[*id].qname == tp.qname);
        let id = match existing {
            Some(id) => id,
            None => {
                let clone = container.clone_tree(inner);
                container[target].inner.push(clone);
                clone
            }
        };
        tp.set_reference(id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::DataType;
    use crate::models::{AttrType, Class, Restrictions, Tag};
    use crate::namespaces::QName;

    fn qname(name: &str) -> QName {
        QName::namespaced("urn:test", name)
    }

    fn element(name: &str, datatype: DataType) -> Attr {
        Attr::new(name, Tag::Element).with_type(AttrType::native(datatype))
    }

    fn names(class: &Class) -> Vec<&str> {
        class.attrs.iter().filter_map(Attr::name).collect()
    }

    #[test]
    fn test_copy_attributes_order_and_overrides() {
        let ext = Extension::new(AttrType::class(qname("Base")))
            .with_restrictions(Restrictions::with_occurs(0, 1));
        let mut container = ClassContainer::new();
        let source = container.add(
            Class::new(qname("Base"), Tag::ComplexType)
                .with_attr(element("a", DataType::String))
                .with_attr(element("b", DataType::String))
                .with_attr(element("c", DataType::String)),
        );
        let target = container.add(
            Class::new(qname("Child"), Tag::ComplexType)
                .with_attr(element("z", DataType::Int))
                .with_attr(element("b", DataType::Int))
                .with_extension(ext.clone()),
        );

        copy_attributes(&mut container, source, target, &ext).unwrap();

        let child = &container[target];
        assert!(child.extensions.is_empty());
        assert_eq!(names(child), vec!["a", "b", "c", "z"]);
        assert_eq!(child.attrs[1].types, vec![AttrType::native(DataType::Int)]);
        assert_eq!(child.attrs[1].restrictions.min_occurs, None);
        assert_eq!(child.attrs[0].restrictions.min_occurs, Some(0));

        // clones are independent of the source
        container[source].attrs[0].default = Some("changed".into());
        assert_eq!(container[target].attrs[0].default, None);
    }

    #[test]
    fn test_copy_attributes_keeps_nameless_fields() {
        let ext = Extension::new(AttrType::class(qname("Base")));
        let mut container = ClassContainer::new();
        let source = container.add(
            Class::new(qname("Base"), Tag::ComplexType).with_attr(Attr::nameless(Tag::Any)),
        );
        let target = container.add(
            Class::new(qname("Child"), Tag::ComplexType)
                .with_attr(Attr::nameless(Tag::Any))
                .with_extension(ext.clone()),
        );

        copy_attributes(&mut container, source, target, &ext).unwrap();
        assert_eq!(container[target].attrs.len(), 2);
    }

    #[test]
    fn test_copy_inner_classes() {
        let ext = Extension::new(AttrType::class(qname("Base")));
        let mut container = ClassContainer::new();
        let source = container.add(
            Class::new(qname("Base"), Tag::ComplexType).with_attr(
                Attr::new("item", Tag::Element).with_type(AttrType::forward(qname("Item"))),
            ),
        );
        let inner = container.add_inner(source, Class::new(qname("Item"), Tag::ComplexType));
        let target = container.add(
            Class::new(qname("Child"), Tag::ComplexType).with_extension(ext.clone()),
        );

        copy_attributes(&mut container, source, target, &ext).unwrap();

        let child = &container[target];
        assert_eq!(child.inner.len(), 1);
        let clone = child.inner[0];
        assert_ne!(clone, inner);
        assert_eq!(container[clone].qname, qname("Item"));
        assert_eq!(child.attrs[0].types[0].reference(), Some(clone));
    }

    #[test]
    fn test_copy_inner_class_pointing_at_target_is_circular() {
        let mut container = ClassContainer::new();
        let source = container.add(Class::new(qname("Outer"), Tag::ComplexType));
        let target = container.add_inner(source, Class::new(qname("Inner"), Tag::ComplexType));
        let mut attr = Attr::new("self", Tag::Element).with_type(AttrType::forward(qname("Inner")));

        copy_inner_classes(&mut container, source, target, &mut attr).unwrap();

        assert!(attr.types[0].circular);
        assert!(container[target].inner.is_empty());
    }

    #[test]
    fn test_copy_inner_classes_missing_inner() {
        let mut container = ClassContainer::new();
        let source = container.add(Class::new(qname("Base"), Tag::ComplexType));
        let target = container.add(Class::new(qname("Child"), Tag::ComplexType));
        let mut attr = Attr::new("x", Tag::Element).with_type(AttrType::forward(qname("Gone")));

        let err = copy_inner_classes(&mut container, source, target, &mut attr).unwrap_err();
        assert!(matches!(err, Error::Invariant(_)));
    }
}
