//! Class container
//!
//! The container owns every class of a generation run in an arena addressed
//! by [`ClassId`]. Top-level classes are indexed by qualified name; inner
//! classes live in the arena but are only reachable through their parent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};
use crate::handlers::ClassHandler;
use crate::models::{Attr, AttrType, Class, ClassId, Tag};
use crate::namespaces::QName;

/// Tag condition used by prioritized lookups
pub type Condition = fn(&Class) -> bool;

/// Dependency search priority: xs:simpleType before xs:complexType
pub const TYPE_PRIORITY: &[Condition] = &[is_simple_type_tag, is_complex_type_tag];

fn is_simple_type_tag(class: &Class) -> bool {
    class.tag == Tag::SimpleType
}

fn is_complex_type_tag(class: &Class) -> bool {
    class.tag == Tag::ComplexType
}

/// Serialized form of a container; a class's position is its id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerDump {
    /// Every class in arena order
    pub classes: Vec<Class>,
}

/// Arena of classes with qualified-name lookup
#[derive(Debug, Clone, Default)]
pub struct ClassContainer {
    classes: Vec<Class>,
    index: IndexMap<QName, Vec<ClassId>>,
}

#[derive(Clone, Copy)]
enum Mark {
    Visiting,
    Done(usize),
}

impl ClassContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container holding the given top-level classes
    pub fn from_classes(classes: impl IntoIterator<Item = Class>) -> Self {
        let mut container = Self::new();
        for class in classes {
            container.add(class);
        }
        container
    }

    /// Rebuild a container from its dump.
    ///
    /// Classes not listed as inner by any other class are indexed as
    /// top-level classes. Stamped references must point inside the dump and
    /// never sit on native types; inner classes must form a forest.
    pub fn from_dump(dump: ContainerDump) -> Result<Self> {
        let len = dump.classes.len();
        let mut inner = HashSet::new();
        for class in &dump.classes {
            for id in &class.inner {
                if id.index() >= len {
                    return Err(Error::Invariant(format!(
                        "class '{}' lists unknown inner class {}",
                        class.qname, id
                    )));
                }
                inner.insert(*id);
            }
            check_references(class, len)?;
        }
        check_inner_cycles(&dump.classes)?;

        let mut container = Self::new();
        for (position, class) in dump.classes.into_iter().enumerate() {
            let id = ClassId(position);
            if !inner.contains(&id) {
                container.index.entry(class.qname.clone()).or_default().push(id);
            }
            container.classes.push(class);
        }

        Ok(container)
    }

    /// Snapshot the container
    pub fn to_dump(&self) -> ContainerDump {
        ContainerDump {
            classes: self.classes.clone(),
        }
    }

    /// Add a top-level class
    pub fn add(&mut self, class: Class) -> ClassId {
        let id = ClassId(self.classes.len());
        self.index.entry(class.qname.clone()).or_default().push(id);
        self.classes.push(class);
        id
    }

    /// Add an inner class and attach it to its parent
    pub fn add_inner(&mut self, parent: ClassId, class: Class) -> ClassId {
        let id = ClassId(self.classes.len());
        self.classes.push(class);
        self.classes[parent.index()].inner.push(id);
        id
    }

    /// Deep clone a class and its inner classes into fresh, unindexed slots
    pub fn clone_tree(&mut self, id: ClassId) -> ClassId {
        let mut class = self.classes[id.index()].clone();
        let inner = std::mem::take(&mut class.inner);
        let clone = ClassId(self.classes.len());
        self.classes.push(class);

        for child in inner {
            let child_clone = self.clone_tree(child);
            self.classes[clone.index()].inner.push(child_clone);
        }

        clone
    }

    /// Number of classes, inner classes included
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the container is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Every class id in arena order
    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId)
    }

    /// Iterate classes with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes.iter().enumerate().map(|(i, class)| (ClassId(i), class))
    }

    /// Top-level classes with the given qualified name
    pub fn by_qname(&self, qname: &QName) -> &[ClassId] {
        self.index.get(qname).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First top-level class with the given name that satisfies the condition
    pub fn find(&self, qname: &QName, condition: impl Fn(&Class) -> bool) -> Option<ClassId> {
        self.by_qname(qname)
            .iter()
            .copied()
            .find(|id| condition(&self.classes[id.index()]))
    }

    /// Try each condition in turn and return the first match
    pub fn find_by_priority(&self, qname: &QName, conditions: &[Condition]) -> Option<ClassId> {
        conditions
            .iter()
            .find_map(|condition| self.find(qname, condition))
    }

    /// Find the class a type reference points at, simple types first
    pub fn find_type(&self, qname: &QName) -> Option<ClassId> {
        self.find_by_priority(qname, TYPE_PRIORITY)
    }

    /// Class ids sorted by extension depth, bases first.
    ///
    /// Cycles are cut where they are first entered. Ties keep arena order.
    pub fn resolution_order(&self) -> Vec<ClassId> {
        let mut marks = HashMap::new();
        let mut order: Vec<(usize, ClassId)> = self
            .ids()
            .map(|id| (self.depth(id, &mut marks), id))
            .collect();
        order.sort();
        order.into_iter().map(|(_, id)| id).collect()
    }

    fn depth(&self, id: ClassId, marks: &mut HashMap<ClassId, Mark>) -> usize {
        match marks.get(&id) {
            Some(Mark::Done(depth)) => return *depth,
            Some(Mark::Visiting) => return 0,
            None => {}
        }

        marks.insert(id, Mark::Visiting);
        let bases: Vec<ClassId> = self.classes[id.index()]
            .extensions
            .iter()
            .filter(|ext| !ext.type_.native)
            .filter_map(|ext| self.find_type(&ext.type_.qname))
            .collect();
        let depth = bases
            .into_iter()
            .map(|base| self.depth(base, marks) + 1)
            .max()
            .unwrap_or(0);
        marks.insert(id, Mark::Done(depth));

        depth
    }

    /// Run a handler over every class, bases first.
    ///
    /// Classes allocated while the handler runs are processed afterwards.
    pub fn process(&mut self, handler: &mut impl ClassHandler) -> Result<()> {
        let mut pending = self.resolution_order();
        let mut seen = self.len();

        while !pending.is_empty() {
            for id in pending {
                handler.process(self, id)?;
            }

            pending = (seen..self.len()).map(ClassId).collect();
            seen = self.len();
        }

        Ok(())
    }
}

fn check_references(class: &Class, len: usize) -> Result<()> {
    let mut types: Vec<&AttrType> = class.extensions.iter().map(|ext| &ext.type_).collect();
    let mut pending: Vec<&Attr> = class.attrs.iter().collect();
    while let Some(attr) = pending.pop() {
        types.extend(attr.types.iter());
        pending.extend(attr.choices.iter());
    }

    for tp in types {
        match tp.reference() {
            Some(_) if tp.native => {
                return Err(Error::Invariant(format!(
                    "native type '{}' in class '{}' carries a class reference",
                    tp.qname, class.qname
                )));
            }
            Some(id) if id.index() >= len => {
                return Err(Error::Invariant(format!(
                    "type '{}' in class '{}' references unknown class {}",
                    tp.qname, class.qname, id
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

fn check_inner_cycles(classes: &[Class]) -> Result<()> {
    // false while on the current path, true once finished
    fn visit(classes: &[Class], id: ClassId, marks: &mut HashMap<ClassId, bool>) -> Result<()> {
        match marks.get(&id) {
            Some(true) => return Ok(()),
            Some(false) => {
                return Err(Error::Invariant(format!(
                    "inner class cycle through '{}'",
                    classes[id.index()].qname
                )));
            }
            None => {}
        }

        marks.insert(id, false);
        for child in &classes[id.index()].inner {
            visit(classes, *child, marks)?;
        }
        marks.insert(id, true);

        Ok(())
    }

    let mut marks = HashMap::new();
    for position in 0..classes.len() {
        visit(classes, ClassId(position), &mut marks)?;
    }

    Ok(())
}

impl Index<ClassId> for ClassContainer {
    type Output = Class;

    fn index(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }
}

impl IndexMut<ClassId> for ClassContainer {
    fn index_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }
}
