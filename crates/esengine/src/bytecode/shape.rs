//! Hidden classes / shapes (GLOSSARY: "a transitioning structure descriptor
//! shared by objects with the same property layout; inline caches key on
//! it"). No direct analog exists in the teacher (which dispatches property
//! access through Python's descriptor protocol, `bytecode/vm/attr.rs`, with
//! no hidden-class concept); this module is new, shaped the way `attr.rs`
//! structures a VM-owned table indexed by small integer ids, and keyed on
//! the transition semantics spec §3.6/§4.4 describe. See DESIGN.md.

use ahash::AHashMap;

use crate::intern::StringId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u32);

/// One node in the shape transition tree: the set of property names added
/// so far (in insertion order, each with its slot index) and the outgoing
/// transitions keyed by the next property name added.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub parent: Option<ShapeId>,
    /// The property this shape added relative to its parent, and the slot
    /// it occupies. `None` only for the empty root shape.
    pub added: Option<(StringId, u32)>,
    transitions: AHashMap<StringId, ShapeId>,
}

impl Shape {
    #[must_use]
    pub fn slot_count(&self, table: &ShapeTable) -> u32 {
        let mut count = u32::from(self.added.is_some());
        let mut cur = self.parent;
        while let Some(id) = cur {
            let s = table.get(id);
            count += u32::from(s.added.is_some());
            cur = s.parent;
        }
        count
    }

    /// Walks this shape's chain looking for `name`, returning its slot
    /// index if present. Walking toward the root mirrors how a real engine
    /// resolves inherited/previously-added properties.
    #[must_use]
    pub fn find_slot(&self, table: &ShapeTable, name: StringId) -> Option<u32> {
        if let Some((added_name, slot)) = self.added {
            if added_name == name {
                return Some(slot);
            }
        }
        let mut cur = self.parent;
        while let Some(id) = cur {
            let s = table.get(id);
            if let Some((added_name, slot)) = s.added {
                if added_name == name {
                    return Some(slot);
                }
            }
            cur = s.parent;
        }
        None
    }
}

/// Owns every shape created during a parse/emission session. Shapes form a
/// tree (spec §9: "model... with owning parent-to-child links plus
/// non-owning child-to-parent indices"); `ShapeTable` owns the nodes, each
/// `Shape` only references its parent by index.
#[derive(Debug, Default)]
pub struct ShapeTable {
    shapes: Vec<Shape>,
}

impl ShapeTable {
    #[must_use]
    pub fn new() -> Self {
        let mut t = Self { shapes: Vec::new() };
        t.shapes.push(Shape::default());
        t
    }

    #[must_use]
    pub const fn root(&self) -> ShapeId {
        ShapeId(0)
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> &Shape {
        &self.shapes[id.0 as usize]
    }

    /// Transitions `from` by adding `name`, reusing an existing transition
    /// if one was already recorded for the same property name at this node
    /// (the standard hidden-class sharing property: two objects that add
    /// the same properties in the same order converge on the same shape).
    pub fn transition(&mut self, from: ShapeId, name: StringId) -> ShapeId {
        if let Some(&existing) = self.shapes[from.0 as usize].transitions.get(&name) {
            return existing;
        }
        let slot = self.get(from).slot_count(self);
        let id = ShapeId(u32::try_from(self.shapes.len()).expect("shape table overflow"));
        self.shapes.push(Shape { parent: Some(from), added: Some((name, slot)), transitions: AHashMap::new() });
        self.shapes[from.0 as usize].transitions.insert(name, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_property_order_converges_on_same_shape() {
        let mut table = ShapeTable::new();
        let x = StringId::from(1);
        let y = StringId::from(2);
        let root = table.root();
        let s1 = table.transition(table.transition(root, x), y);
        let s2 = table.transition(table.transition(root, x), y);
        assert_eq!(s1, s2);
    }

    #[test]
    fn different_property_order_diverges() {
        let mut table = ShapeTable::new();
        let x = StringId::from(1);
        let y = StringId::from(2);
        let root = table.root();
        let xy = table.transition(table.transition(root, x), y);
        let yx = table.transition(table.transition(root, y), x);
        assert_ne!(xy, yx);
    }

    #[test]
    fn slot_index_is_stable_after_transition() {
        let mut table = ShapeTable::new();
        let x = StringId::from(1);
        let root = table.root();
        let after_x = table.transition(root, x);
        assert_eq!(table.get(after_x).find_slot(&table, x), Some(0));
    }
}
