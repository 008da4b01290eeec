//! In-memory model of the compiled tree.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// A typed property value. The variants are the closed vocabulary the
/// document format knows; each maps to the element tag of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    String(String),
    ProtectedString(String),
    Bool(bool),
    Int(i64),
}

impl Property {
    /// Element tag name used when this property is serialized.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Property::String(_) => "string",
            Property::ProtectedString(_) => "ProtectedString",
            Property::Bool(_) => "bool",
            Property::Int(_) => "int",
        }
    }
}

/// One node of the compiled tree: a class name, uniquely named properties,
/// and an ordered sequence of children.
///
/// Properties iterate in lexicographic name order no matter the insertion
/// order, which keeps serialized output deterministic and diffable. Children
/// keep their insertion order — document order matters for them. `ClassName`
/// is never a property: it is carried by the `class` attribute of the emitted
/// `Item`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    class_name: String,
    properties: BTreeMap<String, Property>,
    pub children: Vec<Instance>,
}

impl Instance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Instance {
            class_name: class_name.into(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for a node with its `Name` property already set.
    pub fn named(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        let mut instance = Instance::new(class_name);
        instance.set_property("Name", Property::String(name.into()));
        instance
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    /// Insert or replace a property. Names are unique within a node.
    pub fn set_property(&mut self, name: impl Into<String>, value: Property) {
        let name = name.into();
        debug_assert!(name != "ClassName", "ClassName is the class attribute, not a property");
        self.properties.insert(name, value);
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Property) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Properties in ascending name order.
    pub fn properties(&self) -> btree_map::Iter<'_, String, Property> {
        self.properties.iter()
    }

    pub fn add_child(&mut self, child: Instance) {
        self.children.push(child);
    }

    /// The `Name` property, when present and a plain string.
    pub fn name(&self) -> Option<&str> {
        match self.property("Name") {
            Some(Property::String(name)) => Some(name),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Instance::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_iterate_sorted_regardless_of_insertion_order() {
        let mut instance = Instance::new("Script");
        instance.set_property("Source", Property::ProtectedString("return 1".to_string()));
        instance.set_property("Disabled", Property::Bool(false));
        instance.set_property("Name", Property::String("module".to_string()));

        let names: Vec<&str> = instance.properties().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Disabled", "Name", "Source"]);
    }

    #[test]
    fn setting_a_property_twice_keeps_one_entry() {
        let mut instance = Instance::new("IntValue");
        instance.set_property("Value", Property::Int(1));
        instance.set_property("Value", Property::Int(2));
        assert_eq!(instance.property_count(), 1);
        assert_eq!(instance.property("Value"), Some(&Property::Int(2)));
    }

    #[test]
    fn named_sets_the_name_property() {
        let instance = Instance::named("Folder", "src");
        assert_eq!(instance.class_name(), "Folder");
        assert_eq!(instance.name(), Some("src"));
    }

    #[test]
    fn children_preserve_insertion_order() {
        let mut parent = Instance::new("Folder");
        parent.add_child(Instance::named("Folder", "z"));
        parent.add_child(Instance::named("Folder", "a"));
        let names: Vec<_> = parent.children.iter().map(|c| c.name().unwrap()).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn subtree_len_counts_every_node() {
        let mut root = Instance::new("Folder");
        let mut mid = Instance::new("Folder");
        mid.add_child(Instance::new("Script"));
        mid.add_child(Instance::new("Script"));
        root.add_child(mid);
        assert_eq!(root.subtree_len(), 4);
    }
}
