use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseNode {
    pub name: String,
    pub parent: Option<String>,
    pub is_group: bool,
}

/// Warehouse hierarchy used to resolve group warehouses to stock-holding ones.
#[derive(Debug, Clone, Default)]
pub struct WarehouseTree {
    nodes: HashMap<String, WarehouseNode>,
    children: HashMap<String, Vec<String>>,
}

impl WarehouseTree {
    pub fn new(nodes: impl IntoIterator<Item = WarehouseNode>) -> Self {
        let mut tree = WarehouseTree::default();
        for node in nodes {
            if let Some(parent) = &node.parent {
                tree.children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.name.clone());
            }
            tree.nodes.insert(node.name.clone(), node);
        }
        for children in tree.children.values_mut() {
            children.sort();
        }
        tree
    }

    pub fn is_group(&self, name: &str) -> bool {
        self.nodes.get(name).map(|n| n.is_group).unwrap_or(false)
    }

    /// Leaf warehouses under `name`; a non-group warehouse is its own leaf.
    pub fn leaf_warehouses(&self, name: &str) -> Vec<String> {
        if !self.is_group(name) {
            return vec![name.to_string()];
        }

        let mut leaves = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![name.to_string()];

        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if !self.is_group(&current) {
                leaves.push(current);
                continue;
            }
            if let Some(children) = self.children.get(&current) {
                stack.extend(children.iter().rev().cloned());
            }
        }

        leaves
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, parent: Option<&str>, is_group: bool) -> WarehouseNode {
        WarehouseNode {
            name: name.into(),
            parent: parent.map(Into::into),
            is_group,
        }
    }

    #[test]
    fn group_expands_to_nested_leaves() {
        let tree = WarehouseTree::new(vec![
            node("All", None, true),
            node("Stores", Some("All"), false),
            node("Plant", Some("All"), true),
            node("Line 1", Some("Plant"), false),
            node("Line 2", Some("Plant"), false),
            node("Empty Group", Some("All"), true),
        ]);

        assert_eq!(
            tree.leaf_warehouses("All"),
            vec!["Line 1", "Line 2", "Stores"]
        );
        assert_eq!(tree.leaf_warehouses("Stores"), vec!["Stores"]);
        assert!(tree.leaf_warehouses("Empty Group").is_empty());
    }

    #[test]
    fn unknown_warehouse_is_treated_as_leaf() {
        let tree = WarehouseTree::default();
        assert_eq!(tree.leaf_warehouses("Elsewhere"), vec!["Elsewhere"]);
    }
}
