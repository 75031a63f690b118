use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

use super::Category;

/// A category plus the arena indices of its children
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub category: Category,
    pub children: Vec<usize>,
}

/// Category hierarchy stored as an arena of nodes linked by index.
///
/// Built from a flat list in one pass. A node whose parent is not part of
/// the list is attached nowhere, and it is not a root either unless its
/// `parent_id` is null. Children keep the order of the input list.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
    roots: Vec<usize>,
}

impl CategoryTree {
    pub fn from_flat(categories: Vec<Category>) -> Self {
        let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(categories.len());
        let mut nodes: Vec<CategoryNode> = Vec::with_capacity(categories.len());

        for category in categories {
            // Duplicate rows (e.g. from overlapping joins) collapse to the first
            if index.contains_key(&category.id) {
                continue;
            }
            index.insert(category.id, nodes.len());
            nodes.push(CategoryNode {
                category,
                children: Vec::new(),
            });
        }

        let mut roots = Vec::new();
        for idx in 0..nodes.len() {
            let parent_id = nodes[idx].category.parent_id;
            match parent_id {
                None => roots.push(idx),
                Some(parent_id) => {
                    if let Some(&parent_idx) = index.get(&parent_id) {
                        if parent_idx != idx {
                            nodes[parent_idx].children.push(idx);
                        }
                    }
                }
            }
        }

        Self { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, idx: usize) -> &CategoryNode {
        &self.nodes[idx]
    }

    /// Indices of main categories (no parent)
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Locate the category named `name`, preferring a main category.
    ///
    /// Falls back to the first node with that name in load order when no
    /// main category carries it.
    pub fn find_main(&self, name: &str) -> Option<usize> {
        let mut fallback = None;
        for (idx, node) in self.nodes.iter().enumerate() {
            if node.category.name_matches(name) {
                if node.category.parent_id.is_none() {
                    return Some(idx);
                }
                fallback.get_or_insert(idx);
            }
        }
        fallback
    }

    /// Direct child of `parent` named `name` (case-insensitive)
    pub fn child_named(&self, parent: usize, name: &str) -> Option<usize> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].category.name_matches(name))
    }

    /// Ids of `idx` and its descendants down to `depth` levels below it
    pub fn subtree_ids(&self, idx: usize, depth: usize) -> CategoryScope {
        let mut ids = BTreeSet::new();
        let mut frontier = vec![idx];

        for level in 0..=depth {
            let mut next = Vec::new();
            for node_idx in frontier {
                if !ids.insert(self.nodes[node_idx].category.id) {
                    continue;
                }
                if level < depth {
                    next.extend(self.nodes[node_idx].children.iter().copied());
                }
            }
            frontier = next;
        }

        CategoryScope(ids)
    }
}

/// The set of category ids whose listings a search covers.
///
/// An empty scope is a valid answer meaning "nothing matches"; it must
/// filter out every listing rather than be treated as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryScope(BTreeSet<Uuid>);

impl CategoryScope {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(id: Uuid) -> Self {
        Self(BTreeSet::from([id]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.0.contains(id)
    }

    pub fn to_vec(&self) -> Vec<Uuid> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<Uuid> for CategoryScope {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::category;

    #[test]
    fn test_from_flat_links_parents_and_children() {
        let root = category("Vehicles", None);
        let cars = category("Cars", Some(root.id));
        let bikes = category("Motorbikes", Some(root.id));
        let tree = CategoryTree::from_flat(vec![cars.clone(), root.clone(), bikes.clone()]);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots().len(), 1);
        let root_idx = tree.roots()[0];
        assert_eq!(tree.node(root_idx).category.id, root.id);
        let child_ids: Vec<Uuid> = tree
            .node(root_idx)
            .children
            .iter()
            .map(|&c| tree.node(c).category.id)
            .collect();
        assert_eq!(child_ids, vec![cars.id, bikes.id]);
    }

    #[test]
    fn test_orphans_are_not_roots() {
        let missing_parent = Uuid::new_v4();
        let orphan = category("Orphan", Some(missing_parent));
        let tree = CategoryTree::from_flat(vec![orphan]);

        assert!(tree.roots().is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let root = category("Jobs", None);
        let tree = CategoryTree::from_flat(vec![root.clone(), root]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_find_main_prefers_root() {
        let other = category("Services", None);
        let nested = category("Jobs", Some(other.id));
        let root = category("Jobs", None);
        let tree = CategoryTree::from_flat(vec![other, nested, root.clone()]);

        let idx = tree.find_main("jobs").unwrap();
        assert_eq!(tree.node(idx).category.id, root.id);
    }

    #[test]
    fn test_find_main_falls_back_to_nested_match() {
        let other = category("Services", None);
        let nested = category("Cleaning", Some(other.id));
        let tree = CategoryTree::from_flat(vec![other, nested.clone()]);

        let idx = tree.find_main("CLEANING").unwrap();
        assert_eq!(tree.node(idx).category.id, nested.id);
        assert_eq!(tree.find_main("Plumbing"), None);
    }

    #[test]
    fn test_subtree_ids_respects_depth() {
        let root = category("Electronics", None);
        let phones = category("Mobile Phones", Some(root.id));
        let android = category("Android", Some(phones.id));
        let deep = category("Pixel", Some(android.id));
        let tree = CategoryTree::from_flat(vec![
            root.clone(),
            phones.clone(),
            android.clone(),
            deep.clone(),
        ]);
        let root_idx = tree.find_main("Electronics").unwrap();

        assert_eq!(tree.subtree_ids(root_idx, 0), CategoryScope::single(root.id));
        let two_levels = tree.subtree_ids(root_idx, 2);
        assert_eq!(two_levels.len(), 3);
        assert!(two_levels.contains(&android.id));
        assert!(!two_levels.contains(&deep.id));
    }
}
