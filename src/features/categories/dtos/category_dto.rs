use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::models::{Category, CategoryTree};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            display_order: c.display_order,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Nested DTOs for every main category of the tree
    pub fn from_tree(tree: &CategoryTree) -> Vec<CategoryTreeDto> {
        tree.roots()
            .iter()
            .map(|&root| Self::from_node(tree, root))
            .collect()
    }

    fn from_node(tree: &CategoryTree, idx: usize) -> CategoryTreeDto {
        let node = tree.node(idx);
        CategoryTreeDto {
            id: node.category.id,
            name: node.category.name.clone(),
            slug: node.category.slug.clone(),
            description: node.category.description.clone(),
            display_order: node.category.display_order,
            children: node
                .children
                .iter()
                .map(|&child| Self::from_node(tree, child))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::category;

    #[test]
    fn test_from_tree_nests_children_under_roots() {
        let electronics = category("Electronics", None);
        let phones = category("Mobile Phones", Some(electronics.id));
        let jobs = category("Jobs", None);
        let tree = CategoryTree::from_flat(vec![electronics, phones, jobs]);

        let dtos = CategoryTreeDto::from_tree(&tree);

        assert_eq!(dtos.len(), 2);
        assert_eq!(dtos[0].name, "Electronics");
        assert_eq!(dtos[0].children.len(), 1);
        assert_eq!(dtos[0].children[0].name, "Mobile Phones");
        assert!(dtos[1].children.is_empty());
    }
}
