use crate::core::error::{AppError, Result};
use crate::features::categories::models::{CategoryScope, CategoryTree, SubSubCategoryMatch};

/// Turns a category path (main / sub / sub-sub names) into the ids whose
/// listings belong to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryResolver {
    sub_sub_match: SubSubCategoryMatch,
}

impl CategoryResolver {
    pub fn new(sub_sub_match: SubSubCategoryMatch) -> Self {
        Self { sub_sub_match }
    }

    /// Walk `tree` along the path.
    ///
    /// - unknown main category: `AppError::NotFound`
    /// - main only: main + children + grandchildren
    /// - main/sub: sub + its children, or empty when main has no such child
    /// - main/sub/sub-sub: see [`SubSubCategoryMatch`]; empty on mismatch
    pub fn resolve(
        &self,
        tree: &CategoryTree,
        main_category: &str,
        sub_category: Option<&str>,
        sub_sub_category: Option<&str>,
    ) -> Result<CategoryScope> {
        let main_idx = tree.find_main(main_category).ok_or_else(|| {
            AppError::NotFound(format!("Category '{}' not found", main_category))
        })?;

        let Some(sub_category) = sub_category else {
            return Ok(tree.subtree_ids(main_idx, 2));
        };

        let Some(sub_idx) = tree.child_named(main_idx, sub_category) else {
            return Ok(CategoryScope::empty());
        };

        let Some(sub_sub_category) = sub_sub_category else {
            return Ok(tree.subtree_ids(sub_idx, 1));
        };

        let scope = match self.sub_sub_match {
            SubSubCategoryMatch::ChildName => tree
                .child_named(sub_idx, sub_sub_category)
                .map(|idx| tree.subtree_ids(idx, 0))
                .unwrap_or_default(),
            SubSubCategoryMatch::DescriptionSubstring => {
                let sub = &tree.node(sub_idx).category;
                let needle = sub_sub_category.to_lowercase();
                let matches = sub
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
                if matches {
                    CategoryScope::single(sub.id)
                } else {
                    CategoryScope::empty()
                }
            }
        };

        Ok(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::shared::test_helpers::{category, category_with_description};

    struct Fixture {
        tree: CategoryTree,
        vehicles: Category,
        cars: Category,
        sedans: Category,
        bikes: Category,
        jobs: Category,
        it_jobs: Category,
    }

    fn fixture() -> Fixture {
        let vehicles = category("Vehicles", None);
        let cars = category_with_description(
            "Cars",
            Some(vehicles.id),
            "Sedans, hatchbacks and SUVs",
        );
        let sedans = category("Sedans", Some(cars.id));
        let bikes = category("Motorbikes", Some(vehicles.id));
        let jobs = category("Jobs", None);
        let it_jobs = category("IT", Some(jobs.id));

        let tree = CategoryTree::from_flat(vec![
            vehicles.clone(),
            cars.clone(),
            sedans.clone(),
            bikes.clone(),
            jobs.clone(),
            it_jobs.clone(),
        ]);

        Fixture {
            tree,
            vehicles,
            cars,
            sedans,
            bikes,
            jobs,
            it_jobs,
        }
    }

    #[test]
    fn test_main_only_covers_two_levels_of_descendants() {
        let f = fixture();
        let scope = CategoryResolver::default()
            .resolve(&f.tree, "Vehicles", None, None)
            .unwrap();

        assert_eq!(
            scope,
            [f.vehicles.id, f.cars.id, f.sedans.id, f.bikes.id]
                .into_iter()
                .collect()
        );
        assert!(!scope.contains(&f.jobs.id));
        assert!(!scope.contains(&f.it_jobs.id));
    }

    #[test]
    fn test_main_lookup_is_case_insensitive() {
        let f = fixture();
        let resolver = CategoryResolver::default();

        let a = resolver.resolve(&f.tree, "Jobs", None, None).unwrap();
        let b = resolver.resolve(&f.tree, "jobs", None, None).unwrap();
        let c = resolver.resolve(&f.tree, "JOBS", None, None).unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_unknown_main_is_not_found() {
        let f = fixture();
        let result =
            CategoryResolver::default().resolve(&f.tree, "NonexistentCategory", None, None);

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_unknown_sub_is_empty_not_error() {
        let f = fixture();
        let scope = CategoryResolver::default()
            .resolve(&f.tree, "Vehicles", Some("NonexistentSub"), None)
            .unwrap();

        assert!(scope.is_empty());
    }

    #[test]
    fn test_sub_covers_itself_and_children() {
        let f = fixture();
        let scope = CategoryResolver::default()
            .resolve(&f.tree, "vehicles", Some("CARS"), None)
            .unwrap();

        assert_eq!(scope, [f.cars.id, f.sedans.id].into_iter().collect());
    }

    #[test]
    fn test_sub_must_be_direct_child_of_main() {
        let f = fixture();
        let scope = CategoryResolver::default()
            .resolve(&f.tree, "Jobs", Some("Cars"), None)
            .unwrap();

        assert!(scope.is_empty());
    }

    #[test]
    fn test_sub_sub_child_lookup() {
        let f = fixture();
        let resolver = CategoryResolver::new(SubSubCategoryMatch::ChildName);

        let scope = resolver
            .resolve(&f.tree, "Vehicles", Some("Cars"), Some("sedans"))
            .unwrap();
        assert_eq!(scope, CategoryScope::single(f.sedans.id));

        let missing = resolver
            .resolve(&f.tree, "Vehicles", Some("Cars"), Some("Coupes"))
            .unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_sub_sub_description_match_selects_subcategory_only() {
        let f = fixture();
        let resolver = CategoryResolver::new(SubSubCategoryMatch::DescriptionSubstring);

        let scope = resolver
            .resolve(&f.tree, "Vehicles", Some("Cars"), Some("HATCHBACK"))
            .unwrap();
        assert_eq!(scope, CategoryScope::single(f.cars.id));

        let missing = resolver
            .resolve(&f.tree, "Vehicles", Some("Cars"), Some("Trucks"))
            .unwrap();
        assert!(missing.is_empty());

        // No description at all never matches
        let no_description = resolver
            .resolve(&f.tree, "Vehicles", Some("Motorbikes"), Some("Scooters"))
            .unwrap();
        assert!(no_description.is_empty());
    }

    #[test]
    fn test_empty_tree_is_not_found() {
        let tree = CategoryTree::default();
        let result = CategoryResolver::default().resolve(&tree, "Vehicles", None, None);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
