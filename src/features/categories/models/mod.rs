mod category;
mod category_tree;

pub use category::{Category, SubSubCategoryMatch};
pub use category_tree::{CategoryScope, CategoryTree};
