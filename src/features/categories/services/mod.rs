mod category_repository;
mod category_resolver;
mod category_service;

pub use category_repository::{CategoryRepository, PgCategoryRepository};
pub use category_resolver::CategoryResolver;
pub use category_service::CategoryService;
