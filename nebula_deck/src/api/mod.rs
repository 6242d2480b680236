//! Catalog service client and artwork loading

pub mod catalog;
pub mod http;

// Re-exports for public API convenience
pub use catalog::{ArtworkLoader, CardFilters, Catalog, CatalogQuery};
pub use http::{HttpCatalog, HttpImageLoader};
