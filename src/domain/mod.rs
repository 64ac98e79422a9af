//! Domain entities and value objects, independent of persistence.

pub mod category;
pub mod page;
pub mod product;
pub mod product_image;
pub mod types;
