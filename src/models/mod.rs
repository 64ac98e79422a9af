//! Diesel models mirroring the database tables.

pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod page;
pub mod product;
pub mod product_image;
