//! JSON representations returned by the read API.

pub mod categories;
pub mod pages;
pub mod products;
