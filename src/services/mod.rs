//! Business logic behind the HTTP handlers. Services take repository traits so
//! they can be exercised against the in-memory test repository.

pub use errors::{ServiceError, ServiceResult};

pub mod categories;
pub mod errors;
pub mod pages;
pub mod products;
