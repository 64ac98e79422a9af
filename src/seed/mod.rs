//! Catalog seeding: a destructive CSV import followed by an optional scrape of
//! a listings page.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

pub mod categories;
pub mod description;
pub mod fetch;
pub mod images;
pub mod importer;
pub mod pricing;
pub mod row;
pub mod web_scraper;

/// Errors that abort the CSV import.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid value: {0}")]
    TypeConstraint(#[from] TypeConstraintError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
