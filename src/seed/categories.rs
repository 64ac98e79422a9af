//! Category discovery and per-row category resolution.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::CategoryName;
use crate::repository::CategoryWriter;
use crate::repository::errors::RepositoryResult;
use crate::seed::row::CsvRow;

/// Generic labels that never become categories on their own.
pub const CATEGORY_STOPLIST: [&str; 4] = ["Electronics", "Computers", "All", "Name Brands"];

/// Category created when no row yields a meaningful name.
pub const FALLBACK_CATEGORY: &str = "Electronics";

const MIN_CATEGORY_CHARS: usize = 3;
const CATEGORIES_PER_ROW: usize = 2;

/// Trimmed, non-empty tokens of a comma-separated categories field.
pub fn split_categories(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|t| !t.is_empty())
}

fn is_meaningful(token: &str) -> bool {
    token.chars().count() >= MIN_CATEGORY_CHARS
        && !CATEGORY_STOPLIST.contains(&token)
        && !token.chars().all(|c| c.is_ascii_digit())
}

/// Insertion-ordered set of category names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryNames {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl CategoryNames {
    /// Adds `name` unless already present. Returns whether it was added.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Scan every row and keep up to two meaningful category names per row.
pub fn collect_category_names<'a, I>(rows: I) -> CategoryNames
where
    I: IntoIterator<Item = &'a CsvRow>,
{
    let mut names = CategoryNames::default();
    for row in rows {
        let Some(field) = row.categories.as_deref() else {
            continue;
        };
        for token in split_categories(field)
            .filter(|t| is_meaningful(t))
            .take(CATEGORIES_PER_ROW)
        {
            names.insert(token);
        }
    }
    names
}

/// Map a row to a category: the first of its tokens that names a known
/// category, else `fallback`.
pub fn resolve_category<'a>(
    row: &CsvRow,
    known: &'a HashMap<String, Category>,
    fallback: Option<&'a Category>,
) -> Option<&'a Category> {
    row.categories
        .as_deref()
        .and_then(|field| split_categories(field).find_map(|token| known.get(token)))
        .or(fallback)
}

/// Categories created for one import run.
#[derive(Debug, Clone, Default)]
pub struct KnownCategories {
    by_name: HashMap<String, Category>,
    first: Option<Category>,
}

impl KnownCategories {
    /// Persist one category per collected name, or the single fallback
    /// category when the set is empty.
    pub fn create<R>(repo: &R, names: &CategoryNames, now: NaiveDateTime) -> RepositoryResult<Self>
    where
        R: CategoryWriter + ?Sized,
    {
        let mut known = Self::default();

        let fallback = [FALLBACK_CATEGORY];
        let names: Vec<&str> = if names.is_empty() {
            fallback.to_vec()
        } else {
            names.iter().collect()
        };

        for name in names {
            let category = repo.create_category(&NewCategory::new(CategoryName::new(name)?, now))?;
            log::info!("Created category: {}", category.name);
            if known.first.is_none() {
                known.first = Some(category.clone());
            }
            known.by_name.insert(name.to_string(), category);
        }

        Ok(known)
    }

    pub fn resolve(&self, row: &CsvRow) -> Option<&Category> {
        resolve_category(row, &self.by_name, self.first.as_ref())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
