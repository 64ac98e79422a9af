//! Product descriptions assembled from CSV attributes.

use crate::domain::types::MAX_DESCRIPTION_CHARS;
use crate::seed::row::CsvRow;

const ELLIPSIS: &str = "...";

/// Build a product description from the descriptive columns of a row.
pub fn synthesize_description(row: &CsvRow) -> String {
    let brand = row.brand.as_deref().unwrap_or_default();
    let mut fragments = Vec::new();

    if let Some(brand) = &row.brand {
        fragments.push(format!("Brand: {brand}"));
    }
    if let Some(manufacturer) = row
        .manufacturer
        .as_deref()
        .filter(|m| Some(*m) != row.brand.as_deref())
    {
        fragments.push(format!("Manufacturer: {manufacturer}"));
    }
    if let Some(model) = &row.manufacturer_number {
        fragments.push(format!("Model: {model}"));
    }
    if let Some(dimension) = &row.dimension {
        fragments.push(format!("Dimensions: {dimension}"));
    }
    if let Some(weight) = &row.weight {
        fragments.push(format!("Weight: {weight}"));
    }
    if let Some(colors) = &row.colors {
        fragments.push(format!("Available Colors: {colors}"));
    }
    if let Some(upc) = code(row.upc.as_deref()) {
        fragments.push(format!("UPC: {upc}"));
    }
    if let Some(ean) = code(row.ean.as_deref()) {
        fragments.push(format!("EAN: {ean}"));
    }

    let sentence = format!(
        "High-quality {brand} product featuring advanced technology and reliable performance."
    );
    let description = if fragments.is_empty() {
        sentence
    } else {
        format!("{sentence}\n\n{}", fragments.join(" | "))
    };

    truncate_description(&description)
}

/// Barcodes of `"0"` are placeholders in the source data.
fn code(value: Option<&str>) -> Option<&str> {
    value.filter(|v| *v != "0")
}

/// Cut `text` to at most [`MAX_DESCRIPTION_CHARS`] characters, marking the cut
/// with an ellipsis.
pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }
    let keep = MAX_DESCRIPTION_CHARS - ELLIPSIS.len();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
