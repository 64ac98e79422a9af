//! Typed extraction of electronics CSV records.

use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Columns as they appear in the CSV header. Unknown columns are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawCsvRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    manufacturer: String,
    #[serde(default, rename = "manufacturerNumber")]
    manufacturer_number: String,
    #[serde(default)]
    dimension: String,
    #[serde(default)]
    weight: String,
    #[serde(default)]
    colors: String,
    #[serde(default)]
    upc: String,
    #[serde(default)]
    ean: String,
    #[serde(default)]
    categories: String,
    #[serde(default, rename = "dateAdded")]
    date_added: String,
    #[serde(default, rename = "dateUpdated")]
    date_updated: String,
    #[serde(default, rename = "imageURLs")]
    image_urls: String,
}

/// One CSV record. Every field is trimmed; blank values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub manufacturer: Option<String>,
    pub manufacturer_number: Option<String>,
    pub dimension: Option<String>,
    pub weight: Option<String>,
    pub colors: Option<String>,
    pub upc: Option<String>,
    pub ean: Option<String>,
    pub categories: Option<String>,
    pub date_added: Option<String>,
    pub date_updated: Option<String>,
    pub image_urls: Option<String>,
}

fn present(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl From<RawCsvRecord> for CsvRow {
    fn from(raw: RawCsvRecord) -> Self {
        Self {
            name: present(raw.name),
            brand: present(raw.brand),
            manufacturer: present(raw.manufacturer),
            manufacturer_number: present(raw.manufacturer_number),
            dimension: present(raw.dimension),
            weight: present(raw.weight),
            colors: present(raw.colors),
            upc: present(raw.upc),
            ean: present(raw.ean),
            categories: present(raw.categories),
            date_added: present(raw.date_added),
            date_updated: present(raw.date_updated),
            image_urls: present(raw.image_urls),
        }
    }
}

impl CsvRow {
    /// Normalized `(name, brand)` identity used to reject duplicate rows.
    pub fn dedup_key(&self) -> Option<String> {
        match (&self.name, &self.brand) {
            (Some(name), Some(brand)) => Some(dedup_key(name, brand)),
            _ => None,
        }
    }

    /// First entry of the comma-separated `imageURLs` list.
    pub fn first_image_url(&self) -> Option<&str> {
        self.image_urls
            .as_deref()
            .and_then(|urls| urls.split(',').next())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

pub fn dedup_key(name: &str, brand: &str) -> String {
    format!("{}_{}", name.trim(), brand.trim()).to_lowercase()
}

/// Rows read from a CSV source.
#[derive(Debug, Clone, Default)]
pub struct LoadedRows {
    pub rows: Vec<CsvRow>,
    /// Records that could not be decoded and were dropped.
    pub malformed: usize,
}

/// Read every record from `reader`. The header row is required; records that
/// fail to decode are logged and counted instead of aborting the load.
///
/// Records shorter than the header are padded with blank cells, so missing
/// trailing columns read as absent rather than malformed.
pub fn read_rows<R: Read>(reader: R) -> Result<LoadedRows, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers = reader.headers()?.clone();

    let mut loaded = LoadedRows::default();
    for (idx, record) in reader.records().enumerate() {
        let decoded = record.and_then(|mut record| {
            record.truncate(headers.len());
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.deserialize::<RawCsvRecord>(Some(&headers))
        });

        match decoded {
            Ok(raw) => loaded.rows.push(raw.into()),
            Err(e) => {
                log::warn!("Skipping malformed CSV record {}: {e}", idx + 2);
                loaded.malformed += 1;
            }
        }
    }

    Ok(loaded)
}

/// Parse a source timestamp, substituting `now` when blank or unparseable.
pub fn parse_timestamp(value: Option<&str>, now: NaiveDateTime) -> NaiveDateTime {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return now;
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.naive_utc();
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return parsed;
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(now)
}
