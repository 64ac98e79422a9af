//! Heuristic price estimation from product name and brand.

use rand::Rng;

/// Lower bound of the multiplicative jitter applied to the drawn base price.
pub const JITTER_MIN: f64 = 0.85;
/// Exclusive upper bound of the jitter.
pub const JITTER_MAX: f64 = 1.15;

/// Inclusive range of whole-dollar base prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Smallest amount an estimate drawn from this range can take.
    pub fn lowest_estimate(&self) -> f64 {
        f64::from(self.min) * JITTER_MIN
    }

    /// Largest amount an estimate drawn from this range can take.
    pub fn highest_estimate(&self) -> f64 {
        f64::from(self.max) * JITTER_MAX
    }
}

/// Choose the base range for a product. Brand rules win over name keywords;
/// the first matching rule applies.
pub fn price_range(name: &str, brand: Option<&str>) -> PriceRange {
    let name = name.to_lowercase();
    let brand = brand.map(|b| b.trim().to_lowercase()).unwrap_or_default();

    match brand.as_str() {
        "apple" if name.contains("iphone") => return PriceRange::new(699, 1299),
        "apple" => return PriceRange::new(199, 2499),
        "microsoft" if name.contains("surface") => return PriceRange::new(899, 2199),
        "microsoft" => return PriceRange::new(99, 699),
        "samsung" if name.contains("galaxy") => return PriceRange::new(599, 1199),
        "samsung" => return PriceRange::new(149, 899),
        "sony" => return PriceRange::new(99, 799),
        "dell" | "hp" | "lenovo" => return PriceRange::new(299, 1499),
        "nintendo" | "xbox" | "playstation" => return PriceRange::new(199, 499),
        _ => {}
    }

    let mentions = |words: &[&str]| words.iter().any(|w| name.contains(w));

    if mentions(&["laptop", "computer"]) {
        PriceRange::new(399, 1299)
    } else if mentions(&["phone", "smartphone"]) {
        PriceRange::new(199, 899)
    } else if mentions(&["tablet", "ipad"]) {
        PriceRange::new(149, 699)
    } else if mentions(&["keyboard", "mouse"]) {
        PriceRange::new(29, 199)
    } else if mentions(&["monitor", "display"]) {
        PriceRange::new(149, 599)
    } else {
        PriceRange::new(49, 399)
    }
}

/// Estimate a plausible price in dollars, rounded to cents.
pub fn estimate_price<R>(name: &str, brand: Option<&str>, rng: &mut R) -> f64
where
    R: Rng,
{
    let range = price_range(name, brand);
    let base = rng.gen_range(range.min..=range.max);
    let jitter = rng.gen_range(JITTER_MIN..JITTER_MAX);
    (f64::from(base) * jitter * 100.0).round() / 100.0
}
