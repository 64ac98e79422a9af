//! Download remote product images and store them as attachments.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::domain::product::Product;
use crate::domain::product_image::ProductImage;
use crate::domain::types::{ImageUrl, TypeConstraintError};
use crate::repository::ProductImageWriter;
use crate::repository::errors::RepositoryError;
use crate::seed::fetch::{FetchError, HttpFetch};

pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// URL fragments identifying placeholder or tracking images.
pub const BLOCKED_IMAGE_MARKERS: [&str; 3] = ["barcodable.com", "placeholder", "box.gif"];

/// Why no download was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Field empty or without any `http` reference.
    NoUrl,
    /// First URL is not an absolute `http(s)` URL.
    NotHttp,
    /// URL points at a known placeholder image.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Attached { filename: String, bytes: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image url: {0}")]
    InvalidUrl(#[from] TypeConstraintError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to store image: {0}")]
    Store(#[from] RepositoryError),
}

/// Pick the URL to download from a raw `imageURLs` field.
pub fn select_image_url(raw: &str) -> Result<&str, SkipReason> {
    if raw.trim().is_empty() || !raw.contains("http") {
        return Err(SkipReason::NoUrl);
    }

    let url = raw.split(',').next().unwrap_or_default().trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(SkipReason::NotHttp);
    }
    if BLOCKED_IMAGE_MARKERS.iter().any(|m| url.contains(m)) {
        return Err(SkipReason::Blocked);
    }
    Ok(url)
}

/// `product_{id}_{8 hex}.jpg`
fn image_filename(product: &Product) -> String {
    format!("product_{}_{:08x}.jpg", product.id, rand::random::<u32>())
}

/// Downloads images with a bounded timeout.
pub struct ImageFetcher<'a, F: ?Sized> {
    fetcher: &'a F,
    timeout: Duration,
}

impl<'a, F> ImageFetcher<'a, F>
where
    F: HttpFetch + ?Sized,
{
    pub fn new(fetcher: &'a F, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Download the first usable URL of `raw` and attach it to `product`,
    /// replacing any earlier image.
    pub fn attach_image_from_url<R>(
        &self,
        repo: &R,
        product: &Product,
        raw: &str,
    ) -> Result<ImageOutcome, ImageError>
    where
        R: ProductImageWriter + ?Sized,
    {
        let url = match select_image_url(raw) {
            Ok(url) => ImageUrl::new(url)?,
            Err(reason) => return Ok(ImageOutcome::Skipped(reason)),
        };

        let data = self.fetcher.fetch(url.as_str(), Some(self.timeout))?;
        let image = ProductImage {
            product_id: product.id,
            filename: image_filename(product),
            content_type: IMAGE_CONTENT_TYPE.to_string(),
            data,
            created_at: Utc::now().naive_utc(),
        };
        repo.attach_product_image(&image)?;

        Ok(ImageOutcome::Attached {
            bytes: image.byte_size(),
            filename: image.filename,
        })
    }

    /// Like [`Self::attach_image_from_url`] but logs the outcome instead of
    /// returning it. Returns whether an image was attached.
    pub fn attach_and_log<R>(&self, repo: &R, product: &Product, raw: Option<&str>) -> bool
    where
        R: ProductImageWriter + ?Sized,
    {
        match self.attach_image_from_url(repo, product, raw.unwrap_or_default()) {
            Ok(ImageOutcome::Attached { filename, bytes }) => {
                log::info!("  Image attached for {}: {filename} ({bytes} bytes)", product.name);
                true
            }
            Ok(ImageOutcome::Skipped(reason)) => {
                log::debug!("  No image for {}: {reason:?}", product.name);
                false
            }
            Err(e) => {
                log::warn!("  Image attachment failed for {}: {e}", product.name);
                false
            }
        }
    }
}
