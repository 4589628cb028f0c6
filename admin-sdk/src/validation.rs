//! Client-side form validation.
//!
//! Everything here runs before a request is built. A failing check is
//! reported per field and the call never reaches the HTTP client.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{CategoryFields, ImageFile, NewProduct, ProductFields};

/// Images accepted in a single upload batch.
pub const MAX_IMAGES_PER_UPLOAD: usize = 3;
/// Images a product may carry in total.
pub const MAX_IMAGES_PER_PRODUCT: usize = 10;
/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    CategoryId,
    Price,
    Discount,
    Images,
    Name,
    Slug,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::CategoryId => "category_id",
            Field::Price => "price",
            Field::Discount => "discount",
            Field::Images => "images",
            Field::Name => "name",
            Field::Slug => "slug",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages. The first message recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn merge(&mut self, other: ValidationErrors) {
        for (field, message) in other.errors {
            self.add(field, message);
        }
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks the product detail fields shared by create and edit.
pub fn validate_product_fields(fields: &ProductFields) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if fields.title.trim().is_empty() {
        errors.add(Field::Title, "Title is required");
    }

    if fields.category_id.is_none() {
        errors.add(Field::CategoryId, "Category is required");
    }

    match fields.price {
        Some(price) if price.is_finite() && price > 0.0 => {}
        _ => errors.add(Field::Price, "Valid price is required"),
    }

    if let Some(discount) = fields.discount {
        if !(0..=100).contains(&discount) {
            errors.add(Field::Discount, "Discount must be between 0 and 100");
        }
    }

    errors
}

/// Checks one upload batch against the per-batch, per-product, size and
/// type limits. `existing` is the number of images the product already has.
pub fn validate_image_batch(images: &[ImageFile], existing: usize) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if images.len() > MAX_IMAGES_PER_UPLOAD {
        errors.add(
            Field::Images,
            format!("Maximum {MAX_IMAGES_PER_UPLOAD} images allowed per upload"),
        );
    } else if existing + images.len() > MAX_IMAGES_PER_PRODUCT {
        errors.add(
            Field::Images,
            format!("Maximum {MAX_IMAGES_PER_PRODUCT} images allowed per product"),
        );
    } else if images.iter().any(|image| image.size() > MAX_IMAGE_BYTES) {
        errors.add(Field::Images, "Each image must be less than 5MB");
    } else if images.iter().any(|image| !image.is_image()) {
        errors.add(Field::Images, "Only image files are allowed");
    }

    errors
}

/// Full check for the create form: fields, at least one image, batch limits.
pub fn validate_new_product(product: &NewProduct) -> Result<(), ValidationErrors> {
    let mut errors = validate_product_fields(&product.fields);

    if product.images.is_empty() {
        errors.add(Field::Images, "At least one image is required");
    } else {
        errors.merge(validate_image_batch(&product.images, 0));
    }

    errors.into_result()
}

pub fn validate_category(fields: &CategoryFields) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if fields.name.trim().is_empty() {
        errors.add(Field::Name, "Name is required");
    }
    if fields.slug.trim().is_empty() {
        errors.add(Field::Slug, "Slug is required");
    }
    errors.into_result()
}

/// Derives a URL slug from a display name: lowercase, word characters and
/// single hyphens only, no leading or trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.trim().to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '_' || ch == '-' {
            pending_separator = true;
        }
    }

    slug
}
