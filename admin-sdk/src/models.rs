use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pricing;

/// Configuration for the admin API client
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Backend base URL (e.g., "http://localhost:4000")
    pub base_url: String,
    /// Where the operator is sent when the session is invalidated
    pub login_location: String,
    /// Timeout for HTTP requests (in seconds)
    pub request_timeout_secs: u64,
}

impl AdminConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            login_location: "/login".to_string(),
            request_timeout_secs: 30,
        }
    }

    pub fn with_login_location(mut self, location: impl Into<String>) -> Self {
        self.login_location = location.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.request_timeout_secs = timeout_secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new("http://localhost:4000")
    }
}

/// Identifier of a backend resource. The backend may use numeric or string
/// keys; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Number(id) => write!(f, "{id}"),
            ResourceId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        ResourceId::Number(id)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        id.parse().unwrap_or_else(|_| ResourceId::Text(id.to_string()))
    }
}

impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(id) => ResourceId::Number(id),
            Err(_) => ResourceId::Text(s.trim().to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct GoogleCallbackRequest {
    pub code: String,
}

/// Token issued by the login and OAuth exchange endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleAuthUrl {
    pub url: String,
}

/// Result of verifying the current token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedSession {
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Editable category fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFields {
    pub name: String,
    pub slug: String,
    pub is_active: bool,
}

impl CategoryFields {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            is_active: true,
        }
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryList {
    pub categories: Vec<Category>,
}

/// Acknowledgement of a category write. The backend may or may not echo
/// the saved category; only the success flag decides the outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryChange {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ResourceId,
    /// Public URL of the stored image
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: ResourceId,
    #[serde(default)]
    pub category_name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount: i64,
    pub final_price: f64,
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

/// Filters for the product listing. Absent filters are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub active: Option<bool>,
    pub category_slug: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductFilters {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(active) = self.active {
            query.push(("is_active".to_string(), active.to_string()));
        }
        if let Some(slug) = self.category_slug.as_deref().filter(|s| !s.is_empty()) {
            query.push(("category".to_string(), slug.to_string()));
        }
        if let Some(page) = self.page.filter(|p| *p > 0) {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            query.push(("limit".to_string(), limit.to_string()));
        }
        query
    }
}

/// Product detail fields shared by the create and edit forms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFields {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: Option<ResourceId>,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    pub is_active: bool,
}

impl ProductFields {
    /// Display price after discount; missing values count as zero.
    pub fn final_price(&self) -> f64 {
        pricing::final_price(self.price.unwrap_or(0.0), self.discount.unwrap_or(0))
    }
}

impl From<&Product> for ProductFields {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            category_id: Some(product.category_id.clone()),
            price: Some(product.price),
            discount: Some(product.discount),
            is_active: product.is_active,
        }
    }
}

/// A product to create, with its initial images
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ProductFields,
    pub images: Vec<ImageFile>,
}

impl NewProduct {
    pub fn new(fields: ProductFields, images: Vec<ImageFile>) -> Self {
        Self { fields, images }
    }
}

/// An image selected for upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Acknowledgement of a product write, image upload or image deletion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductChange {
    #[serde(default)]
    pub message: Option<String>,
    /// Present when the backend echoes the updated product
    #[serde(default)]
    pub product: Option<Product>,
}

/// Outcome of an edit that also uploads new images
#[derive(Debug, Clone)]
pub struct ProductUpdateReport {
    /// Latest product state echoed by the backend, if any
    pub product: Option<Product>,
    /// `None` when no images were submitted
    pub images_uploaded: Option<bool>,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounts {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub categories: ResourceCounts,
    pub products: ResourceCounts,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub data: DashboardStats,
}
