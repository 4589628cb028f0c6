use std::path::PathBuf;

use admin_sdk::{CategoryFields, ProductFields, ProductFilters, ResourceId};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "admin-console")]
#[command(about = "Back-office console for the storefront admin API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with username and password
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Keep the session for 7 days instead of this run only
        #[arg(long)]
        remember: bool,
    },
    /// Print the Google OAuth consent URL
    GoogleUrl,
    /// Finish Google sign-in with the code from the OAuth redirect
    GoogleCallback { code: String },
    /// Check the stored token with the backend
    Verify,
    /// Forget the stored token
    Logout,
    /// Report whether a token is stored
    Whoami,
    /// Dashboard totals
    Stats,
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Products(ProductCommand),
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    List {
        /// Only active (true) or inactive (false) categories
        #[arg(long)]
        active: Option<bool>,
    },
    Create(CategoryArgs),
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    Toggle { id: ResourceId },
    /// Print the slug derived from a category name
    Slug { name: String },
}

#[derive(Debug, Clone, Args)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: String,
    /// Derived from the name when omitted
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub inactive: bool,
}

impl CategoryArgs {
    pub fn to_fields(&self) -> CategoryFields {
        let slug = self
            .slug
            .clone()
            .unwrap_or_else(|| admin_sdk::validation::slugify(&self.name));
        CategoryFields::new(self.name.trim(), slug).with_active(!self.inactive)
    }
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[arg(long)]
        active: Option<bool>,
        /// Category slug
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Get { id: ResourceId },
    Create {
        #[command(flatten)]
        fields: ProductArgs,
        /// Image file to upload (repeatable)
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Save product details and optionally append images
    Update {
        id: ResourceId,
        #[command(flatten)]
        fields: ProductArgs,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    Toggle { id: ResourceId },
    AddImages {
        id: ResourceId,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    DeleteImage {
        product_id: ResourceId,
        image_id: ResourceId,
    },
    /// Price after discount, as shown in the product form
    FinalPrice {
        price: f64,
        #[arg(default_value_t = 0)]
        discount: i64,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Category id
    #[arg(long)]
    pub category: Option<ResourceId>,
    #[arg(long)]
    pub price: Option<f64>,
    /// Percent off, 0 to 100
    #[arg(long)]
    pub discount: Option<i64>,
    #[arg(long)]
    pub inactive: bool,
}

impl ProductArgs {
    pub fn to_fields(&self) -> ProductFields {
        ProductFields {
            title: self.title.clone(),
            description: self.description.clone().filter(|d| !d.trim().is_empty()),
            category_id: self.category.clone(),
            price: self.price,
            discount: self.discount,
            is_active: !self.inactive,
        }
    }
}

pub fn product_filters(
    active: Option<bool>,
    category: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
) -> ProductFilters {
    ProductFilters {
        active,
        category_slug: category,
        page,
        limit,
    }
}
