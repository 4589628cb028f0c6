use std::fmt;
use std::sync::Arc;

use admin_sdk::{
    events::EventReceiver, pricing, validation, AdminClient, ImageFile, Persistence, ResourceId,
    SessionEvent, SessionStore,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::{
    cli::{product_filters, CategoryCommand, Command, ProductCommand},
    config::AppConfig,
    storage::FileCookieJar,
    utils::{
        errors::{ConsoleError, Result},
        images,
    },
};

/// What a command prints on stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Line(String),
}

impl Output {
    fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Output::Json(serde_json::to_value(value)?))
    }

    fn line(text: impl Into<String>) -> Self {
        Output::Line(text.into())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Json(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&pretty)
            }
            Output::Line(text) => f.write_str(text),
        }
    }
}

/// Runs one console command against the admin backend.
pub struct Console {
    client: AdminClient,
    events: tokio::sync::Mutex<EventReceiver>,
}

impl Console {
    pub fn new(client: AdminClient) -> Self {
        let events = client.subscribe();
        Self {
            client,
            events: tokio::sync::Mutex::new(events),
        }
    }

    /// Wire a client with the file-backed session from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let jar = FileCookieJar::new(config.session.cookie_file.clone());
        debug!("Session cookies at {}", jar.path().display());
        let session = SessionStore::new(Arc::new(jar));
        let client = AdminClient::new(config.admin_config(), session)
            .map_err(|e| ConsoleError::Configuration(e.to_string()))?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &AdminClient {
        &self.client
    }

    pub async fn run(&self, command: Command) -> Result<Output> {
        let result = self.execute(command).await;
        match self.login_required().await {
            Some(location) => {
                warn!("Session invalidated, login required at {}", location);
                Err(ConsoleError::SessionExpired { location })
            }
            None => result,
        }
    }

    /// Drains pending session events, returning the login location if the
    /// session was invalidated.
    async fn login_required(&self) -> Option<String> {
        let mut events = self.events.lock().await;
        let mut location = None;
        loop {
            match events.try_recv() {
                Ok(SessionEvent::LoginRequired { location: to, .. }) => location = Some(to),
                Ok(event) => debug!("Session event: {:?}", event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} session events", skipped)
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        location
    }

    async fn execute(&self, command: Command) -> Result<Output> {
        let client = &self.client;
        match command {
            Command::Login {
                username,
                password,
                remember,
            } => {
                client
                    .sign_in(&username, &password, Persistence::remember(remember))
                    .await
                    .map_err(|e| ConsoleError::command(e, "Login failed"))?;
                Ok(Output::line("Login successful!"))
            }
            Command::GoogleUrl => {
                let auth = client
                    .auth()
                    .google_auth_url()
                    .await
                    .map_err(|e| ConsoleError::command(e, "Google authentication failed"))?;
                Ok(Output::line(auth.url))
            }
            Command::GoogleCallback { code } => {
                client
                    .complete_google_sign_in(&code)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Google authentication failed"))?;
                Ok(Output::line("Login successful!"))
            }
            Command::Verify => {
                let verified = client
                    .auth()
                    .verify()
                    .await
                    .map_err(|e| ConsoleError::command(e, "Authentication failed"))?;
                Output::json(&verified)
            }
            Command::Logout => {
                client.sign_out();
                Ok(Output::line("Logged out successfully"))
            }
            Command::Whoami => Ok(Output::Json(json!({
                "authenticated": client.is_authenticated(),
                "base_url": client.config().base_url,
            }))),
            Command::Stats => {
                let stats = client
                    .stats()
                    .dashboard()
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to fetch stats"))?;
                Output::json(&stats)
            }
            Command::Categories(command) => self.categories(command).await,
            Command::Products(command) => self.products(command).await,
        }
    }

    async fn categories(&self, command: CategoryCommand) -> Result<Output> {
        let categories = self.client.categories();
        match command {
            CategoryCommand::List { active } => {
                let list = categories
                    .list(active)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to fetch categories"))?;
                Output::json(&list)
            }
            CategoryCommand::Create(args) => {
                let change = categories
                    .create(&args.to_fields())
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to save category"))?;
                acknowledged(change.message, change.category, "Category created successfully")
            }
            CategoryCommand::Update { id, fields } => {
                let change = categories
                    .update(&id, &fields.to_fields())
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to save category"))?;
                acknowledged(change.message, change.category, "Category updated successfully")
            }
            CategoryCommand::Toggle { id } => {
                let change = categories
                    .toggle_active(&id)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to toggle category status"))?;
                acknowledged(change.message, change.category, "Category status updated")
            }
            CategoryCommand::Slug { name } => {
                Ok(Output::line(admin_sdk::validation::slugify(&name)))
            }
        }
    }

    async fn products(&self, command: ProductCommand) -> Result<Output> {
        let products = self.client.products();
        match command {
            ProductCommand::List {
                active,
                category,
                page,
                limit,
            } => {
                let page = products
                    .list(&product_filters(active, category, page, limit))
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to fetch products"))?;
                Output::json(&page)
            }
            ProductCommand::Get { id } => {
                let product = self.fetch_product(&id).await?;
                Output::json(&product)
            }
            ProductCommand::Create { fields, images } => {
                let images = images::load_images(&images).await?;
                let change = products
                    .create(admin_sdk::NewProduct::new(fields.to_fields(), images))
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to create product"))?;
                acknowledged(change.message, change.product, "Product created successfully")
            }
            ProductCommand::Update { id, fields, images } => {
                let images = images::load_images(&images).await?;
                let existing = if images.is_empty() {
                    0
                } else {
                    self.existing_image_count(&id, &images, "Failed to update product")
                        .await?
                };
                let report = self
                    .client
                    .update_product_with_images(&id, &fields.to_fields(), images, existing)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to update product"))?;

                let status = match report.images_uploaded {
                    None => "Product updated successfully",
                    Some(true) => "Product and images updated successfully",
                    Some(false) => "Product updated, but some images failed to upload",
                };
                Ok(Output::Json(json!({
                    "status": status,
                    "product": serde_json::to_value(&report.product)?,
                })))
            }
            ProductCommand::Toggle { id } => {
                let change = products
                    .toggle_active(&id)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to toggle product status"))?;
                acknowledged(change.message, change.product, "Product status updated")
            }
            ProductCommand::AddImages { id, images } => {
                let images = images::load_images(&images).await?;
                let existing = self
                    .existing_image_count(&id, &images, "Failed to upload images")
                    .await?;
                let change = products
                    .add_images(&id, images, existing)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to upload images"))?;
                Output::json(&change)
            }
            ProductCommand::DeleteImage {
                product_id,
                image_id,
            } => {
                products
                    .delete_image(&product_id, &image_id)
                    .await
                    .map_err(|e| ConsoleError::command(e, "Failed to delete image"))?;
                Ok(Output::line("Image deleted successfully"))
            }
            ProductCommand::FinalPrice { price, discount } => Ok(Output::line(
                pricing::format_price(pricing::final_price(price, discount)),
            )),
        }
    }

    /// Checks the batch on its own first, so an oversized upload is refused
    /// before the product is fetched to learn how many images it holds.
    async fn existing_image_count(
        &self,
        id: &ResourceId,
        images: &[ImageFile],
        fallback: &str,
    ) -> Result<usize> {
        validation::validate_image_batch(images, 0)
            .into_result()
            .map_err(|e| ConsoleError::command(e.into(), fallback))?;
        Ok(self.fetch_product(id).await?.images.len())
    }

    async fn fetch_product(&self, id: &ResourceId) -> Result<admin_sdk::Product> {
        self.client
            .products()
            .get_by_id(id)
            .await
            .map_err(|e| ConsoleError::command(e, "Failed to fetch product"))
    }
}

/// Renders a write acknowledgement: the echoed entity when the backend sent
/// one, otherwise its message or `fallback`.
fn acknowledged<T: Serialize>(
    message: Option<String>,
    entity: Option<T>,
    fallback: &str,
) -> Result<Output> {
    let message = message.unwrap_or_else(|| fallback.to_string());
    info!("{}", message);
    match entity {
        Some(entity) => Output::json(&entity),
        None => Ok(Output::line(message)),
    }
}
