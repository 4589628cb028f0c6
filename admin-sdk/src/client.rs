use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::{
    envelope,
    errors::{AdminError, Result},
    events::{EventBus, EventReceiver, SessionEvent},
    middleware::{ResponseVerdict, SessionMiddleware},
    models::*,
    services::{AuthService, CategoryService, ProductService, StatsService},
    session::{Persistence, SessionStore},
    traits::{EventNavigator, Navigator, Transport},
    transport::{ApiRequest, ApiResponse, ReqwestTransport},
    validation,
};

/// The single choke point for outbound requests.
///
/// Every call goes through the session middleware: the token is attached
/// before the transport runs and the 401 policy is applied to whatever comes
/// back. Transport failures are passed through untouched.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    middleware: Arc<SessionMiddleware>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, middleware: SessionMiddleware) -> Self {
        Self {
            transport,
            middleware: Arc::new(middleware),
        }
    }

    /// Sends `request` and returns the raw response.
    ///
    /// A 401 from a protected endpoint comes back as
    /// [`AdminError::SessionExpired`] after the session has been cleared.
    pub async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        let span = tracing::debug_span!(
            "api_request",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            path = %request.path,
        );

        async move {
            self.middleware.before(&mut request);
            let path = request.path.clone();

            debug!(multipart = request.is_multipart(), "Dispatching request");
            let response = self.transport.send(request).await.map_err(|e| {
                warn!("Request to {} failed before a response arrived: {}", path, e);
                e
            })?;

            let status = response.status;
            if !status.is_success() {
                warn!("Backend answered {} for {}", status, path);
            } else {
                debug!("Backend answered {}", status);
            }

            match self.middleware.after(&path, status) {
                ResponseVerdict::Pass => Ok(response),
                ResponseVerdict::SessionInvalidated => Err(AdminError::SessionExpired { path }),
            }
        }
        .instrument(span)
        .await
    }

    /// Sends `request` and decodes the success envelope into `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.dispatch(request).await?;
        envelope::decode(response)
    }
}

/// Entry point for the admin backend: owns the session store, the HTTP
/// client core and the per-resource facades.
#[derive(Clone)]
pub struct AdminClient {
    config: AdminConfig,
    session: SessionStore,
    events: EventBus,
    auth: AuthService,
    categories: CategoryService,
    products: ProductService,
    stats: StatsService,
}

impl AdminClient {
    /// Create a client that talks to `config.base_url` over HTTP and
    /// announces login redirects on its event bus.
    pub fn new(config: AdminConfig, session: SessionStore) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let events = EventBus::new();
        let navigator = Arc::new(EventNavigator::new(events.clone()));
        Ok(Self::with_parts(config, session, events, transport, navigator))
    }

    /// Assemble a client from explicit collaborators.
    pub fn with_parts(
        config: AdminConfig,
        session: SessionStore,
        events: EventBus,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let middleware =
            SessionMiddleware::new(session.clone(), navigator, config.login_location.clone());
        let api = ApiClient::new(transport, middleware);

        Self {
            config,
            session,
            events,
            auth: AuthService::new(api.clone()),
            categories: CategoryService::new(api.clone()),
            products: ProductService::new(api.clone()),
            stats: StatsService::new(api),
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn categories(&self) -> &CategoryService {
        &self.categories
    }

    pub fn products(&self) -> &ProductService {
        &self.products
    }

    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in with username and password and keep the issued token.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        persistence: Persistence,
    ) -> Result<TokenResponse> {
        let response = self.auth.login(username, password).await?;
        self.session.set(&response.token, persistence);
        self.events.publish(SessionEvent::SignedIn {
            remembered: persistence == Persistence::Persistent,
        });
        info!("Signed in as {}", username);
        Ok(response)
    }

    /// Finish the Google OAuth flow. OAuth logins are always remembered.
    pub async fn complete_google_sign_in(&self, code: &str) -> Result<TokenResponse> {
        let response = self.auth.exchange_google_code(code).await?;
        self.session.set(&response.token, Persistence::Persistent);
        self.events
            .publish(SessionEvent::SignedIn { remembered: true });
        info!("Signed in with Google");
        Ok(response)
    }

    pub fn sign_out(&self) {
        self.session.clear();
        self.events.publish(SessionEvent::SignedOut);
        info!("Signed out");
    }

    /// Save product details, then upload `new_images` if there are any.
    ///
    /// Both the fields and the image batch are validated before the first
    /// request. A failed image upload after a successful update is reported
    /// in the result rather than as an error, unless the session expired.
    pub async fn update_product_with_images(
        &self,
        id: &ResourceId,
        fields: &ProductFields,
        new_images: Vec<ImageFile>,
        existing_images: usize,
    ) -> Result<ProductUpdateReport> {
        validation::validate_product_fields(fields).into_result()?;
        if !new_images.is_empty() {
            validation::validate_image_batch(&new_images, existing_images).into_result()?;
        }

        let updated = self.products.update(id, fields).await?;
        if new_images.is_empty() {
            return Ok(ProductUpdateReport {
                product: updated.product,
                images_uploaded: None,
            });
        }

        match self
            .products
            .add_images(id, new_images, existing_images)
            .await
        {
            Ok(change) => Ok(ProductUpdateReport {
                product: change.product.or(updated.product),
                images_uploaded: Some(true),
            }),
            Err(e) if e.is_session_expired() => Err(e),
            Err(e) => {
                warn!("Product {} updated, but image upload failed: {}", id, e);
                Ok(ProductUpdateReport {
                    product: updated.product,
                    images_uploaded: Some(false),
                })
            }
        }
    }
}
