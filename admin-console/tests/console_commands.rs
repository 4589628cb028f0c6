//! Console commands driven against a scripted backend.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use admin_console::{
    cli::{CategoryCommand, Command, ProductArgs, ProductCommand},
    Console, ConsoleError, Output,
};
use admin_sdk::{
    errors::Result as SdkResult, AdminClient, AdminConfig, ApiRequest, ApiResponse, EventBus,
    EventNavigator, Persistence, ResourceId, SessionStore, StatusCode, Transport,
};
use assert_matches::assert_matches;
use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<(StatusCode, Value)>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<(StatusCode, Value)>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn paths(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn send(&self, request: ApiRequest) -> SdkResult<ApiResponse> {
        self.seen.lock().unwrap().push(request);
        let (status, body) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({"success": false})));
        Ok(ApiResponse::json(status, &body))
    }
}

fn console(backend: Arc<ScriptedBackend>) -> (Console, SessionStore) {
    let session = SessionStore::in_memory();
    let events = EventBus::new();
    let navigator = Arc::new(EventNavigator::new(events.clone()));
    let client = AdminClient::with_parts(
        AdminConfig::new("http://backend.test"),
        session.clone(),
        events,
        backend,
        navigator,
    );
    (Console::new(client), session)
}

fn product(images: usize) -> Value {
    json!({
        "id": 7,
        "title": "Desk lamp",
        "category_id": 3,
        "price": 200.0,
        "discount": 25,
        "final_price": 150.0,
        "is_active": true,
        "images": (0..images).map(|i| json!({"id": i, "image": format!("/uploads/{i}.png")})).collect::<Vec<_>>()
    })
}

fn lamp_args() -> ProductArgs {
    ProductArgs {
        title: "Desk lamp".to_string(),
        description: None,
        category: Some(ResourceId::from(3)),
        price: Some(200.0),
        discount: Some(25),
        inactive: false,
    }
}

#[tokio::test]
async fn expired_session_is_reported_once_and_clears_the_token() {
    let backend = ScriptedBackend::new(vec![(
        StatusCode::UNAUTHORIZED,
        json!({"success": false, "message": "Token expired"}),
    )]);
    let (console, session) = console(backend);
    session.set("stale", Persistence::Persistent);

    let err = console.run(Command::Stats).await.unwrap_err();
    assert_matches!(err, ConsoleError::SessionExpired { ref location } if location == "/login");
    assert_eq!(err.to_string(), "Session expired. Please login again.");
    assert_eq!(err.exit_code(), 2);
    assert!(!session.is_authenticated());

    let whoami = console.run(Command::Whoami).await.unwrap();
    assert_matches!(whoami, Output::Json(ref v) if v["authenticated"] == false);
}

#[tokio::test]
async fn login_then_logout() {
    let backend = ScriptedBackend::new(vec![(
        StatusCode::OK,
        json!({"success": true, "token": "fresh"}),
    )]);
    let (console, session) = console(backend.clone());

    let out = console
        .run(Command::Login {
            username: "admin".to_string(),
            password: "secret".to_string(),
            remember: true,
        })
        .await
        .unwrap();
    assert_eq!(out.to_string(), "Login successful!");
    assert_eq!(session.get().as_deref(), Some("fresh"));

    console.run(Command::Logout).await.unwrap();
    assert_eq!(session.get(), None);
    assert_eq!(backend.paths(), vec!["POST /api/auth/login"]);
}

#[tokio::test]
async fn backend_message_is_shown_for_failed_saves() {
    let backend = ScriptedBackend::new(vec![(
        StatusCode::CONFLICT,
        json!({"success": false, "message": "Slug already exists"}),
    )]);
    let (console, _) = console(backend);

    let err = console
        .run(Command::Categories(CategoryCommand::Create(
            admin_console::cli::CategoryArgs {
                name: "Lighting".to_string(),
                slug: None,
                inactive: false,
            },
        )))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Slug already exists");
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn product_create_without_images_fails_locally() {
    let backend = ScriptedBackend::new(Vec::new());
    let (console, _) = console(backend.clone());

    let err = console
        .run(Command::Products(ProductCommand::Create {
            fields: lamp_args(),
            images: Vec::new(),
        }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("At least one image is required"));
    assert!(backend.paths().is_empty());
}

#[tokio::test]
async fn update_with_images_reports_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    let image: PathBuf = dir.path().join("side.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G']).unwrap();

    let backend = ScriptedBackend::new(vec![
        (StatusCode::OK, json!({"success": true, "product": product(2)})),
        (StatusCode::OK, json!({"success": true, "product": product(2)})),
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"success": false, "message": "Upload failed"}),
        ),
    ]);
    let (console, _) = console(backend.clone());

    let out = console
        .run(Command::Products(ProductCommand::Update {
            id: ResourceId::from(7),
            fields: lamp_args(),
            images: vec![image],
        }))
        .await
        .unwrap();

    let Output::Json(value) = out else {
        panic!("expected JSON output");
    };
    assert_eq!(
        value["status"],
        "Product updated, but some images failed to upload"
    );
    assert_eq!(
        backend.paths(),
        vec![
            "GET /admin/products/7",
            "PUT /admin/products/7",
            "POST /admin/products/7/images",
        ]
    );
}

#[tokio::test]
async fn final_price_is_computed_offline() {
    let backend = ScriptedBackend::new(Vec::new());
    let (console, _) = console(backend.clone());

    let out = console
        .run(Command::Products(ProductCommand::FinalPrice {
            price: 200.0,
            discount: 25,
        }))
        .await
        .unwrap();
    assert_eq!(out, Output::Line("150.00".to_string()));
    assert!(backend.paths().is_empty());
}

#[tokio::test]
async fn oversized_batches_are_refused_before_the_product_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let images: Vec<PathBuf> = (0..4)
        .map(|i| {
            let path = dir.path().join(format!("{i}.png"));
            std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
            path
        })
        .collect();

    let backend = ScriptedBackend::new(Vec::new());
    let (console, _) = console(backend.clone());

    let err = console
        .run(Command::Products(ProductCommand::AddImages {
            id: ResourceId::from(7),
            images: images.clone(),
        }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Maximum 3 images allowed per upload"));

    let err = console
        .run(Command::Products(ProductCommand::Update {
            id: ResourceId::from(7),
            fields: lamp_args(),
            images,
        }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Maximum 3 images allowed per upload"));

    assert!(backend.paths().is_empty());
}

#[tokio::test]
async fn bare_acknowledgement_prints_the_backend_message() {
    let backend = ScriptedBackend::new(vec![(
        StatusCode::OK,
        json!({"success": true, "message": "Category created successfully"}),
    )]);
    let (console, _) = console(backend);

    let out = console
        .run(Command::Categories(CategoryCommand::Create(
            admin_console::cli::CategoryArgs {
                name: "Lighting".to_string(),
                slug: None,
                inactive: false,
            },
        )))
        .await
        .unwrap();
    assert_eq!(out, Output::Line("Category created successfully".to_string()));
}
