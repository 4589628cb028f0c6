//! Shared fakes for the client tests: a transport that records requests
//! and replays canned answers, plus a client wired to it.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use admin_sdk::{
    errors::Result, AdminClient, AdminConfig, ApiRequest, ApiResponse, EventBus, EventNavigator,
    ImageFile, MemoryCookieJar, NewProduct, ProductFields, ResourceId, SessionStore, Transport,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

pub struct FakeTransport {
    requests: Mutex<Vec<ApiRequest>>,
    replies: Mutex<VecDeque<ApiResponse>>,
    fallback: ApiResponse,
}

impl FakeTransport {
    /// Answers every request with `status` and `body`.
    pub fn replying(status: StatusCode, body: Value) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            fallback: ApiResponse::json(status, &body),
        })
    }

    /// Answers with `replies` in order, then with 500s.
    pub fn scripted(replies: Vec<(StatusCode, Value)>) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|(status, body)| ApiResponse::json(status, &body))
                    .collect(),
            ),
            fallback: ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();
        Ok(reply.unwrap_or_else(|| self.fallback.clone()))
    }
}

pub struct Harness {
    pub client: AdminClient,
    pub session: SessionStore,
    pub jar: Arc<MemoryCookieJar>,
}

pub fn harness(transport: Arc<FakeTransport>) -> Harness {
    let jar = Arc::new(MemoryCookieJar::new());
    let session = SessionStore::new(jar.clone());
    let events = EventBus::new();
    let navigator = Arc::new(EventNavigator::new(events.clone()));
    let client = AdminClient::with_parts(
        AdminConfig::new("http://backend.test"),
        session.clone(),
        events,
        transport,
        navigator,
    );
    Harness {
        client,
        session,
        jar,
    }
}

pub fn png(name: &str, size: usize) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0x89; size])
}

pub fn lamp_fields() -> ProductFields {
    ProductFields {
        title: "Desk lamp".to_string(),
        description: Some("Brass, adjustable".to_string()),
        category_id: Some(ResourceId::from(3)),
        price: Some(200.0),
        discount: Some(25),
        is_active: true,
    }
}

pub fn lamp(images: Vec<ImageFile>) -> NewProduct {
    NewProduct::new(lamp_fields(), images)
}

pub fn product_json(id: i64) -> Value {
    serde_json::json!({
        "id": id,
        "title": "Desk lamp",
        "description": "Brass, adjustable",
        "category_id": 3,
        "category_name": "Lighting",
        "price": 200.0,
        "discount": 25,
        "final_price": 150.0,
        "is_active": true,
        "images": [{ "id": 11, "image": "https://cdn.example/11.png" }]
    })
}
