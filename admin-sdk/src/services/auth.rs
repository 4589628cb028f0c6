use crate::{
    client::ApiClient,
    errors::Result,
    middleware::{GOOGLE_CALLBACK_PATH, LOGIN_PATH},
    models::{GoogleAuthUrl, GoogleCallbackRequest, LoginRequest, TokenResponse, VerifiedSession},
    transport::ApiRequest,
};

const GOOGLE_URL_PATH: &str = "/api/auth/google/url";
const VERIFY_PATH: &str = "/api/auth/verify";

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange username and password for a token. Does not store it.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let request = ApiRequest::post(LOGIN_PATH).with_json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        self.client.call(request).await
    }

    /// URL of the Google consent screen to send the operator to.
    pub async fn google_auth_url(&self) -> Result<GoogleAuthUrl> {
        self.client.call(ApiRequest::get(GOOGLE_URL_PATH)).await
    }

    /// Exchange the OAuth `code` from the callback for a token.
    pub async fn exchange_google_code(&self, code: &str) -> Result<TokenResponse> {
        let request = ApiRequest::post(GOOGLE_CALLBACK_PATH).with_json(&GoogleCallbackRequest {
            code: code.to_string(),
        })?;
        self.client.call(request).await
    }

    /// Ask the backend whether the current token is still valid.
    pub async fn verify(&self) -> Result<VerifiedSession> {
        self.client.call(ApiRequest::get(VERIFY_PATH)).await
    }
}
