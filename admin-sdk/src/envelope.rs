use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    errors::{AdminError, Result},
    transport::ApiResponse,
};

/// The backend's `{ "success": bool, ... }` body as an explicit tagged value.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure { message: Option<String> },
}

impl<T: DeserializeOwned> Envelope<T> {
    /// A body without a `success` flag counts as a success if it decodes.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value.get("success").and_then(Value::as_bool) {
            Some(false) => Ok(Envelope::Failure {
                message: message_of(&value),
            }),
            _ => serde_json::from_value(value).map(Envelope::Success),
        }
    }
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Turns a raw response into the typed payload or an [`AdminError::Api`].
pub(crate) fn decode<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    let status = response.status;

    if !status.is_success() {
        let message = serde_json::from_slice::<Value>(&response.body)
            .ok()
            .as_ref()
            .and_then(message_of);
        return Err(AdminError::Api { status, message });
    }

    // An empty or `null` 2xx body is a bare acknowledgement.
    let value = if response.body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        match serde_json::from_slice::<Value>(&response.body)? {
            Value::Null => Value::Object(Map::new()),
            value => value,
        }
    };

    match Envelope::<T>::from_value(value)? {
        Envelope::Success(payload) => Ok(payload),
        Envelope::Failure { message } => Err(AdminError::Api { status, message }),
    }
}
