// In-memory Api used by builder and fetcher tests.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{RepofetchError, Result};

use super::client::Api;

enum Canned {
    Json(Value),
    Status(u16, String),
    Transport(String),
}

/// Canned responses keyed by endpoint. Unknown endpoints answer 404.
#[derive(Default)]
pub(crate) struct FakeApi {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, endpoint: &str, value: Value) -> Self {
        self.responses
            .insert(endpoint.to_string(), Canned::Json(value));
        self
    }

    pub fn with_status(mut self, endpoint: &str, status: u16, message: &str) -> Self {
        self.responses.insert(
            endpoint.to_string(),
            Canned::Status(status, message.to_string()),
        );
        self
    }

    pub fn with_transport_error(mut self, endpoint: &str, detail: &str) -> Self {
        self.responses
            .insert(endpoint.to_string(), Canned::Transport(detail.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Api for FakeApi {
    async fn request(&self, endpoint: &str) -> Result<Value> {
        self.calls.lock().unwrap().push(endpoint.to_string());

        match self.responses.get(endpoint) {
            Some(Canned::Json(value)) => Ok(value.clone()),
            Some(Canned::Status(status, message)) => Err(RepofetchError::Api {
                status: *status,
                message: message.clone(),
                endpoint: endpoint.to_string(),
            }),
            Some(Canned::Transport(detail)) => Err(RepofetchError::Transport(detail.clone())),
            None => Err(RepofetchError::Api {
                status: 404,
                message: "Not Found".to_string(),
                endpoint: endpoint.to_string(),
            }),
        }
    }
}

/// Base64-encode text the way the contents API does.
pub(crate) fn encoded(text: &str) -> Value {
    use base64::{Engine, engine::general_purpose::STANDARD};
    serde_json::json!({ "content": STANDARD.encode(text), "encoding": "base64" })
}
