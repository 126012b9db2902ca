//! Untyped passthrough for endpoints without a dedicated method

use super::{ClientError, PortalClient};
use reqwest::Method;
use serde_json::Value as JsonValue;
use std::borrow::Cow;

fn absolute(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

impl PortalClient {
    /// Authenticated GET of an arbitrary API path
    pub async fn get(&self, path: &str) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::GET, &absolute(path));
        self.execute_authenticated(req).await
    }

    /// Authenticated POST of a JSON body to an arbitrary API path
    pub async fn post(&self, path: &str, body: &JsonValue) -> Result<JsonValue, ClientError> {
        let req = self.request(Method::POST, &absolute(path)).json(body);
        self.execute_authenticated(req).await
    }
}
