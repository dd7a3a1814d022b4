//! Request descriptor and single-shot dispatcher.
//!
//! Every call is one form-encoded POST. No retry, no batching.

use reqwest::{Client, Method};
use url::Url;

use crate::api::types::ApiResponse;
use crate::error::{ChatError, ChatResult};

/// A validated request, built per call and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP verb. Always POST for this API.
    pub verb: Method,
    /// Form fields in send order.
    pub fields: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    /// Start an unauthenticated POST for `method`.
    pub fn post(method: &'static str) -> Self {
        Self {
            verb: Method::POST,
            fields: vec![("method", method.to_string())],
        }
    }

    /// Set `apikey` as the second field, replacing any earlier key.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.fields.retain(|(k, _)| *k != "apikey");
        let at = self.fields.len().min(1);
        self.fields.insert(at, ("apikey", api_key.to_string()));
        self
    }

    /// Append a form field.
    pub fn field(mut self, name: &'static str, value: impl ToString) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Send one request and decode the JSON envelope.
pub(crate) async fn dispatch(
    http: &Client,
    url: &Url,
    request: RequestDescriptor,
) -> ChatResult<ApiResponse> {
    let method = request.get("method").unwrap_or_default().to_string();
    tracing::debug!(method = %method, url = %url, "Dispatching chat API request");

    let response = http
        .request(request.verb, url.clone())
        .form(&request.fields)
        .send()
        .await?
        .error_for_status()?;

    let text = response.text().await?;
    serde_json::from_str::<ApiResponse>(&text).map_err(|e| {
        tracing::warn!(method = %method, error = %e, "Malformed chat API response");
        ChatError::UnexpectedResponse(format!("{e}: {text}"))
    })
}
