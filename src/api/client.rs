//! Blockscan Chat API client.
//!
//! # Responsibilities
//! - Hold the endpoint and the write-once API key
//! - Validate arguments before any request is built
//! - Issue one POST per call and decode the payload

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::address::{self, ChatAddress};
use crate::api::operation::{validate_address, GetAllMsgParams, Operation};
use crate::api::request::{self, RequestDescriptor};
use crate::api::types::{decode_integer, decode_messages, BulkSendOutcome};
use crate::config::ApiConfig;
use crate::error::{ChatError, ChatResult};

/// Client for the Blockscan Chat API.
pub struct ChatClient {
    http: Client,
    api_url: Url,
    /// Set once by a successful `init`.
    api_key: OnceLock<String>,
    /// Pause between sends in `send_msg_bulk`.
    bulk_interval: Duration,
}

impl ChatClient {
    /// Create an uninitialized client. Call [`ChatClient::init`] before any
    /// data method, or use [`ChatClient::connect`].
    pub fn new(config: &ApiConfig) -> ChatResult<Self> {
        let api_url: Url = config.api_url.parse().map_err(|e| {
            ChatError::InvalidInput(format!("Invalid API URL '{}': {}", config.api_url, e))
        })?;
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            api_url,
            api_key: OnceLock::new(),
            bulk_interval: Duration::from_millis(config.bulk_send_interval_ms),
        })
    }

    /// Create a client and verify its API key in one step.
    pub async fn connect(config: &ApiConfig) -> ChatResult<Self> {
        let client = Self::new(config)?;
        client.init(&config.api_key).await?;
        Ok(client)
    }

    /// Verify `api_key` with a ping and store it.
    ///
    /// Fails with [`ChatError::AlreadyInitialized`] on a second call and with
    /// [`ChatError::InvalidApiKey`] when the server rejects the key. A rejected
    /// key leaves the client uninitialized.
    pub async fn init(&self, api_key: &str) -> ChatResult<()> {
        if self.api_key.get().is_some() {
            return Err(ChatError::AlreadyInitialized);
        }
        if api_key.is_empty() {
            return Err(ChatError::InvalidInput(
                "API key must not be empty".to_string(),
            ));
        }

        let ping = RequestDescriptor::post("ping").with_api_key(api_key);
        let response = request::dispatch(&self.http, &self.api_url, ping).await?;
        if !response.ping_accepted() {
            tracing::warn!(
                api_url = %self.api_url,
                message = ?response.message,
                "Ping rejected, API key is invalid"
            );
            return Err(ChatError::InvalidApiKey);
        }

        self.api_key
            .set(api_key.to_string())
            .map_err(|_| ChatError::AlreadyInitialized)?;

        tracing::info!(api_url = %self.api_url, "Chat client initialized");
        Ok(())
    }

    /// True once an API key has been accepted.
    pub fn is_initialized(&self) -> bool {
        self.api_key.get().is_some()
    }

    /// The endpoint this client posts to.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Validate and run an operation, returning the raw `result` payload.
    pub async fn execute(&self, operation: &Operation) -> ChatResult<Value> {
        let request = operation.to_request()?.with_api_key(self.api_key()?);

        let response = request::dispatch(&self.http, &self.api_url, request).await?;
        response.into_result().inspect_err(|e| {
            tracing::warn!(method = operation.method(), error = %e, "Chat API call failed");
        })
    }

    /// Unread message count for the key owner.
    pub async fn get_local_msg_count(&self) -> ChatResult<u64> {
        let result = self.execute(&Operation::LocalMsgCount).await?;
        decode_integer(result, "message count")
    }

    /// Unread message count from `address`.
    pub async fn get_external_msg_count(&self, address: &str) -> ChatResult<u64> {
        let operation = Operation::ExternalMsgCount {
            address: address.to_string(),
        };
        let result = self.execute(&operation).await?;
        decode_integer(result, "message count")
    }

    pub async fn get_first_msg_id(&self) -> ChatResult<i64> {
        let result = self.execute(&Operation::FirstMsgId).await?;
        decode_integer(result, "message id")
    }

    pub async fn get_last_msg_id(&self) -> ChatResult<i64> {
        let result = self.execute(&Operation::LastMsgId).await?;
        decode_integer(result, "message id")
    }

    /// Fetch a page of messages.
    pub async fn get_all_msg(&self, params: GetAllMsgParams) -> ChatResult<Vec<Value>> {
        let result = self.execute(&Operation::AllMsg(params)).await?;
        decode_messages(result)
    }

    /// Send `message` to `address`. Returns the server's confirmation.
    pub async fn send_msg(&self, address: &str, message: &str) -> ChatResult<Value> {
        let operation = Operation::SendMsg {
            address: address.to_string(),
            message: message.to_string(),
        };
        self.execute(&operation).await
    }

    /// Mark every message from `address` as read.
    pub async fn mark_all_msg_as_read(&self, address: &str) -> ChatResult<Value> {
        let operation = Operation::MarkAllMsgAsRead {
            address: address.to_string(),
        };
        self.execute(&operation).await
    }

    /// Send the same message to several addresses, one at a time, pausing
    /// between sends.
    ///
    /// All addresses are validated first; if any is invalid nothing is sent.
    /// A failed send is recorded in its outcome and does not stop the batch.
    pub async fn send_msg_bulk<S: AsRef<str>>(
        &self,
        addresses: &[S],
        message: &str,
    ) -> ChatResult<Vec<BulkSendOutcome>> {
        if message.is_empty() {
            return Err(ChatError::InvalidInput(
                "Please provide both a valid address and message.".to_string(),
            ));
        }
        let recipients = addresses
            .iter()
            .map(|a| validate_address(a.as_ref()))
            .collect::<ChatResult<Vec<ChatAddress>>>()?;
        self.api_key()?;

        let mut outcomes = Vec::with_capacity(recipients.len());
        for (i, address) in recipients.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.bulk_interval).await;
            }
            let result = self.send_msg(address.as_str(), message).await;
            if let Err(e) = &result {
                tracing::warn!(to = %address, error = %e, "Bulk send failed for recipient");
            }
            outcomes.push(BulkSendOutcome { address, result });
        }

        tracing::info!(
            sent = outcomes.iter().filter(|o| o.result.is_ok()).count(),
            total = outcomes.len(),
            "Bulk send finished"
        );
        Ok(outcomes)
    }

    /// See [`address::is_address`].
    pub fn is_address(address: &str) -> bool {
        address::is_address(address)
    }

    /// See [`address::to_checksum_address`].
    pub fn to_checksum_address(address: &str) -> ChatResult<String> {
        address::to_checksum_address(address)
    }

    fn api_key(&self) -> ChatResult<&str> {
        self.api_key
            .get()
            .map(String::as_str)
            .ok_or(ChatError::NotInitialized)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_url", &self.api_url.as_str())
            .field("initialized", &self.is_initialized())
            .field("bulk_interval_ms", &self.bulk_interval.as_millis())
            .finish()
    }
}
