//! Client library for the Blockscan Chat API.
//!
//! ```no_run
//! use blockscan_chat::{ApiConfig, ChatClient, GetAllMsgParams};
//!
//! # async fn run() -> blockscan_chat::ChatResult<()> {
//! let config = ApiConfig {
//!     api_key: "YOUR_API_KEY".to_string(),
//!     ..Default::default()
//! };
//! let client = ChatClient::connect(&config).await?;
//! let unread = client.get_local_msg_count().await?;
//! let page = client
//!     .get_all_msg(GetAllMsgParams { offset: 10, ..Default::default() })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod api;
pub mod config;
pub mod error;
pub mod observability;

pub use address::{is_address, to_checksum_address, ChatAddress};
pub use api::{BulkSendOutcome, ChatClient, GetAllMsgParams, Operation};
pub use config::{ApiConfig, ChatConfig};
pub use error::{ChatError, ChatResult};
