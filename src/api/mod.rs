//! Blockscan Chat API subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → client.rs (credential check, typed entry points)
//!     → operation.rs (parameter validation, form field mapping)
//!     → request.rs (one form-encoded POST)
//!     → types.rs (JSON envelope → result payload)
//! ```
//!
//! # Design Decisions
//! - The API key is write-once; a client is either initialized or not
//! - All validation is local and happens before a request is built
//! - Transport errors are returned as-is; the caller decides on retries

pub mod client;
pub mod operation;
pub mod request;
pub mod types;

pub use client::ChatClient;
pub use operation::{GetAllMsgParams, Operation};
pub use request::RequestDescriptor;
pub use types::{ApiResponse, BulkSendOutcome, DEFAULT_API_URL};
