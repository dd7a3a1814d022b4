//! Per-method parameter contracts.
//!
//! # Responsibilities
//! - Describe each data method and its parameters as a typed value
//! - Validate parameters locally, before any request is built
//! - Map a validated operation onto its form fields
//!
//! # Design Decisions
//! - Validation never touches the network, so it is testable offline
//! - The JSON entry point rejects unknown and extra keys via serde
//! - Addresses are forwarded in checksum form

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::ChatAddress;
use crate::api::request::RequestDescriptor;
use crate::error::{ChatError, ChatResult};

/// Largest page offset accepted by `getchat`.
pub const MAX_OFFSET: u32 = 100;

/// Largest message category accepted by `getchat`.
pub const MAX_C_TYPE: u32 = 2;

/// Parameters for listing messages. All fields default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct GetAllMsgParams {
    /// Message id to start from.
    pub start_id: i64,
    /// Number of messages to offset, 0 to 100.
    pub offset: u32,
    /// Message category, 0 to 2.
    pub c_type: u32,
}

impl GetAllMsgParams {
    pub fn validate(&self) -> ChatResult<()> {
        if self.offset > MAX_OFFSET {
            return Err(ChatError::InvalidInput(format!(
                "offset must be an integer between 0 and {MAX_OFFSET}, got {}",
                self.offset
            )));
        }
        if self.c_type > MAX_C_TYPE {
            return Err(ChatError::InvalidInput(format!(
                "cType must be an integer between 0 and {MAX_C_TYPE}, got {}",
                self.c_type
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AddressArgs {
    address: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SendArgs {
    address: String,
    message: String,
}

/// One remote data method with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Unread count for the key owner.
    LocalMsgCount,
    /// Unread count from a given address.
    ExternalMsgCount { address: String },
    /// Id of the first message.
    FirstMsgId,
    /// Id of the last message.
    LastMsgId,
    /// Page of messages.
    AllMsg(GetAllMsgParams),
    /// Send `message` to `address`.
    SendMsg { address: String, message: String },
    /// Mark every message from `address` as read.
    MarkAllMsgAsRead { address: String },
}

impl Operation {
    /// Build an operation from a method name and an optional JSON object of
    /// parameters, e.g. `("getAllMsg", {"offset": 10})`.
    pub fn from_json(name: &str, params: Option<&Value>) -> ChatResult<Self> {
        let params = params.filter(|p| !p.is_null());

        let operation = match name {
            "getLocalMsgCount" => {
                expect_no_params(name, params)?;
                Operation::LocalMsgCount
            }
            "getExternalMsgCount" => {
                let args: AddressArgs = parse_params(name, params)?;
                Operation::ExternalMsgCount {
                    address: args.address,
                }
            }
            "getFirstMsgId" => {
                expect_no_params(name, params)?;
                Operation::FirstMsgId
            }
            "getLastMsgId" => {
                expect_no_params(name, params)?;
                Operation::LastMsgId
            }
            "getAllMsg" => Operation::AllMsg(parse_params(name, params)?),
            "sendMsg" => {
                let args: SendArgs = parse_params(name, params)?;
                Operation::SendMsg {
                    address: args.address,
                    message: args.message,
                }
            }
            "markAllMsgAsRead" => {
                let args: AddressArgs = parse_params(name, params)?;
                Operation::MarkAllMsgAsRead {
                    address: args.address,
                }
            }
            other => {
                return Err(ChatError::InvalidInput(format!(
                    "Unsupported method: {other}"
                )))
            }
        };

        operation.validate()?;
        Ok(operation)
    }

    /// Wire name sent in the `method` form field.
    pub fn method(&self) -> &'static str {
        match self {
            Operation::LocalMsgCount | Operation::ExternalMsgCount { .. } => "unreadmsgcount",
            Operation::FirstMsgId => "getfirstmsgid",
            Operation::LastMsgId => "getlastmsgid",
            Operation::AllMsg(_) => "getchat",
            Operation::SendMsg { .. } => "sendchat",
            Operation::MarkAllMsgAsRead { .. } => "markmsgread",
        }
    }

    /// Check every argument against the method's contract.
    pub fn validate(&self) -> ChatResult<()> {
        match self {
            Operation::LocalMsgCount | Operation::FirstMsgId | Operation::LastMsgId => Ok(()),
            Operation::ExternalMsgCount { address } | Operation::MarkAllMsgAsRead { address } => {
                validate_address(address).map(|_| ())
            }
            Operation::AllMsg(params) => params.validate(),
            Operation::SendMsg { address, message } => {
                validate_send(address, message).map(|_| ())
            }
        }
    }

    /// Validate and build the form request for this operation, without the API key.
    pub fn to_request(&self) -> ChatResult<RequestDescriptor> {
        let request = RequestDescriptor::post(self.method());
        let request = match self {
            Operation::LocalMsgCount | Operation::FirstMsgId | Operation::LastMsgId => request,
            Operation::ExternalMsgCount { address } | Operation::MarkAllMsgAsRead { address } => {
                request.field("address", validate_address(address)?)
            }
            Operation::AllMsg(params) => {
                params.validate()?;
                request
                    .field("startid", params.start_id)
                    .field("offset", params.offset)
                    .field("ctype", params.c_type)
            }
            Operation::SendMsg { address, message } => {
                let to = validate_send(address, message)?;
                request.field("to", to).field("msg", message)
            }
        };
        Ok(request)
    }
}

/// Non-empty and valid per the checksum rules.
pub fn validate_address(address: &str) -> ChatResult<ChatAddress> {
    if address.is_empty() {
        return Err(ChatError::InvalidInput(
            "Please provide a valid address.".to_string(),
        ));
    }
    ChatAddress::parse(address)
}

fn validate_send(address: &str, message: &str) -> ChatResult<ChatAddress> {
    if address.is_empty() || message.is_empty() {
        return Err(ChatError::InvalidInput(
            "Please provide both a valid address and message.".to_string(),
        ));
    }
    ChatAddress::parse(address)
}

fn expect_no_params(name: &str, params: Option<&Value>) -> ChatResult<()> {
    match params {
        None => Ok(()),
        Some(Value::Object(map)) if map.is_empty() => Ok(()),
        Some(_) => Err(ChatError::InvalidInput(format!(
            "{name} does not accept any parameters"
        ))),
    }
}

fn parse_params<T: DeserializeOwned>(name: &str, params: Option<&Value>) -> ChatResult<T> {
    let value = params
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(value).map_err(|e| {
        ChatError::InvalidInput(format!("Invalid parameters passed to {name}: {e}"))
    })
}
