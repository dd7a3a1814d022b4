//! Wire types and result decoding.

use serde::Deserialize;
use serde_json::Value;

use crate::address::{is_address, ChatAddress};
use crate::error::{ChatError, ChatResult};

/// Default Blockscan Chat endpoint.
pub const DEFAULT_API_URL: &str = "https://chatapi.blockscan.com/v1/api";

/// JSON envelope returned by every API method.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// "1" on success, "0" on failure. Some deployments send a bare number.
    pub status: Value,
    /// Short status text, e.g. "OK" or "NOTOK".
    #[serde(default)]
    pub message: Option<String>,
    /// Method-specific payload.
    #[serde(default)]
    pub result: Value,
}

impl ApiResponse {
    /// True when the server reported success.
    pub fn is_ok(&self) -> bool {
        match &self.status {
            Value::String(s) => s == "1",
            Value::Number(n) => n.as_u64() == Some(1),
            _ => false,
        }
    }

    /// A ping is accepted on status "1", or when the result is a pong token
    /// naming a valid address.
    pub fn ping_accepted(&self) -> bool {
        self.is_ok() || self.result.as_str().is_some_and(contains_address)
    }

    /// Unwrap the payload, turning a failure status into [`ChatError::Api`].
    pub fn into_result(self) -> ChatResult<Value> {
        if self.is_ok() {
            return Ok(self.result);
        }
        let message = match (self.result, self.message) {
            (Value::String(s), _) if !s.is_empty() => s,
            (_, Some(m)) => m,
            (other, None) => other.to_string(),
        };
        Err(ChatError::Api { message })
    }
}

fn contains_address(token: &str) -> bool {
    token
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word.starts_with("0x") && is_address(word))
}

/// Decode a count or id that may arrive as a number or a numeric string.
pub(crate) fn decode_integer<T>(value: Value, what: &str) -> ChatResult<T>
where
    T: TryFrom<i64> + std::str::FromStr,
{
    let parsed = match &value {
        Value::Number(n) => n.as_i64().and_then(|n| T::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<T>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ChatError::UnexpectedResponse(format!("expected {what}, got {value}")))
}

/// Decode a message listing. A null result is an empty page.
pub(crate) fn decode_messages(value: Value) -> ChatResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(ChatError::UnexpectedResponse(format!(
            "expected message array, got {other}"
        ))),
    }
}

/// Outcome of one send within a bulk send.
#[derive(Debug)]
pub struct BulkSendOutcome {
    /// Recipient, in checksum form.
    pub address: ChatAddress,
    /// Server confirmation or the error for this recipient.
    pub result: ChatResult<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> ApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_status_variants() {
        assert!(response(json!({"status": "1", "result": 3})).is_ok());
        assert!(response(json!({"status": 1, "result": 3})).is_ok());
        assert!(!response(json!({"status": "0", "result": "NOTOK"})).is_ok());
    }

    #[test]
    fn test_ping_accepts_pong_with_address() {
        let pong = response(json!({
            "status": "0",
            "result": "pong, 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        }));
        assert!(pong.ping_accepted());

        let bogus = response(json!({"status": "0", "result": "pong, 0x1234"}));
        assert!(!bogus.ping_accepted());
    }

    #[test]
    fn test_failure_status_becomes_api_error() {
        let err = response(json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"}))
            .into_result()
            .unwrap_err();
        match err {
            ChatError::Api { message } => assert_eq!(message, "Invalid API Key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_integer() {
        assert_eq!(decode_integer::<u64>(json!(5), "count").unwrap(), 5);
        assert_eq!(decode_integer::<u64>(json!("7"), "count").unwrap(), 7);
        assert_eq!(decode_integer::<i64>(json!(-1), "id").unwrap(), -1);
        assert!(decode_integer::<u64>(json!(-1), "count").is_err());
        assert!(decode_integer::<u64>(json!([1]), "count").is_err());
    }

    #[test]
    fn test_decode_messages() {
        assert_eq!(decode_messages(json!([{"id": 1}])).unwrap().len(), 1);
        assert!(decode_messages(Value::Null).unwrap().is_empty());
        assert!(decode_messages(json!("nope")).is_err());
    }
}
