//! EIP-55 checksum address validation.
//!
//! # Rules
//! - Accepted shape is an optional `0x` prefix followed by exactly 40 hex digits
//! - All-lowercase and all-uppercase inputs carry no checksum claim and are
//!   always valid
//! - Mixed-case inputs must match the Keccak-256 derived casing exactly

use std::fmt;
use std::str::FromStr;

use alloy::primitives::keccak256;

use crate::error::{ChatError, ChatResult};

/// Number of hex digits in an address body.
const ADDRESS_HEX_LEN: usize = 40;

/// Convert an address to its `0x`-prefixed EIP-55 checksum form.
///
/// Fails with [`ChatError::InvalidAddressFormat`] when the input is not 40 hex
/// digits, and with [`ChatError::InvalidChecksum`] when a mixed-case input
/// disagrees with the derived casing.
pub fn to_checksum_address(address: &str) -> ChatResult<String> {
    let body = address.strip_prefix("0x").unwrap_or(address);
    if body.len() != ADDRESS_HEX_LEN || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChatError::InvalidAddressFormat(address.to_string()));
    }

    let lower = body.to_ascii_lowercase();
    let hash = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(ADDRESS_HEX_LEN + 2);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash.0[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble > 7 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    if is_mixed_case(body) && checksummed != address {
        return Err(ChatError::InvalidChecksum(address.to_string()));
    }

    Ok(checksummed)
}

/// True iff [`to_checksum_address`] accepts the input.
pub fn is_address(address: &str) -> bool {
    to_checksum_address(address).is_ok()
}

fn is_mixed_case(body: &str) -> bool {
    let has_upper = body.bytes().any(|b| (b'A'..=b'F').contains(&b));
    let has_lower = body.bytes().any(|b| (b'a'..=b'f').contains(&b));
    has_upper && has_lower
}

/// A validated address, always held in checksum form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatAddress(String);

impl ChatAddress {
    /// Validate and normalize an address.
    pub fn parse(address: &str) -> ChatResult<Self> {
        to_checksum_address(address).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ChatAddress {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChatAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChatAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ChatAddress> for String {
    fn from(address: ChatAddress) -> Self {
        address.0
    }
}
