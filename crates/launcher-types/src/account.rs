//! Account-related types for the launcher system.
//!
//! This module defines the address and transaction-handle types used
//! throughout the deployment pipeline.

use std::fmt;

/// Blockchain address representation.
///
/// Stores addresses as raw bytes to support different blockchain formats.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Address(pub Vec<u8>);

impl Address {
	/// Parses an address from a hex string (with or without 0x prefix).
	pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
		let stripped = s.strip_prefix("0x").unwrap_or(s);
		let bytes = hex::decode(stripped)?;
		if bytes.len() != 20 {
			return Err(hex::FromHexError::InvalidStringLength);
		}
		Ok(Self(bytes))
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// Opaque handle to a submitted user operation.
///
/// Returned by the relay on submission and redeemed exactly once for a
/// receipt.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserOpHash(pub Vec<u8>);

impl fmt::Display for UserOpHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}
