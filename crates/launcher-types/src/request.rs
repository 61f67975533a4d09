//! Deployment request types for the launcher system.
//!
//! A request arrives from the form layer as plain strings and is validated
//! structurally here before any numeric parsing or encoding happens.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Errors produced while validating a deployment request.
#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("invalid request fields: {0}")]
	Fields(String),
	#[error("invalid price {value:?}: {reason}")]
	InvalidPrice { value: String, reason: String },
	#[error("invalid max supply {value:?}: {reason}")]
	InvalidSupply { value: String, reason: String },
}

impl From<validator::ValidationErrors> for ValidationError {
	fn from(errors: validator::ValidationErrors) -> Self {
		ValidationError::Fields(errors.to_string())
	}
}

/// A request to deploy an NFT collection contract.
///
/// All fields arrive as strings from the form layer; `price` is a
/// human-readable decimal in native-currency units and `max_supply` a
/// decimal integer. The request is immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeploymentRequest {
	/// Collection name.
	#[validate(length(min = 2, max = 50))]
	pub name: String,
	/// Collection symbol.
	#[validate(length(min = 2, max = 10))]
	pub symbol: String,
	/// Base URI for token metadata.
	#[validate(url)]
	pub base_uri: String,
	/// Mint price in native-currency units, e.g. "0.1".
	#[validate(length(min = 1))]
	pub price: String,
	/// Maximum token supply as a decimal integer string.
	#[validate(length(min = 1))]
	pub max_supply: String,
	/// Optional display metadata, carried opaquely to the outcome record.
	#[validate(nested)]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<CollectionMetadata>,
}

impl DeploymentRequest {
	/// Validates the structural shape of the request fields.
	///
	/// Numeric parsing of `price` and `max_supply` happens separately in the
	/// codec; this only checks lengths and URL shapes.
	pub fn validate_fields(&self) -> Result<(), ValidationError> {
		self.validate().map_err(ValidationError::from)
	}
}

/// Display metadata attached to a collection.
///
/// The core never validates reachability of these URLs; they are opaque
/// strings produced by the upload collaborator and persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, Default)]
pub struct CollectionMetadata {
	#[validate(length(min = 10, max = 1000))]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[validate(url)]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[validate(url)]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub banner_url: Option<String>,
	#[validate(url)]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub website: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub twitter: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub discord: Option<String>,
}
