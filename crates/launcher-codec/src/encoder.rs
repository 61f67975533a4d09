//! Contract call encoding for collection deployments.
//!
//! Numeric fields arrive as decimal strings and are scaled with exact
//! decimal arithmetic before encoding; no floating point is involved at any
//! point.

use alloy::primitives::{
	utils::{parse_units, ParseUnits},
	U256,
};
use alloy::sol_types::SolCall;
use launcher_types::{Address, DeploymentRequest, EncodedCall, ValidationError};
use thiserror::Error;

use crate::abi::deployCall;

/// Decimal places of the chain's native currency.
const NATIVE_DECIMALS: u8 = 18;

#[derive(Debug, Error)]
pub enum EncodingError {
	#[error("invalid target contract address: {0}")]
	InvalidTarget(String),
}

/// The validated, typed form of a deployment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployParams {
	pub name: String,
	pub symbol: String,
	pub base_uri: String,
	/// Mint price in the currency's smallest unit.
	pub price: U256,
	pub max_supply: U256,
}

/// Validates a request structurally and parses its numeric fields.
///
/// Fails before any encoding or network activity when a field is malformed.
pub fn validate_request(request: &DeploymentRequest) -> Result<DeployParams, ValidationError> {
	request.validate_fields()?;

	let price = scale_price(&request.price)?;
	let max_supply = parse_supply(&request.max_supply)?;

	Ok(DeployParams {
		name: request.name.clone(),
		symbol: request.symbol.clone(),
		base_uri: request.base_uri.clone(),
		price,
		max_supply,
	})
}

/// Scales a human-readable decimal price to the currency's base unit.
fn scale_price(price: &str) -> Result<U256, ValidationError> {
	let parsed = parse_units(price, NATIVE_DECIMALS).map_err(|e| ValidationError::InvalidPrice {
		value: price.to_string(),
		reason: e.to_string(),
	})?;

	match parsed {
		ParseUnits::U256(value) => Ok(value),
		ParseUnits::I256(_) => Err(ValidationError::InvalidPrice {
			value: price.to_string(),
			reason: "price must not be negative".to_string(),
		}),
	}
}

/// Parses the max supply as a non-negative decimal integer.
fn parse_supply(max_supply: &str) -> Result<U256, ValidationError> {
	U256::from_str_radix(max_supply, 10).map_err(|e| ValidationError::InvalidSupply {
		value: max_supply.to_string(),
		reason: e.to_string(),
	})
}

/// Encodes the `deploy` call for the sale contract.
///
/// Pure and deterministic: the same parameters always produce identical
/// bytes.
pub fn encode_deploy(params: &DeployParams, target: &Address) -> Result<EncodedCall, EncodingError> {
	if target.0.len() != 20 {
		return Err(EncodingError::InvalidTarget(format!(
			"expected 20 bytes, got {}",
			target.0.len()
		)));
	}

	let call = deployCall {
		name: params.name.clone(),
		symbol: params.symbol.clone(),
		baseUri: params.base_uri.clone(),
		price: params.price,
		maxSupply: params.max_supply,
	};

	Ok(EncodedCall {
		to: target.clone(),
		value: U256::ZERO,
		data: call.abi_encode(),
	})
}
