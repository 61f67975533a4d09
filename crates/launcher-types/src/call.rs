//! Contract call types for the launcher system.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::Address;

/// An ABI-encoded contract call ready for submission.
///
/// Derived deterministically from a validated deployment request; owned
/// transiently by the orchestrator for the duration of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCall {
	/// The contract the call targets.
	pub to: Address,
	/// Native-currency value attached to the call (zero for deployments).
	pub value: U256,
	/// ABI-encoded selector and arguments.
	pub data: Vec<u8>,
}

/// How the execution fee of a submission is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SponsorshipMode {
	/// A paymaster covers the fee; the user operation carries its data.
	Sponsored,
	/// The smart account pays its own fee.
	Unsponsored,
}
