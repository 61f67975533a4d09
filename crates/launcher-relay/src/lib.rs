//! Sponsored transaction relay client.
//!
//! Wraps a signing key and a remote bundler/paymaster pair behind the
//! `RelayInterface` trait: address resolution, sponsored submission, and
//! receipt resolution. Failures are surfaced once with the relay's
//! diagnostic message; nothing here retries automatically.

pub mod implementations;
pub mod userop;

use async_trait::async_trait;
use launcher_types::{Address, EncodedCall, SponsorshipMode, SubmissionReceipt, UserOpHash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
	#[error("invalid key: {0}")]
	InvalidKey(String),
	#[error("signing failed: {0}")]
	Signing(String),
	#[error("network error: {0}")]
	Network(String),
	#[error("relay rejected submission: {0}")]
	Rejected(String),
}

#[async_trait]
pub trait RelayInterface: Send + Sync {
	/// Returns the smart-account address controlled by the configured
	/// signing key. Computed by the remote infrastructure, not locally.
	async fn smart_account_address(&self) -> Result<Address, RelayError>;

	/// Packages the call as a user operation and submits it to the relay.
	///
	/// Returns as soon as the relay accepts the request; inclusion is not
	/// awaited here.
	async fn submit(
		&self,
		call: &EncodedCall,
		mode: SponsorshipMode,
	) -> Result<UserOpHash, RelayError>;

	/// Resolves a submission handle to its receipt, polling until the
	/// operation is included.
	///
	/// Unbounded by itself; the caller owns the timeout.
	async fn wait_for_receipt(&self, handle: &UserOpHash) -> Result<SubmissionReceipt, RelayError>;
}

/// Shortens a hash for log output.
pub(crate) fn truncate_hash(bytes: &[u8]) -> String {
	let hash_str = hex::encode(bytes);
	if hash_str.len() <= 8 {
		hash_str
	} else {
		format!("{}..", &hash_str[..8])
	}
}
