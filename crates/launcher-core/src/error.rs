//! Error taxonomy for the deployment pipeline.

use launcher_codec::EncodingError;
use launcher_relay::RelayError;
use launcher_types::{UserOpHash, ValidationError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Pipeline stage a deployment was in when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStage {
	Idle,
	Validating,
	Encoding,
	Submitting,
	AwaitingReceipt,
	DecodingEvents,
}

impl fmt::Display for DeployStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			DeployStage::Idle => "idle",
			DeployStage::Validating => "validating",
			DeployStage::Encoding => "encoding",
			DeployStage::Submitting => "submitting",
			DeployStage::AwaitingReceipt => "awaiting receipt",
			DeployStage::DecodingEvents => "decoding events",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Error)]
pub enum DeployError {
	/// No caller identity was supplied; nothing was submitted.
	#[error("no connected identity")]
	Precondition,

	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error(transparent)]
	Encoding(#[from] EncodingError),

	/// The relay or the network failed; carries the relay's diagnostic.
	#[error("relay failure while {stage}: {source}")]
	Relay {
		stage: DeployStage,
		#[source]
		source: RelayError,
	},

	/// The chain included the operation but its execution reverted.
	#[error("execution reverted on-chain: {}", .reason.as_deref().unwrap_or("no reason given"))]
	ExecutionReverted {
		user_op_hash: UserOpHash,
		reason: Option<String>,
	},

	/// No receipt arrived within the configured bound. The operation may
	/// still land later; resubmission is not replay-protected.
	#[error("no receipt within {timeout:?}")]
	ReceiptTimeout { timeout: Duration },

	/// The receipt confirmed but carried no deployment event. Treated as an
	/// unrecoverable inconsistency, never retried.
	#[error("deployment event missing from confirmed receipt")]
	DeploymentEventMissing { user_op_hash: UserOpHash },

	/// The local wait was abandoned. The remote operation is unaffected.
	#[error("deployment cancelled while awaiting receipt")]
	Cancelled,
}

impl DeployError {
	/// The stage the pipeline was in when this error surfaced.
	pub fn stage(&self) -> DeployStage {
		match self {
			DeployError::Precondition => DeployStage::Idle,
			DeployError::Validation(_) => DeployStage::Validating,
			DeployError::Encoding(_) => DeployStage::Encoding,
			DeployError::Relay { stage, .. } => *stage,
			DeployError::ExecutionReverted { .. } => DeployStage::AwaitingReceipt,
			DeployError::ReceiptTimeout { .. } => DeployStage::AwaitingReceipt,
			DeployError::Cancelled => DeployStage::AwaitingReceipt,
			DeployError::DeploymentEventMissing { .. } => DeployStage::DecodingEvents,
		}
	}
}
