//! Receipt types for confirmed user operations.

use serde::{Deserialize, Serialize};

use crate::UserOpHash;

/// A single log entry emitted during contract execution.
///
/// Interpretable only with knowledge of the emitting contract's event
/// definitions; a receipt routinely contains entries from the entry point,
/// the account, and the paymaster alongside the target contract's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Ordered 32-byte topics; the first is the event selector when present.
	pub topics: Vec<[u8; 32]>,
	/// Unindexed event data.
	pub data: Vec<u8>,
}

/// The confirmed on-chain record of a submitted user operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
	/// The handle this receipt resolves.
	pub user_op_hash: UserOpHash,
	/// Hash of the bundle transaction that included the operation.
	pub transaction_hash: Vec<u8>,
	/// Whether the inner call executed without reverting.
	pub success: bool,
	/// Revert reason reported by the relay, when available.
	pub reason: Option<String>,
	/// Logs emitted by this user operation, in emission order.
	pub logs: Vec<LogEntry>,
}
