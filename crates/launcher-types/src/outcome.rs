//! Result record of a completed deployment.

use serde::{Deserialize, Serialize};

use crate::{Address, DeploymentRequest, UserOpHash};

/// Produced on success; the caller is responsible for persisting it.
///
/// Nothing is persisted by the core itself, on success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOutcome {
	/// Address of the freshly deployed collection contract.
	pub deployed_address: Address,
	/// Handle of the user operation that performed the deployment.
	pub user_op_hash: UserOpHash,
	/// The request that originated the deployment, metadata included.
	pub request: DeploymentRequest,
}
