//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Top-level launcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
	/// Relay and account-abstraction endpoints.
	pub relay: RelayConfig,
	/// Deployment pipeline settings.
	#[serde(default)]
	pub deployment: DeploymentConfig,
	/// On-chain contract addresses.
	pub contracts: ContractsConfig,
}

/// Endpoints and credentials for the sponsored-transaction relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
	/// Standard execution-layer JSON-RPC endpoint.
	pub rpc_url: String,
	/// Bundler JSON-RPC endpoint (eth_sendUserOperation et al.).
	pub bundler_url: String,
	/// Paymaster sponsorship endpoint.
	pub paymaster_url: String,
	/// Chain the relay targets.
	pub chain_id: u64,
	/// Hex-encoded signing key for the smart-account owner.
	pub private_key: String,
	/// EntryPoint contract address.
	pub entry_point: String,
	/// Smart-account factory address.
	pub account_factory: String,
	/// Salt used when deriving the counterfactual account address.
	#[serde(default)]
	pub account_salt: u64,
}

/// Deployment pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
	/// Upper bound on the receipt wait, in seconds.
	#[serde(default = "default_receipt_timeout_secs")]
	pub receipt_timeout_secs: u64,
	/// Interval between receipt polls, in seconds.
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
}

impl Default for DeploymentConfig {
	fn default() -> Self {
		Self {
			receipt_timeout_secs: default_receipt_timeout_secs(),
			poll_interval_secs: default_poll_interval_secs(),
		}
	}
}

fn default_receipt_timeout_secs() -> u64 {
	180
}

fn default_poll_interval_secs() -> u64 {
	3
}

/// On-chain contract addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
	/// Sale contract whose `deploy` entry point creates collections.
	pub sale_address: String,
}
