//! HTTP relay implementation over ERC-4337 bundler/paymaster JSON-RPC.
//!
//! The signing key lives inside the relay instance and nowhere else;
//! construct one relay per deployment attempt so the key is released when
//! the attempt ends, on every exit path.

use crate::userop::{GasEstimate, SponsorshipData, UserOperation, UserOperationReceipt};
use crate::{truncate_hash, RelayError, RelayInterface};
use alloy::network::TransactionBuilder;
use alloy::primitives::{aliases::U192, Address as AlloyAddress, Bytes, B256, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::sol;
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use launcher_types::{Address, EncodedCall, LogEntry, SponsorshipMode, SubmissionReceipt, UserOpHash};
use std::time::Duration;

// Solidity type definitions for the account-abstraction contracts the relay
// talks to: the account factory, the entry point, and the smart account.
sol! {
	/// Counterfactual address of the account the factory would deploy.
	function getAddress(address owner, uint256 salt) view returns (address account);

	/// Factory entry point used in the init code of an undeployed account.
	function createAccount(address owner, uint256 salt) returns (address account);

	/// Entry point nonce for a sender.
	function getNonce(address sender, uint192 key) view returns (uint256 nonce);

	/// Smart-account call dispatch wrapping the target contract call.
	function execute(address dest, uint256 value, bytes func);
}

/// Placeholder signature accepted by bundlers for gas estimation.
const ESTIMATION_SIGNATURE: [u8; 65] = [1u8; 65];

/// Connection parameters for the relay infrastructure.
#[derive(Debug, Clone)]
pub struct RelaySettings {
	pub rpc_url: String,
	pub bundler_url: String,
	pub paymaster_url: String,
	pub chain_id: u64,
	pub private_key: String,
	pub entry_point: String,
	pub account_factory: String,
	pub account_salt: u64,
	pub poll_interval: Duration,
}

/// Relay client over a bundler and a paymaster endpoint.
pub struct HttpRelay {
	/// Signing key for the smart account owner; held for the lifetime of
	/// this client only.
	signer: PrivateKeySigner,
	/// Chain RPC, used for view calls and fee reads.
	rpc: RootProvider,
	/// Bundler endpoint accepting user operations.
	bundler: RootProvider,
	/// Paymaster endpoint granting sponsorship.
	paymaster: RootProvider,
	chain_id: u64,
	entry_point: AlloyAddress,
	factory: AlloyAddress,
	salt: U256,
	poll_interval: Duration,
}

impl HttpRelay {
	/// Connects a relay client from its settings.
	pub fn connect(settings: &RelaySettings) -> Result<Self, RelayError> {
		let signer = settings
			.private_key
			.parse::<PrivateKeySigner>()
			.map_err(|e| RelayError::InvalidKey(format!("Invalid private key: {}", e)))?;

		let rpc = RootProvider::new_http(
			settings
				.rpc_url
				.parse()
				.map_err(|e| RelayError::Network(format!("Invalid RPC URL: {}", e)))?,
		);
		let bundler = RootProvider::new_http(
			settings
				.bundler_url
				.parse()
				.map_err(|e| RelayError::Network(format!("Invalid bundler URL: {}", e)))?,
		);
		let paymaster = RootProvider::new_http(
			settings
				.paymaster_url
				.parse()
				.map_err(|e| RelayError::Network(format!("Invalid paymaster URL: {}", e)))?,
		);

		let entry_point = settings
			.entry_point
			.parse::<AlloyAddress>()
			.map_err(|e| RelayError::Network(format!("Invalid entry point address: {}", e)))?;
		let factory = settings
			.account_factory
			.parse::<AlloyAddress>()
			.map_err(|e| RelayError::Network(format!("Invalid factory address: {}", e)))?;

		Ok(Self {
			signer,
			rpc,
			bundler,
			paymaster,
			chain_id: settings.chain_id,
			entry_point,
			factory,
			salt: U256::from(settings.account_salt),
			poll_interval: settings.poll_interval,
		})
	}

	/// Resolves the counterfactual account address through the factory.
	async fn resolve_sender(&self) -> Result<AlloyAddress, RelayError> {
		let call = getAddressCall {
			owner: self.signer.address(),
			salt: self.salt,
		};
		let tx = TransactionRequest::default()
			.with_to(self.factory)
			.with_input(call.abi_encode());

		let ret = self
			.rpc
			.call(tx)
			.await
			.map_err(|e| RelayError::Network(format!("Failed to resolve account address: {}", e)))?;

		getAddressCall::abi_decode_returns(&ret)
			.map_err(|e| RelayError::Network(format!("Unexpected factory response: {}", e)))
	}

	/// Reads the account's entry-point nonce.
	async fn account_nonce(&self, sender: AlloyAddress) -> Result<U256, RelayError> {
		let call = getNonceCall {
			sender,
			key: U192::ZERO,
		};
		let tx = TransactionRequest::default()
			.with_to(self.entry_point)
			.with_input(call.abi_encode());

		let ret = self
			.rpc
			.call(tx)
			.await
			.map_err(|e| RelayError::Network(format!("Failed to read account nonce: {}", e)))?;

		getNonceCall::abi_decode_returns(&ret)
			.map_err(|e| RelayError::Network(format!("Unexpected entry point response: {}", e)))
	}

	/// Builds the init code for an account the factory has not deployed yet.
	async fn init_code(&self, sender: AlloyAddress) -> Result<Bytes, RelayError> {
		let code = self
			.rpc
			.get_code_at(sender)
			.await
			.map_err(|e| RelayError::Network(format!("Failed to read account code: {}", e)))?;

		if !code.is_empty() {
			return Ok(Bytes::new());
		}

		let mut init_code = self.factory.to_vec();
		init_code.extend(
			createAccountCall {
				owner: self.signer.address(),
				salt: self.salt,
			}
			.abi_encode(),
		);
		Ok(Bytes::from(init_code))
	}

	/// Asks the bundler for gas figures for the given operation.
	async fn estimate_gas(&self, op: &UserOperation) -> Result<GasEstimate, RelayError> {
		self.bundler
			.raw_request(
				"eth_estimateUserOperationGas".into(),
				(op.clone(), self.entry_point),
			)
			.await
			.map_err(|e| RelayError::Rejected(format!("Gas estimation failed: {}", e)))
	}

	/// Asks the paymaster to sponsor the operation.
	async fn sponsor(&self, op: &UserOperation) -> Result<SponsorshipData, RelayError> {
		self.paymaster
			.raw_request("pm_sponsorUserOperation".into(), (op.clone(), self.entry_point))
			.await
			.map_err(|e| RelayError::Rejected(format!("Sponsorship refused: {}", e)))
	}
}

#[async_trait]
impl RelayInterface for HttpRelay {
	async fn smart_account_address(&self) -> Result<Address, RelayError> {
		let sender = self.resolve_sender().await?;
		Ok(Address(sender.as_slice().to_vec()))
	}

	async fn submit(
		&self,
		call: &EncodedCall,
		mode: SponsorshipMode,
	) -> Result<UserOpHash, RelayError> {
		if call.to.0.len() != 20 {
			return Err(RelayError::Rejected(
				"Target contract address must be 20 bytes".to_string(),
			));
		}
		let mut dest_bytes = [0u8; 20];
		dest_bytes.copy_from_slice(&call.to.0);
		let dest = AlloyAddress::from(dest_bytes);

		let sender = self.resolve_sender().await?;
		let nonce = self.account_nonce(sender).await?;
		let init_code = self.init_code(sender).await?;

		let call_data = executeCall {
			dest,
			value: call.value,
			func: Bytes::from(call.data.clone()),
		}
		.abi_encode();

		let gas_price = self
			.rpc
			.get_gas_price()
			.await
			.map_err(|e| RelayError::Network(format!("Failed to read gas price: {}", e)))?;

		let mut op = UserOperation {
			sender,
			nonce,
			init_code,
			call_data: Bytes::from(call_data),
			call_gas_limit: U256::ZERO,
			verification_gas_limit: U256::ZERO,
			pre_verification_gas: U256::ZERO,
			max_fee_per_gas: U256::from(gas_price),
			max_priority_fee_per_gas: U256::from(gas_price),
			paymaster_and_data: Bytes::new(),
			signature: Bytes::from(ESTIMATION_SIGNATURE.to_vec()),
		};

		let estimate = self.estimate_gas(&op).await?;
		op.call_gas_limit = estimate.call_gas_limit;
		op.verification_gas_limit = estimate.verification_gas_limit;
		op.pre_verification_gas = estimate.pre_verification_gas;

		if matches!(mode, SponsorshipMode::Sponsored) {
			let sponsorship = self.sponsor(&op).await?;
			op.paymaster_and_data = sponsorship.paymaster_and_data;
			if let Some(gas) = sponsorship.call_gas_limit {
				op.call_gas_limit = gas;
			}
			if let Some(gas) = sponsorship.verification_gas_limit {
				op.verification_gas_limit = gas;
			}
			if let Some(gas) = sponsorship.pre_verification_gas {
				op.pre_verification_gas = gas;
			}
		}

		let hash = op.hash(self.entry_point, self.chain_id);
		let signature = self
			.signer
			.sign_message(hash.as_slice())
			.await
			.map_err(|e| RelayError::Signing(format!("Failed to sign user operation: {}", e)))?;
		op.signature = Bytes::from(signature.as_bytes().to_vec());

		let accepted: B256 = self
			.bundler
			.raw_request("eth_sendUserOperation".into(), (op.clone(), self.entry_point))
			.await
			.map_err(|e| RelayError::Rejected(format!("Bundler rejected operation: {}", e)))?;

		tracing::info!(
			user_op_hash = %truncate_hash(accepted.as_slice()),
			sponsored = matches!(mode, SponsorshipMode::Sponsored),
			"Submitted user operation"
		);

		Ok(UserOpHash(accepted.to_vec()))
	}

	async fn wait_for_receipt(&self, handle: &UserOpHash) -> Result<SubmissionReceipt, RelayError> {
		if handle.0.len() != 32 {
			return Err(RelayError::Network(
				"User operation hash must be 32 bytes".to_string(),
			));
		}
		let hash = B256::from_slice(&handle.0);

		loop {
			let receipt: Option<UserOperationReceipt> = self
				.bundler
				.raw_request("eth_getUserOperationReceipt".into(), (hash,))
				.await
				.map_err(|e| RelayError::Network(format!("Failed to fetch receipt: {}", e)))?;

			match receipt {
				Some(receipt) => {
					let logs = receipt
						.logs
						.iter()
						.map(|log| LogEntry {
							topics: log.inner.data.topics().iter().map(|t| t.0).collect(),
							data: log.inner.data.data.to_vec(),
						})
						.collect();

					return Ok(SubmissionReceipt {
						user_op_hash: UserOpHash(receipt.user_op_hash.to_vec()),
						transaction_hash: receipt.receipt.transaction_hash.to_vec(),
						success: receipt.success,
						reason: receipt.reason,
						logs,
					});
				}
				None => {
					tracing::debug!(
						user_op_hash = %truncate_hash(&handle.0),
						"Operation not yet included, polling again"
					);
					tokio::time::sleep(self.poll_interval).await;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn settings() -> RelaySettings {
		RelaySettings {
			rpc_url: "https://rpc.example.com".to_string(),
			bundler_url: "https://bundler.example.com".to_string(),
			paymaster_url: "https://paymaster.example.com".to_string(),
			chain_id: 43113,
			// Well-known throwaway development key
			private_key: "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
				.to_string(),
			entry_point: "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789".to_string(),
			account_factory: "0x9406Cc6185a346906296840746125a0E44976454".to_string(),
			account_salt: 0,
			poll_interval: Duration::from_secs(3),
		}
	}

	#[test]
	fn test_connect_parses_settings() {
		assert!(HttpRelay::connect(&settings()).is_ok());
	}

	#[test]
	fn test_connect_rejects_bad_key() {
		let mut bad = settings();
		bad.private_key = "0x1234".to_string();
		assert!(matches!(
			HttpRelay::connect(&bad),
			Err(RelayError::InvalidKey(_))
		));
	}

	#[test]
	fn test_connect_rejects_bad_urls_and_addresses() {
		let mut bad = settings();
		bad.bundler_url = "not a url".to_string();
		assert!(matches!(
			HttpRelay::connect(&bad),
			Err(RelayError::Network(_))
		));

		let mut bad = settings();
		bad.entry_point = "0x1234".to_string();
		assert!(matches!(
			HttpRelay::connect(&bad),
			Err(RelayError::Network(_))
		));
	}
}
