//! The deployment service and its builder.

use crate::error::{DeployError, DeployStage};
use launcher_codec::abi::{DEPLOYED_ADDRESS_PARAM, NFT_DEPLOYED_EVENT, SALE_CONTRACT_ABI};
use launcher_codec::{encode_deploy, validate_request, DecoderError, EventDecoder};
use launcher_relay::RelayInterface;
use launcher_types::{Address, DeploymentOutcome, DeploymentRequest, SponsorshipMode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Default bound on the receipt wait.
const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);

/// Abandons the local receipt wait of in-flight deployments.
///
/// Cancellation only stops local waiting; a submitted operation may still
/// land on-chain afterwards.
#[derive(Clone)]
pub struct CancelHandle {
	tx: broadcast::Sender<()>,
}

impl CancelHandle {
	pub fn cancel(&self) {
		// No receivers just means nothing is currently waiting.
		let _ = self.tx.send(());
	}
}

/// Orchestrates one deployment request end-to-end.
///
/// The pipeline is strictly sequential with no internal parallelism; each
/// network-bound step is a suspension point. Concurrent deployments must
/// each use their own relay client.
pub struct DeployService {
	relay: Arc<dyn RelayInterface>,
	decoder: EventDecoder,
	target: Address,
	receipt_timeout: Duration,
	cancel: broadcast::Sender<()>,
}

impl DeployService {
	/// Handle for abandoning the receipt wait from another task.
	pub fn cancel_handle(&self) -> CancelHandle {
		CancelHandle {
			tx: self.cancel.clone(),
		}
	}

	/// Runs a deployment to completion.
	///
	/// No step retries automatically. Re-submission after a failure is NOT
	/// replay-protected: a previously submitted operation may still land,
	/// so retrying after `ReceiptTimeout` can deploy twice.
	pub async fn deploy(
		&self,
		request: &DeploymentRequest,
		caller: Option<&Address>,
	) -> Result<DeploymentOutcome, DeployError> {
		// Precondition: reject before any network activity.
		let caller = caller.ok_or(DeployError::Precondition)?;
		info!(caller = %caller, name = %request.name, "Starting collection deployment");

		let params = validate_request(request)?;
		let call = encode_deploy(&params, &self.target)?;

		let handle = self
			.relay
			.submit(&call, SponsorshipMode::Sponsored)
			.await
			.map_err(|source| DeployError::Relay {
				stage: DeployStage::Submitting,
				source,
			})?;
		info!(user_op_hash = %handle, "Submission accepted, awaiting receipt");

		let mut cancelled = self.cancel.subscribe();
		let receipt = tokio::select! {
			outcome = tokio::time::timeout(
				self.receipt_timeout,
				self.relay.wait_for_receipt(&handle),
			) => match outcome {
				Ok(Ok(receipt)) => receipt,
				Ok(Err(source)) => {
					return Err(DeployError::Relay {
						stage: DeployStage::AwaitingReceipt,
						source,
					})
				}
				Err(_) => {
					return Err(DeployError::ReceiptTimeout {
						timeout: self.receipt_timeout,
					})
				}
			},
			_ = cancelled.recv() => {
				warn!(
					user_op_hash = %handle,
					"Deployment cancelled locally; the submitted operation may still land on-chain"
				);
				return Err(DeployError::Cancelled);
			}
		};

		if !receipt.success {
			return Err(DeployError::ExecutionReverted {
				user_op_hash: handle,
				reason: receipt.reason,
			});
		}

		// Logs are decoded in receipt order; entries from other contracts
		// simply fail to match.
		let deployed_address = receipt
			.logs
			.iter()
			.filter_map(|entry| self.decoder.try_decode(entry))
			.find(|decoded| decoded.name == NFT_DEPLOYED_EVENT)
			.and_then(|decoded| decoded.address_param(DEPLOYED_ADDRESS_PARAM))
			.ok_or_else(|| DeployError::DeploymentEventMissing {
				user_op_hash: handle.clone(),
			})?;

		info!(deployed = %deployed_address, "Collection deployed");

		Ok(DeploymentOutcome {
			deployed_address,
			user_op_hash: handle,
			request: request.clone(),
		})
	}
}

/// Builder for [`DeployService`].
pub struct DeployServiceBuilder {
	relay: Arc<dyn RelayInterface>,
	target: Address,
	abi_json: Option<String>,
	receipt_timeout: Duration,
}

impl DeployServiceBuilder {
	pub fn new(relay: Arc<dyn RelayInterface>, target: Address) -> Self {
		Self {
			relay,
			target,
			abi_json: None,
			receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
		}
	}

	/// Overrides the embedded sale-contract ABI.
	pub fn with_abi(mut self, abi_json: impl Into<String>) -> Self {
		self.abi_json = Some(abi_json.into());
		self
	}

	pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
		self.receipt_timeout = timeout;
		self
	}

	pub fn build(self) -> Result<DeployService, DecoderError> {
		let decoder = match self.abi_json {
			Some(json) => EventDecoder::from_json(&json)?,
			None => EventDecoder::from_json(SALE_CONTRACT_ABI)?,
		};
		let (cancel, _) = broadcast::channel(1);

		Ok(DeployService {
			relay: self.relay,
			decoder,
			target: self.target,
			receipt_timeout: self.receipt_timeout,
			cancel,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::Address as AlloyAddress;
	use alloy::sol_types::SolEvent;
	use async_trait::async_trait;
	use launcher_codec::abi::NFTDeployed;
	use launcher_relay::RelayError;
	use launcher_types::{
		EncodedCall, LogEntry, SubmissionReceipt, UserOpHash,
	};
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Instant;

	/// Relay test double recording invocations.
	struct MockRelay {
		submit_calls: AtomicUsize,
		wait_calls: AtomicUsize,
		/// None makes the receipt wait never resolve.
		receipt: Option<SubmissionReceipt>,
	}

	impl MockRelay {
		fn with_receipt(receipt: SubmissionReceipt) -> Self {
			Self {
				submit_calls: AtomicUsize::new(0),
				wait_calls: AtomicUsize::new(0),
				receipt: Some(receipt),
			}
		}

		fn never_resolving() -> Self {
			Self {
				submit_calls: AtomicUsize::new(0),
				wait_calls: AtomicUsize::new(0),
				receipt: None,
			}
		}
	}

	#[async_trait]
	impl RelayInterface for MockRelay {
		async fn smart_account_address(&self) -> Result<Address, RelayError> {
			Ok(Address(vec![0x11; 20]))
		}

		async fn submit(
			&self,
			_call: &EncodedCall,
			_mode: SponsorshipMode,
		) -> Result<UserOpHash, RelayError> {
			self.submit_calls.fetch_add(1, Ordering::SeqCst);
			Ok(UserOpHash(vec![0xab; 32]))
		}

		async fn wait_for_receipt(
			&self,
			handle: &UserOpHash,
		) -> Result<SubmissionReceipt, RelayError> {
			self.wait_calls.fetch_add(1, Ordering::SeqCst);
			match &self.receipt {
				Some(receipt) => {
					let mut receipt = receipt.clone();
					receipt.user_op_hash = handle.clone();
					Ok(receipt)
				}
				None => {
					std::future::pending::<()>().await;
					unreachable!()
				}
			}
		}
	}

	fn request() -> DeploymentRequest {
		DeploymentRequest {
			name: "My Awesome NFTs".to_string(),
			symbol: "NFTS".to_string(),
			base_uri: "https://api.example.com/metadata/".to_string(),
			price: "0.1".to_string(),
			max_supply: "10000".to_string(),
			metadata: None,
		}
	}

	fn caller() -> Address {
		Address(vec![0xcc; 20])
	}

	fn deployed_entry(deployed: AlloyAddress) -> LogEntry {
		let event = NFTDeployed {
			deployedAddress: deployed,
			creator: AlloyAddress::repeat_byte(0xcc),
			name: "My Awesome NFTs".to_string(),
			symbol: "NFTS".to_string(),
		};
		let log_data = event.encode_log_data();
		LogEntry {
			topics: log_data.topics().iter().map(|t| t.0).collect(),
			data: log_data.data.to_vec(),
		}
	}

	fn noise_entry(seed: u8) -> LogEntry {
		LogEntry {
			topics: vec![[seed; 32], [0x01; 32]],
			data: vec![seed; 32],
		}
	}

	fn receipt_with_logs(success: bool, logs: Vec<LogEntry>) -> SubmissionReceipt {
		SubmissionReceipt {
			user_op_hash: UserOpHash(vec![0xab; 32]),
			transaction_hash: vec![0x55; 32],
			success,
			reason: if success {
				None
			} else {
				Some("mint cap exceeded".to_string())
			},
			logs,
		}
	}

	fn service(relay: Arc<MockRelay>) -> DeployService {
		DeployServiceBuilder::new(relay, Address(vec![0x42; 20]))
			.build()
			.unwrap()
	}

	#[tokio::test]
	async fn test_missing_caller_fails_before_any_network_call() {
		let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(true, vec![])));
		let service = service(relay.clone());

		let err = service.deploy(&request(), None).await.unwrap_err();
		assert!(matches!(err, DeployError::Precondition));
		assert_eq!(err.stage(), DeployStage::Idle);
		assert_eq!(relay.submit_calls.load(Ordering::SeqCst), 0);
		assert_eq!(relay.wait_calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_invalid_request_fails_before_submission() {
		let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(true, vec![])));
		let service = service(relay.clone());

		let mut bad = request();
		bad.price = "abc".to_string();
		let err = service.deploy(&bad, Some(&caller())).await.unwrap_err();
		assert!(matches!(err, DeployError::Validation(_)));
		assert_eq!(err.stage(), DeployStage::Validating);
		assert_eq!(relay.submit_calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn test_success_extracts_address_and_ignores_noise() {
		let deployed = AlloyAddress::repeat_byte(0xaa);
		let logs = vec![
			noise_entry(0x01),
			noise_entry(0x02),
			deployed_entry(deployed),
			noise_entry(0x03),
		];
		let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(true, logs)));
		let service = service(relay.clone());

		let outcome = service.deploy(&request(), Some(&caller())).await.unwrap();
		assert_eq!(outcome.deployed_address, Address(deployed.as_slice().to_vec()));
		assert_eq!(outcome.request, request());
		assert_eq!(relay.submit_calls.load(Ordering::SeqCst), 1);
		assert_eq!(relay.wait_calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_matching_log_position_does_not_matter() {
		let deployed = AlloyAddress::repeat_byte(0xaa);
		for logs in [
			vec![deployed_entry(deployed), noise_entry(0x01)],
			vec![noise_entry(0x01), deployed_entry(deployed)],
		] {
			let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(true, logs)));
			let outcome = service(relay)
				.deploy(&request(), Some(&caller()))
				.await
				.unwrap();
			assert_eq!(
				outcome.deployed_address,
				Address(deployed.as_slice().to_vec())
			);
		}
	}

	#[tokio::test]
	async fn test_missing_event_is_terminal() {
		let logs = vec![noise_entry(0x01), noise_entry(0x02)];
		let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(true, logs)));
		let service = service(relay.clone());

		let err = service
			.deploy(&request(), Some(&caller()))
			.await
			.unwrap_err();
		assert!(matches!(err, DeployError::DeploymentEventMissing { .. }));
		assert_eq!(err.stage(), DeployStage::DecodingEvents);
		// No retry was attempted.
		assert_eq!(relay.submit_calls.load(Ordering::SeqCst), 1);
		assert_eq!(relay.wait_calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn test_reverted_execution_is_distinct_from_relay_failure() {
		let relay = Arc::new(MockRelay::with_receipt(receipt_with_logs(false, vec![])));
		let service = service(relay);

		let err = service
			.deploy(&request(), Some(&caller()))
			.await
			.unwrap_err();
		match err {
			DeployError::ExecutionReverted { reason, .. } => {
				assert_eq!(reason.as_deref(), Some("mint cap exceeded"));
			}
			other => panic!("expected ExecutionReverted, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_receipt_timeout_fires_at_or_after_the_bound() {
		let bound = Duration::from_millis(150);
		let relay = Arc::new(MockRelay::never_resolving());
		let service = DeployServiceBuilder::new(relay, Address(vec![0x42; 20]))
			.with_receipt_timeout(bound)
			.build()
			.unwrap();

		let started = Instant::now();
		let err = service
			.deploy(&request(), Some(&caller()))
			.await
			.unwrap_err();
		assert!(matches!(err, DeployError::ReceiptTimeout { .. }));
		assert_eq!(err.stage(), DeployStage::AwaitingReceipt);
		assert!(started.elapsed() >= bound);
	}

	#[tokio::test]
	async fn test_cancellation_abandons_the_wait() {
		let relay = Arc::new(MockRelay::never_resolving());
		let service = Arc::new(
			DeployServiceBuilder::new(relay, Address(vec![0x42; 20]))
				.with_receipt_timeout(Duration::from_secs(60))
				.build()
				.unwrap(),
		);
		let cancel = service.cancel_handle();

		let task = {
			let service = service.clone();
			let request = request();
			let caller = caller();
			tokio::spawn(async move { service.deploy(&request, Some(&caller)).await })
		};

		tokio::time::sleep(Duration::from_millis(50)).await;
		cancel.cancel();

		let err = task.await.unwrap().unwrap_err();
		assert!(matches!(err, DeployError::Cancelled));
	}
}
