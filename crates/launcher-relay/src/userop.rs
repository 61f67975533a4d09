//! ERC-4337 user-operation wire types.
//!
//! These structs mirror the JSON shapes exchanged with the bundler and
//! paymaster endpoints; quantities serialize as hex per JSON-RPC convention.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// A v0.6 user operation as submitted to the bundler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
	pub sender: Address,
	pub nonce: U256,
	pub init_code: Bytes,
	pub call_data: Bytes,
	pub call_gas_limit: U256,
	pub verification_gas_limit: U256,
	pub pre_verification_gas: U256,
	pub max_fee_per_gas: U256,
	pub max_priority_fee_per_gas: U256,
	pub paymaster_and_data: Bytes,
	pub signature: Bytes,
}

impl UserOperation {
	/// Computes the hash the account owner signs, per the entry point's
	/// v0.6 rules: keccak over the ABI-encoded operation fields, bound to
	/// the entry point address and chain id.
	pub fn hash(&self, entry_point: Address, chain_id: u64) -> B256 {
		let packed = (
			self.sender,
			self.nonce,
			keccak256(&self.init_code),
			keccak256(&self.call_data),
			self.call_gas_limit,
			self.verification_gas_limit,
			self.pre_verification_gas,
			self.max_fee_per_gas,
			self.max_priority_fee_per_gas,
			keccak256(&self.paymaster_and_data),
		)
			.abi_encode();

		let inner = keccak256(packed);
		keccak256((inner, entry_point, U256::from(chain_id)).abi_encode())
	}
}

/// Gas figures returned by `eth_estimateUserOperationGas`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasEstimate {
	pub pre_verification_gas: U256,
	pub verification_gas_limit: U256,
	pub call_gas_limit: U256,
}

/// Sponsorship data returned by `pm_sponsorUserOperation`.
///
/// Paymasters may adjust the gas figures they are willing to sponsor; the
/// optional fields override the bundler's estimate when present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipData {
	pub paymaster_and_data: Bytes,
	#[serde(default)]
	pub pre_verification_gas: Option<U256>,
	#[serde(default)]
	pub verification_gas_limit: Option<U256>,
	#[serde(default)]
	pub call_gas_limit: Option<U256>,
}

/// Response of `eth_getUserOperationReceipt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
	pub user_op_hash: B256,
	pub success: bool,
	#[serde(default)]
	pub reason: Option<String>,
	/// Logs emitted by this user operation, excluding other operations in
	/// the same bundle.
	#[serde(default)]
	pub logs: Vec<alloy::rpc::types::Log>,
	pub receipt: BundleReceipt,
}

/// The bundle transaction the operation was included in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleReceipt {
	pub transaction_hash: B256,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_op() -> UserOperation {
		UserOperation {
			sender: Address::repeat_byte(0x11),
			nonce: U256::from(7u64),
			init_code: Bytes::new(),
			call_data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
			call_gas_limit: U256::from(100_000u64),
			verification_gas_limit: U256::from(150_000u64),
			pre_verification_gas: U256::from(21_000u64),
			max_fee_per_gas: U256::from(1_000_000_000u64),
			max_priority_fee_per_gas: U256::from(1_000_000_000u64),
			paymaster_and_data: Bytes::new(),
			signature: Bytes::new(),
		}
	}

	#[test]
	fn test_hash_is_deterministic() {
		let op = sample_op();
		let entry_point = Address::repeat_byte(0x22);
		assert_eq!(op.hash(entry_point, 1), op.hash(entry_point, 1));
	}

	#[test]
	fn test_hash_binds_fields_entry_point_and_chain() {
		let op = sample_op();
		let entry_point = Address::repeat_byte(0x22);
		let base = op.hash(entry_point, 1);

		let mut changed = op.clone();
		changed.nonce = U256::from(8u64);
		assert_ne!(base, changed.hash(entry_point, 1));

		assert_ne!(base, op.hash(Address::repeat_byte(0x33), 1));
		assert_ne!(base, op.hash(entry_point, 137));
	}

	#[test]
	fn test_signature_is_not_part_of_the_hash() {
		let op = sample_op();
		let entry_point = Address::repeat_byte(0x22);
		let mut signed = op.clone();
		signed.signature = Bytes::from(vec![1u8; 65]);
		assert_eq!(op.hash(entry_point, 1), signed.hash(entry_point, 1));
	}

	#[test]
	fn test_wire_field_names_are_camel_case() {
		let value = serde_json::to_value(sample_op()).unwrap();
		let object = value.as_object().unwrap();
		for key in [
			"sender",
			"nonce",
			"initCode",
			"callData",
			"callGasLimit",
			"verificationGasLimit",
			"preVerificationGas",
			"maxFeePerGas",
			"maxPriorityFeePerGas",
			"paymasterAndData",
			"signature",
		] {
			assert!(object.contains_key(key), "missing wire field {key}");
		}
	}

	#[test]
	fn test_receipt_deserializes_from_bundler_shape() {
		let json = r#"{
			"userOpHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
			"entryPoint": "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
			"success": false,
			"reason": "AA23 reverted",
			"logs": [],
			"receipt": {
				"transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
				"blockNumber": "0x10"
			}
		}"#;

		let receipt: UserOperationReceipt = serde_json::from_str(json).unwrap();
		assert!(!receipt.success);
		assert_eq!(receipt.reason.as_deref(), Some("AA23 reverted"));
		assert_eq!(receipt.receipt.transaction_hash, B256::repeat_byte(0x22));
	}
}
