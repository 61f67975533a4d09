//! Sale contract ABI definitions.

use alloy::sol;

// Solidity type definitions for the collection sale contract.
//
// These match the on-chain contract ABI for call encoding and event decoding.
sol! {
	/// Entry point that deploys a new collection contract.
	function deploy(
		string name,
		string symbol,
		string baseUri,
		uint256 price,
		uint256 maxSupply
	) returns (address deployed);

	/// Event emitted by the sale contract once a collection is deployed.
	event NFTDeployed(
		address indexed deployedAddress,
		address indexed creator,
		string name,
		string symbol
	);
}

/// Name of the event that confirms a successful deployment.
pub const NFT_DEPLOYED_EVENT: &str = "NFTDeployed";

/// Name of the event argument carrying the deployed contract address.
pub const DEPLOYED_ADDRESS_PARAM: &str = "deployedAddress";

/// JSON ABI of the sale contract, as published by its build pipeline.
///
/// Used to construct the dynamic event decoder; must stay in sync with the
/// `sol!` definitions above.
pub const SALE_CONTRACT_ABI: &str = r#"[
  {
    "type": "function",
    "name": "deploy",
    "stateMutability": "nonpayable",
    "inputs": [
      { "name": "name", "type": "string" },
      { "name": "symbol", "type": "string" },
      { "name": "baseUri", "type": "string" },
      { "name": "price", "type": "uint256" },
      { "name": "maxSupply", "type": "uint256" }
    ],
    "outputs": [{ "name": "deployed", "type": "address" }]
  },
  {
    "type": "event",
    "name": "NFTDeployed",
    "anonymous": false,
    "inputs": [
      { "name": "deployedAddress", "type": "address", "indexed": true },
      { "name": "creator", "type": "address", "indexed": true },
      { "name": "name", "type": "string", "indexed": false },
      { "name": "symbol", "type": "string", "indexed": false }
    ]
  }
]"#;
