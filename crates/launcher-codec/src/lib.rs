//! ABI encoding and event decoding for collection deployments.
//!
//! The encoder turns a validated deployment request into the calldata for
//! the sale contract's `deploy` entry point; the decoder interprets receipt
//! logs against the sale contract ABI without treating non-matching entries
//! as errors.

pub mod abi;
pub mod decoder;
pub mod encoder;

pub use decoder::{DecodedLog, DecoderError, EventDecoder};
pub use encoder::{encode_deploy, validate_request, DeployParams, EncodingError};
