//! Dynamic event log decoding.
//!
//! A receipt carries logs from every contract touched by the bundle, so a
//! non-matching entry is an expected outcome, not an error: `try_decode`
//! returns `None` for it. Only a malformed ABI definition fails, and that is
//! caught once at construction.

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::B256;
use launcher_types::{Address, LogEntry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecoderError {
	#[error("malformed ABI definition: {0}")]
	InvalidAbi(String),
	#[error("ABI defines no events")]
	NoEvents,
}

/// A log entry successfully interpreted as a named event.
#[derive(Debug, Clone)]
pub struct DecodedLog {
	/// The event's name as declared in the ABI.
	pub name: String,
	/// Event arguments in declaration order, paired with their names.
	pub params: Vec<(String, DynSolValue)>,
}

impl DecodedLog {
	/// Looks up an argument by name.
	pub fn param(&self, name: &str) -> Option<&DynSolValue> {
		self.params
			.iter()
			.find(|(param_name, _)| param_name == name)
			.map(|(_, value)| value)
	}

	/// Looks up an address-typed argument by name.
	pub fn address_param(&self, name: &str) -> Option<Address> {
		match self.param(name)? {
			DynSolValue::Address(addr) => Some(Address(addr.as_slice().to_vec())),
			_ => None,
		}
	}
}

/// Decodes log entries against the events of a JSON ABI.
pub struct EventDecoder {
	events: Vec<(B256, Event)>,
}

impl EventDecoder {
	/// Builds a decoder from a JSON ABI string.
	///
	/// Anonymous events are skipped; they cannot be matched by selector.
	pub fn from_json(abi_json: &str) -> Result<Self, DecoderError> {
		let abi: JsonAbi =
			serde_json::from_str(abi_json).map_err(|e| DecoderError::InvalidAbi(e.to_string()))?;

		let events: Vec<(B256, Event)> = abi
			.events()
			.filter(|event| !event.anonymous)
			.map(|event| (event.selector(), event.clone()))
			.collect();

		if events.is_empty() {
			return Err(DecoderError::NoEvents);
		}

		Ok(Self { events })
	}

	/// Attempts to interpret a log entry as one of the ABI's events.
	///
	/// Returns `None` when no event matches the entry's selector or when the
	/// topics/data do not fit the matched event's shape.
	pub fn try_decode(&self, entry: &LogEntry) -> Option<DecodedLog> {
		let selector = B256::from(*entry.topics.first()?);
		let (_, event) = self.events.iter().find(|(sel, _)| *sel == selector)?;

		let topics: Vec<B256> = entry.topics.iter().map(|t| B256::from(*t)).collect();
		let decoded = event.decode_log_parts(topics, &entry.data).ok()?;

		let mut indexed = decoded.indexed.into_iter();
		let mut body = decoded.body.into_iter();
		let mut params = Vec::with_capacity(event.inputs.len());
		for input in &event.inputs {
			let value = if input.indexed {
				indexed.next()?
			} else {
				body.next()?
			};
			params.push((input.name.clone(), value));
		}

		Some(DecodedLog {
			name: event.name.clone(),
			params,
		})
	}
}
