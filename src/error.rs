use std::path::PathBuf;

use alloy::primitives::Address;
use thiserror::Error;

/// Everything a contract-session verb can fail with.
///
/// Only `Connectivity` is fatal, and only during startup. Every other variant
/// is reported to the operator and control returns to the menu.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("cannot reach node at {url}: {reason}")]
	Connectivity { url: String, reason: String },

	#[error("artifact not found at {}. Run `forge build` before using the CLI.", path.display())]
	ArtifactMissing { path: PathBuf },

	#[error("artifact at {} is malformed: {reason}", path.display())]
	ArtifactMalformed { path: PathBuf, reason: String },

	#[error("invalid address: {0:?}")]
	InvalidAddress(String),

	#[error("invalid amount {input:?}: {reason}")]
	InvalidAmount { input: String, reason: String },

	#[error("invalid data {input:?}: {reason}")]
	InvalidData { input: String, reason: String },

	#[error("contract at {address} did not respond: {reason}")]
	ContractUnreachable { address: Address, reason: String },

	#[error("only the owner ({owner}) can withdraw; active wallet is {caller}")]
	NotOwner { owner: Address, caller: Address },

	#[error("transaction failed: {0}")]
	Transaction(String),

	#[error("no contract selected. Deploy or load one first.")]
	NotBound,
}

impl SessionError {
	/// Wrap a chain-client failure, keeping the whole cause chain.
	pub fn transaction(err: anyhow::Error) -> Self {
		Self::Transaction(format!("{err:#}"))
	}

	pub fn invalid_amount(input: &str, reason: impl Into<String>) -> Self {
		Self::InvalidAmount {
			input: input.to_owned(),
			reason: reason.into(),
		}
	}

	pub fn invalid_data(input: &str, reason: impl Into<String>) -> Self {
		Self::InvalidData {
			input: input.to_owned(),
			reason: reason.into(),
		}
	}
}
