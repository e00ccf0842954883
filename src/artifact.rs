use std::path::{Path, PathBuf};

use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::error::SessionError;

/// Events the CLI listens for once a contract is bound.
pub const WATCHED_EVENTS: [&str; 2] = ["Received", "FallbackCalled"];

/// A compiled contract: its ABI and creation bytecode.
#[derive(Debug, Clone)]
pub struct Artifact {
	pub abi: JsonAbi,
	pub bytecode: Bytes,
}

impl Artifact {
	/// The first event declared under `name`, if the ABI has one.
	pub fn event(&self, name: &str) -> Option<&Event> {
		self.abi.event(name).and_then(|overloads| overloads.first())
	}

	/// The subset of [`WATCHED_EVENTS`] this artifact actually declares.
	pub fn watched_events(&self) -> Vec<Event> {
		WATCHED_EVENTS
			.iter()
			.filter_map(|name| self.event(name).cloned())
			.collect()
	}
}

// Foundry writes `bytecode` as `{ "object": "0x..", ... }`; other
// toolchains write a bare hex string. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
	Hex(String),
	Object { object: String },
}

#[derive(Deserialize)]
struct RawArtifact {
	abi: Option<serde_json::Value>,
	bytecode: Option<RawBytecode>,
}

/// Reads the compiled artifact from a fixed path.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
	path: PathBuf,
}

impl ArtifactLoader {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn load(&self) -> Result<Artifact, SessionError> {
		if !self.path.exists() {
			return Err(SessionError::ArtifactMissing {
				path: self.path.clone(),
			});
		}

		let content =
			std::fs::read_to_string(&self.path).map_err(|e| self.malformed(e.to_string()))?;
		let raw: RawArtifact = serde_json::from_str(&content)
			.map_err(|e| self.malformed(format!("invalid JSON: {e}")))?;

		let abi = raw.abi.ok_or_else(|| self.malformed("missing `abi` field"))?;
		let abi: JsonAbi =
			serde_json::from_value(abi).map_err(|e| self.malformed(format!("invalid `abi`: {e}")))?;

		let bytecode = raw.bytecode.ok_or_else(|| self.malformed("missing `bytecode` field"))?;
		let code = match bytecode {
			RawBytecode::Hex(s) => s,
			RawBytecode::Object { object } => object,
		};
		let code = code.strip_prefix("0x").unwrap_or(&code);
		if code.is_empty() {
			return Err(self.malformed("empty `bytecode` (abstract contract or interface?)"));
		}
		let bytecode = hex::decode(code)
			.map_err(|e| self.malformed(format!("invalid `bytecode` hex: {e}")))?;

		log::debug!(
			"loaded artifact {} ({} bytes of bytecode)",
			self.path.display(),
			bytecode.len()
		);
		Ok(Artifact {
			abi,
			bytecode: bytecode.into(),
		})
	}

	fn malformed(&self, reason: impl Into<String>) -> SessionError {
		SessionError::ArtifactMalformed {
			path: self.path.clone(),
			reason: reason.into(),
		}
	}
}
