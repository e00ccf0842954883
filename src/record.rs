use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::input::parse_address;

/// The most recent deployment, persisted so a later run can resume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
	pub address: String,
	pub deployer: String,
	pub network: String,
	/// ISO-8601 UTC, millisecond precision.
	pub timestamp: String,
}

impl DeploymentRecord {
	/// Build a record for a deployment that just confirmed.
	pub fn now(address: Address, deployer: Address, network: &str) -> Self {
		Self {
			address: address.to_checksum(None),
			deployer: deployer.to_checksum(None),
			network: network.to_owned(),
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
		}
	}

	/// The recorded contract address, if it is well-formed.
	pub fn contract_address(&self) -> Option<Address> {
		parse_address(&self.address).ok()
	}
}

/// What [`RecordStore::read`] found on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
	Absent,
	/// The file exists but is unparseable or names a bad address.
	Invalid(String),
	Valid(DeploymentRecord),
}

/// JSON file holding a single [`DeploymentRecord`].
#[derive(Debug, Clone)]
pub struct RecordStore {
	path: PathBuf,
}

impl RecordStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Read the stored record, telling a missing file apart from one that
	/// cannot be used.
	pub fn read(&self) -> StoredRecord {
		let content = match std::fs::read_to_string(&self.path) {
			Ok(c) => c,
			Err(e) => {
				log::debug!("no deployment record at {}: {e}", self.path.display());
				return StoredRecord::Absent;
			}
		};

		let record: DeploymentRecord = match serde_json::from_str(&content) {
			Ok(r) => r,
			Err(e) => {
				log::warn!("ignoring unreadable deployment record {}: {e}", self.path.display());
				return StoredRecord::Invalid(e.to_string());
			}
		};

		if record.contract_address().is_none() {
			log::warn!("ignoring deployment record with invalid address {:?}", record.address);
			return StoredRecord::Invalid(format!("invalid address {:?}", record.address));
		}
		StoredRecord::Valid(record)
	}

	/// Anything short of a parseable record with a valid address counts as
	/// "no prior deployment".
	pub fn load(&self) -> Option<DeploymentRecord> {
		match self.read() {
			StoredRecord::Valid(record) => Some(record),
			StoredRecord::Absent | StoredRecord::Invalid(_) => None,
		}
	}

	/// Overwrite the stored record, creating parent directories if needed.
	pub fn save(&self, record: &DeploymentRecord) -> anyhow::Result<()> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				std::fs::create_dir_all(parent)?;
			}
		}
		std::fs::write(&self.path, serde_json::to_string_pretty(record)?)?;
		Ok(())
	}
}
