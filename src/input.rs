use std::fmt;
use std::str::FromStr;

use alloy::primitives::{utils::parse_ether, Address, Bytes, U256};

use crate::error::SessionError;
use crate::ui::format_eth;

// -- Addresses --

/// Parse a `0x`-prefixed, 20-byte hex address.
///
/// All-lowercase and all-uppercase forms are accepted as-is. Mixed case is
/// treated as an EIP-55 checksum and must validate.
pub fn parse_address(input: &str) -> Result<Address, SessionError> {
	let invalid = || SessionError::InvalidAddress(input.to_owned());

	let digits = input.strip_prefix("0x").ok_or_else(invalid)?;
	if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return Err(invalid());
	}

	let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
	let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
	if has_lower && has_upper {
		Address::parse_checksummed(input, None).map_err(|_| invalid())
	} else {
		input.parse().map_err(|_| invalid())
	}
}

// -- ETH amounts --

/// A strictly positive amount of ether, held in wei.
///
/// The only way to get one is through [`Amount::parse`], so any `Amount`
/// handed to a session verb has already been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(U256);

impl Amount {
	/// Parse a decimal ETH string such as `"0.1"`.
	pub fn parse(input: &str) -> Result<Self, SessionError> {
		let value: f64 = input
			.parse()
			.map_err(|_| SessionError::invalid_amount(input, "not a number"))?;
		if !value.is_finite() || value <= 0.0 {
			return Err(SessionError::invalid_amount(input, "must be greater than zero"));
		}

		let wei =
			parse_ether(input).map_err(|e| SessionError::invalid_amount(input, e.to_string()))?;
		if wei.is_zero() {
			return Err(SessionError::invalid_amount(input, "smaller than one wei"));
		}
		Ok(Self(wei))
	}

	pub fn wei(&self) -> U256 {
		self.0
	}
}

impl FromStr for Amount {
	type Err = SessionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ETH", format_eth(self.0))
	}
}

// -- Call payloads --

/// Non-empty calldata given as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
	pub fn parse(input: &str) -> Result<Self, SessionError> {
		let digits = input
			.strip_prefix("0x")
			.ok_or_else(|| SessionError::invalid_data(input, "must start with 0x"))?;
		if digits.is_empty() {
			// An empty payload would hit receive() instead of fallback().
			return Err(SessionError::invalid_data(input, "needs at least one byte"));
		}
		let raw =
			hex::decode(digits).map_err(|e| SessionError::invalid_data(input, e.to_string()))?;
		Ok(Self(raw.into()))
	}

	pub fn bytes(&self) -> &Bytes {
		&self.0
	}
}

impl FromStr for Payload {
	type Err = SessionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Payload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}
