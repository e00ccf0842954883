use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::Event;
use alloy::primitives::LogData;

use crate::ui::format_eth;

/// Decode `data` against the first matching event and render it as one line,
/// e.g. `Received => sender=0x.., amount=0.1 ETH (block 7)`.
///
/// Returns `None` when no event matches topic0 or the data does not decode.
pub fn render(events: &[Event], data: &LogData, block: Option<u64>) -> Option<String> {
	let topic0 = data.topics().first()?;
	let event = events.iter().find(|e| e.selector() == *topic0)?;
	let decoded = match event.decode_log(data) {
		Ok(d) => d,
		Err(e) => {
			log::debug!("could not decode {} log: {e}", event.name);
			return None;
		}
	};

	let mut indexed = decoded.indexed.iter();
	let mut body = decoded.body.iter();
	let mut fields = Vec::with_capacity(event.inputs.len());
	for input in &event.inputs {
		let value = (if input.indexed { indexed.next() } else { body.next() })?;
		fields.push(format!("{}={}", input.name, render_value(&input.name, value)));
	}

	let mut line = format!("{} => {}", event.name, fields.join(", "));
	if let Some(block) = block {
		line.push_str(&format!(" (block {block})"));
	}
	Some(line)
}

fn render_value(name: &str, value: &DynSolValue) -> String {
	match value {
		DynSolValue::Address(a) => a.to_checksum(None),
		DynSolValue::Uint(v, _) if name == "amount" || name == "value" => {
			format!("{} ETH", format_eth(*v))
		}
		DynSolValue::Uint(v, _) => v.to_string(),
		DynSolValue::Int(v, _) => v.to_string(),
		DynSolValue::Bool(b) => b.to_string(),
		DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
		DynSolValue::FixedBytes(word, size) => format!("0x{}", hex::encode(&word[..*size])),
		DynSolValue::String(s) => format!("{s:?}"),
		other => format!("{other:?}"),
	}
}

#[cfg(test)]
mod tests {
	use alloy::json_abi::JsonAbi;
	use alloy::primitives::{Address, U256};

	use super::*;

	const ABI: &str = r#"[
		{"type":"event","name":"Received","inputs":[
			{"name":"sender","type":"address","indexed":true},
			{"name":"amount","type":"uint256","indexed":false}
		],"anonymous":false},
		{"type":"event","name":"FallbackCalled","inputs":[
			{"name":"sender","type":"address","indexed":true},
			{"name":"amount","type":"uint256","indexed":false},
			{"name":"data","type":"bytes","indexed":false}
		],"anonymous":false}
	]"#;

	fn events() -> Vec<Event> {
		let abi: JsonAbi = serde_json::from_str(ABI).unwrap();
		["Received", "FallbackCalled"]
			.iter()
			.map(|n| abi.event(n).unwrap()[0].clone())
			.collect()
	}

	fn sender() -> Address {
		"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
	}

	#[test]
	fn renders_received() {
		let events = events();
		let amount = U256::from(100_000_000_000_000_000u64);
		let log = LogData::new_unchecked(
			vec![events[0].selector(), sender().into_word()],
			amount.to_be_bytes::<32>().to_vec().into(),
		);

		let line = render(&events, &log, Some(7)).unwrap();
		assert_eq!(
			line,
			"Received => sender=0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266, \
			 amount=0.1 ETH (block 7)"
		);
	}

	#[test]
	fn renders_fallback_with_payload() {
		let events = events();
		let body = DynSolValue::Tuple(vec![
			DynSolValue::Uint(U256::from(1_000_000_000_000_000_000u64), 256),
			DynSolValue::Bytes(vec![0x12, 0x34, 0x56, 0x78]),
		])
		.abi_encode_params();
		let log = LogData::new_unchecked(
			vec![events[1].selector(), sender().into_word()],
			body.into(),
		);

		let line = render(&events, &log, None).unwrap();
		assert!(line.starts_with("FallbackCalled => sender=0xf39F"));
		assert!(line.ends_with("amount=1.0 ETH, data=0x12345678"));
	}

	#[test]
	fn unknown_topic_is_skipped() {
		let log = LogData::new_unchecked(vec![Default::default()], Default::default());
		assert!(render(&events(), &log, None).is_none());
	}
}
