//! Console output: colors, spinners, and one renderer per verb outcome.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use alloy::primitives::{utils::format_ether, Address, U256};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::chain::{NetworkInfo, TxOutcome};
use crate::session::{Deployment, StatsReport, Withdrawal};

/// Format wei as ether without trailing zeros (`0.1`, `2.0`).
pub fn format_eth(wei: U256) -> String {
	let full = format_ether(wei);
	if !full.contains('.') {
		return format!("{full}.0");
	}
	let trimmed = full.trim_end_matches('0');
	if trimmed.ends_with('.') {
		format!("{trimmed}0")
	} else {
		trimmed.to_owned()
	}
}

/// Run `task` behind a spinner, marking it done or failed when it settles.
pub async fn with_spinner<T, E, F>(message: &str, task: F) -> Result<T, E>
where
	F: Future<Output = Result<T, E>>,
{
	let spinner = ProgressBar::new_spinner();
	if let Ok(s) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
		spinner.set_style(s);
	}
	spinner.set_message(message.to_owned());
	spinner.enable_steady_tick(Duration::from_millis(80));

	let result = task.await;
	let mark = match &result {
		Ok(_) => style("✔").green(),
		Err(_) => style("✖").red(),
	};
	spinner.finish_with_message(format!("{mark} {message}"));
	result
}

pub fn banner() {
	println!("{}", style("=== FallbackDemo CLI ===").blue().bold());
	println!(
		"{}\n",
		style("Solidity fallback/receive demo on a local dev chain").dim()
	);
}

pub fn network_summary(network: &NetworkInfo, wallet: Address, balance: U256) {
	println!(
		"{}",
		style(format!("Network: {} (Chain ID: {})", network.name, network.chain_id)).dim()
	);
	println!("{}", style(format!("Wallet:  {wallet}")).dim());
	println!("{}\n", style(format!("Balance: {} ETH", format_eth(balance))).dim());
}

pub fn success(msg: impl Display) {
	println!("{}\n", style(format!("✅ {msg}")).green());
}

pub fn notice(msg: impl Display) {
	println!("{}\n", style(msg).yellow());
}

pub fn failure(err: impl Display) {
	println!("{}\n", style(format!("Error: {err}")).red());
}

/// Shown when a prompt answer is rejected and the question is asked again.
pub fn rejected(err: impl Display) {
	println!("{}", style(format!("  {err}")).red());
}

pub fn event_line(line: &str) {
	println!("{}", style(format!("🔔 Event {line}")).magenta().bright());
}

pub fn separator() {
	println!("{}\n", style("=".repeat(60)).dim());
}

pub fn goodbye() {
	println!("{}", style("\nGoodbye! 👋\n").cyan());
}

pub fn transaction(label: &str, tx: &TxOutcome) {
	println!("{}", style(format!("Tx hash: {}", tx.hash)).cyan());
	match tx.block {
		Some(block) => success(format!("{label} mined in block {block}.")),
		None => success(format!("{label} mined.")),
	}
}

pub fn deployment(d: &Deployment) {
	println!("{}", style(format!("Tx hash: {}", d.tx.hash)).cyan());
	success(format!("Contract deployed at: {}", d.address));
	match &d.record {
		Ok(path) => println!(
			"{}\n",
			style(format!("Deployment info saved to {}", path.display())).dim()
		),
		Err(reason) => notice(format!("Could not save deployment info: {reason}")),
	}
}

pub fn balance(wei: U256) {
	println!(
		"{}\n",
		style(format!("💰 Contract Balance: {} ETH ({wei} wei)", format_eth(wei))).blue()
	);
}

pub fn stats(report: &StatsReport) {
	let s = &report.stats;
	println!("{}", style("📊 Contract Statistics").blue().bold());
	let row = |label: &str, wei: U256| format!("{label:<19}{} ETH", format_eth(wei));
	println!("{}", style(row("Total Received:", s.total_received)).green());
	println!("{}", style(row("Total Withdrawn:", s.total_withdrawn)).green());
	println!("{}", style(row("Current Balance:", s.current_balance)).green());
	println!("{}", style(row("Your Contribution:", report.contribution)).yellow());
	println!("{}", style(format!("Owner Address:     {}", report.owner)).magenta());
	let verdict = if report.is_owner() {
		"You are the owner ✅"
	} else {
		"You are NOT the owner ❌"
	};
	println!("{}\n", style(verdict).dim());
}

pub fn withdrawal(w: &Withdrawal) {
	match w {
		Withdrawal::NothingToWithdraw => notice("Contract balance is zero."),
		Withdrawal::Done { amount, tx } => {
			transaction(&format!("Withdrawal of {} ETH", format_eth(*amount)), tx)
		}
	}
}
