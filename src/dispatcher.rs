//! The interactive menu loop.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Start ─startup─▶ MenuWait ─pick─▶ Executing(cmd) ─done─▶ MenuWait
//!                     │
//!                     └─exit─▶ Terminated
//! ```
//!
//! Verb failures are printed and the loop carries on. The only errors that
//! escape [`Dispatcher::run`] are an unreachable node at startup and a
//! broken terminal.

use std::fmt;

use alloy::primitives::U256;
use anyhow::{anyhow, Result};

use crate::chain::ChainClient;
use crate::error::SessionError;
use crate::input::{parse_address, Amount, Payload};
use crate::prompt::Prompter;
use crate::record::StoredRecord;
use crate::session::{Session, WithdrawMode};
use crate::ui::{self, format_eth};

/// The fixed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
	Deploy,
	Load,
	SendValue,
	SendData,
	CheckBalance,
	CheckStats,
	Withdraw,
	Exit,
}

impl MenuCommand {
	/// Menu order.
	pub const ALL: [MenuCommand; 8] = [
		Self::Deploy,
		Self::Load,
		Self::SendValue,
		Self::SendData,
		Self::CheckBalance,
		Self::CheckStats,
		Self::Withdraw,
		Self::Exit,
	];

	pub fn label(self) -> &'static str {
		match self {
			Self::Deploy => "🚀 Deploy new contract",
			Self::Load => "📦 Load existing contract",
			Self::SendValue => "💸 Send Ether (trigger receive())",
			Self::SendData => "📡 Send Data (trigger fallback())",
			Self::CheckBalance => "💰 Check contract balance",
			Self::CheckStats => "📊 View contract statistics",
			Self::Withdraw => "🏦 Withdraw funds (owner only)",
			Self::Exit => "❌ Exit",
		}
	}

	/// Commands that act on the bound contract.
	pub fn requires_contract(self) -> bool {
		matches!(
			self,
			Self::SendValue
				| Self::SendData
				| Self::CheckBalance
				| Self::CheckStats
				| Self::Withdraw
		)
	}
}

impl fmt::Display for MenuCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
	Start,
	MenuWait,
	Executing(MenuCommand),
	Terminated,
}

pub struct Dispatcher<C, P> {
	session: Session<C>,
	prompter: P,
	state: DispatchState,
	assume_yes: bool,
}

impl<C: ChainClient, P: Prompter> Dispatcher<C, P> {
	pub fn new(session: Session<C>, prompter: P) -> Self {
		Self {
			session,
			prompter,
			state: DispatchState::Start,
			assume_yes: false,
		}
	}

	/// Resume the recorded deployment without asking.
	pub fn assume_yes(mut self, yes: bool) -> Self {
		self.assume_yes = yes;
		self
	}

	pub fn state(&self) -> DispatchState {
		self.state
	}

	pub fn session(&self) -> &Session<C> {
		&self.session
	}

	pub fn prompter(&self) -> &P {
		&self.prompter
	}

	/// Drive the loop until the operator picks Exit.
	pub async fn run(&mut self) -> Result<()> {
		while self.state != DispatchState::Terminated {
			self.step().await?;
		}
		Ok(())
	}

	/// Perform exactly one transition.
	pub async fn step(&mut self) -> Result<()> {
		self.state = match self.state {
			DispatchState::Start => {
				self.startup().await?;
				DispatchState::MenuWait
			}
			DispatchState::MenuWait => match self.choose()? {
				MenuCommand::Exit => {
					ui::goodbye();
					DispatchState::Terminated
				}
				cmd => DispatchState::Executing(cmd),
			},
			DispatchState::Executing(cmd) => {
				self.execute(cmd).await?;
				ui::separator();
				DispatchState::MenuWait
			}
			DispatchState::Terminated => DispatchState::Terminated,
		};
		Ok(())
	}

	// -- Transitions --

	async fn startup(&mut self) -> Result<()> {
		let conn = ui::with_spinner("Connecting to node...", self.session.connect()).await?;
		ui::network_summary(&conn.network, conn.wallet, conn.balance);

		let record = match self.session.records().read() {
			StoredRecord::Valid(record) => record,
			StoredRecord::Absent => {
				ui::notice("No previous deployment found.");
				return Ok(());
			}
			StoredRecord::Invalid(reason) => {
				ui::notice(format!("Saved deployment is invalid ({reason}); ignoring it."));
				return Ok(());
			}
		};

		let resume = self.assume_yes
			|| self.prompter.confirm(
				&format!("Found last deployment at {}. Auto-load it?", record.address),
				true,
			)?;
		if resume {
			let task = self.session.load(&record.address);
			match ui::with_spinner("Loading contract...", task).await {
				Ok(address) => ui::success(format!("Resumed contract at {address}")),
				Err(e) => ui::failure(e),
			}
		}
		Ok(())
	}

	fn choose(&mut self) -> Result<MenuCommand> {
		let items: Vec<String> = MenuCommand::ALL.iter().map(|c| c.label().to_owned()).collect();
		let index = self.prompter.select("Choose an action:", &items, 0)?;
		MenuCommand::ALL
			.get(index)
			.copied()
			.ok_or_else(|| anyhow!("menu index {index} out of range"))
	}

	async fn execute(&mut self, cmd: MenuCommand) -> Result<()> {
		if cmd.requires_contract() && !self.session.is_bound() {
			ui::failure("No contract selected. Deploy or load one from the menu.");
			return Ok(());
		}

		match cmd {
			MenuCommand::Deploy => {
				match ui::with_spinner("Deploying FallbackDemo...", self.session.deploy()).await {
					Ok(d) => ui::deployment(&d),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::Load => {
				let address = self.ask("Enter contract address:", None, |s| {
					parse_address(s).map(|_| s.to_owned())
				})?;
				match ui::with_spinner("Loading contract...", self.session.load(&address)).await {
					Ok(a) => ui::success(format!("Contract loaded successfully at: {a}")),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::SendValue => {
				let amount = self.ask(
					"Enter amount of ETH to send (receive()):",
					Some("0.1"),
					Amount::parse,
				)?;
				let task = self.session.send_value(amount);
				match ui::with_spinner(&format!("Sending {amount} (receive)..."), task).await {
					Ok(tx) => ui::transaction("receive()", &tx),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::SendData => {
				let amount = self.ask(
					"Enter amount of ETH to send (fallback()):",
					Some("0.1"),
					Amount::parse,
				)?;
				let payload =
					self.ask("Hex data (0x...) to send:", Some("0x12345678"), Payload::parse)?;
				let task = self.session.send_data(amount, &payload);
				let label = format!("Sending {amount} with data (fallback)...");
				match ui::with_spinner(&label, task).await {
					Ok(tx) => ui::transaction("fallback()", &tx),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::CheckBalance => {
				let task = self.session.balance();
				match ui::with_spinner("Fetching contract balance...", task).await {
					Ok(wei) => ui::balance(wei),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::CheckStats => {
				match ui::with_spinner("Fetching stats...", self.session.stats()).await {
					Ok(report) => ui::stats(&report),
					Err(e) => ui::failure(e),
				}
			}
			MenuCommand::Withdraw => self.withdraw().await?,
			MenuCommand::Exit => {}
		}
		Ok(())
	}

	async fn withdraw(&mut self) -> Result<()> {
		let balance = match self.session.withdrawable().await {
			Ok(b) => b,
			Err(e) => {
				ui::failure(e);
				return Ok(());
			}
		};
		if balance.is_zero() {
			ui::notice("Contract balance is zero.");
			return Ok(());
		}

		let choices = vec![
			format!("Withdraw ALL ({} ETH)", format_eth(balance)),
			"Withdraw specific amount".to_owned(),
			"Cancel".to_owned(),
		];
		let mode = match self.prompter.select("Withdraw mode:", &choices, 0)? {
			0 => WithdrawMode::All,
			1 => {
				let amount = self.ask("Amount to withdraw (ETH):", None, |s| within(s, balance))?;
				WithdrawMode::Specific(amount)
			}
			_ => return Ok(()),
		};

		let label = match mode {
			WithdrawMode::All => "Withdrawing all funds...".to_owned(),
			WithdrawMode::Specific(a) => format!("Withdrawing {a} from contract..."),
		};
		match ui::with_spinner(&label, self.session.withdraw(mode)).await {
			Ok(w) => ui::withdrawal(&w),
			Err(e) => ui::failure(e),
		}
		Ok(())
	}

	/// Ask until `parse` accepts the answer.
	fn ask<T>(
		&mut self,
		prompt: &str,
		default: Option<&str>,
		parse: impl Fn(&str) -> Result<T, SessionError>,
	) -> Result<T> {
		loop {
			let raw = self.prompter.input(prompt, default)?;
			match parse(raw.trim()) {
				Ok(value) => return Ok(value),
				Err(e) => ui::rejected(e),
			}
		}
	}
}

fn within(input: &str, balance: U256) -> Result<Amount, SessionError> {
	let amount = Amount::parse(input)?;
	if amount.wei() > balance {
		return Err(SessionError::invalid_amount(input, "exceeds contract balance"));
	}
	Ok(amount)
}
