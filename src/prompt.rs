use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// The three kinds of question the dispatcher asks.
///
/// Kept behind a trait so the menu loop can be driven without a terminal.
pub trait Prompter {
	/// Pick one of `items`, returning its index.
	fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize>;

	/// Free-form line of text. Validation is the caller's job.
	fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

	fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

/// Interactive prompts on the controlling terminal.
pub struct TerminalPrompter {
	theme: ColorfulTheme,
}

impl TerminalPrompter {
	pub fn new() -> Self {
		Self {
			theme: ColorfulTheme::default(),
		}
	}
}

impl Default for TerminalPrompter {
	fn default() -> Self {
		Self::new()
	}
}

impl Prompter for TerminalPrompter {
	fn select(&mut self, prompt: &str, items: &[String], default: usize) -> Result<usize> {
		Ok(Select::with_theme(&self.theme)
			.with_prompt(prompt)
			.items(items)
			.default(default)
			.interact()?)
	}

	fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
		let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
		if let Some(d) = default {
			input = input.default(d.to_owned());
		}
		Ok(input.interact_text()?)
	}

	fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
		Ok(Confirm::with_theme(&self.theme)
			.with_prompt(prompt)
			.default(default)
			.interact()?)
	}
}
