//! CLI output formatting utilities.
//!
//! Everything human-facing goes to stderr; stdout carries protocol
//! responses and JSON output only.

use anyhow::Context;
use owo_colors::{OwoColorize, Stream};

use localfile_lib::provider::diagnostics::{Diagnostics, Severity};

pub mod symbols {
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_diagnostics(diags: &Diagnostics) {
  for diag in diags {
    let line = diag.to_string();
    match diag.severity {
      Severity::Error => print_error(&line),
      Severity::Warning => print_warning(&line),
    }
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
