//! Diagnostics returned to the host.
//!
//! Provider operations never fail with a Rust error at the protocol
//! boundary; every problem becomes a diagnostic with a short summary and a
//! detail string, optionally pinned to an attribute.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
  Error,
  Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
  pub severity: Severity,
  pub summary: String,
  pub detail: String,
  /// Attribute the diagnostic refers to, if any.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attribute: Option<String>,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.attribute {
      Some(attr) => write!(f, "{} ({}): {}", self.summary, attr, self.detail),
      None => write!(f, "{}: {}", self.summary, self.detail),
    }
  }
}

/// Ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  /// A collection holding a single error.
  pub fn error(summary: impl Into<String>, detail: impl fmt::Display) -> Self {
    let mut diags = Self::new();
    diags.add_error(summary, detail);
    diags
  }

  /// A collection holding a single attribute error.
  pub fn attribute_error(attribute: impl Into<String>, summary: impl Into<String>, detail: impl fmt::Display) -> Self {
    let mut diags = Self::new();
    diags.add_attribute_error(attribute, summary, detail);
    diags
  }

  pub fn add_error(&mut self, summary: impl Into<String>, detail: impl fmt::Display) {
    self.0.push(Diagnostic {
      severity: Severity::Error,
      summary: summary.into(),
      detail: detail.to_string(),
      attribute: None,
    });
  }

  pub fn add_attribute_error(
    &mut self,
    attribute: impl Into<String>,
    summary: impl Into<String>,
    detail: impl fmt::Display,
  ) {
    self.0.push(Diagnostic {
      severity: Severity::Error,
      summary: summary.into(),
      detail: detail.to_string(),
      attribute: Some(attribute.into()),
    });
  }

  pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl fmt::Display) {
    self.0.push(Diagnostic {
      severity: Severity::Warning,
      summary: summary.into(),
      detail: detail.to_string(),
      attribute: None,
    });
  }

  pub fn extend(&mut self, other: Diagnostics) {
    self.0.extend(other.0);
  }

  pub fn has_error(&self) -> bool {
    self.0.iter().any(|d| d.severity == Severity::Error)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
    self.0.iter()
  }
}

impl<'a> IntoIterator for &'a Diagnostics {
  type Item = &'a Diagnostic;
  type IntoIter = std::slice::Iter<'a, Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl fmt::Display for Diagnostics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
    write!(f, "{}", lines.join("; "))
  }
}
