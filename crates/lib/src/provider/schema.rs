//! Attribute schemas for the provider, resources and data sources.

use serde::Serialize;
use serde_json::Value;

use super::diagnostics::Diagnostics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
  pub name: &'static str,
  pub description: &'static str,
  pub required: bool,
  pub optional: bool,
  pub computed: bool,
  pub sensitive: bool,
  /// A change to this attribute destroys and recreates the resource.
  pub requires_replace: bool,
  /// Keep the prior state value while planning instead of marking it unknown.
  pub use_state_for_unknown: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub default: Option<&'static str>,
}

impl Attribute {
  fn base(name: &'static str, description: &'static str) -> Self {
    Self {
      name,
      description,
      required: false,
      optional: false,
      computed: false,
      sensitive: false,
      requires_replace: false,
      use_state_for_unknown: false,
      default: None,
    }
  }

  pub fn required(name: &'static str, description: &'static str) -> Self {
    Self {
      required: true,
      ..Self::base(name, description)
    }
  }

  pub fn optional(name: &'static str, description: &'static str) -> Self {
    Self {
      optional: true,
      ..Self::base(name, description)
    }
  }

  pub fn computed(name: &'static str, description: &'static str) -> Self {
    Self {
      computed: true,
      ..Self::base(name, description)
    }
  }

  pub fn requires_replace(mut self) -> Self {
    self.requires_replace = true;
    self
  }

  pub fn use_state_for_unknown(mut self) -> Self {
    self.use_state_for_unknown = true;
    self
  }

  /// Static default. An attribute with a default is also computed.
  pub fn with_default(mut self, value: &'static str) -> Self {
    self.default = Some(value);
    self.computed = true;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
  pub description: &'static str,
  pub attributes: Vec<Attribute>,
}

impl Schema {
  pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
    Self {
      description,
      attributes,
    }
  }

  pub fn attribute(&self, name: &str) -> Option<&Attribute> {
    self.attributes.iter().find(|a| a.name == name)
  }

  /// Fill null or missing attributes that carry a static default.
  pub fn apply_defaults(&self, state: &mut Value) {
    let Some(object) = state.as_object_mut() else {
      return;
    };
    for attr in &self.attributes {
      if let Some(default) = attr.default {
        let entry = object.entry(attr.name).or_insert(Value::Null);
        if entry.is_null() {
          *entry = Value::String(default.to_string());
        }
      }
    }
  }

  /// Report required attributes that are missing or null.
  pub fn validate_required(&self, config: &Value) -> Diagnostics {
    let mut diags = Diagnostics::new();
    for attr in self.attributes.iter().filter(|a| a.required) {
      let missing = config.get(attr.name).is_none_or(Value::is_null);
      if missing {
        diags.add_attribute_error(
          attr.name,
          "Missing required argument",
          format!("The argument \"{}\" is required, but no definition was found.", attr.name),
        );
      }
    }
    diags
  }

  /// Names of replace-forcing attributes whose value differs between the
  /// prior state and the proposed state.
  pub fn requires_replace(&self, prior: &Value, proposed: &Value) -> Vec<String> {
    self
      .attributes
      .iter()
      .filter(|a| a.requires_replace)
      .filter(|a| prior.get(a.name).unwrap_or(&Value::Null) != proposed.get(a.name).unwrap_or(&Value::Null))
      .map(|a| a.name.to_string())
      .collect()
  }
}
