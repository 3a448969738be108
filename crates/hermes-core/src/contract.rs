//! Declared action contracts.
//!
//! An action declares the inputs it expects, each with an example value that
//! describes its shape. The adapter only inspects the declaration; validating
//! actual input values is the action's own business.
//!
//! # Example
//!
//! ```
//! use hermes_core::contract::{ActionContract, InputDef};
//! use serde_json::json;
//!
//! let contract = ActionContract::builder("get-user")
//!     .description("Looks up a user by id")
//!     .input(InputDef::new("id", json!("abc123")).required())
//!     .input(InputDef::new("verbose", json!(false)))
//!     .build();
//!
//! assert_eq!(contract.inputs().len(), 2);
//! assert!(contract.input("id").unwrap().is_required());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the input that carries the raw event in generic adaptation.
pub const EVENT_INPUT: &str = "event";

/// Name of the input that carries the invocation context in generic adaptation.
pub const CONTEXT_INPUT: &str = "context";

/// The declared input contract of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionContract {
    /// Action name, used in logs.
    name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Declared inputs, in declaration order.
    #[serde(default)]
    inputs: Vec<InputDef>,
}

impl ActionContract {
    /// Creates a new contract builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ActionContractBuilder {
        ActionContractBuilder::new(name)
    }

    /// Returns the action name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns all declared inputs.
    #[must_use]
    pub fn inputs(&self) -> &[InputDef] {
        &self.inputs
    }

    /// Looks up a declared input by name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&InputDef> {
        self.inputs.iter().find(|input| input.name == name)
    }

    /// Returns the declared input names, in declaration order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|input| input.name.as_str())
    }

    /// Returns `true` if the contract declares exactly the `event` and
    /// `context` inputs used by generic adaptation, in any order.
    #[must_use]
    pub fn declares_event_and_context(&self) -> bool {
        self.inputs.len() == 2
            && self.input(EVENT_INPUT).is_some()
            && self.input(CONTEXT_INPUT).is_some()
    }
}

/// Builder for [`ActionContract`].
#[derive(Debug)]
pub struct ActionContractBuilder {
    name: String,
    description: Option<String>,
    inputs: Vec<InputDef>,
}

impl ActionContractBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            inputs: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares an input. A later declaration with the same name replaces the
    /// earlier one.
    #[must_use]
    pub fn input(mut self, input: InputDef) -> Self {
        self.inputs.retain(|existing| existing.name != input.name);
        self.inputs.push(input);
        self
    }

    /// Declares the `event` and `context` inputs with empty dictionary
    /// examples, as generic adaptation requires.
    #[must_use]
    pub fn event_and_context(self) -> Self {
        self.input(InputDef::new(EVENT_INPUT, Value::Object(serde_json::Map::new())))
            .input(InputDef::new(CONTEXT_INPUT, Value::Object(serde_json::Map::new())))
    }

    /// Builds the contract.
    #[must_use]
    pub fn build(self) -> ActionContract {
        ActionContract {
            name: self.name,
            description: self.description,
            inputs: self.inputs,
        }
    }
}

/// A single declared input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDef {
    name: String,
    example: Value,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl InputDef {
    /// Declares an optional input with an example value.
    #[must_use]
    pub fn new(name: impl Into<String>, example: Value) -> Self {
        Self {
            name: name.into(),
            example,
            required: false,
            description: None,
        }
    }

    /// Marks the input as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the input name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the example value.
    #[must_use]
    pub fn example(&self) -> &Value {
        &self.example
    }

    /// Returns whether the input is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns `true` if the example is an empty dictionary (`{}`).
    #[must_use]
    pub fn has_empty_dictionary_example(&self) -> bool {
        self.example.as_object().is_some_and(serde_json::Map::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_order() {
        let contract = ActionContract::builder("create-order")
            .input(InputDef::new("sku", json!("A-1")).required())
            .input(InputDef::new("quantity", json!(1)))
            .build();

        let names: Vec<_> = contract.input_names().collect();
        assert_eq!(names, vec!["sku", "quantity"]);
        assert_eq!(contract.name(), "create-order");
        assert!(contract.description().is_none());
    }

    #[test]
    fn test_redeclared_input_replaces() {
        let contract = ActionContract::builder("a")
            .input(InputDef::new("x", json!(1)))
            .input(InputDef::new("x", json!("one")))
            .build();

        assert_eq!(contract.inputs().len(), 1);
        assert_eq!(contract.input("x").unwrap().example(), &json!("one"));
    }

    #[test]
    fn test_event_and_context_shape() {
        let contract = ActionContract::builder("on-queue")
            .event_and_context()
            .build();

        assert!(contract.declares_event_and_context());
        assert!(contract
            .inputs()
            .iter()
            .all(InputDef::has_empty_dictionary_example));
    }

    #[test]
    fn test_extra_input_is_not_event_and_context() {
        let contract = ActionContract::builder("on-queue")
            .event_and_context()
            .input(InputDef::new("extra", json!({})))
            .build();

        assert!(!contract.declares_event_and_context());
    }

    #[test]
    fn test_empty_dictionary_example() {
        assert!(InputDef::new("event", json!({})).has_empty_dictionary_example());
        assert!(!InputDef::new("event", json!({"a": 1})).has_empty_dictionary_example());
        assert!(!InputDef::new("event", json!([])).has_empty_dictionary_example());
        assert!(!InputDef::new("event", json!("")).has_empty_dictionary_example());
    }

    #[test]
    fn test_contract_deserializes() {
        let contract: ActionContract = serde_json::from_value(json!({
            "name": "echo",
            "inputs": [
                {"name": "event", "example": {}},
                {"name": "context", "example": {}, "required": true}
            ]
        }))
        .unwrap();

        assert!(contract.declares_event_and_context());
        assert!(contract.input("context").unwrap().is_required());
        assert!(!contract.input("event").unwrap().is_required());
    }
}
