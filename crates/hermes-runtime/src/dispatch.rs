//! Event-type dispatch.
//!
//! An [`AdaptableAction`] says up front which kind of action it is. The
//! adapter resolves the event type and validates the action's declared
//! inputs once, at construction, so an invocation never meets an action it
//! cannot call.
//!
//! | Event type | Action | Contract requirement |
//! |------------|--------|----------------------|
//! | `http` | [`HttpAction`] | none |
//! | `generic` | [`GenericAction`] | exactly `event` and `context`, each with example `{}` |

use std::fmt;
use std::sync::Arc;

use hermes_core::contract::{CONTEXT_INPUT, EVENT_INPUT};
use hermes_core::{
    ActionContract, ErasedGenericAction, EventType, GenericAction, HermesError, HermesResult,
};
use hermes_extract::{ErasedHttpAction, HttpAction};

/// An action ready to be adapted.
#[derive(Clone)]
pub enum AdaptableAction {
    /// Receives a request view and a responder.
    Http(Arc<dyn ErasedHttpAction>),
    /// Receives the raw event and context.
    Generic(Arc<dyn ErasedGenericAction>),
}

impl AdaptableAction {
    /// Wraps an HTTP action.
    pub fn http<A: HttpAction>(action: A) -> Self {
        Self::Http(Arc::new(action))
    }

    /// Wraps a generic action.
    pub fn generic<A: GenericAction>(action: A) -> Self {
        Self::Generic(Arc::new(action))
    }

    /// Returns the action's declared contract.
    #[must_use]
    pub fn contract(&self) -> &ActionContract {
        match self {
            Self::Http(action) => action.contract(),
            Self::Generic(action) => action.contract(),
        }
    }

    /// Returns the event type this action is shaped for.
    #[must_use]
    pub const fn native_event_type(&self) -> EventType {
        match self {
            Self::Http(_) => EventType::Http,
            Self::Generic(_) => EventType::Generic,
        }
    }

    /// Resolves the event type to adapt with and validates the contract.
    ///
    /// With no explicit event type, the action's own shape decides.
    ///
    /// # Errors
    ///
    /// Returns [`HermesError::Configuration`] if the action does not fit the
    /// event type or its generic contract is malformed.
    pub fn resolve(&self, requested: Option<EventType>) -> HermesResult<EventType> {
        let event_type = requested.unwrap_or_else(|| self.native_event_type());
        let name = self.contract().name();

        if event_type != self.native_event_type() {
            return Err(HermesError::configuration(format!(
                "action '{name}' is a {} action and cannot be adapted to {event_type} events",
                self.native_event_type()
            )));
        }

        if event_type == EventType::Generic {
            validate_generic_contract(self.contract())?;
        }

        Ok(event_type)
    }
}

impl fmt::Debug for AdaptableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(match self {
            Self::Http(_) => "Http",
            Self::Generic(_) => "Generic",
        })
        .field(&self.contract().name())
        .finish()
    }
}

impl From<Arc<dyn ErasedHttpAction>> for AdaptableAction {
    fn from(action: Arc<dyn ErasedHttpAction>) -> Self {
        Self::Http(action)
    }
}

impl From<Arc<dyn ErasedGenericAction>> for AdaptableAction {
    fn from(action: Arc<dyn ErasedGenericAction>) -> Self {
        Self::Generic(action)
    }
}

/// Checks that a contract declares exactly `event` and `context`, each with
/// an empty-dictionary example.
///
/// # Errors
///
/// Returns [`HermesError::Configuration`] describing the first problem found.
pub fn validate_generic_contract(contract: &ActionContract) -> HermesResult<()> {
    let name = contract.name();

    for required in [EVENT_INPUT, CONTEXT_INPUT] {
        let Some(input) = contract.input(required) else {
            return Err(HermesError::configuration(format!(
                "action '{name}' must declare an '{required}' input to handle generic events"
            )));
        };
        if !input.has_empty_dictionary_example() {
            return Err(HermesError::configuration(format!(
                "the '{required}' input of action '{name}' must have an empty dictionary ({{}}) as its example, got {}",
                input.example()
            )));
        }
    }

    let extra: Vec<&str> = contract
        .input_names()
        .filter(|input| *input != EVENT_INPUT && *input != CONTEXT_INPUT)
        .collect();
    if !extra.is_empty() {
        return Err(HermesError::configuration(format!(
            "action '{name}' declares inputs other than 'event' and 'context': {}",
            extra.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{FnGenericAction, InputDef};
    use hermes_extract::{FnHttpAction, RequestView, Responder};
    use serde_json::json;

    fn generic(contract: ActionContract) -> AdaptableAction {
        AdaptableAction::generic(FnGenericAction::new(contract, |inputs| async move {
            Ok(inputs.event)
        }))
    }

    fn http() -> AdaptableAction {
        AdaptableAction::http(FnHttpAction::new(
            ActionContract::builder("get-order").build(),
            |_req: RequestView, res: Responder| async move { Ok(res.send_status(204)) },
        ))
    }

    #[test]
    fn test_http_is_inferred() {
        assert_eq!(http().resolve(None).unwrap(), EventType::Http);
        assert_eq!(http().resolve(Some(EventType::Http)).unwrap(), EventType::Http);
    }

    #[test]
    fn test_generic_is_inferred() {
        let action = generic(ActionContract::builder("sqs").event_and_context().build());
        assert_eq!(action.resolve(None).unwrap(), EventType::Generic);
    }

    #[test]
    fn test_mismatched_event_type() {
        let err = http().resolve(Some(EventType::Generic)).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("get-order"));

        let action = generic(ActionContract::builder("sqs").event_and_context().build());
        assert!(action.resolve(Some(EventType::Http)).unwrap_err().is_configuration());
    }

    #[test]
    fn test_missing_context_input() {
        let contract = ActionContract::builder("sqs")
            .input(InputDef::new("event", json!({})))
            .build();
        let err = generic(contract).resolve(None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'context'"));
    }

    #[test]
    fn test_non_empty_example() {
        let contract = ActionContract::builder("sqs")
            .input(InputDef::new("event", json!({"Records": []})))
            .input(InputDef::new("context", json!({})))
            .build();
        let err = generic(contract).resolve(None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("empty dictionary"));
    }

    #[test]
    fn test_non_object_example() {
        let contract = ActionContract::builder("sqs")
            .input(InputDef::new("event", json!({})))
            .input(InputDef::new("context", json!("ctx")))
            .build();
        assert!(generic(contract).resolve(None).is_err());
    }

    #[test]
    fn test_extra_inputs() {
        let contract = ActionContract::builder("sqs")
            .event_and_context()
            .input(InputDef::new("limit", json!(10)))
            .build();
        let err = generic(contract).resolve(None).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_from_prebuilt_arc() {
        let action: Arc<dyn ErasedGenericAction> = Arc::new(FnGenericAction::new(
            ActionContract::builder("prebuilt").event_and_context().build(),
            |_inputs| async { Ok(json!(null)) },
        ));
        let adaptable = AdaptableAction::from(action);
        assert_eq!(adaptable.native_event_type(), EventType::Generic);
        assert_eq!(format!("{adaptable:?}"), "Generic(\"prebuilt\")");
    }
}
