//! Request/response actions.

use crate::request::RequestView;
use crate::response::{Responder, ResponseResult};
use futures_util::future::BoxFuture;
use hermes_core::ActionContract;
use std::fmt;
use std::future::Future;

/// An action adapted to HTTP-shaped events.
///
/// The action reads from the [`RequestView`] and finishes by calling one
/// terminal operation on the [`Responder`]. Declared failure paths go
/// through [`Responder::server_error`] and friends; an `Err` return is an
/// adapter-level failure and becomes a 500 failure result.
///
/// # Example
///
/// ```
/// use hermes_core::ActionContract;
/// use hermes_extract::{HttpAction, RequestView, Responder, ResponseResult};
/// use serde_json::json;
///
/// struct GetOrder {
///     contract: ActionContract,
/// }
///
/// impl HttpAction for GetOrder {
///     fn contract(&self) -> &ActionContract {
///         &self.contract
///     }
///
///     async fn handle(&self, req: RequestView, res: Responder) -> ResponseResult {
///         match req.param_str("id") {
///             Some(id) => res.json(&json!({ "id": id })),
///             None => Ok(res.not_found()),
///         }
///     }
/// }
/// ```
pub trait HttpAction: Send + Sync + 'static {
    /// Returns the declared input contract.
    fn contract(&self) -> &ActionContract;

    /// Handles one request.
    fn handle(
        &self,
        req: RequestView,
        res: Responder,
    ) -> impl Future<Output = ResponseResult> + Send;
}

/// Object-safe form of [`HttpAction`].
pub trait ErasedHttpAction: Send + Sync + 'static {
    /// Returns the declared input contract.
    fn contract(&self) -> &ActionContract;

    /// Handles one request, boxing the future.
    fn handle_boxed(&self, req: RequestView, res: Responder) -> BoxFuture<'_, ResponseResult>;
}

impl<A: HttpAction> ErasedHttpAction for A {
    fn contract(&self) -> &ActionContract {
        HttpAction::contract(self)
    }

    fn handle_boxed(&self, req: RequestView, res: Responder) -> BoxFuture<'_, ResponseResult> {
        Box::pin(self.handle(req, res))
    }
}

/// A closure-based HTTP action.
///
/// # Example
///
/// ```
/// use hermes_core::ActionContract;
/// use hermes_extract::FnHttpAction;
/// use serde_json::json;
///
/// let health = FnHttpAction::new(
///     ActionContract::builder("health").build(),
///     |_req, res| async move { res.json(&json!({"ok": true})) },
/// );
/// ```
pub struct FnHttpAction<F> {
    contract: ActionContract,
    func: F,
}

impl<F, Fut> FnHttpAction<F>
where
    F: Fn(RequestView, Responder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    /// Creates an HTTP action from a contract and a closure.
    #[must_use]
    pub const fn new(contract: ActionContract, func: F) -> Self {
        Self { contract, func }
    }
}

impl<F> fmt::Debug for FnHttpAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHttpAction")
            .field("contract", &self.contract.name())
            .finish_non_exhaustive()
    }
}

impl<F, Fut> HttpAction for FnHttpAction<F>
where
    F: Fn(RequestView, Responder) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ResponseResult> + Send + 'static,
{
    fn contract(&self) -> &ActionContract {
        &self.contract
    }

    fn handle(
        &self,
        req: RequestView,
        res: Responder,
    ) -> impl Future<Output = ResponseResult> + Send {
        (self.func)(req, res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::{InboundEvent, InvocationContext};
    use serde_json::json;
    use std::sync::Arc;

    fn request(event: serde_json::Value) -> RequestView {
        RequestView::new(InboundEvent::new(event), InvocationContext::new("r-1"))
    }

    #[tokio::test]
    async fn test_fn_action_reads_params() {
        let action = FnHttpAction::new(
            ActionContract::builder("greet").build(),
            |req: RequestView, res: Responder| async move {
                let name = req.param_str("name").unwrap_or("world").to_string();
                Ok(res.send(format!("hello {name}")))
            },
        );

        let sent = action
            .handle(request(json!({"pathParameters": {"name": "ada"}})), Responder::new(false))
            .await
            .unwrap();
        assert_eq!(sent.body(), &json!("hello ada"));
    }

    #[tokio::test]
    async fn test_erased_action() {
        let action: Arc<dyn ErasedHttpAction> = Arc::new(FnHttpAction::new(
            ActionContract::builder("missing").build(),
            |_req: RequestView, res: Responder| async move { Ok(res.not_found()) },
        ));

        assert_eq!(action.contract().name(), "missing");
        let sent = action
            .handle_boxed(request(json!({})), Responder::new(false))
            .await
            .unwrap();
        assert_eq!(sent.status_code(), 404);
    }
}
