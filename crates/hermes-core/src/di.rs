//! Per-invocation service container.
//!
//! Bootstrap hooks register the resources an invocation needs (connections,
//! clients, caches of request-scoped data); the action resolves them by type
//! and teardown hooks release them. A fresh container is created for every
//! invocation and dropped when it completes, so nothing leaks from one
//! invocation into the next.
//!
//! # Example
//!
//! ```
//! use hermes_core::di::ServiceContainer;
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let mut services = ServiceContainer::new();
//! services.register(Arc::new(Database { url: "postgres://localhost/app".into() }));
//!
//! let db: Arc<Database> = services.resolve().unwrap();
//! assert!(db.url.starts_with("postgres"));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A service could not be resolved.
#[derive(Debug, Clone, Error)]
#[error("Failed to resolve {type_name}: service not registered")]
pub struct InjectionError {
    /// The type name that could not be resolved.
    pub type_name: &'static str,
}

impl InjectionError {
    /// Creates an error for a missing service of type `T`.
    #[must_use]
    pub fn not_registered<T>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Type-keyed store of `Arc`-wrapped services.
///
/// Cloning is cheap: the clone shares the registered `Arc`s, but later
/// registrations on one copy are not seen by the other.
#[derive(Default, Clone)]
pub struct ServiceContainer {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl ServiceContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any earlier service of the same type.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Removes a service and returns it.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<Arc<T>> {
        self.services
            .remove(&TypeId::of::<T>())
            .and_then(|s| s.downcast::<T>().ok())
    }

    /// Resolves a service by type.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Resolves a service or returns an error naming the missing type.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve().ok_or_else(InjectionError::not_registered::<T>)
    }

    /// Checks if a service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("service_count", &self.services.len())
            .finish()
    }
}
