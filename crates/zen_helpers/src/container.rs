//! Service lookup with optional type validation.
//!
//! Services are stored type-erased behind [`Service`]. [`resolve`] fetches one
//! by identifier and, when expected types are given, checks that its concrete
//! type is one of them.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ResolveError, ResolveResult};

/// A shared, type-erased service instance.
#[derive(Clone)]
pub struct Service {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Service {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the concrete type this service was created from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn matches(&self, expected: &ExpectedType) -> bool {
        self.type_id == expected.type_id
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.clone().downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// A type a resolved service is allowed to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedType {
    type_id: TypeId,
    name: &'static str,
}

impl ExpectedType {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A source of services addressed by string identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait Container {
    /// Whether an entry exists for `id`.
    fn has(&self, id: &str) -> bool;

    /// Fetch the entry for `id`.
    fn get(&self, id: &str) -> Option<Service>;
}

/// In-memory container mapping identifiers to services.
///
/// Registering under an existing identifier replaces the previous service.
#[derive(Default, Clone)]
pub struct ServiceContainer {
    services: HashMap<String, Service>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a value under `id`.
    pub fn register<T: Any + Send + Sync>(&mut self, id: impl Into<String>, value: T) {
        self.register_service(id, Service::new(value));
    }

    /// Register an already shared value under `id`.
    pub fn register_arc<T: Any + Send + Sync>(&mut self, id: impl Into<String>, value: Arc<T>) {
        self.register_service(id, Service::from_arc(value));
    }

    pub fn register_service(&mut self, id: impl Into<String>, service: Service) {
        let id = id.into();
        debug!("Registering service {} as {}", id, service.type_name());
        self.services.insert(id, service);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    /// All registered identifiers.
    pub fn names(&self) -> Vec<&str> {
        self.services.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn unregister(&mut self, id: &str) -> Option<Service> {
        debug!("Unregistering service {}", id);
        self.services.remove(id)
    }

    pub fn clear(&mut self) {
        self.services.clear();
    }
}

impl Container for ServiceContainer {
    fn has(&self, id: &str) -> bool {
        self.contains(id)
    }

    fn get(&self, id: &str) -> Option<Service> {
        self.services.get(id).cloned()
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolve the service registered under `id`.
///
/// With an empty `expected` list any type is accepted; otherwise the service
/// must match at least one of the listed types.
pub fn resolve(
    container: &dyn Container,
    id: &str,
    expected: &[ExpectedType],
) -> ResolveResult<Service> {
    if !container.has(id) {
        return Err(ResolveError::NotFound(id.to_string()));
    }
    let service = container
        .get(id)
        .ok_or_else(|| ResolveError::NotFound(id.to_string()))?;

    if expected.is_empty() || expected.iter().any(|e| service.matches(e)) {
        return Ok(service);
    }

    Err(ResolveError::InvalidType {
        id: id.to_string(),
        expected: expected.iter().map(ExpectedType::name).collect(),
        actual: service.type_name(),
    })
}

/// Resolve the service registered under `id` as a `T`.
pub fn resolve_as<T: Any + Send + Sync>(
    container: &dyn Container,
    id: &str,
) -> ResolveResult<Arc<T>> {
    let service = resolve(container, id, &[ExpectedType::of::<T>()])?;
    service.downcast::<T>().ok_or_else(|| ResolveError::InvalidType {
        id: id.to_string(),
        expected: vec![type_name::<T>()],
        actual: service.type_name(),
    })
}
