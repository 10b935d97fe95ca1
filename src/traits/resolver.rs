//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::traits::Dispose;

/// Boxed disposal hook, run once when its owner is torn down.
pub type DisposeHook = Box<dyn FnOnce() -> DiResult<()> + Send>;

/// Core resolver trait for object-safe service resolution.
///
/// Factories receive a [`ResolverContext`](crate::ResolverContext) that wraps
/// one of these, so the same factory works whether it runs against the root
/// provider or a child scope.
///
/// Most users should use the [`Resolver`] trait instead, which provides the
/// generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved service wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (not found, wrong lifetime, circular, etc.)
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn Any + Send + Sync>>;

    /// Registers a disposal hook with whoever owns this resolver's lifetime.
    fn push_disposer(&self, hook: DisposeHook);
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Implemented by [`ServiceProvider`](crate::ServiceProvider),
/// [`Scope`](crate::Scope) and [`ResolverContext`](crate::ResolverContext).
///
/// # Examples
///
/// ```
/// use ferrous_scope::{Resolver, ServiceCollection};
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(42usize);
///
/// let provider = collection.build();
/// assert_eq!(*provider.get::<usize>().unwrap(), 42);
/// assert!(provider.get_optional::<String>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    ///
    /// Fails with [`DiError::NotFound`] when `T`, or anything its factory
    /// asks for, is not registered.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::of::<T>();
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves `T` if it is registered.
    ///
    /// Only a missing registration for `T` itself maps to `None`; a missing
    /// dependency further down is still an error.
    fn get_optional<T: 'static + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        match self.get::<T>() {
            Ok(service) => Ok(Some(service)),
            Err(DiError::NotFound(name)) if name == std::any::type_name::<T>() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Registers a service for disposal when this resolver's owner is torn down.
    fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        self.push_disposer(Box::new(move || service.dispose()));
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
