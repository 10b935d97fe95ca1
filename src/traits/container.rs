//! Capability traits a container must offer to back a [`ScopedResolver`](crate::ScopedResolver).

use std::sync::Arc;

use crate::error::DiResult;

/// A container that can open child lifetime scopes.
///
/// This is the only thing [`ScopedResolver`](crate::ScopedResolver) needs
/// from its root. [`ServiceProvider`](crate::ServiceProvider) implements it,
/// and so can any test double.
///
/// # Examples
///
/// A minimal in-memory container that only knows one type:
///
/// ```
/// use ferrous_scope::{DiError, DiResult, LifetimeScope, ScopeFactory, ScopedResolver};
/// use std::any::Any;
/// use std::sync::Arc;
///
/// struct Greeting(&'static str);
///
/// struct FakeScope;
///
/// impl LifetimeScope for FakeScope {
///     fn resolve_required<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
///         let any: Arc<dyn Any + Send + Sync> = Arc::new(Greeting("hello"));
///         any.downcast::<T>()
///             .map_err(|_| DiError::NotFound(std::any::type_name::<T>()))
///     }
///
///     fn dispose(&self) -> DiResult<()> {
///         Ok(())
///     }
/// }
///
/// struct FakeContainer;
///
/// impl ScopeFactory for FakeContainer {
///     type Scope = FakeScope;
///
///     fn create_scope(&self) -> FakeScope {
///         FakeScope
///     }
/// }
///
/// let resolver = ScopedResolver::new(FakeContainer);
/// assert_eq!(resolver.resolve::<Greeting>().unwrap().0, "hello");
/// assert!(resolver.resolve::<u32>().is_err());
/// ```
pub trait ScopeFactory: Send + Sync {
    /// The scope type produced by [`create_scope`](Self::create_scope).
    type Scope: LifetimeScope;

    /// Opens an isolated resolution boundary.
    ///
    /// Must be cheap and free of side effects beyond scope bookkeeping.
    fn create_scope(&self) -> Self::Scope;
}

/// A resolution boundary whose teardown cascades to what was resolved in it.
pub trait LifetimeScope: Send + Sync {
    /// Resolves `T` within this scope, honoring its registered lifetime.
    ///
    /// Fails when `T` or one of its dependencies cannot be resolved.
    fn resolve_required<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>>;

    /// Tears the scope down.
    ///
    /// Must succeed on a scope nothing was resolved from, and a second call
    /// must not dispose anything twice.
    fn dispose(&self) -> DiResult<()>;
}

impl<C: ScopeFactory + ?Sized> ScopeFactory for Arc<C> {
    type Scope = C::Scope;

    fn create_scope(&self) -> Self::Scope {
        (**self).create_scope()
    }
}
