//! Scope-per-resolution service resolver.

use tracing::{debug, warn};

use crate::config::ResolverOptions;
use crate::error::{DiError, DiResult};
use crate::handle::ScopeBoundHandle;
use crate::traits::{LifetimeScope, ScopeFactory};

/// Resolves services into [`ScopeBoundHandle`]s, one fresh child scope per call.
///
/// The resolver holds its root container for its whole life and keeps no
/// other state. Every [`resolve`](Self::resolve) call opens a new scope, even
/// when the requested type ends up being a root singleton; the handle then
/// owns that scope and tears it down on release.
///
/// Concurrent calls are independent: each gets its own scope, and singleton
/// caching is left to the container.
///
/// # Examples
///
/// ```
/// use ferrous_scope::{ScopedResolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Clock;
/// struct Session { clock: Arc<Clock> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Clock);
/// services.add_scoped_factory::<Session, _>(|r| Ok(Session { clock: r.get::<Clock>()? }));
///
/// let resolver = ScopedResolver::new(services.build());
/// let first = resolver.resolve::<Session>().unwrap();
/// let second = resolver.resolve::<Session>().unwrap();
///
/// assert!(!Arc::ptr_eq(first.service(), second.service()));
/// assert!(Arc::ptr_eq(&first.clock, &second.clock));
/// ```
pub struct ScopedResolver<C: ScopeFactory> {
    container: C,
    options: ResolverOptions,
}

impl<C: ScopeFactory> ScopedResolver<C> {
    /// Creates a resolver over `container` with default options.
    pub fn new(container: C) -> Self {
        Self::with_options(container, ResolverOptions::default())
    }

    /// Creates a resolver over `container` with explicit options.
    pub fn with_options(container: C, options: ResolverOptions) -> Self {
        Self { container, options }
    }

    /// The root container.
    pub fn container(&self) -> &C {
        &self.container
    }

    /// Options applied to issued handles.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolves `T` inside a new child scope and binds the two together.
    ///
    /// # Errors
    ///
    /// Returns the container's resolution error (typically
    /// [`DiError::NotFound`]) when `T` or one of its dependencies cannot be
    /// resolved. The scope opened for the attempt is disposed before the
    /// error is returned.
    pub fn resolve<T>(&self) -> DiResult<ScopeBoundHandle<T, C::Scope>>
    where
        T: Send + Sync + 'static,
    {
        let service = std::any::type_name::<T>();
        let scope = self.container.create_scope();
        debug!(service, "child scope created for resolution");

        match scope.resolve_required::<T>() {
            Ok(instance) => Ok(ScopeBoundHandle::new(instance, scope)
                .with_release_on_drop(self.options.release_on_drop)),
            Err(e) => {
                debug!(service, error = %e, "resolution failed; disposing child scope");
                if let Err(teardown) = scope.dispose() {
                    warn!(service, error = %teardown, "child scope teardown failed after resolution error");
                }
                Err(e)
            }
        }
    }

    /// Resolves `T`, runs `f` with it, then releases the handle.
    ///
    /// The handle is released on every path. An error from `f` takes
    /// precedence; a release error is only returned when `f` succeeded.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_scope::{DiError, ScopedResolver, ServiceCollection};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_factory::<Vec<u8>, _>(|_| Ok(vec![1, 2, 3]));
    ///
    /// let resolver = ScopedResolver::new(services.build());
    /// let total = resolver.with_service(|bytes: &Vec<u8>| {
    ///     Ok::<u32, DiError>(bytes.iter().map(|b| *b as u32).sum())
    /// })?;
    /// assert_eq!(total, 6);
    /// assert_eq!(resolver.container().scope_stats().open(), 0);
    /// # Ok::<(), DiError>(())
    /// ```
    pub fn with_service<T, R, E, F>(&self, f: F) -> Result<R, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) -> Result<R, E>,
        E: From<DiError>,
    {
        let handle = self.resolve::<T>()?;
        let result = f(handle.service().as_ref());
        let released = handle.release();

        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(teardown)) => {
                warn!(
                    service = std::any::type_name::<T>(),
                    error = %teardown,
                    "release failed after service callback error"
                );
                Err(e)
            }
        }
    }
}

impl<C: ScopeFactory + Clone> Clone for ScopedResolver<C> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            options: self.options.clone(),
        }
    }
}
