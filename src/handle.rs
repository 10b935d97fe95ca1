//! Owned pairing of a resolved service and the lifetime scope that produced it.

use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::DiResult;
use crate::traits::LifetimeScope;

/// A resolved service bound to the lifetime scope it was resolved from.
///
/// The handle exclusively owns the scope. [`release`](Self::release) tears
/// that scope down at most once; any later call is a no-op returning
/// `Ok(())`, so cleanup can be triggered from several exit paths without
/// double disposal. Dropping an unreleased handle releases it as well,
/// unless the handle was built with `release_on_drop` turned off.
///
/// The service stays readable after release. The handle does not invalidate
/// it; callers are expected to stop using it once the scope is gone.
///
/// # Examples
///
/// ```
/// use ferrous_scope::{ScopedResolver, ServiceCollection};
///
/// struct RequestContext { id: u32 }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<RequestContext, _>(|_| Ok(RequestContext { id: 7 }));
///
/// let resolver = ScopedResolver::new(services.build());
/// let handle = resolver.resolve::<RequestContext>().unwrap();
/// assert_eq!(handle.id, 7);
///
/// handle.release().unwrap();
/// handle.release().unwrap(); // no-op
/// assert!(handle.is_released());
/// ```
pub struct ScopeBoundHandle<T, S: LifetimeScope> {
    service: Arc<T>,
    scope: S,
    released: AtomicBool,
    release_on_drop: bool,
}

impl<T, S: LifetimeScope> ScopeBoundHandle<T, S> {
    /// Binds `service` to `scope`. Never fails and has no side effects.
    pub fn new(service: Arc<T>, scope: S) -> Self {
        Self {
            service,
            scope,
            released: AtomicBool::new(false),
            release_on_drop: true,
        }
    }

    /// Sets whether dropping an unreleased handle releases it.
    pub fn with_release_on_drop(mut self, release_on_drop: bool) -> Self {
        self.release_on_drop = release_on_drop;
        self
    }

    /// The resolved instance.
    ///
    /// Does not check whether the handle was released.
    pub fn service(&self) -> &Arc<T> {
        &self.service
    }

    /// Tears down the owned scope, once.
    ///
    /// The first caller claims the release atomically and disposes the
    /// scope, propagating any teardown failure. Every later call returns
    /// `Ok(())` without touching the scope, including after a failed
    /// teardown: the scope is never disposed twice.
    pub fn release(&self) -> DiResult<()> {
        if self.released.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!(service = std::any::type_name::<T>(), "releasing scope-bound handle");
        self.scope.dispose()
    }

    /// Whether [`release`](Self::release) has been claimed.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl<T, S: LifetimeScope> Deref for ScopeBoundHandle<T, S> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.service
    }
}

impl<T, S: LifetimeScope> Drop for ScopeBoundHandle<T, S> {
    fn drop(&mut self) {
        if self.is_released() {
            return;
        }
        let service = std::any::type_name::<T>();
        if !self.release_on_drop {
            warn!(service, "scope-bound handle dropped without release; scope left open");
            return;
        }
        if let Err(e) = self.release() {
            warn!(service, error = %e, "scope teardown failed while dropping handle");
        }
    }
}

impl<T, S: LifetimeScope> fmt::Debug for ScopeBoundHandle<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeBoundHandle")
            .field("service", &std::any::type_name::<T>())
            .field("released", &self.is_released())
            .field("release_on_drop", &self.release_on_drop)
            .finish()
    }
}
