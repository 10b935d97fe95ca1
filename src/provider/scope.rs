//! Child lifetime scopes and their disposal.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use super::{ResolverContext, ServiceProvider};
use crate::internal::DisposeBag;
use crate::registration::{AnyArc, Registration};
use crate::traits::{DisposeHook, LifetimeScope, Resolver, ResolverCore};
use crate::{DiError, DiResult, Key, Lifetime};

/// Per-scope instance cache.
///
/// The lock is never held while a factory runs, so a factory may resolve
/// other scoped services from the same scope. If two threads race on the same
/// key, the first stored instance wins and both callers get it.
#[derive(Default)]
pub(crate) struct ScopedCache {
    instances: Mutex<HashMap<Key, AnyArc>>,
}

impl ScopedCache {
    pub(crate) fn get_or_try_insert<F>(&self, key: &Key, create: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        if let Some(cached) = self.instances.lock().get(key) {
            return Ok(cached.clone());
        }

        let value = create()?;

        let mut guard = self.instances.lock();
        Ok(guard.entry(*key).or_insert(value).clone())
    }

    pub(crate) fn clear(&self) {
        self.instances.lock().clear();
    }
}

/// Scoped service container for request-scoped dependency resolution.
///
/// A `Scope` caches scoped services and collects the disposers of everything
/// it constructs. Singletons are delegated to the root provider and are
/// never disposed with the scope.
///
/// # Lifetime Behavior
///
/// - **Singleton**: Resolved and cached in the root provider
/// - **Scoped**: Resolved and cached within this scope
/// - **Transient**: Created fresh on every resolution, with this scope as resolver
///
/// # Examples
///
/// ```
/// use ferrous_scope::{Resolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct DatabaseConnection(String);
/// struct UserService { db: Arc<DatabaseConnection> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_scoped_factory::<DatabaseConnection, _>(|_| {
///     Ok(DatabaseConnection("connection-123".to_string()))
/// });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     Ok(UserService { db: resolver.get::<DatabaseConnection>()? })
/// });
///
/// let provider = collection.build();
/// let scope = provider.create_scope();
///
/// let user1 = scope.get::<UserService>().unwrap();
/// let user2 = scope.get::<UserService>().unwrap();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
///
/// scope.dispose().unwrap();
/// ```
pub struct Scope {
    root: ServiceProvider,
    cache: ScopedCache,
    disposers: Mutex<DisposeBag>,
    disposed: AtomicBool,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self {
            root,
            cache: ScopedCache::default(),
            disposers: Mutex::new(DisposeBag::default()),
            disposed: AtomicBool::new(false),
        }
    }

    /// Disposes this scope's disposers in LIFO order.
    ///
    /// Only the first call does any work. Every disposer runs even if an
    /// earlier one fails; the first failure is returned. After disposal the
    /// scope refuses further resolution with [`DiError::ScopeDisposed`].
    pub fn dispose(&self) -> DiResult<()> {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.root.note_scope_disposed();

        let mut bag = std::mem::take(&mut *self.disposers.lock());
        trace!(disposers = bag.len(), "disposing scope");
        let result = bag.run_all_reverse();
        self.cache.clear();
        result
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    fn construct(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        trace!(service = key.display_name(), lifetime = ?reg.lifetime, "constructing in scope");
        let ctx = ResolverContext::new(self);
        (reg.ctor)(&ctx)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let bag = self.disposers.get_mut();
        if !bag.is_empty() {
            warn!(
                disposers = bag.len(),
                "Scope dropped with undisposed resources; call dispose() before dropping"
            );
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        if self.is_disposed() {
            return Err(DiError::ScopeDisposed);
        }

        let (reg, _guard) = self.root.enter(key)?;
        match reg.lifetime {
            Lifetime::Singleton => self.root.resolve_singleton(reg, key),
            Lifetime::Scoped => self.cache.get_or_try_insert(key, || self.construct(reg, key)),
            Lifetime::Transient => self.construct(reg, key),
        }
    }

    fn push_disposer(&self, hook: DisposeHook) {
        self.disposers.lock().push(hook);
    }
}

impl LifetimeScope for Scope {
    fn resolve_required<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.get::<T>()
    }

    fn dispose(&self) -> DiResult<()> {
        Scope::dispose(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DiError, Resolver, ServiceCollection};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn scoped_cache_is_per_scope() {
        let counter = Arc::new(AtomicUsize::new(0));
        let next = counter.clone();

        let mut sc = ServiceCollection::new();
        sc.add_scoped_factory::<String, _>(move |_| {
            Ok(format!("scoped-{}", next.fetch_add(1, Ordering::SeqCst) + 1))
        });

        let sp = sc.build();
        let scope1 = sp.create_scope();
        let s1a = scope1.get::<String>().unwrap();
        let s1b = scope1.get::<String>().unwrap();
        assert!(Arc::ptr_eq(&s1a, &s1b));

        let scope2 = sp.create_scope();
        let s2 = scope2.get::<String>().unwrap();
        assert_eq!(s1a.as_str(), "scoped-1");
        assert_eq!(s2.as_str(), "scoped-2");
    }

    #[test]
    fn disposed_scope_rejects_resolution() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(7u32);
        let sp = sc.build();

        let scope = sp.create_scope();
        assert_eq!(*scope.get::<u32>().unwrap(), 7);
        scope.dispose().unwrap();
        assert!(scope.is_disposed());
        assert_eq!(scope.get::<u32>().unwrap_err(), DiError::ScopeDisposed);
    }

    #[test]
    fn empty_scope_disposes_cleanly() {
        let sp = ServiceCollection::new().build();
        let scope = sp.create_scope();
        assert!(scope.dispose().is_ok());
        assert!(scope.dispose().is_ok());
    }
}
