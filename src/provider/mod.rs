//! Service provider module for dependency injection.
//!
//! This module contains the root [`ServiceProvider`], the child [`Scope`]
//! and the [`ResolverContext`] handed to factories.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::config::ProviderOptions;
use crate::internal::{DisposeBag, ResolutionGuard};
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::{DisposeHook, ResolverCore, ScopeFactory};
use crate::{DiError, DiResult, Key, Lifetime};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;
use scope::ScopedCache;

/// Root service provider of the reference container.
///
/// Singletons are cached here and shared with every scope. Scoped
/// registrations resolved directly from the root live in a root-level cache
/// unless [`ProviderOptions::validate_scopes`] is set, in which case they are
/// rejected with [`DiError::WrongLifetime`].
///
/// The provider is cheap to clone (it uses `Arc` internally) and safe to
/// share between threads.
///
/// # Examples
///
/// ```
/// use ferrous_scope::{Resolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut collection = ServiceCollection::new();
/// collection.add_singleton(Database { url: "postgres://localhost".to_string() });
/// collection.add_transient_factory::<UserService, _>(|resolver| {
///     Ok(UserService { db: resolver.get::<Database>()? })
/// });
///
/// let provider = collection.build();
/// let user_service = provider.get::<UserService>().unwrap();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    registry: Registry,
    options: ProviderOptions,
    root_scoped: ScopedCache,
    root_disposers: Mutex<DisposeBag>,
    scopes_created: AtomicUsize,
    scopes_disposed: AtomicUsize,
}

/// Counts of child scopes created from and disposed against a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScopeStats {
    /// Scopes handed out by `create_scope`.
    pub created: usize,
    /// Scopes whose `dispose` has run.
    pub disposed: usize,
}

impl ScopeStats {
    /// Scopes created but not yet disposed.
    pub fn open(&self) -> usize {
        self.created.saturating_sub(self.disposed)
    }
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, options: ProviderOptions) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                options,
                root_scoped: ScopedCache::default(),
                root_disposers: Mutex::new(DisposeBag::default()),
                scopes_created: AtomicUsize::new(0),
                scopes_disposed: AtomicUsize::new(0),
            }),
        }
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// Each scope keeps its own cache of scoped services and its own
    /// disposers, while singletons still come from this provider.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_scope::{Resolver, ServiceCollection};
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct RequestId(usize);
    ///
    /// let counter = Arc::new(AtomicUsize::new(0));
    /// let next = counter.clone();
    ///
    /// let mut collection = ServiceCollection::new();
    /// collection.add_scoped_factory::<RequestId, _>(move |_| {
    ///     Ok(RequestId(next.fetch_add(1, Ordering::SeqCst)))
    /// });
    ///
    /// let provider = collection.build();
    /// let scope1 = provider.create_scope();
    /// let scope2 = provider.create_scope();
    ///
    /// let req1a = scope1.get::<RequestId>().unwrap();
    /// let req1b = scope1.get::<RequestId>().unwrap();
    /// let req2 = scope2.get::<RequestId>().unwrap();
    ///
    /// assert!(Arc::ptr_eq(&req1a, &req1b));
    /// assert!(!Arc::ptr_eq(&req1a, &req2));
    /// ```
    pub fn create_scope(&self) -> Scope {
        self.inner.scopes_created.fetch_add(1, Ordering::AcqRel);
        Scope::new(self.clone())
    }

    /// Disposes root-owned disposers (singletons and root-scoped services) in LIFO order.
    ///
    /// Every disposer runs; the first failure is returned.
    pub fn dispose(&self) -> DiResult<()> {
        let mut bag = std::mem::take(&mut *self.inner.root_disposers.lock());
        trace!(disposers = bag.len(), "disposing root provider");
        bag.run_all_reverse()
    }

    /// Snapshot of scope bookkeeping, useful for leak checks.
    pub fn scope_stats(&self) -> ScopeStats {
        ScopeStats {
            created: self.inner.scopes_created.load(Ordering::Acquire),
            disposed: self.inner.scopes_disposed.load(Ordering::Acquire),
        }
    }

    /// Options this provider was built with.
    pub fn options(&self) -> &ProviderOptions {
        &self.inner.options
    }

    /// Whether `T` has a registration.
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.inner.registry.contains_key(&Key::of::<T>())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut lines: Vec<String> = self
            .inner
            .registry
            .iter()
            .map(|(k, r)| format!("  {}: {:?}", k.display_name(), r.lifetime))
            .collect();
        lines.sort();

        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        for line in lines {
            s.push_str(&line);
            s.push('\n');
        }
        let stats = self.scope_stats();
        s.push_str(&format!(
            "Scopes: {} created, {} disposed, {} open\n",
            stats.created,
            stats.disposed,
            stats.open()
        ));
        s
    }

    pub(crate) fn note_scope_disposed(&self) {
        self.inner.scopes_disposed.fetch_add(1, Ordering::AcqRel);
    }

    /// Looks up a registration and guards against re-entrant construction.
    pub(crate) fn enter(&self, key: &Key) -> DiResult<(&Registration, ResolutionGuard)> {
        let reg = self
            .inner
            .registry
            .get(key)
            .ok_or(DiError::NotFound(key.display_name()))?;
        let guard = ResolutionGuard::enter(key.display_name(), self.inner.options.max_depth)?;
        Ok((reg, guard))
    }

    /// Resolves a singleton, building it with the root as its resolver.
    pub(crate) fn resolve_singleton(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        let Some(cell) = &reg.singleton else {
            return self.construct(reg, key);
        };

        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        cell.get_or_try_init(|| {
            trace!(service = key.display_name(), "constructing singleton");
            self.construct(reg, key)
        })
        .cloned()
    }

    fn construct(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        trace!(service = key.display_name(), lifetime = ?reg.lifetime, "constructing at root");
        let ctx = ResolverContext::new(self);
        (reg.ctor)(&ctx)
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ServiceProvider {
    fn drop(&mut self) {
        // Only the last reference can still hold undisposed root resources.
        if Arc::strong_count(&self.inner) == 1 {
            if let Some(bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    warn!(
                        disposers = bag.len(),
                        "ServiceProvider dropped with undisposed resources; call dispose() before dropping"
                    );
                }
            }
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let (reg, _guard) = self.enter(key)?;
        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg, key),
            Lifetime::Scoped => {
                if self.inner.options.validate_scopes {
                    return Err(DiError::WrongLifetime(
                        "Cannot resolve scoped service from root provider",
                    ));
                }
                self.inner
                    .root_scoped
                    .get_or_try_insert(key, || self.construct(reg, key))
            }
            Lifetime::Transient => {
                // Root disposers only drain on dispose(), so each root-built
                // disposable transient would be held until then.
                if reg.disposable && self.inner.options.validate_scopes {
                    return Err(DiError::WrongLifetime(
                        "Cannot resolve disposable transient service from root provider",
                    ));
                }
                self.construct(reg, key)
            }
        }
    }

    fn push_disposer(&self, hook: DisposeHook) {
        self.inner.root_disposers.lock().push(hook);
    }
}

impl ScopeFactory for ServiceProvider {
    type Scope = Scope;

    fn create_scope(&self) -> Scope {
        ServiceProvider::create_scope(self)
    }
}
