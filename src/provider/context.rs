//! Resolver context for dependency injection.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use std::sync::Arc;

use crate::registration::AnyArc;
use crate::traits::{Dispose, DisposeHook, Resolver, ResolverCore};
use crate::{DiResult, Key};

/// Context passed to factory functions for resolving dependencies.
///
/// Wraps whichever resolver owns the instance being built: the root
/// provider for singletons (and root-scoped services), the scope otherwise.
/// Disposers registered through the context therefore land with the owner
/// that will tear the instance down.
///
/// # Examples
///
/// ```
/// use ferrous_scope::{Resolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database>, cache: Option<Arc<String>> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     Ok(UserService {
///         db: resolver.get::<Database>()?,
///         cache: resolver.get_optional::<String>()?,
///     })
/// });
///
/// let user = services.build().get::<UserService>().unwrap();
/// assert!(user.cache.is_none());
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }

    /// Resolves a dependency of the service being built.
    pub fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        Resolver::get(self)
    }

    /// Resolves a dependency if `T` itself is registered.
    pub fn get_optional<T: 'static + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        Resolver::get_optional(self)
    }

    /// Registers `service` for disposal with the owner of the instance being built.
    pub fn register_disposer<T: Dispose>(&self, service: Arc<T>) {
        Resolver::register_disposer(self, service)
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        self.resolver.resolve_any(key)
    }

    fn push_disposer(&self, hook: DisposeHook) {
        self.resolver.push_disposer(hook);
    }
}
