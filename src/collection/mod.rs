//! Service collection module for dependency injection.
//!
//! This module contains the ServiceCollection type used to register services
//! and build the root [`ServiceProvider`].

use std::sync::Arc;

use crate::config::ProviderOptions;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Registration, Registry};
use crate::traits::Dispose;
use crate::{DiResult, Key, Lifetime, ServiceProvider};

/// Registration list for the reference container.
///
/// Registering the same type twice replaces the earlier registration.
///
/// # Examples
///
/// ```rust
/// use ferrous_scope::{ScopedResolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Config { database_url: String }
/// struct Repository { config: Arc<Config> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { database_url: "postgres://localhost".to_string() });
/// services.add_scoped_factory::<Repository, _>(|r| {
///     Ok(Repository { config: r.get::<Config>()? })
/// });
///
/// let resolver = ScopedResolver::new(services.build());
/// let repo = resolver.resolve::<Repository>().unwrap();
/// assert_eq!(repo.config.database_url, "postgres://localhost");
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    registry: Registry,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Concrete Type Registrations -----

    /// Registers a singleton instance shared across the entire application.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry
            .insert(Key::of::<T>(), Registration::new(Lifetime::Singleton, Arc::new(ctor)));
        self
    }

    /// Registers a singleton factory that creates the instance on first request.
    ///
    /// The factory runs against the root provider, so its dependencies are
    /// singletons or root-scoped services.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory that creates one instance per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory that creates a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    /// Registers a factory with an explicit lifetime.
    pub fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r)?)) };
        self.registry
            .insert(Key::of::<T>(), Registration::new(lifetime, Arc::new(ctor)));
        self
    }

    // ----- Disposable Registrations -----

    /// Registers a singleton whose disposer runs when the root provider is disposed.
    pub fn add_singleton_disposable<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Dispose,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_disposable(Lifetime::Singleton, factory)
    }

    /// Registers a scoped service whose disposer runs when its scope is disposed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_scope::{DiResult, Dispose, ScopedResolver, ServiceCollection};
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// struct UnitOfWork(Arc<AtomicUsize>);
    ///
    /// impl Dispose for UnitOfWork {
    ///     fn dispose(&self) -> DiResult<()> {
    ///         self.0.fetch_add(1, Ordering::SeqCst);
    ///         Ok(())
    ///     }
    /// }
    ///
    /// let commits = Arc::new(AtomicUsize::new(0));
    /// let counter = commits.clone();
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_scoped_disposable::<UnitOfWork, _>(move |_| Ok(UnitOfWork(counter.clone())));
    ///
    /// let resolver = ScopedResolver::new(services.build());
    /// {
    ///     let _uow = resolver.resolve::<UnitOfWork>().unwrap();
    /// } // released on drop
    /// assert_eq!(commits.load(Ordering::SeqCst), 1);
    /// ```
    pub fn add_scoped_disposable<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Dispose,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_disposable(Lifetime::Scoped, factory)
    }

    /// Registers a transient service whose disposer runs with the resolving scope.
    ///
    /// Resolve these through a scope. Resolved straight from the root
    /// provider, each instance's disposer is held until the provider is
    /// disposed; with [`ProviderOptions::validate_scopes`] the root refuses
    /// them with [`DiError::WrongLifetime`](crate::DiError::WrongLifetime).
    pub fn add_transient_disposable<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Dispose,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_disposable(Lifetime::Transient, factory)
    }

    fn add_disposable<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Dispose,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let service = Arc::new(factory(r)?);
            // The context belongs to the instance's owner, so the disposer
            // runs when that owner is torn down.
            r.register_disposer(service.clone());
            Ok(service as AnyArc)
        };
        self.registry.insert(
            Key::of::<T>(),
            Registration::new(lifetime, Arc::new(ctor)).with_disposal(),
        );
        self
    }

    // ----- Queries -----

    /// Whether `T` has been registered.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains_key(&Key::of::<T>())
    }

    /// Number of registered service types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    // ----- Build -----

    /// Builds the root provider with default options.
    pub fn build(self) -> ServiceProvider {
        self.build_with_options(ProviderOptions::default())
    }

    /// Builds the root provider with the given options.
    pub fn build_with_options(self, options: ProviderOptions) -> ServiceProvider {
        ServiceProvider::new(self.registry, options)
    }
}
