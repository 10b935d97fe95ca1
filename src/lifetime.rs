//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// The lifetime decides what a [`ScopedResolver`](crate::ScopedResolver)
/// hands back on repeated calls: every call gets its own child scope, so only
/// singletons are shared between handles.
///
/// # Examples
///
/// ```rust
/// use ferrous_scope::{ScopedResolver, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db_url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_scoped_factory::<Repository, _>(|r| {
///     let db = r.get::<Database>()?;
///     Ok(Repository { db_url: db.url.clone() })
/// });
///
/// let resolver = ScopedResolver::new(services.build());
///
/// // Singleton: same instance in every handle
/// let db1 = resolver.resolve::<Database>().unwrap();
/// let db2 = resolver.resolve::<Database>().unwrap();
/// assert!(Arc::ptr_eq(db1.service(), db2.service()));
///
/// // Scoped: each handle owns its own scope, so instances differ
/// let repo1 = resolver.resolve::<Repository>().unwrap();
/// let repo2 = resolver.resolve::<Repository>().unwrap();
/// assert!(!Arc::ptr_eq(repo1.service(), repo2.service()));
/// assert_eq!(repo1.db_url, "postgres://localhost");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever
    ///
    /// Built on first request with the root provider as its resolver, so its
    /// own dependencies never come from a short-lived child scope.
    Singleton,
    /// Single instance per scope, cached for scope lifetime
    ///
    /// Disposables registered with this lifetime are torn down when the
    /// owning scope is disposed.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}
