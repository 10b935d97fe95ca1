//! # ferrous-scope
//!
//! Scope-bound service resolution on top of a lifetime-aware DI container.
//!
//! A [`ScopedResolver`] opens a fresh child lifetime scope for every request,
//! resolves the service inside it, and hands back a [`ScopeBoundHandle`] that
//! owns the scope. Releasing the handle tears the scope down exactly once,
//! cascading disposal to everything the scope constructed, and releasing it
//! again is a harmless no-op.
//!
//! ## Features
//!
//! - **One scope per resolution**: scoped and transient services never leak between handles
//! - **Idempotent release**: atomic claim, so redundant cleanup paths are safe
//! - **RAII**: dropping a handle releases it
//! - **Leak-free failures**: a failed resolution disposes its scope before returning
//! - **Pluggable container**: anything implementing [`ScopeFactory`] / [`LifetimeScope`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_scope::{ScopedResolver, ServiceCollection};
//! use std::sync::Arc;
//!
//! struct Settings { name: &'static str }
//! struct Request { settings: Arc<Settings> }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Settings { name: "app" });
//! services.add_scoped_factory::<Request, _>(|r| {
//!     Ok(Request { settings: r.get::<Settings>()? })
//! });
//!
//! let resolver = ScopedResolver::new(services.build());
//!
//! let request = resolver.resolve::<Request>().unwrap();
//! assert_eq!(request.settings.name, "app");
//! request.release().unwrap();
//!
//! // Every scope opened by the resolver has been torn down.
//! assert_eq!(resolver.container().scope_stats().open(), 0);
//! ```
//!
//! ## Failure handling
//!
//! ```rust
//! use ferrous_scope::{DiError, ScopedResolver, ServiceCollection};
//!
//! struct Unregistered;
//!
//! let resolver = ScopedResolver::new(ServiceCollection::new().build());
//! assert!(matches!(resolver.resolve::<Unregistered>(), Err(DiError::NotFound(_))));
//! assert_eq!(resolver.container().scope_stats().open(), 0);
//! ```

// Module declarations
pub mod collection;
pub mod config;
pub mod error;
pub mod handle;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod resolver;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::ServiceCollection;
pub use config::{ProviderOptions, ResolverOptions};
pub use error::{DiError, DiResult};
pub use handle::ScopeBoundHandle;
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::{ResolverContext, Scope, ScopeStats, ServiceProvider};
pub use resolver::ScopedResolver;
pub use traits::{Dispose, DisposeHook, LifetimeScope, Resolver, ResolverCore, ScopeFactory};
