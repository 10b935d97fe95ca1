//! Core traits for scoped resolution.

mod container;
mod dispose;
mod resolver;

pub use container::{LifetimeScope, ScopeFactory};
pub use dispose::Dispose;
pub use resolver::{DisposeHook, Resolver, ResolverCore};
