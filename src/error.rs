//! Error types for scoped resolution and the reference container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the failures that can surface while resolving a service inside
/// a lifetime scope or while tearing that scope down again.
///
/// # Examples
///
/// ```rust
/// use ferrous_scope::{DiError, ScopedResolver, ServiceCollection};
///
/// let resolver = ScopedResolver::new(ServiceCollection::new().build());
/// match resolver.resolve::<String>() {
///     Err(DiError::NotFound(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_scope::DiError;
///
/// let circular = DiError::Circular(vec!["ServiceA", "ServiceB", "ServiceA"]);
/// assert_eq!(circular.to_string(), "Circular dependency: ServiceA -> ServiceB -> ServiceA");
///
/// let teardown = DiError::disposal::<String>("flush failed");
/// assert!(teardown.is_disposal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Service (or one of its dependencies) not registered
    NotFound(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    Circular(Vec<&'static str>),
    /// Invalid lifetime resolution (scoped from root with validation on)
    WrongLifetime(&'static str),
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
    /// A disposer failed while its scope was torn down
    Disposal {
        /// Type name of the service whose disposer failed
        service: &'static str,
        /// Failure reported by the disposer
        message: String,
    },
    /// Resolution attempted on a scope that was already torn down
    ScopeDisposed,
}

impl DiError {
    /// Builds a [`DiError::Disposal`] for service type `T`.
    pub fn disposal<T: ?Sized>(message: impl Into<String>) -> Self {
        DiError::Disposal {
            service: std::any::type_name::<T>(),
            message: message.into(),
        }
    }

    /// Whether the error came from scope teardown rather than resolution.
    pub fn is_disposal(&self) -> bool {
        matches!(self, DiError::Disposal { .. })
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Disposal { service, message } => {
                write!(f, "Disposal of {} failed: {}", service, message)
            }
            DiError::ScopeDisposed => write!(f, "Scope already disposed"),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
