//! Disposal trait for resource cleanup.

use crate::error::DiResult;

/// Trait for synchronous resource disposal.
///
/// Implement this trait for services that need structured teardown (flushing
/// buffers, closing connections). Registered disposers run in LIFO order when
/// the owning scope is disposed, which for a
/// [`ScopeBoundHandle`](crate::ScopeBoundHandle) happens on release.
///
/// A failing disposer does not stop the remaining ones; the first failure is
/// reported by the scope's `dispose`.
///
/// # Examples
///
/// ```
/// use ferrous_scope::{DiError, DiResult, Dispose, ScopedResolver, ServiceCollection};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// struct Connection {
///     closed: Arc<AtomicBool>,
/// }
///
/// impl Dispose for Connection {
///     fn dispose(&self) -> DiResult<()> {
///         self.closed.store(true, Ordering::SeqCst);
///         Ok(())
///     }
/// }
///
/// let closed = Arc::new(AtomicBool::new(false));
/// let flag = closed.clone();
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_disposable::<Connection, _>(move |_| {
///     Ok(Connection { closed: flag.clone() })
/// });
///
/// let resolver = ScopedResolver::new(services.build());
/// let handle = resolver.resolve::<Connection>()?;
/// assert!(!closed.load(Ordering::SeqCst));
///
/// handle.release()?;
/// assert!(closed.load(Ordering::SeqCst));
/// # Ok::<(), DiError>(())
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self) -> DiResult<()>;
}
