//! Internal disposal bag for managing cleanup hooks.

use tracing::warn;

use crate::error::DiResult;
use crate::traits::DisposeHook;

/// Container for disposal hooks with LIFO execution order.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<DisposeHook>,
}

impl DisposeBag {
    /// Add a disposal hook.
    pub(crate) fn push(&mut self, hook: DisposeHook) {
        self.hooks.push(hook);
    }

    /// Execute every hook in reverse order (LIFO).
    ///
    /// All hooks run even if some fail. The first failure is returned and the
    /// rest are logged.
    pub(crate) fn run_all_reverse(&mut self) -> DiResult<()> {
        let mut first_err = None;
        while let Some(hook) = self.hooks.pop() {
            if let Err(e) = hook() {
                if first_err.is_none() {
                    first_err = Some(e);
                } else {
                    warn!(error = %e, "additional disposer failure");
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Check if the bag is empty (no disposers registered).
    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }
}
