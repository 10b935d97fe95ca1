//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Keys currently being constructed on this thread, outermost first.
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Guard marking a key as under construction on the current thread.
///
/// Entering a key that is already on the stack yields
/// [`DiError::Circular`] with the full path instead of recursing until the
/// stack overflows (or deadlocking on a singleton cell).
pub(crate) struct ResolutionGuard {
    name: &'static str,
}

impl ResolutionGuard {
    pub(crate) fn enter(name: &'static str, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            if stack.iter().any(|&n| n == name) {
                let mut path = stack.clone();
                path.push(name);
                return Err(DiError::Circular(path));
            }

            if stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push(name);
            Ok(Self { name })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.name));
        });
    }
}
