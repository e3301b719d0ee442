//! Provider cycle detection.
//!
//! Each thread keeps the stack of (container, token) pairs currently being
//! resolved. Entering a pair that is already on the stack is a cycle.

use crate::di::{Token, TokenKey};
use crate::error::{NestletError, Result};
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static RESOLVING: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    container: u64,
    key: TokenKey,
    label: Arc<str>,
}

/// Pops its frame when dropped.
pub(crate) struct ResolutionGuard {
    _frame: (),
}

impl ResolutionGuard {
    pub(crate) fn enter(container: u64, token: &Token) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            let start = stack
                .iter()
                .position(|frame| frame.container == container && &frame.key == token.key());

            if let Some(start) = start {
                let mut cycle: Vec<&str> = stack[start..]
                    .iter()
                    .map(|frame| frame.label.as_ref())
                    .collect();
                cycle.push(token.label());
                return Err(NestletError::CircularDependency {
                    cycle: cycle.join(" -> "),
                });
            }

            stack.push(Frame {
                container,
                key: token.key().clone(),
                label: token.shared_label(),
            });
            Ok(Self { _frame: () })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
