// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared single-threaded state that tolerates re-entrant mutation requests.
//!
//! Browser event handlers borrow the drag and drop state for the length of
//! one event. User callbacks run inside that borrow and may create or dispose
//! bindings, which need the same state. [`Deferred`] queues such requests and
//! applies them, in order, as soon as the running event handler returns.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::RefCell;
use core::fmt;

type Op<T> = Box<dyn FnOnce(&mut T)>;

/// A value plus a queue of mutations waiting for it to be free.
pub struct Deferred<T> {
    value: RefCell<T>,
    pending: RefCell<VecDeque<Op<T>>>,
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("busy", &self.is_busy())
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

impl<T> Deferred<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    /// Returns `true` while a dispatch or an op holds the value.
    pub fn is_busy(&self) -> bool {
        self.value.try_borrow_mut().is_err()
    }

    /// Number of queued ops.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run `f` with exclusive access, then apply the ops queued while it ran.
    ///
    /// Returns `None` without running `f` when the value is already held,
    /// i.e. when called from inside another dispatch.
    pub fn dispatch<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let out = {
            let mut value = self.value.try_borrow_mut().ok()?;
            f(&mut value)
        };
        self.flush();
        Some(out)
    }

    /// Apply `op` now, or right after the running dispatch if there is one.
    pub fn apply(&self, op: impl FnOnce(&mut T) + 'static) {
        let Ok(mut value) = self.value.try_borrow_mut() else {
            self.pending.borrow_mut().push_back(Box::new(op));
            return;
        };
        op(&mut value);
        drop(value);
        self.flush();
    }

    fn flush(&self) {
        loop {
            let Some(op) = self.pending.borrow_mut().pop_front() else {
                return;
            };
            match self.value.try_borrow_mut() {
                Ok(mut value) => op(&mut value),
                Err(_) => {
                    self.pending.borrow_mut().push_front(op);
                    return;
                }
            }
        }
    }
}
