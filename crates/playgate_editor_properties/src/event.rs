// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synchronous observer lists.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

/// Handle returned by [`Observers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Create a new random subscription ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A list of callbacks invoked synchronously, in subscription order.
///
/// Handlers may subscribe or unsubscribe while a notification is running;
/// the change takes effect from the next notification.
pub struct Observers<A: ?Sized> {
    handlers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn(&A)>)>>,
}

impl<A: ?Sized> Observers<A> {
    /// Create an empty observer list
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler
    pub fn subscribe(&self, handler: impl Fn(&A) + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Invoke every handler once
    pub fn notify(&self, arg: &A) {
        let handlers: Vec<_> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(arg);
        }
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Drop every handler
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

impl<A: ?Sized> Default for Observers<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> std::fmt::Debug for Observers<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("len", &self.len()).finish()
    }
}
