//! Content-count callbacks.
//!
//! A controller reports the new result count after every cycle to each
//! callback registered here.

use alloc::boxed::Box;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback receiving the new total result count.
pub type CountCallback = Box<dyn Fn(usize)>;

/// Manages content-count callbacks for one controller.
pub struct SubscriptionManager {
    subscriptions: HashMap<SubscriptionId, CountCallback>,
    next_id: SubscriptionId,
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers `callback` and returns its id.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(usize) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.insert(id, Box::new(callback));
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Calls every callback with `total`.
    pub fn notify_all(&self, total: usize) {
        for callback in self.subscriptions.values() {
            callback(total);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.subscriptions.keys().copied().collect()
    }
}
