//! Publish/subscribe channel for [`Notification`]s.
//!
//! Subscribers register per [`Topic`] (or for everything) and receive each
//! matching notification in subscription order. A subscriber that returns an
//! error or panics is logged and skipped; the remaining subscribers still run.
//!
//! `publish` delivers immediately. `post` queues a notification for the next
//! `dispatch_pending`, which is how notifications raised in the middle of
//! another dispatch are kept in order.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};

use slotmap::{new_key_type, SlotMap};

use super::message::{Notification, Topic};
use crate::error::HandlerResult;

new_key_type! {
    /// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
    pub struct SubscriptionId;
}

type Subscriber = Box<dyn FnMut(&Notification) -> HandlerResult>;

struct Subscription {
    /// `None` subscribes to every topic.
    topic: Option<Topic>,
    handler: Subscriber,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Typed notification bus.
#[derive(Default)]
pub struct EventBus {
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    /// Delivery order; slotmap iteration order is not insertion order.
    order: Vec<SubscriptionId>,
    queue: VecDeque<Notification>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one topic.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: FnMut(&Notification) -> HandlerResult + 'static,
    {
        self.insert(Some(topic), Box::new(handler))
    }

    /// Subscribe to every notification.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Notification) -> HandlerResult + 'static,
    {
        self.insert(None, Box::new(handler))
    }

    fn insert(&mut self, topic: Option<Topic>, handler: Subscriber) -> SubscriptionId {
        let id = self.subscriptions.insert(Subscription { topic, handler });
        self.order.push(id);
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if self.subscriptions.remove(id).is_none() {
            return false;
        }
        self.order.retain(|&s| s != id);
        true
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Deliver a notification to every matching subscriber now.
    ///
    /// Returns how many subscribers completed without error.
    pub fn publish(&mut self, notification: Notification) -> usize {
        let topic = notification.topic();
        let mut delivered = 0;

        for &id in &self.order {
            let Some(sub) = self.subscriptions.get_mut(id) else {
                continue;
            };
            if sub.topic.is_some_and(|t| t != topic) {
                continue;
            }

            let handler = &mut sub.handler;
            match catch_unwind(AssertUnwindSafe(|| handler(&notification))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(err)) => {
                    tracing::error!(notification = %notification, error = %err, "subscriber failed");
                }
                Err(_) => {
                    tracing::error!(notification = %notification, "subscriber panicked");
                }
            }
        }

        delivered
    }

    /// Queue a notification for the next [`dispatch_pending`](Self::dispatch_pending).
    pub fn post(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// Number of queued notifications.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Publish queued notifications in FIFO order until the queue is empty.
    ///
    /// Returns the number of notifications dispatched.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut count = 0;
        while let Some(notification) = self.queue.pop_front() {
            self.publish(notification);
            count += 1;
        }
        count
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriptions.len())
            .field("pending", &self.queue.len())
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
