//! Multi-subscriber progress fan-out keyed by run id.
//!
//! Grounded on the worker pool's `mpsc`-based progress channel,
//! generalized from one channel to a map of bounded per-subscriber queues:
//! a slow or stalled subscriber can only ever lose its own events, never
//! block the publisher or any other subscriber.

use crate::types::{ProgressEvent, RunId};
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

const SUBSCRIBER_BUFFER: usize = 100;

/// A subscriber's receiving half, tagged with the id `unsubscribe` needs to
/// find and drop its matching sender.
pub struct ProgressReceiver {
    id: Uuid,
    rx: mpsc::Receiver<ProgressEvent>,
}

impl ProgressReceiver {
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> std::result::Result<ProgressEvent, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}

/// Optional sink (e.g. a websocket gateway) that also receives every
/// published event, in addition to per-run subscribers.
pub trait Broadcaster: Send + Sync {
    fn broadcast(&self, event: &ProgressEvent);
}

struct Subscriber {
    id: Uuid,
    sender: mpsc::Sender<ProgressEvent>,
}

pub struct ProgressPublisher {
    subscribers: RwLock<HashMap<RunId, Vec<Subscriber>>>,
    broadcaster: Option<Box<dyn Broadcaster>>,
}

impl ProgressPublisher {
    pub fn new() -> Self {
        Self { subscribers: RwLock::new(HashMap::new()), broadcaster: None }
    }

    pub fn with_broadcaster(broadcaster: Box<dyn Broadcaster>) -> Self {
        Self { subscribers: RwLock::new(HashMap::new()), broadcaster: Some(broadcaster) }
    }

    pub async fn subscribe(&self, run_id: RunId) -> ProgressReceiver {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let id = Uuid::new_v4();
        self.subscribers.write().await.entry(run_id).or_default().push(Subscriber { id, sender: tx });
        ProgressReceiver { id, rx }
    }

    /// Drop one subscriber's slot, identified by its receiver. Deletes the
    /// run's entry entirely once its last subscriber leaves.
    pub async fn unsubscribe(&self, run_id: RunId, receiver: &ProgressReceiver) {
        let mut subscribers = self.subscribers.write().await;
        if let Some(senders) = subscribers.get_mut(&run_id) {
            senders.retain(|s| s.id != receiver.id);
            if senders.is_empty() {
                subscribers.remove(&run_id);
            }
        }
    }

    /// Publish to every subscriber of this event's run. Send is
    /// non-blocking: a full subscriber buffer drops this event for that
    /// subscriber only.
    pub async fn publish(&self, event: ProgressEvent) {
        if let Some(broadcaster) = &self.broadcaster {
            broadcaster.broadcast(&event);
        }

        let subscribers = self.subscribers.read().await;
        if let Some(senders) = subscribers.get(&event.run_id) {
            for subscriber in senders {
                // try_send is the non-blocking contract: a full buffer
                // drops this event for that one subscriber.
                let _ = subscriber.sender.try_send(event.clone());
            }
        }
    }

    /// Remove every subscriber for a run, closing their channels.
    pub async fn close(&self, run_id: RunId) {
        self.subscribers.write().await.remove(&run_id);
    }

    pub async fn subscriber_count(&self, run_id: RunId) -> usize {
        self.subscribers.read().await.get(&run_id).map(Vec::len).unwrap_or(0)
    }
}

impl Default for ProgressPublisher {
    fn default() -> Self {
        Self::new()
    }
}
