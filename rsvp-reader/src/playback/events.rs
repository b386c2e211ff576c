//! Typed publish/subscribe for reader events
//!
//! Callbacks are registered per [`EventKind`] and run synchronously, in
//! registration order, on the thread that triggered the event. Nothing is
//! queued or dropped. Every event is also mirrored onto a Tokio broadcast
//! channel for async consumers; that feed is bounded and may lag.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rsvp_common::events::{EventKind, PlayerEvent};
use tokio::sync::broadcast;
use tracing::trace;

/// Events buffered per receiver on the broadcast mirror
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Callback invoked with each event of its kind
pub type EventCallback = Arc<dyn Fn(&PlayerEvent) + Send + Sync + 'static>;

/// Identifies one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Listener {
    id: SubscriptionId,
    kind: EventKind,
    callback: EventCallback,
}

/// Callback registry plus broadcast mirror
pub struct EventBus {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<PlayerEvent>,
}

impl EventBus {
    /// Create a bus whose broadcast mirror buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            tx,
        }
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback` for events of `kind`
    pub fn on<F>(&self, kind: EventKind, callback: F) -> SubscriptionId
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push(Listener {
            id,
            kind,
            callback: Arc::new(callback),
        });
        trace!("Registered {} listener {:?}", kind, id);
        id
    }

    /// Remove the callback registered as `id` on `kind`.
    ///
    /// Returns false if no such callback exists.
    pub fn off(&self, kind: EventKind, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|l| !(l.kind == kind && l.id == id));
        before != listeners.len()
    }

    /// Number of callbacks registered on `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners().iter().filter(|l| l.kind == kind).count()
    }

    /// Deliver `event` to every callback on its kind, then to the broadcast
    /// mirror.
    ///
    /// The registry lock is released before callbacks run, so a callback may
    /// subscribe, unsubscribe or drive the engine. Callbacks added during
    /// delivery see the next event, not this one.
    pub fn emit(&self, event: PlayerEvent) {
        let kind = event.kind();
        let callbacks: Vec<EventCallback> = self
            .listeners()
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| Arc::clone(&l.callback))
            .collect();

        for callback in &callbacks {
            callback(&event);
        }

        if self.tx.receiver_count() > 0 {
            // Ignore send errors (no receivers is OK)
            let _ = self.tx.send(event);
        }
    }

    /// Subscribe to the async mirror of all future events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

/// Unsubscribe handle returned by the engine's `on`
#[derive(Debug, Clone)]
pub struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    bus: Weak<EventBus>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, kind: EventKind, bus: &Arc<EventBus>) -> Self {
        Self {
            id,
            kind,
            bus: Arc::downgrade(bus),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Remove the callback. Returns false if it was already removed or the
    /// engine is gone.
    pub fn unsubscribe(self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.off(self.kind, self.id),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(bus: &EventBus, kind: EventKind, log: &Arc<Mutex<Vec<String>>>, tag: &str) -> SubscriptionId {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        bus.on(kind, move |event| {
            log.lock().unwrap().push(format!("{}:{}", tag, event.kind()));
        })
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let bus = EventBus::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&bus, EventKind::Play, &log, "a");
        recorder(&bus, EventKind::Play, &log, "b");

        bus.emit(PlayerEvent::Play { index: 0 });

        assert_eq!(*log.lock().unwrap(), vec!["a:play", "b:play"]);
    }

    #[test]
    fn test_only_matching_kind_is_delivered() {
        let bus = EventBus::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&bus, EventKind::Pause, &log, "p");

        bus.emit(PlayerEvent::Play { index: 0 });
        bus.emit(PlayerEvent::Pause { index: 4 });

        assert_eq!(*log.lock().unwrap(), vec!["p:pause"]);
    }

    #[test]
    fn test_off_removes_specific_callback() {
        let bus = EventBus::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder(&bus, EventKind::Stop, &log, "a");
        recorder(&bus, EventKind::Stop, &log, "b");

        assert!(!bus.off(EventKind::Play, a), "wrong kind must not match");
        assert!(bus.off(EventKind::Stop, a));
        assert!(!bus.off(EventKind::Stop, a));

        bus.emit(PlayerEvent::Stop { index: 0 });
        assert_eq!(*log.lock().unwrap(), vec!["b:stop"]);
        assert_eq!(bus.listener_count(EventKind::Stop), 1);
    }

    #[test]
    fn test_subscription_unsubscribe() {
        let bus = Arc::new(EventBus::default());
        let id = bus.on(EventKind::End, |_| {});
        let subscription = Subscription::new(id, EventKind::End, &bus);

        assert_eq!(bus.listener_count(EventKind::End), 1);
        assert!(subscription.clone().unsubscribe());
        assert_eq!(bus.listener_count(EventKind::End), 0);
        assert!(!subscription.unsubscribe());
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::default());
        let calls = Arc::new(AtomicU64::new(0));
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let weak_bus = Arc::downgrade(&bus);
        let counter = Arc::clone(&calls);
        let own_id = Arc::clone(&slot);
        let id = bus.on(EventKind::Word, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let (Some(bus), Some(id)) = (weak_bus.upgrade(), *own_id.lock().unwrap()) {
                bus.off(EventKind::Word, id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        bus.emit(PlayerEvent::SpeedChange { rate: 1 });
        bus.emit(PlayerEvent::Progress(rsvp_common::human_time::progress_info(0, 0, 300)));
        let word = PlayerEvent::Word(rsvp_common::events::WordInfo {
            word: "x".into(),
            index: 0,
            before: String::new(),
            orp_char: "x".into(),
            after: String::new(),
            orp_index: 0,
            word_length: 1,
        });
        bus.emit(word.clone());
        bus.emit(word);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_broadcast_mirror_receives_events() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(PlayerEvent::SpeedChange { rate: 420 });

        assert_eq!(rx.recv().await.unwrap(), PlayerEvent::SpeedChange { rate: 420 });
    }

    #[test]
    fn test_default_mirror_buffers_channel_capacity() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        for rate in 0..EVENT_CHANNEL_CAPACITY as u32 {
            bus.emit(PlayerEvent::SpeedChange { rate });
        }
        assert_eq!(rx.try_recv().unwrap(), PlayerEvent::SpeedChange { rate: 0 });

        // One more than the buffer holds: the oldest unread event is lost
        let mut rx = bus.subscribe();
        for rate in 0..EVENT_CHANNEL_CAPACITY as u32 + 1 {
            bus.emit(PlayerEvent::SpeedChange { rate });
        }
        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(1))
        ));
    }
}
