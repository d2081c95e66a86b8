//! Bridge between native callbacks and the per-frame poll.
//!
//! Native callbacks are plain function pointers with no user data, so they
//! write into one process-wide [`EventBridge`]. Each event kind has a one-slot
//! mailbox: repeated notifications before a drain coalesce and only the last
//! payload survives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::path_list;
use crate::state::WindowStateEvent;

/// Notification published to subscribers after a poll drains the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    MonitorChanged { monitor_count: i32 },
    StyleChanged(WindowStateEvent),
    FilesDropped(Vec<String>),
}

/// One-slot, edge-triggered mailbox.
#[derive(Debug)]
pub struct PendingEvent<T> {
    slot: Mutex<Option<T>>,
}

impl<T> Default for PendingEvent<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> PendingEvent<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `payload` and mark the mailbox ready, replacing anything unread.
    pub fn post(&self, payload: T) {
        *self.slot() = Some(payload);
    }

    /// Hand back the payload if one arrived since the last take.
    pub fn take(&self) -> Option<T> {
        self.slot().take()
    }

    pub fn is_ready(&self) -> bool {
        self.slot().is_some()
    }

    pub fn clear(&self) {
        self.slot().take();
    }
}

/// Receiver side of the native callbacks.
pub trait EventSink: Sync {
    fn files_dropped(&self, payload: &str);
    fn monitor_changed(&self, monitor_count: i32);
    fn style_changed(&self, event: i32);
}

#[derive(Debug, Default)]
pub struct EventBridge {
    accepting: AtomicBool,
    dropped_files: PendingEvent<Vec<String>>,
    monitor_changed: PendingEvent<i32>,
    style_changed: PendingEvent<WindowStateEvent>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting callbacks with empty mailboxes.
    pub fn init(&self) {
        self.reset();
        self.accepting.store(true, Ordering::SeqCst);
        debug!("event bridge accepting callbacks");
    }

    /// Drop anything not yet drained.
    pub fn reset(&self) {
        self.dropped_files.clear();
        self.monitor_changed.clear();
        self.style_changed.clear();
    }

    /// Stop accepting callbacks. Late callbacks become no-ops.
    pub fn teardown(&self) {
        self.accepting.store(false, Ordering::SeqCst);
        self.reset();
        debug!("event bridge torn down");
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    pub fn take_dropped_files(&self) -> Option<Vec<String>> {
        self.dropped_files.take()
    }

    /// Monitor count reported by the last monitor-changed callback.
    pub fn take_monitor_changed(&self) -> Option<i32> {
        self.monitor_changed.take()
    }

    pub fn take_style_changed(&self) -> Option<WindowStateEvent> {
        self.style_changed.take()
    }
}

impl EventSink for EventBridge {
    fn files_dropped(&self, payload: &str) {
        if !self.is_accepting() {
            trace!("ignoring drop after teardown");
            return;
        }
        let paths = path_list::decode(payload);
        if !paths.is_empty() {
            self.dropped_files.post(paths);
        }
    }

    fn monitor_changed(&self, monitor_count: i32) {
        if self.is_accepting() {
            self.monitor_changed.post(monitor_count);
        }
    }

    fn style_changed(&self, event: i32) {
        if self.is_accepting() {
            self.style_changed.post(WindowStateEvent::from_raw(event));
        }
    }
}

static BRIDGE: Lazy<EventBridge> = Lazy::new(EventBridge::new);

/// The process-wide bridge the native callbacks write into.
pub fn bridge() -> &'static EventBridge {
    &BRIDGE
}

pub fn on_files_dropped(payload: &str) {
    BRIDGE.files_dropped(payload);
}

pub fn on_monitor_changed(monitor_count: i32) {
    BRIDGE.monitor_changed(monitor_count);
}

pub fn on_style_changed(event: i32) {
    BRIDGE.style_changed(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailbox_coalesces_to_last_payload() {
        let mailbox = PendingEvent::new();
        mailbox.post(1);
        mailbox.post(2);
        assert!(mailbox.is_ready());
        assert_eq!(mailbox.take(), Some(2));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn drop_keeps_only_second_payload() {
        let bridge = EventBridge::new();
        bridge.init();
        bridge.files_dropped("first.txt");
        bridge.files_dropped("second.txt\0third.txt");
        assert_eq!(
            bridge.take_dropped_files(),
            Some(vec!["second.txt".to_string(), "third.txt".to_string()])
        );
        assert_eq!(bridge.take_dropped_files(), None);
    }

    #[test]
    fn empty_drop_does_not_mark_ready() {
        let bridge = EventBridge::new();
        bridge.init();
        bridge.files_dropped("\0\n\0");
        assert_eq!(bridge.take_dropped_files(), None);
    }

    #[test]
    fn callbacks_after_teardown_are_ignored() {
        let bridge = EventBridge::new();
        bridge.init();
        bridge.monitor_changed(2);
        bridge.teardown();
        bridge.style_changed(1);
        bridge.files_dropped("late.txt");
        assert_eq!(bridge.take_monitor_changed(), None);
        assert_eq!(bridge.take_style_changed(), None);
        assert_eq!(bridge.take_dropped_files(), None);
    }

    #[test]
    fn init_clears_stale_mailboxes() {
        let bridge = EventBridge::new();
        bridge.init();
        bridge.style_changed(WindowStateEvent::RESIZED.bits() as i32);
        bridge.init();
        assert_eq!(bridge.take_style_changed(), None);
    }
}
