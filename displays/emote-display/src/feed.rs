//! System status feed
//!
//! A bounded queue of [`SystemEvent`]s between whatever notices status
//! changes (network stack, audio, battery monitor) and the display. Posting
//! never blocks; the display side applies events through a
//! [`StatusTracker`] so only real changes reach the screen.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use emote_core::{EmotionDisplay, StatusTracker, SystemEvent};

/// Default queue depth
pub const STATUS_QUEUE_SIZE: usize = 8;

/// Queue of pending status events
pub struct StatusFeed<M: RawMutex, const N: usize = STATUS_QUEUE_SIZE> {
    events: Channel<M, SystemEvent, N>,
}

impl<M: RawMutex, const N: usize> Default for StatusFeed<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> StatusFeed<M, N> {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
        }
    }

    /// Queue an event without blocking
    ///
    /// Returns false, and drops the event, if the queue is full.
    pub fn post(&self, event: SystemEvent) -> bool {
        match self.events.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("status queue full, dropping {}", event);
                false
            }
        }
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Apply all queued events
    ///
    /// Returns how many icons were shown.
    pub fn drain<D: EmotionDisplay>(&self, display: &D, tracker: &mut StatusTracker) -> usize {
        let mut shown = 0;
        while let Ok(event) = self.events.try_receive() {
            if apply(display, tracker, event) {
                shown += 1;
            }
        }
        shown
    }

    /// Wait for one event and apply it
    ///
    /// Returns true if an icon was shown.
    pub async fn next<D: EmotionDisplay>(&self, display: &D, tracker: &mut StatusTracker) -> bool {
        let event = self.events.receive().await;
        apply(display, tracker, event)
    }

    /// Apply events as they arrive, forever
    pub async fn run<D: EmotionDisplay>(&self, display: &D, tracker: &mut StatusTracker) {
        loop {
            self.next(display, tracker).await;
        }
    }
}

/// Feed one event through the tracker, showing the icon on a change
pub fn apply<D: EmotionDisplay>(
    display: &D,
    tracker: &mut StatusTracker,
    event: SystemEvent,
) -> bool {
    match tracker.update(event) {
        Some(icon) => {
            display.set_icon(icon.name());
            true
        }
        None => {
            debug!("status unchanged: {}", event);
            false
        }
    }
}
