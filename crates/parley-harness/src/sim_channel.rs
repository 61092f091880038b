//! Simulated channel.
//!
//! `SimChannel` plays the chat SDK's part for one channel: mutators apply a
//! change to the channel state first and emit the matching event second,
//! which is the order the preview relies on.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use parley_core::{
    Capabilities, Channel, ChannelEvent, ChannelHandle, ChannelId, StreamMessage, UserId,
};
use tokio::sync::broadcast;

/// Default event buffer. Receivers further behind than this lag.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// In-memory channel implementing [`ChannelHandle`].
#[derive(Debug)]
pub struct SimChannel {
    id: ChannelId,
    /// Messages from this user do not count as unread.
    viewer: UserId,
    state: Mutex<Channel>,
    events: broadcast::Sender<ChannelEvent>,
}

impl SimChannel {
    /// Simulate `channel` as seen by `viewer`.
    pub fn new(channel: Channel, viewer: impl Into<UserId>) -> Self {
        Self::with_capacity(channel, viewer, DEFAULT_EVENT_CAPACITY)
    }

    /// Like [`SimChannel::new`] with an explicit event buffer size.
    pub fn with_capacity(channel: Channel, viewer: impl Into<UserId>, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self { id: channel.id.clone(), viewer: viewer.into(), state: Mutex::new(channel), events }
    }

    /// Append a message. Counts as unread unless the viewer wrote it.
    pub fn push_message(&self, message: StreamMessage) -> Arc<StreamMessage> {
        let message = Arc::new(message);
        {
            let mut channel = self.lock();
            if message.user.id != self.viewer {
                channel.unread_count += 1;
            }
            channel.messages.push(Arc::clone(&message));
        }
        self.emit(ChannelEvent::MessageNew { message: Arc::clone(&message) });
        message
    }

    /// Replace the loaded message with the same ID.
    ///
    /// Returns `false` (and emits nothing) if no such message is loaded.
    pub fn update_message(&self, message: StreamMessage) -> bool {
        let Some(message) = self.replace(message) else {
            return false;
        };
        self.emit(ChannelEvent::MessageUpdated { message });
        true
    }

    /// Mark the loaded message `message_id` deleted at `at`.
    pub fn delete_message(&self, message_id: &str, at: DateTime<Utc>) -> bool {
        let deleted = {
            let channel = self.lock();
            channel.messages.iter().find(|m| m.id == message_id).map(|m| (**m).clone().deleted(at))
        };
        let Some(message) = deleted.and_then(|m| self.replace(m)) else {
            return false;
        };
        self.emit(ChannelEvent::MessageDeleted { message });
        true
    }

    /// Remove every message. The unread counter is left alone.
    pub fn truncate(&self) {
        self.lock().messages.clear();
        self.emit(ChannelEvent::ChannelTruncated);
    }

    /// `user_id` read the channel. Resets the counter if that is the viewer.
    pub fn mark_read(&self, user_id: impl Into<UserId>) {
        let user_id = user_id.into();
        if user_id == self.viewer {
            self.lock().unread_count = 0;
        }
        self.emit(ChannelEvent::MessageRead { user_id });
    }

    /// Overwrite the unread counter without emitting an event.
    pub fn set_unread(&self, count: u32) {
        self.lock().unread_count = count;
    }

    /// Overwrite the viewer's capabilities without emitting an event.
    pub fn set_capabilities(&self, capabilities: Capabilities) {
        self.lock().data.own_capabilities = capabilities;
    }

    /// Emit `event` without touching the channel state.
    pub fn emit(&self, event: ChannelEvent) {
        tracing::trace!(channel_id = %self.id, event = event.name(), "emitting channel event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Live event subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn replace(&self, message: StreamMessage) -> Option<Arc<StreamMessage>> {
        let mut channel = self.lock();
        let slot = channel.messages.iter_mut().find(|m| m.id == message.id)?;
        let message = Arc::new(message);
        *slot = Arc::clone(&message);
        Some(message)
    }

    fn lock(&self) -> MutexGuard<'_, Channel> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelHandle for SimChannel {
    fn id(&self) -> &str {
        &self.id
    }

    fn snapshot(&self) -> Channel {
        self.lock().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }
}
