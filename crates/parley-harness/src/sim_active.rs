//! Simulated active-channel service.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use parley_core::{ActiveChannel, ActiveChannelSource, ChannelHandle, ChannelId, ChannelSelector};
use tokio::sync::watch;

use crate::SimChannel;

/// Tracks which registered [`SimChannel`] is active.
///
/// Implements both sides of channel selection: previews subscribe through
/// [`ActiveChannelSource`] and request changes through [`ChannelSelector`].
/// Selection requests apply immediately.
#[derive(Debug)]
pub struct SimActiveChannel {
    active: watch::Sender<Option<ActiveChannel>>,
    channels: Mutex<BTreeMap<ChannelId, Arc<SimChannel>>>,
    /// Every `set_active` request, in order.
    requests: Mutex<Vec<ChannelId>>,
}

impl Default for SimActiveChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl SimActiveChannel {
    /// No channels registered, nothing active.
    pub fn new() -> Self {
        let (active, _) = watch::channel(None);
        Self { active, channels: Mutex::new(BTreeMap::new()), requests: Mutex::new(Vec::new()) }
    }

    /// Make `channel` selectable.
    pub fn register(&self, channel: Arc<SimChannel>) {
        lock(&self.channels).insert(channel.id().to_string(), channel);
    }

    /// Activate a registered channel, or clear the selection with `None`.
    ///
    /// Capabilities are read from the channel's current snapshot. Returns
    /// `false` if `channel_id` is not registered.
    pub fn activate(&self, channel_id: Option<&str>) -> bool {
        let next = match channel_id {
            None => None,
            Some(id) => {
                let Some(channel) = lock(&self.channels).get(id).cloned() else {
                    tracing::warn!(channel_id = id, "activating unknown channel");
                    return false;
                };
                Some(channel.snapshot().to_active())
            },
        };
        tracing::debug!(channel_id, "active channel changed");
        self.active.send_replace(next);
        true
    }

    /// Currently active channel.
    pub fn current(&self) -> Option<ActiveChannel> {
        self.active.borrow().clone()
    }

    /// Channel IDs passed to [`ChannelSelector::set_active`], in order.
    pub fn requests(&self) -> Vec<ChannelId> {
        lock(&self.requests).clone()
    }

    /// Live active-channel subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.active.receiver_count()
    }
}

impl ActiveChannelSource for SimActiveChannel {
    fn subscribe(&self) -> watch::Receiver<Option<ActiveChannel>> {
        self.active.subscribe()
    }
}

impl ChannelSelector for SimActiveChannel {
    fn set_active(&self, channel_id: &str) {
        lock(&self.requests).push(channel_id.to_string());
        self.activate(Some(channel_id));
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
