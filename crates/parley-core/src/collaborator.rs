//! Collaborator contracts.
//!
//! The state machines never call the chat SDK themselves. Runtimes execute
//! their actions against these traits, which production code implements on
//! top of the SDK and tests implement with simulated collaborators.
//!
//! All collaborators are `Send + Sync` so runtimes can share them with
//! spawned upload and send tasks.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};

use crate::{ActiveChannel, Attachment, Channel, ChannelEvent, FileRef, SendError, UploadError};

/// Source of the currently active channel.
pub trait ActiveChannelSource: Send + Sync {
    /// Subscribe to active-channel changes.
    ///
    /// The receiver's current value is the active channel at subscription
    /// time. Dropping the receiver releases the subscription.
    fn subscribe(&self) -> watch::Receiver<Option<ActiveChannel>>;
}

/// Live handle to one channel.
pub trait ChannelHandle: Send + Sync {
    /// Channel ID.
    fn id(&self) -> &str;

    /// Snapshot of the current channel state.
    fn snapshot(&self) -> Channel;

    /// Subscribe to the channel's lifecycle events.
    ///
    /// Dropping the receiver releases the subscription.
    fn subscribe(&self) -> broadcast::Receiver<ChannelEvent>;
}

/// Sends new messages and updates existing ones.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a new message to the channel `cid`.
    async fn send_message(
        &self,
        cid: &str,
        text: String,
        attachments: Vec<Attachment>,
    ) -> Result<(), SendError>;

    /// Replace the text and attachments of an existing message.
    async fn update_message(
        &self,
        cid: &str,
        message_id: &str,
        text: String,
        attachments: Vec<Attachment>,
    ) -> Result<(), SendError>;
}

/// Uploads files selected in the composer.
#[async_trait]
pub trait AttachmentUploader: Send + Sync {
    /// Upload `file` to the channel `cid` and return its remote reference.
    ///
    /// Images and other files may use different endpoints; implementations
    /// dispatch on [`FileRef::kind`]. Timeouts are the implementation's
    /// responsibility.
    async fn upload(&self, cid: &str, file: &FileRef) -> Result<Attachment, UploadError>;
}

/// Shows user-facing notifications. Fire-and-forget.
pub trait Notifier: Send + Sync {
    /// Show a notification that stays until dismissed.
    fn show_persistent(&self, text: &str) -> DismissHandle;

    /// Show a notification that disappears on its own.
    fn show_temporary(&self, text: &str);
}

/// Makes a channel the active one.
pub trait ChannelSelector: Send + Sync {
    /// Request that `channel_id` become active. Not awaited.
    fn set_active(&self, channel_id: &str);
}

/// Dismisses a persistent notification.
///
/// Consuming the handle dismisses the notification exactly once. Dropping it
/// without calling [`DismissHandle::dismiss`] leaves the notification up.
pub struct DismissHandle(Box<dyn FnOnce() + Send>);

impl DismissHandle {
    /// Wrap a dismiss callback.
    pub fn new(dismiss: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(dismiss))
    }

    /// Handle that does nothing, for notifiers without dismissal.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Dismiss the notification.
    pub fn dismiss(self) {
        (self.0)();
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissHandle").finish_non_exhaustive()
    }
}
