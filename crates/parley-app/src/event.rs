//! Component input events.
//!
//! Events originate from two sources:
//! - Subscriptions (active-channel changes, channel lifecycle events).
//! - Outcomes of actions the runtime executed (upload and send results).
//!
//! User intents (send, pick files, ...) are methods on the state machines
//! rather than events, mirroring how a UI calls into a component.

use parley_core::{ActiveChannel, Attachment, ChannelEvent, ChannelId, SendError, UploadError};

use crate::state::{SendTicket, UploadId};

/// Events processed by the [`crate::ChannelPreview`] state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// The active channel changed.
    ActiveChannelChanged {
        /// New active channel. `None` if nothing is active.
        channel_id: Option<ChannelId>,
    },

    /// The bound channel emitted a lifecycle event.
    Channel(ChannelEvent),
}

/// Events processed by the [`crate::Composer`] state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    /// The active channel changed.
    ActiveChannelChanged(Option<ActiveChannel>),

    /// The runtime started uploading.
    UploadStarted {
        /// Local upload ID.
        upload_id: UploadId,
    },

    /// An upload finished.
    UploadSucceeded {
        /// Local upload ID.
        upload_id: UploadId,
        /// Remote reference returned by the uploader.
        attachment: Attachment,
    },

    /// An upload failed.
    UploadFailed {
        /// Local upload ID.
        upload_id: UploadId,
        /// Failure reported by the uploader.
        error: UploadError,
    },

    /// A send or update completed.
    SendSucceeded {
        /// Ticket from the send action.
        ticket: SendTicket,
    },

    /// A send or update failed.
    SendFailed {
        /// Ticket from the send action.
        ticket: SendTicket,
        /// Failure reported by the messaging collaborator.
        error: SendError,
    },
}
