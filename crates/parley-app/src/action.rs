//! Component side-effects and intents.
//!
//! This module defines [`PreviewAction`] and [`ComposerAction`], the
//! instructions the state machines produce for a runtime to execute.

use parley_core::{Attachment, ChannelId, FileRef, MessageId};

use crate::state::{NotificationId, SendTicket, UploadId};

/// Actions produced by the [`crate::ChannelPreview`] state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewAction {
    /// The view changed; re-render.
    Render,

    /// Ask the channel-selection collaborator to activate a channel.
    SelectChannel {
        /// Channel to activate.
        channel_id: ChannelId,
    },
}

/// Actions produced by the [`crate::Composer`] state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerAction {
    /// The draft changed; re-render.
    Render,

    /// Upload a selected file.
    ///
    /// The runtime reports back with `UploadStarted` and then
    /// `UploadSucceeded` or `UploadFailed` for the same `upload_id`.
    StartUpload {
        /// Local upload ID.
        upload_id: UploadId,
        /// Channel the file is uploaded to.
        cid: String,
        /// File to upload.
        file: FileRef,
    },

    /// Send a new message.
    SendMessage {
        /// Correlates the outcome.
        ticket: SendTicket,
        /// Target channel.
        cid: String,
        /// Message text.
        text: String,
        /// Uploaded attachments in selection order.
        attachments: Vec<Attachment>,
    },

    /// Update an existing message.
    UpdateMessage {
        /// Correlates the outcome.
        ticket: SendTicket,
        /// Channel of the message.
        cid: String,
        /// Message to update.
        message_id: MessageId,
        /// New text.
        text: String,
        /// New attachments.
        attachments: Vec<Attachment>,
    },

    /// Show a notification until dismissed.
    ShowPersistentNotification {
        /// ID used to dismiss it later.
        id: NotificationId,
        /// Notification text.
        text: String,
    },

    /// Dismiss a persistent notification.
    DismissNotification {
        /// ID from `ShowPersistentNotification`.
        id: NotificationId,
    },

    /// Show a self-dismissing notification.
    ShowTemporaryNotification {
        /// Notification text.
        text: String,
    },

    /// A send or update completed; notify the host.
    MessageSubmitted {
        /// Edited message. `None` for a new message.
        edited: Option<MessageId>,
    },
}
