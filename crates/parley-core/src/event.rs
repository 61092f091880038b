//! Channel lifecycle events.
//!
//! The SDK delivers events keyed by name (`message.new`, ...) with loosely
//! typed payloads. [`ChannelEvent`] closes that set over the kinds the preview
//! reacts to; adapters drop every other event name before it gets here.

use std::sync::Arc;

use crate::{StreamMessage, UserId};

/// Events emitted by a channel handle.
///
/// Each event is delivered after the SDK has applied it to the channel
/// state, so a snapshot taken while handling the event already reflects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// `message.new`: a message was appended.
    MessageNew {
        /// The new message.
        message: Arc<StreamMessage>,
    },

    /// `message.updated`: a message was edited or soft-deleted.
    MessageUpdated {
        /// The message after the update.
        message: Arc<StreamMessage>,
    },

    /// `message.deleted`: a message was deleted.
    MessageDeleted {
        /// The message carrying its deletion timestamp.
        message: Arc<StreamMessage>,
    },

    /// `channel.truncated`: all messages were removed.
    ChannelTruncated,

    /// `message.read`: a member's read state changed.
    MessageRead {
        /// Member whose read state changed.
        user_id: UserId,
    },
}

impl ChannelEvent {
    /// SDK event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageNew { .. } => "message.new",
            Self::MessageUpdated { .. } => "message.updated",
            Self::MessageDeleted { .. } => "message.deleted",
            Self::ChannelTruncated => "channel.truncated",
            Self::MessageRead { .. } => "message.read",
        }
    }

    /// Message carried by the event. `None` for events without one.
    pub fn message(&self) -> Option<&Arc<StreamMessage>> {
        match self {
            Self::MessageNew { message }
            | Self::MessageUpdated { message }
            | Self::MessageDeleted { message } => Some(message),
            Self::ChannelTruncated | Self::MessageRead { .. } => None,
        }
    }
}
