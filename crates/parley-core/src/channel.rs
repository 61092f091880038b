//! Channel snapshots.
//!
//! A [`Channel`] is the read-only view of one conversation the preview
//! reconciler works from. The chat SDK owns the live channel; collaborators
//! hand out snapshots of it (see [`crate::ChannelHandle`]).

use std::{collections::BTreeMap, sync::Arc};

use crate::{Capabilities, ChannelId, StreamMessage, User, UserId};

/// Channel metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelData {
    /// Channel name. `None` for unnamed (typically direct) channels.
    pub name: Option<String>,
    /// Channel image URL.
    pub image: Option<String>,
    /// Language the SDK auto-translates incoming messages into.
    pub auto_translation_language: Option<String>,
    /// Capabilities the current user holds on this channel.
    pub own_capabilities: Capabilities,
}

/// Channel member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The member's user record.
    pub user: User,
}

impl From<User> for Member {
    fn from(user: User) -> Self {
        Self { user }
    }
}

/// Snapshot of a channel's observable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel ID, unique within its type.
    pub id: ChannelId,
    /// Fully-qualified channel ID (`type:id`).
    pub cid: String,
    /// Channel metadata.
    pub data: ChannelData,
    /// Members keyed by user ID.
    pub members: BTreeMap<UserId, Member>,
    /// Loaded messages, most recent last.
    pub messages: Vec<Arc<StreamMessage>>,
    /// Unread counter for the current user, as computed by the SDK.
    pub unread_count: u32,
}

impl Channel {
    /// Empty `messaging` channel.
    pub fn new(id: impl Into<ChannelId>) -> Self {
        let id = id.into();
        Self {
            cid: format!("messaging:{id}"),
            id,
            data: ChannelData::default(),
            members: BTreeMap::new(),
            messages: Vec::new(),
            unread_count: 0,
        }
    }

    /// Most recent loaded message. `None` if no messages are loaded.
    pub fn latest_message(&self) -> Option<&Arc<StreamMessage>> {
        self.messages.last()
    }

    /// Check whether `message_id` is the most recent loaded message.
    pub fn is_latest(&self, message_id: &str) -> bool {
        self.latest_message().is_some_and(|m| m.id == message_id)
    }

    /// Unread message count for the current user.
    pub fn count_unread(&self) -> u32 {
        self.unread_count
    }

    /// Summary used by the active-channel source.
    pub fn to_active(&self) -> ActiveChannel {
        ActiveChannel {
            id: self.id.clone(),
            cid: self.cid.clone(),
            capabilities: self.data.own_capabilities.clone(),
        }
    }
}

/// The channel currently focused in the UI.
///
/// Carries just what consumers of the active-channel stream need: identity
/// for the preview, capabilities for the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChannel {
    /// Channel ID.
    pub id: ChannelId,
    /// Fully-qualified channel ID.
    pub cid: String,
    /// Capabilities the current user holds on this channel.
    pub capabilities: Capabilities,
}
