//! Builders for common test data.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parley_core::{
    Attachment, Capabilities, Channel, FileRef, Member, StreamMessage, User,
};

use crate::SimChannel;

/// User ID the fixtures treat as the viewer.
pub const CURRENT_USER: &str = "currentUser";

/// Fixed point in time so fixture output is reproducible.
pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default()
}

/// User with a display name.
pub fn user(id: &str, name: &str) -> User {
    User::new(id).with_name(name)
}

/// Message by `author` created at [`epoch`] plus `seq` seconds.
pub fn message(id: &str, author: &User, text: &str, seq: i64) -> StreamMessage {
    StreamMessage::new(id, author.clone())
        .with_text(text)
        .created(epoch() + chrono::Duration::seconds(seq))
}

/// Image file as a picker would report it.
pub fn image_file(name: &str) -> FileRef {
    FileRef::new(name, "image/png", 2048)
}

/// Non-image file as a picker would report it.
pub fn document_file(name: &str) -> FileRef {
    FileRef::new(name, "application/pdf", 4096)
}

/// Remote reference for an uploaded `file`.
pub fn uploaded(file: &FileRef) -> Attachment {
    Attachment::uploaded(file, format!("https://cdn.parley.test/{}", file.name))
}

/// Builder for channel snapshots.
#[derive(Debug, Clone)]
pub struct ChannelBuilder {
    channel: Channel,
}

impl ChannelBuilder {
    /// Unnamed channel with the current user as its only member and both
    /// `read-events` and `upload-file` granted.
    pub fn new(id: &str) -> Self {
        let mut channel = Channel::new(id);
        channel.data.own_capabilities =
            ["read-events", "upload-file"].into_iter().collect::<Capabilities>();
        channel.members.insert(CURRENT_USER.to_string(), Member::from(User::new(CURRENT_USER)));
        Self { channel }
    }

    /// Set the channel name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.channel.data.name = Some(name.to_string());
        self
    }

    /// Set the channel image.
    #[must_use]
    pub fn image(mut self, url: &str) -> Self {
        self.channel.data.image = Some(url.to_string());
        self
    }

    /// Add a member.
    #[must_use]
    pub fn member(mut self, user: User) -> Self {
        self.channel.members.insert(user.id.clone(), Member::from(user));
        self
    }

    /// Append a loaded message.
    #[must_use]
    pub fn message(mut self, message: StreamMessage) -> Self {
        self.channel.messages.push(Arc::new(message));
        self
    }

    /// Set the unread counter.
    #[must_use]
    pub fn unread(mut self, count: u32) -> Self {
        self.channel.unread_count = count;
        self
    }

    /// Replace the granted capabilities.
    #[must_use]
    pub fn capabilities(mut self, capabilities: &[&str]) -> Self {
        self.channel.data.own_capabilities = capabilities.iter().copied().collect();
        self
    }

    /// Set the auto-translation language.
    #[must_use]
    pub fn translated_to(mut self, language: &str) -> Self {
        self.channel.data.auto_translation_language = Some(language.to_string());
        self
    }

    /// Finish the snapshot.
    pub fn build(self) -> Channel {
        self.channel
    }

    /// Finish as a simulated channel seen by [`CURRENT_USER`].
    pub fn simulate(self) -> Arc<SimChannel> {
        Arc::new(SimChannel::new(self.channel, CURRENT_USER))
    }
}
