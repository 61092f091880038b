//! Channel preview reconciler.
//!
//! This module defines the [`ChannelPreview`] state machine, which derives the
//! display state of one entry in a channel list: title, latest-message line,
//! active highlight and unread badge.
//!
//! This is a pure state machine: it consumes [`crate::PreviewEvent`] inputs
//! together with a snapshot of the channel taken after the event was applied,
//! and produces [`crate::PreviewAction`] instructions. Every input is handled
//! synchronously; there are no suspension points.
//!
//! # Responsibilities
//!
//! - Tracks whether the bound channel is the active one.
//! - Mirrors the channel's unread counter, gated on the `read-events`
//!   capability and suppressed while the channel is active.
//! - Picks the latest-message line (translation, deletion and attachment
//!   placeholders).

use std::sync::Arc;

use parley_core::{Channel, ChannelEvent, ChannelId, StreamMessage};

use crate::{
    PreviewAction, PreviewConfig, PreviewEvent,
    config::Placeholders,
    state::{Avatar, PreviewView},
};

/// Channel preview state machine.
///
/// One instance per channel; instances share nothing.
#[derive(Debug, Clone)]
pub struct ChannelPreview {
    /// Current user, placeholders, separator.
    config: PreviewConfig,
    /// ID of the bound channel.
    channel_id: ChannelId,
    /// Last known active channel. `None` if nothing is active.
    active_channel: Option<ChannelId>,
    /// Derived view state.
    view: PreviewView,
}

impl ChannelPreview {
    /// Bind a new preview to `channel`.
    ///
    /// `active_channel` is the active channel at bind time; later changes
    /// arrive as [`PreviewEvent::ActiveChannelChanged`].
    pub fn new(
        config: PreviewConfig,
        channel: &Channel,
        active_channel: Option<ChannelId>,
    ) -> Self {
        let mut preview = Self {
            config,
            channel_id: channel.id.clone(),
            active_channel,
            view: PreviewView::default(),
        };
        preview.rebuild(channel);
        preview
    }

    /// Rebind to `channel` and recompute the whole view.
    ///
    /// Used when the bound channel changes, or when events were missed and
    /// incremental updates can no longer be trusted.
    pub fn bind(&mut self, channel: &Channel) -> Vec<PreviewAction> {
        let before = self.view.clone();
        self.channel_id.clone_from(&channel.id);
        self.rebuild(channel);
        self.render_if_changed(&before)
    }

    /// Process an event and return actions.
    ///
    /// `channel` is the channel snapshot after the SDK applied the event.
    pub fn handle(&mut self, event: PreviewEvent, channel: &Channel) -> Vec<PreviewAction> {
        let before = self.view.clone();
        match event {
            PreviewEvent::ActiveChannelChanged { channel_id } => {
                self.view.is_active = channel_id.as_deref() == Some(self.channel_id.as_str());
                self.active_channel = channel_id;
                self.refresh_unread(channel);
            },
            PreviewEvent::Channel(event) => self.handle_channel_event(event, channel),
        }
        self.render_if_changed(&before)
    }

    /// The user clicked the preview.
    pub fn click(&self) -> Vec<PreviewAction> {
        vec![PreviewAction::SelectChannel { channel_id: self.channel_id.clone() }]
    }

    /// Current view state.
    pub fn view(&self) -> &PreviewView {
        &self.view
    }

    /// ID of the bound channel.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Last known active channel.
    pub fn active_channel(&self) -> Option<&str> {
        self.active_channel.as_deref()
    }

    fn handle_channel_event(&mut self, event: ChannelEvent, channel: &Channel) {
        tracing::trace!(channel_id = %self.channel_id, event = event.name(), "channel event");
        match event {
            ChannelEvent::MessageNew { message } => {
                self.view.display_text = self.text_for(Some(&*message), channel);
                self.refresh_unread(channel);
            },
            ChannelEvent::MessageUpdated { message } | ChannelEvent::MessageDeleted { message } => {
                // Only the tail of the message list is shown
                if channel.is_latest(&message.id) {
                    self.view.display_text = self.text_for(Some(&*message), channel);
                }
            },
            ChannelEvent::ChannelTruncated => {
                self.view.display_text = self.text_for(None, channel);
            },
            ChannelEvent::MessageRead { .. } => self.refresh_unread(channel),
        }
    }

    fn rebuild(&mut self, channel: &Channel) {
        self.view.is_active = self.active_channel.as_deref() == Some(channel.id.as_str());
        self.view.display_title =
            display_title(channel, &self.config.current_user, &self.config.title_separator);
        self.view.avatar = Avatar {
            image_url: channel.data.image.clone(),
            name: channel.data.name.clone().unwrap_or_else(|| self.view.display_title.clone()),
        };
        self.view.display_text = self.text_for(channel.latest_message().map(Arc::as_ref), channel);
        self.refresh_unread(channel);
    }

    fn refresh_unread(&mut self, channel: &Channel) {
        let count = if self.view.is_active || !channel.data.own_capabilities.can_read_events() {
            0
        } else {
            channel.count_unread()
        };
        self.view.unread_count = count;
        self.view.is_unread = count > 0;
    }

    fn text_for(&self, message: Option<&StreamMessage>, channel: &Channel) -> String {
        display_text(
            message,
            channel.data.auto_translation_language.as_deref(),
            &self.config.current_user,
            &self.config.placeholders,
        )
    }

    fn render_if_changed(&self, before: &PreviewView) -> Vec<PreviewAction> {
        if &self.view == before { vec![] } else { vec![PreviewAction::Render] }
    }
}

/// Latest-message line for `message`.
///
/// Deletion wins over everything; a translation into
/// `translation_language` wins over the original text unless the current
/// user wrote the message.
pub fn display_text(
    message: Option<&StreamMessage>,
    translation_language: Option<&str>,
    current_user: &str,
    placeholders: &Placeholders,
) -> String {
    let Some(message) = message else {
        return placeholders.no_messages.clone();
    };

    if message.is_deleted() {
        return placeholders.deleted.clone();
    }

    if message.user.id != current_user
        && let Some(translated) = translation_language.and_then(|lang| message.translation(lang))
    {
        return translated.to_string();
    }

    match message.text.as_deref() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ if !message.attachments.is_empty() => placeholders.attachment.clone(),
        _ => String::new(),
    }
}

/// Channel title: the channel name, or the other members' names.
///
/// Falls back to the channel ID when the channel is unnamed and has no
/// other members.
pub fn display_title(channel: &Channel, current_user: &str, separator: &str) -> String {
    if let Some(name) = channel.data.name.as_deref().filter(|name| !name.is_empty()) {
        return name.to_string();
    }

    let others: Vec<&str> = channel
        .members
        .values()
        .filter(|member| member.user.id != current_user)
        .map(|member| member.user.display_name())
        .collect();

    if others.is_empty() { channel.id.clone() } else { others.join(separator) }
}
