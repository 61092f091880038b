//! Users and message snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{Attachment, MessageId, UserId};

/// A chat user as referenced from messages and member lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable user ID.
    pub id: UserId,
    /// Display name. `None` if the user never set one.
    pub name: Option<String>,
    /// Avatar image URL.
    pub image: Option<String>,
}

impl User {
    /// User with only an ID.
    pub fn new(id: impl Into<UserId>) -> Self {
        Self { id: id.into(), name: None, image: None }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name to show in lists: the display name, or the ID if the name is
    /// missing or empty.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.id,
        }
    }
}

/// Per-language translations of a message's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    texts: BTreeMap<String, String>,
}

impl Translations {
    /// Empty translation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation for `language`.
    #[must_use]
    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(language.into(), text.into());
        self
    }

    /// Translated text for `language`.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.texts.get(language).map(String::as_str)
    }
}

/// Immutable message snapshot delivered by the chat SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    /// Message ID.
    pub id: MessageId,
    /// Message text. `None` for attachment-only messages.
    pub text: Option<String>,
    /// Attachments in display order.
    pub attachments: Vec<Attachment>,
    /// Author.
    pub user: User,
    /// When the message was deleted. `None` if it is live.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Automatic translations.
    pub i18n: Option<Translations>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl StreamMessage {
    /// Text-less message with no attachments, created now.
    pub fn new(id: impl Into<MessageId>, user: User) -> Self {
        Self {
            id: id.into(),
            text: None,
            attachments: Vec::new(),
            user,
            deleted_at: None,
            i18n: None,
            created_at: Utc::now(),
        }
    }

    /// Set the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the attachments.
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Set the translations.
    #[must_use]
    pub fn with_translations(mut self, translations: Translations) -> Self {
        self.i18n = Some(translations);
        self
    }

    /// Mark as deleted at `at`.
    #[must_use]
    pub fn deleted(mut self, at: DateTime<Utc>) -> Self {
        self.deleted_at = Some(at);
        self
    }

    /// Set the creation time.
    #[must_use]
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Check whether the message carries a deletion timestamp.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Translated text for `language`, if the SDK provided one.
    pub fn translation(&self, language: &str) -> Option<&str> {
        self.i18n.as_ref().and_then(|t| t.get(language))
    }

    /// Text, or the empty string if there is none.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}
