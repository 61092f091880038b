//! Component configuration.
//!
//! Texts shown to the user are configuration rather than constants so a host
//! application can localize them.

use parley_core::UserId;

/// Placeholder texts for the preview's latest-message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    /// Shown when the channel has no messages.
    pub no_messages: String,
    /// Shown when the latest message is deleted.
    pub deleted: String,
    /// Shown when the latest message has attachments but no text.
    pub attachment: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            no_messages: "Nothing yet...".to_string(),
            deleted: "Message deleted".to_string(),
            attachment: "🏙 Attachment...".to_string(),
        }
    }
}

/// Configuration for a [`crate::ChannelPreview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Current user. Excluded from generated titles and never translated.
    pub current_user: UserId,
    /// Latest-message placeholders.
    pub placeholders: Placeholders,
    /// Separator between member names in generated titles.
    pub title_separator: String,
}

impl PreviewConfig {
    /// Default configuration for `current_user`.
    pub fn new(current_user: impl Into<UserId>) -> Self {
        Self {
            current_user: current_user.into(),
            placeholders: Placeholders::default(),
            title_separator: ", ".to_string(),
        }
    }
}

/// Notification texts shown by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerTexts {
    /// Persistent notice while a send waits for uploads.
    pub wait_for_uploads: String,
    /// Temporary notice when an upload fails.
    pub upload_failed: String,
    /// Temporary notice when an edit is rejected.
    pub edit_failed: String,
    /// Temporary notice when a new message is rejected. Only shown with
    /// [`ComposerConfig::report_compose_failures`].
    pub send_failed: String,
}

impl Default for ComposerTexts {
    fn default() -> Self {
        Self {
            wait_for_uploads: "Wait until all attachments have uploaded".to_string(),
            upload_failed: "Error uploading file, maybe it exceeds the size limit".to_string(),
            edit_failed: "Edit message request failed".to_string(),
            send_failed: "Message could not be sent".to_string(),
        }
    }
}

/// Configuration for a [`crate::Composer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Allow attaching files at all.
    pub file_upload_enabled: bool,
    /// Accept every file of a selection. When off only the first is kept.
    pub multiple_file_upload_enabled: bool,
    /// MIME types or extensions offered by the file picker. Empty accepts
    /// everything.
    pub accepted_file_types: Vec<String>,
    /// Show [`ComposerTexts::send_failed`] when a new message fails to send.
    /// Off by default: compose failures are only logged.
    pub report_compose_failures: bool,
    /// Notification texts.
    pub texts: ComposerTexts,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            file_upload_enabled: true,
            multiple_file_upload_enabled: true,
            accepted_file_types: Vec::new(),
            report_compose_failures: false,
            texts: ComposerTexts::default(),
        }
    }
}

impl ComposerConfig {
    /// Value for the file picker's `accept` attribute.
    pub fn accept_attribute(&self) -> String {
        self.accepted_file_types.join(",")
    }
}
