//! Observable component state.
//!
//! These structures are the view models the state machines publish. They
//! hold everything a renderer needs and nothing about how the state was
//! derived.

use std::sync::Arc;

use parley_core::{Attachment, FileRef, MessageId, StreamMessage};

/// Channel avatar shown next to a preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Avatar {
    /// Channel image URL.
    pub image_url: Option<String>,
    /// Name used for the initials fallback.
    pub name: String,
}

/// Derived state of one channel preview.
///
/// Invariants: `is_unread` implies `!is_active`, and `unread_count` is 0
/// whenever `is_unread` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewView {
    /// This channel is the active channel.
    pub is_active: bool,
    /// Show the unread styling and badge.
    pub is_unread: bool,
    /// Badge count. 0 unless `is_unread`.
    pub unread_count: u32,
    /// Latest-message line.
    pub display_text: String,
    /// Channel title.
    pub display_title: String,
    /// Avatar.
    pub avatar: Avatar,
}

impl PreviewView {
    /// Badge text. `None` if no badge is shown.
    pub fn badge(&self) -> Option<String> {
        self.is_unread.then(|| self.unread_count.to_string())
    }

    /// One-line rendering: active marker, title, latest message, badge.
    pub fn summary(&self) -> String {
        let marker = if self.is_active { '>' } else { ' ' };
        let badge = self.badge().map(|b| format!(" ({b})")).unwrap_or_default();
        format!("{marker} {}: {}{badge}", self.display_title, self.display_text)
    }
}

/// Local ID of an attachment upload within one composer.
pub type UploadId = u64;

/// ID of a persistent notification requested by a composer.
pub type NotificationId = u64;

/// ID correlating a send/update request with its outcome.
pub type SendTicket = u64;

/// Upload progress of one attachment.
///
/// The remote reference exists exactly when the upload succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Selected, upload not started yet.
    Pending,
    /// Upload in flight.
    Uploading,
    /// Uploaded (or carried over from an edited message).
    Success {
        /// Remote attachment reference.
        attachment: Attachment,
    },
    /// Upload failed. Retried only on explicit request.
    Failed,
}

impl UploadStatus {
    /// Pending or uploading.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Uploading)
    }

    /// Remote reference of a successful upload.
    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Self::Success { attachment } => Some(attachment),
            Self::Pending | Self::Uploading | Self::Failed => None,
        }
    }
}

/// One entry of the composer's attachment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Local ID.
    pub id: UploadId,
    /// Selected file.
    pub file: FileRef,
    /// Upload progress.
    pub status: UploadStatus,
}

/// Whether the composer writes a new message or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComposerMode {
    /// Writing a new message.
    #[default]
    Compose,
    /// Editing the contained message.
    Edit(Arc<StreamMessage>),
}

impl ComposerMode {
    /// ID of the message being edited. `None` in compose mode.
    pub fn editing(&self) -> Option<&MessageId> {
        match self {
            Self::Compose => None,
            Self::Edit(message) => Some(&message.id),
        }
    }
}

/// Snapshot of the composer's draft for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerView {
    /// Compose or edit.
    pub mode: ComposerMode,
    /// Draft text.
    pub text: String,
    /// Attachment list in selection order.
    pub uploads: Vec<AttachmentUpload>,
    /// The user may upload files in the active channel.
    pub is_file_upload_authorized: bool,
    /// Entries still pending or uploading.
    pub uploads_in_progress: usize,
    /// The wait-for-uploads notice is showing.
    pub is_waiting_for_uploads: bool,
}
