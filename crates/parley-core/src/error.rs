//! Error types reported by collaborators.
//!
//! None of these are fatal to the state machines. Upload errors turn an
//! attachment entry into `failed`; send errors become a notification (edit)
//! or a log line (compose).

use thiserror::Error;

use crate::MessageId;

/// Errors from the attachment upload collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The backend refused the file (type not allowed, quota, ...).
    #[error("upload rejected: {reason}")]
    Rejected {
        /// Reason given by the backend.
        reason: String,
    },

    /// File exceeds the backend size limit.
    #[error("file too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Size of the file.
        size: u64,
        /// Maximum accepted size.
        limit: u64,
    },

    /// Network or server failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl UploadError {
    /// Returns true if a manual retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Errors from the send/update-message collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The backend refused the message (permissions, validation, ...).
    #[error("message rejected: {0}")]
    Rejected(String),

    /// The message to update no longer exists.
    #[error("message {message_id} not found")]
    NotFound {
        /// ID of the missing message.
        message_id: MessageId,
    },

    /// Network or server failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl SendError {
    /// Returns true if resending might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
