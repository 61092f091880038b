//! Application layer for Parley
//!
//! Pure state machines for a chat client's channel previews and message
//! composer, plus the async runtimes that drive them against the chat SDK's
//! collaborators. The state machines do no I/O, so tests and simulations run
//! the same code as production.
//!
//! # Components
//!
//! - [`ChannelPreview`]: Derives one channel list entry (title, latest
//!   message, unread badge, active marker) from channel events
//! - [`Composer`]: Message draft with attachment uploads, edit mode and send
//!   gating
//! - [`PreviewRuntime`] / [`ComposerRuntime`]: tokio tasks executing the
//!   state machines' actions
//! - [`Subscription`]: Lifetime guard that releases a runtime's subscriptions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod composer;
mod config;
mod error;
mod event;
mod preview;
mod runtime;
mod state;
mod subscription;

pub use action::{ComposerAction, PreviewAction};
pub use composer::Composer;
pub use config::{ComposerConfig, ComposerTexts, Placeholders, PreviewConfig};
pub use error::RuntimeError;
pub use event::{ComposerEvent, PreviewEvent};
pub use preview::{ChannelPreview, display_text, display_title};
pub use runtime::{
    ComposerHandle, ComposerRuntime, MessageSubmitted, PreviewHandle, PreviewRuntime,
};
pub use state::{
    AttachmentUpload, Avatar, ComposerMode, ComposerView, NotificationId, PreviewView, SendTicket,
    UploadId, UploadStatus,
};
pub use subscription::Subscription;
