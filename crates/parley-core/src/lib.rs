//! Parley core
//!
//! Domain model and collaborator contracts shared by the channel-preview and
//! message-composer state machines.
//!
//! The chat protocol, persistence and transport all live in an external chat
//! SDK. This crate only describes the slice of that SDK the state machines
//! read from ([`Channel`], [`StreamMessage`], [`ChannelEvent`]) and the
//! interfaces they drive ([`collaborator`]).
//!
//! # Components
//!
//! - [`Channel`]: Read-only snapshot of one channel (data, members, messages,
//!   unread counter)
//! - [`StreamMessage`]: Immutable message snapshot
//! - [`ChannelEvent`]: Closed set of channel lifecycle events
//! - [`Capability`]: Permission tokens granted on a channel
//! - [`collaborator`]: Traits for the SDK services the runtimes call

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attachment;
mod capability;
mod channel;
pub mod collaborator;
mod error;
mod event;
mod message;

pub use attachment::{Attachment, AttachmentKind, FileRef};
pub use capability::{Capabilities, Capability};
pub use channel::{ActiveChannel, Channel, ChannelData, Member};
pub use collaborator::{
    ActiveChannelSource, AttachmentUploader, ChannelHandle, ChannelSelector, DismissHandle,
    MessageSender, Notifier,
};
pub use error::{SendError, UploadError};
pub use event::ChannelEvent;
pub use message::{StreamMessage, Translations, User};

/// Opaque channel identifier.
pub type ChannelId = String;

/// Opaque user identifier.
pub type UserId = String;

/// Opaque message identifier.
pub type MessageId = String;
