//! Simulation harness for Parley.
//!
//! In-memory implementations of the chat SDK collaborators so the preview and
//! composer runtimes can be driven deterministically in tests and demos.
//!
//! # Collaborators
//!
//! - [`SimChannel`]: Channel state plus its event stream
//! - [`SimActiveChannel`]: Active-channel source and selector
//! - [`SimUploader`], [`SimMessenger`], [`SimNotifier`]: Upload, messaging
//!   and notification services that record every call
//!
//! # Scenarios
//!
//! [`ScenarioGenerator`] turns a seed into a reproducible stream of channel
//! activity that [`SimWorld`] plays against the simulated SDK.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties of previews and
//! composers against snapshots. Use [`InvariantRegistry::standard()`] for the
//! common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod invariants;
pub mod scenario;
mod sim_active;
mod sim_channel;
mod sim_services;

pub use invariants::{
    ActivePreviewMatchesSelection, ComposerSnapshot, Invariant, InvariantRegistry,
    InvariantResult, NoticeOnlyWhileUploading, PreviewSnapshot, Subject, SystemSnapshot,
    UnreadCountMatchesFlag, UnreadImpliesInactive, UnreadRequiresReadEvents, UploadIdsUnique,
    Violation,
};
pub use scenario::{Activity, ScenarioGenerator, SimWorld};
pub use sim_active::SimActiveChannel;
pub use sim_channel::{DEFAULT_EVENT_CAPACITY, SimChannel};
pub use sim_services::{PersistentNotice, SentMessage, SimMessenger, SimNotifier, SimUploader};
