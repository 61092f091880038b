//! Async runtimes for the state machines.
//!
//! Each runtime owns one state machine, subscribes it to its collaborators
//! and executes the actions it returns. A runtime runs as a single tokio
//! task and is controlled through a handle:
//!
//! - [`PreviewRuntime`] / [`PreviewHandle`]: one channel preview
//! - [`ComposerRuntime`] / [`ComposerHandle`]: one message composer
//!
//! Dropping a handle stops its task and releases every subscription the
//! task held.

mod composer;
mod preview;

pub use composer::{ComposerHandle, ComposerRuntime, MessageSubmitted};
pub use preview::{PreviewHandle, PreviewRuntime};
