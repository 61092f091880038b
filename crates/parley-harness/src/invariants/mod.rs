//! Invariants over previews and composers.
//!
//! Each [`Invariant`] states a property of one preview or one composer,
//! optionally relative to the active channel. The registry walks every
//! subject in a [`SystemSnapshot`] and collects one [`Violation`] per failing
//! (invariant, subject) pair, so a broken step reports everything at once.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::single_preview(PreviewSnapshot::capture(&preview, &channel));
//! registry.assert_all(&snapshot, "after message.new");
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    ActivePreviewMatchesSelection, NoticeOnlyWhileUploading, UnreadCountMatchesFlag,
    UnreadImpliesInactive, UnreadRequiresReadEvents, UploadIdsUnique,
};
use parley_core::ChannelId;
pub use snapshot::{ComposerSnapshot, PreviewSnapshot, SystemSnapshot};

/// Outcome of checking one subject. `Err` holds the failure description.
pub type InvariantResult = Result<(), String>;

/// What a violation is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// Preview bound to this channel.
    Preview(ChannelId),
    /// Composer at this index of [`SystemSnapshot::composers`].
    Composer(usize),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preview(channel_id) => write!(f, "preview {channel_id}"),
            Self::Composer(index) => write!(f, "composer #{index}"),
        }
    }
}

/// A property that failed for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the failing invariant.
    pub invariant: &'static str,
    /// Preview or composer it failed for.
    pub subject: Subject,
    /// What was observed.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.invariant, self.subject, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of a single preview or composer.
///
/// Implement whichever of the two hooks applies; the other defaults to
/// holding.
pub trait Invariant: Send + Sync {
    /// Name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check one preview. `state` gives access to the active channel.
    fn check_preview(
        &self,
        _preview: &PreviewSnapshot,
        _state: &SystemSnapshot,
    ) -> InvariantResult {
        Ok(())
    }

    /// Check one composer.
    fn check_composer(&self, _composer: &ComposerSnapshot) -> InvariantResult {
        Ok(())
    }

    /// Every violation of this invariant in `state`.
    fn check(&self, state: &SystemSnapshot) -> Vec<Violation> {
        let previews = state.previews.iter().filter_map(|preview| {
            self.check_preview(preview, state).err().map(|message| Violation {
                invariant: self.name(),
                subject: Subject::Preview(preview.channel_id.clone()),
                message,
            })
        });
        let composers = state.composers.iter().enumerate().filter_map(|(index, composer)| {
            self.check_composer(composer).err().map(|message| Violation {
                invariant: self.name(),
                subject: Subject::Composer(index),
                message,
            })
        });
        previews.chain(composers).collect()
    }
}

/// Set of invariants checked together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every preview and composer invariant.
    ///
    /// [`ActivePreviewMatchesSelection`] is left out: it only holds once the
    /// active channel has propagated to every preview. Add it explicitly
    /// where the snapshot is taken at rest.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UnreadImpliesInactive);
        registry.add(UnreadCountMatchesFlag);
        registry.add(UnreadRequiresReadEvents);
        registry.add(NoticeOnlyWhileUploading);
        registry.add(UploadIdsUnique);
        registry
    }

    /// Register `invariant`.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check every registered invariant against every subject in `state`.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().flat_map(|invariant| invariant.check(state)).collect();
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Like [`Self::check_all`], but panics listing every violation.
    ///
    /// `context` names the step that produced `state`.
    #[allow(clippy::panic, reason = "test helper reports violations by panicking")]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let report = violations.iter().map(ToString::to_string).collect::<Vec<_>>();
            panic!(
                "{} invariant violation(s) {context}:\n  {}",
                violations.len(),
                report.join("\n  ")
            );
        }
    }

    /// Names of the registered invariants, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(|invariant| invariant.name()).collect()
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvariantRegistry").field("invariants", &self.names()).finish()
    }
}
