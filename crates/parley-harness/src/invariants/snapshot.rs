//! Observable state snapshots for invariant checking.
//!
//! Invariants operate on snapshots rather than live state machines so every
//! check sees one consistent moment.

use parley_app::{ChannelPreview, Composer, ComposerView, PreviewView};
use parley_core::{Channel, ChannelId};

/// Snapshot of every component on screen.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Channel the active-channel service reports. `None` if nothing is active.
    pub active_channel: Option<ChannelId>,
    /// One entry per channel preview.
    pub previews: Vec<PreviewSnapshot>,
    /// One entry per composer.
    pub composers: Vec<ComposerSnapshot>,
}

impl SystemSnapshot {
    /// Empty snapshot (no components).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot holding a single preview.
    pub fn single_preview(preview: PreviewSnapshot) -> Self {
        Self { active_channel: None, previews: vec![preview], composers: Vec::new() }
    }

    /// Snapshot holding a single composer.
    pub fn single_composer(composer: ComposerSnapshot) -> Self {
        Self { active_channel: None, previews: Vec::new(), composers: vec![composer] }
    }

    /// Set the active channel.
    #[must_use]
    pub fn with_active_channel(mut self, channel_id: Option<ChannelId>) -> Self {
        self.active_channel = channel_id;
        self
    }

    /// Add a preview.
    pub fn add_preview(&mut self, preview: PreviewSnapshot) {
        self.previews.push(preview);
    }

    /// Add a composer.
    pub fn add_composer(&mut self, composer: ComposerSnapshot) {
        self.composers.push(composer);
    }
}

/// Snapshot of one channel preview.
#[derive(Debug, Clone, Default)]
pub struct PreviewSnapshot {
    /// Bound channel.
    pub channel_id: ChannelId,
    /// The viewer holds `read-events` on the channel.
    pub can_read_events: bool,
    /// Published view.
    pub view: PreviewView,
}

impl PreviewSnapshot {
    /// Capture `preview` bound to `channel`.
    pub fn capture(preview: &ChannelPreview, channel: &Channel) -> Self {
        Self {
            channel_id: preview.channel_id().to_string(),
            can_read_events: channel.data.own_capabilities.can_read_events(),
            view: preview.view().clone(),
        }
    }
}

/// Snapshot of one composer.
#[derive(Debug, Clone, Default)]
pub struct ComposerSnapshot {
    /// Published view.
    pub view: ComposerView,
}

impl ComposerSnapshot {
    /// Capture `composer`.
    pub fn capture(composer: &Composer) -> Self {
        Self { view: composer.view() }
    }
}

impl From<ComposerView> for ComposerSnapshot {
    fn from(view: ComposerView) -> Self {
        Self { view }
    }
}
