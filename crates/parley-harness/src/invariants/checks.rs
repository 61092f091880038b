//! Standard preview and composer invariants.

use std::collections::BTreeSet;

use super::{ComposerSnapshot, Invariant, InvariantResult, PreviewSnapshot, SystemSnapshot};

/// The active channel is never shown as unread.
pub struct UnreadImpliesInactive;

impl Invariant for UnreadImpliesInactive {
    fn name(&self) -> &'static str {
        "unread_implies_inactive"
    }

    fn check_preview(&self, preview: &PreviewSnapshot, _state: &SystemSnapshot) -> InvariantResult {
        if preview.view.is_unread && preview.view.is_active {
            return Err("active and unread".to_string());
        }
        Ok(())
    }
}

/// The badge count is positive exactly when the channel is unread.
pub struct UnreadCountMatchesFlag;

impl Invariant for UnreadCountMatchesFlag {
    fn name(&self) -> &'static str {
        "unread_count_matches_flag"
    }

    fn check_preview(&self, preview: &PreviewSnapshot, _state: &SystemSnapshot) -> InvariantResult {
        let view = &preview.view;
        if view.is_unread != (view.unread_count > 0) {
            return Err(format!(
                "is_unread={} but unread_count={}",
                view.is_unread, view.unread_count
            ));
        }
        Ok(())
    }
}

/// Unread state is only derived when the viewer may read events.
pub struct UnreadRequiresReadEvents;

impl Invariant for UnreadRequiresReadEvents {
    fn name(&self) -> &'static str {
        "unread_requires_read_events"
    }

    fn check_preview(&self, preview: &PreviewSnapshot, _state: &SystemSnapshot) -> InvariantResult {
        if preview.view.is_unread && !preview.can_read_events {
            return Err("unread without read-events".to_string());
        }
        Ok(())
    }
}

/// Only the preview of the active channel is marked active.
pub struct ActivePreviewMatchesSelection;

impl Invariant for ActivePreviewMatchesSelection {
    fn name(&self) -> &'static str {
        "active_preview_matches_selection"
    }

    fn check_preview(&self, preview: &PreviewSnapshot, state: &SystemSnapshot) -> InvariantResult {
        let selected = state.active_channel.as_deref() == Some(preview.channel_id.as_str());
        if preview.view.is_active != selected {
            return Err(format!(
                "is_active={} but active channel is {:?}",
                preview.view.is_active, state.active_channel
            ));
        }
        Ok(())
    }
}

/// The in-progress counter matches the list, and the wait-for-uploads notice
/// only shows while something is in progress.
pub struct NoticeOnlyWhileUploading;

impl Invariant for NoticeOnlyWhileUploading {
    fn name(&self) -> &'static str {
        "notice_only_while_uploading"
    }

    fn check_composer(&self, composer: &ComposerSnapshot) -> InvariantResult {
        let view = &composer.view;
        let in_progress = view.uploads.iter().filter(|u| u.status.is_in_progress()).count();
        if in_progress != view.uploads_in_progress {
            return Err(format!(
                "reports {} uploads in progress, list has {in_progress}",
                view.uploads_in_progress
            ));
        }
        if view.is_waiting_for_uploads && in_progress == 0 {
            return Err("notice showing with no upload in progress".to_string());
        }
        Ok(())
    }
}

/// Upload IDs within one composer are unique.
pub struct UploadIdsUnique;

impl Invariant for UploadIdsUnique {
    fn name(&self) -> &'static str {
        "upload_ids_unique"
    }

    fn check_composer(&self, composer: &ComposerSnapshot) -> InvariantResult {
        let mut seen = BTreeSet::new();
        match composer.view.uploads.iter().find(|upload| !seen.insert(upload.id)) {
            Some(upload) => Err(format!("upload id {} repeated", upload.id)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_app::{AttachmentUpload, ComposerView, PreviewView, UploadStatus};
    use parley_core::FileRef;

    use super::*;
    
    fn preview(view: PreviewView) -> PreviewSnapshot {
        PreviewSnapshot { channel_id: "c".into(), can_read_events: true, view }
    }

    fn upload(id: u64, status: UploadStatus) -> AttachmentUpload {
        AttachmentUpload { id, file: FileRef::new("a.png", "image/png", 1), status }
    }

    #[test]
    fn active_unread_channel_violates() {
        let view =
            PreviewView { is_active: true, is_unread: true, unread_count: 2, ..Default::default() };
        let state = SystemSnapshot::single_preview(preview(view));
        assert_eq!(UnreadImpliesInactive.check(&state).len(), 1);
    }

    #[test]
    fn zero_count_with_flag_violates() {
        let view = PreviewView { is_unread: true, unread_count: 0, ..Default::default() };
        let state = SystemSnapshot::single_preview(preview(view));
        assert_eq!(UnreadCountMatchesFlag.check(&state).len(), 1);
    }

    #[test]
    fn unread_without_capability_violates() {
        let view = PreviewView { is_unread: true, unread_count: 1, ..Default::default() };
        let mut snapshot = preview(view);
        snapshot.can_read_events = false;
        let state = SystemSnapshot::single_preview(snapshot);
        assert_eq!(UnreadRequiresReadEvents.check(&state).len(), 1);
    }

    #[test]
    fn active_flag_must_follow_selection() {
        let view = PreviewView { is_active: true, ..Default::default() };
        let state =
            SystemSnapshot::single_preview(preview(view)).with_active_channel(Some("other".into()));
        assert_eq!(ActivePreviewMatchesSelection.check(&state).len(), 1);

        let state = state.with_active_channel(Some("c".into()));
        assert!(ActivePreviewMatchesSelection.check(&state).is_empty());
    }

    #[test]
    fn notice_without_uploads_violates() {
        let view = ComposerView { is_waiting_for_uploads: true, ..Default::default() };
        let state = SystemSnapshot::single_composer(ComposerSnapshot::from(view));
        assert_eq!(NoticeOnlyWhileUploading.check(&state).len(), 1);
    }

    #[test]
    fn repeated_upload_id_violates() {
        let view = ComposerView {
            uploads: vec![upload(1, UploadStatus::Failed), upload(1, UploadStatus::Failed)],
            ..Default::default()
        };
        let state = SystemSnapshot::single_composer(ComposerSnapshot::from(view));
        assert_eq!(UploadIdsUnique.check(&state).len(), 1);
    }
}
