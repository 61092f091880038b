//! Message composer state machine.
//!
//! This module defines the [`Composer`], which owns the draft of one message:
//! its text, the attachment upload queue, and whether the user may upload
//! files in the active channel.
//!
//! This is a pure state machine: user intents are methods, collaborator
//! outcomes arrive as [`crate::ComposerEvent`]s, and both return
//! [`crate::ComposerAction`] instructions for the runtime to execute.
//!
//! # Modes
//!
//! - **Compose**: writes a new message. Starts with an empty draft.
//! - **Edit**: rewrites an existing message. The draft is seeded from the
//!   message once, when it is loaded, and never re-seeded for the same
//!   message.
//!
//! # Uploads
//!
//! Each selected file moves `Pending → Uploading → Success | Failed`. Sends
//! are refused while any upload is pending or uploading; the first refusal
//! raises a persistent notice that is dismissed as soon as the last upload
//! settles.

use std::{collections::BTreeMap, sync::Arc};

use parley_core::{ActiveChannel, Attachment, FileRef, MessageId, StreamMessage};

use crate::{
    ComposerAction, ComposerConfig, ComposerEvent,
    state::{
        AttachmentUpload, ComposerMode, ComposerView, NotificationId, SendTicket, UploadId,
        UploadStatus,
    },
};

/// A send or update awaiting its outcome.
#[derive(Debug, Clone)]
struct PendingSend {
    /// Edited message. `None` for a new message.
    edited: Option<MessageId>,
    /// Draft generation the send was taken from.
    draft: u64,
}

/// Message composer state machine.
///
/// No I/O dependencies; one instance per composer on screen.
#[derive(Debug, Clone)]
pub struct Composer {
    config: ComposerConfig,
    /// Active channel. `None` if nothing is active.
    channel: Option<ActiveChannel>,
    /// Active channel grants `upload-file`.
    is_file_upload_authorized: bool,
    mode: ComposerMode,
    text: String,
    /// Attachment list in selection order.
    uploads: Vec<AttachmentUpload>,
    /// Bumped whenever the upload list is reset. Outcomes of sends taken
    /// from an older draft must not reset the current one.
    draft: u64,
    /// Wait-for-uploads notice currently showing.
    wait_notice: Option<NotificationId>,
    /// Sends and updates awaiting their outcome.
    in_flight: BTreeMap<SendTicket, PendingSend>,
    next_upload_id: UploadId,
    next_notification_id: NotificationId,
    next_ticket: SendTicket,
}

impl Composer {
    /// Create a composer in compose mode with no active channel.
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            config,
            channel: None,
            is_file_upload_authorized: false,
            mode: ComposerMode::Compose,
            text: String::new(),
            uploads: Vec::new(),
            draft: 0,
            wait_notice: None,
            in_flight: BTreeMap::new(),
            next_upload_id: 0,
            next_notification_id: 0,
            next_ticket: 0,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: ComposerEvent) -> Vec<ComposerAction> {
        match event {
            ComposerEvent::ActiveChannelChanged(channel) => {
                self.is_file_upload_authorized =
                    channel.as_ref().is_some_and(|c| c.capabilities.can_upload_file());
                tracing::debug!(
                    channel = channel.as_ref().map(|c| c.cid.as_str()),
                    upload_authorized = self.is_file_upload_authorized,
                    "active channel changed, resetting draft"
                );
                self.channel = channel;
                self.text.clear();
                let mut actions = self.reset_uploads();
                actions.push(ComposerAction::Render);
                actions
            },
            ComposerEvent::UploadStarted { upload_id } => match self.upload_mut(upload_id) {
                Some(upload) if upload.status == UploadStatus::Pending => {
                    upload.status = UploadStatus::Uploading;
                    vec![ComposerAction::Render]
                },
                _ => {
                    tracing::trace!(upload_id, "ignoring start of untracked upload");
                    vec![]
                },
            },
            ComposerEvent::UploadSucceeded { upload_id, attachment } => {
                match self.upload_mut(upload_id) {
                    Some(upload) if upload.status.is_in_progress() => {
                        upload.status = UploadStatus::Success { attachment };
                    },
                    _ => {
                        tracing::trace!(upload_id, "ignoring result of untracked upload");
                        return vec![];
                    },
                }
                let mut actions = self.dismiss_if_idle();
                actions.push(ComposerAction::Render);
                actions
            },
            ComposerEvent::UploadFailed { upload_id, error } => {
                match self.upload_mut(upload_id) {
                    Some(upload) if upload.status.is_in_progress() => {
                        let file = &upload.file.name;
                        let transient = error.is_transient();
                        tracing::warn!(upload_id, %file, transient, %error, "upload failed");
                        upload.status = UploadStatus::Failed;
                    },
                    _ => {
                        tracing::trace!(upload_id, "ignoring failure of untracked upload");
                        return vec![];
                    },
                }
                let mut actions = vec![ComposerAction::ShowTemporaryNotification {
                    text: self.config.texts.upload_failed.clone(),
                }];
                actions.extend(self.dismiss_if_idle());
                actions.push(ComposerAction::Render);
                actions
            },
            ComposerEvent::SendSucceeded { ticket } => {
                let Some(pending) = self.in_flight.remove(&ticket) else {
                    return vec![];
                };
                let compose = pending.edited.is_none();
                let mut actions = vec![ComposerAction::MessageSubmitted { edited: pending.edited }];
                if compose && pending.draft == self.draft {
                    actions.extend(self.reset_uploads());
                    actions.push(ComposerAction::Render);
                }
                actions
            },
            ComposerEvent::SendFailed { ticket, error } => {
                let Some(pending) = self.in_flight.remove(&ticket) else {
                    return vec![];
                };
                if let Some(message_id) = pending.edited {
                    let transient = error.is_transient();
                    tracing::warn!(%message_id, transient, %error, "message update failed");
                    return vec![ComposerAction::ShowTemporaryNotification {
                        text: self.config.texts.edit_failed.clone(),
                    }];
                }
                // Draft was already cleared when the send started
                tracing::warn!(transient = error.is_transient(), %error, "message send failed");
                if self.config.report_compose_failures {
                    vec![ComposerAction::ShowTemporaryNotification {
                        text: self.config.texts.send_failed.clone(),
                    }]
                } else {
                    vec![]
                }
            },
        }
    }

    /// Load a message for editing, or return to compose mode with `None`.
    ///
    /// Passing the message currently being edited (the same `Arc`) is a
    /// no-op, so the draft is never re-seeded from it.
    pub fn set_message(&mut self, message: Option<Arc<StreamMessage>>) -> Vec<ComposerAction> {
        let unchanged = match (&self.mode, &message) {
            (ComposerMode::Compose, None) => true,
            (ComposerMode::Edit(current), Some(next)) => Arc::ptr_eq(current, next),
            _ => false,
        };
        if unchanged {
            return vec![];
        }

        let mut actions = self.reset_uploads();
        if let Some(message) = message {
            tracing::debug!(message_id = %message.id, "editing message");
            self.text = message.text.clone().unwrap_or_default();
            for attachment in &message.attachments {
                let id = self.allocate_upload_id();
                self.uploads.push(AttachmentUpload {
                    id,
                    file: FileRef::from_attachment(attachment),
                    status: UploadStatus::Success { attachment: attachment.clone() },
                });
            }
            self.mode = ComposerMode::Edit(message);
        } else {
            self.text.clear();
            self.mode = ComposerMode::Compose;
        }
        actions.push(ComposerAction::Render);
        actions
    }

    /// Replace the draft text.
    pub fn set_text(&mut self, text: impl Into<String>) -> Vec<ComposerAction> {
        let text = text.into();
        if text == self.text {
            return vec![];
        }
        self.text = text;
        vec![ComposerAction::Render]
    }

    /// The user picked files.
    ///
    /// An empty selection is a no-op, as is any selection while uploads are
    /// disabled or not authorized in the active channel. With multiple
    /// upload disabled only the first file is kept.
    pub fn files_selected(&mut self, files: Vec<FileRef>) -> Vec<ComposerAction> {
        if files.is_empty() {
            return vec![];
        }
        if !self.config.file_upload_enabled || !self.is_file_upload_authorized {
            tracing::debug!(count = files.len(), "file upload not allowed, ignoring selection");
            return vec![];
        }
        let Some(cid) = self.channel.as_ref().map(|c| c.cid.clone()) else {
            return vec![];
        };

        let accepted = if self.config.multiple_file_upload_enabled { files.len() } else { 1 };
        let mut actions = Vec::with_capacity(accepted + 1);
        for file in files.into_iter().take(accepted) {
            let upload_id = self.allocate_upload_id();
            tracing::debug!(upload_id, file = %file.name, "queueing upload");
            self.uploads.push(AttachmentUpload {
                id: upload_id,
                file: file.clone(),
                status: UploadStatus::Pending,
            });
            actions.push(ComposerAction::StartUpload { upload_id, cid: cid.clone(), file });
        }
        actions.push(ComposerAction::Render);
        actions
    }

    /// The user asked to send the draft.
    ///
    /// Refused while uploads are in progress. A draft with no text and no
    /// uploaded attachment is silently ignored.
    pub fn send(&mut self) -> Vec<ComposerAction> {
        let in_progress = self.uploads_in_progress();
        if in_progress > 0 {
            if self.wait_notice.is_some() {
                return vec![];
            }
            let id = self.next_notification_id;
            self.next_notification_id += 1;
            self.wait_notice = Some(id);
            tracing::debug!(in_progress, "send refused until uploads finish");
            return vec![
                ComposerAction::ShowPersistentNotification {
                    id,
                    text: self.config.texts.wait_for_uploads.clone(),
                },
                ComposerAction::Render,
            ];
        }

        let attachments: Vec<Attachment> =
            self.uploads.iter().filter_map(|u| u.status.attachment().cloned()).collect();
        if self.text.is_empty() && attachments.is_empty() {
            return vec![];
        }
        let Some(cid) = self.channel.as_ref().map(|c| c.cid.clone()) else {
            tracing::debug!("no active channel, nothing to send to");
            return vec![];
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        match &self.mode {
            ComposerMode::Compose => {
                self.in_flight.insert(ticket, PendingSend { edited: None, draft: self.draft });
                let text = std::mem::take(&mut self.text);
                vec![
                    ComposerAction::SendMessage { ticket, cid, text, attachments },
                    ComposerAction::Render,
                ]
            },
            ComposerMode::Edit(message) => {
                let message_id = message.id.clone();
                let pending = PendingSend { edited: Some(message_id.clone()), draft: self.draft };
                self.in_flight.insert(ticket, pending);
                vec![ComposerAction::UpdateMessage {
                    ticket,
                    cid,
                    message_id,
                    text: self.text.clone(),
                    attachments,
                }]
            },
        }
    }

    /// Retry a failed upload under the same local ID.
    pub fn retry_upload(&mut self, upload_id: UploadId) -> Vec<ComposerAction> {
        let Some(cid) = self.channel.as_ref().map(|c| c.cid.clone()) else {
            return vec![];
        };
        match self.upload_mut(upload_id) {
            Some(upload) if upload.status == UploadStatus::Failed => {
                upload.status = UploadStatus::Pending;
                let file = upload.file.clone();
                vec![ComposerAction::StartUpload { upload_id, cid, file }, ComposerAction::Render]
            },
            _ => vec![],
        }
    }

    /// Drop an attachment from the draft.
    ///
    /// An upload still in flight keeps running; its outcome is ignored.
    pub fn remove_upload(&mut self, upload_id: UploadId) -> Vec<ComposerAction> {
        let Some(index) = self.uploads.iter().position(|u| u.id == upload_id) else {
            return vec![];
        };
        self.uploads.remove(index);
        let mut actions = self.dismiss_if_idle();
        actions.push(ComposerAction::Render);
        actions
    }

    /// Snapshot of the draft for rendering.
    pub fn view(&self) -> ComposerView {
        ComposerView {
            mode: self.mode.clone(),
            text: self.text.clone(),
            uploads: self.uploads.clone(),
            is_file_upload_authorized: self.is_file_upload_authorized,
            uploads_in_progress: self.uploads_in_progress(),
            is_waiting_for_uploads: self.wait_notice.is_some(),
        }
    }

    /// Compose or edit.
    pub fn mode(&self) -> &ComposerMode {
        &self.mode
    }

    /// Draft text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attachment list in selection order.
    pub fn uploads(&self) -> &[AttachmentUpload] {
        &self.uploads
    }

    /// The user may upload files in the active channel.
    pub fn is_file_upload_authorized(&self) -> bool {
        self.is_file_upload_authorized
    }

    /// Entries still pending or uploading.
    pub fn uploads_in_progress(&self) -> usize {
        self.uploads.iter().filter(|u| u.status.is_in_progress()).count()
    }

    /// The wait-for-uploads notice is showing.
    pub fn is_waiting_for_uploads(&self) -> bool {
        self.wait_notice.is_some()
    }

    /// Sends and updates awaiting their outcome.
    pub fn sends_in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Active channel. `None` if nothing is active.
    pub fn active_channel(&self) -> Option<&ActiveChannel> {
        self.channel.as_ref()
    }

    /// Composer configuration.
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    fn allocate_upload_id(&mut self) -> UploadId {
        let id = self.next_upload_id;
        self.next_upload_id += 1;
        id
    }

    fn upload_mut(&mut self, upload_id: UploadId) -> Option<&mut AttachmentUpload> {
        self.uploads.iter_mut().find(|u| u.id == upload_id)
    }

    /// Clear the upload list and start a new draft generation.
    fn reset_uploads(&mut self) -> Vec<ComposerAction> {
        self.uploads.clear();
        self.draft += 1;
        self.dismiss_if_idle()
    }

    fn dismiss_if_idle(&mut self) -> Vec<ComposerAction> {
        if self.uploads_in_progress() > 0 {
            return vec![];
        }
        match self.wait_notice.take() {
            Some(id) => vec![ComposerAction::DismissNotification { id }],
            None => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_core::{AttachmentKind, Capabilities, SendError, UploadError, User};

    use super::*;

    fn active(id: &str, caps: &[&str]) -> ActiveChannel {
        ActiveChannel {
            id: id.to_string(),
            cid: format!("messaging:{id}"),
            capabilities: caps.iter().copied().collect::<Capabilities>(),
        }
    }

    fn composer() -> Composer {
        let mut composer = Composer::new(ComposerConfig::default());
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(active(
            "general",
            &["upload-file", "read-events"],
        ))));
        composer
    }

    fn file(name: &str) -> FileRef {
        FileRef::new(name, "image/png", 1024)
    }

    fn remote(name: &str) -> Attachment {
        Attachment::uploaded(&file(name), format!("https://cdn/{name}"))
    }

    fn upload_ids(actions: &[ComposerAction]) -> Vec<UploadId> {
        actions
            .iter()
            .filter_map(|a| match a {
                ComposerAction::StartUpload { upload_id, .. } => Some(*upload_id),
                _ => None,
            })
            .collect()
    }

    fn succeed(composer: &mut Composer, upload_id: UploadId, name: &str) -> Vec<ComposerAction> {
        composer.handle(ComposerEvent::UploadStarted { upload_id });
        composer.handle(ComposerEvent::UploadSucceeded { upload_id, attachment: remote(name) })
    }

    fn ticket(actions: &[ComposerAction]) -> SendTicket {
        actions
            .iter()
            .find_map(|a| match a {
                ComposerAction::SendMessage { ticket, .. }
                | ComposerAction::UpdateMessage { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("send action")
    }

    fn edited_message() -> Arc<StreamMessage> {
        Arc::new(
            StreamMessage::new("m1", User::new("currentUser"))
                .with_text("hi")
                .with_attachments(vec![remote("a1.png")]),
        )
    }

    #[test]
    fn starts_empty_in_compose_mode() {
        let composer = composer();
        assert_eq!(composer.mode(), &ComposerMode::Compose);
        assert_eq!(composer.text(), "");
        assert!(composer.uploads().is_empty());
        assert!(composer.is_file_upload_authorized());
    }

    #[test]
    fn edit_mode_seeds_text_and_attachments() {
        let mut composer = composer();
        let message = edited_message();

        composer.set_message(Some(Arc::clone(&message)));

        assert_eq!(composer.text(), "hi");
        assert_eq!(composer.uploads().len(), 1);
        let seeded = UploadStatus::Success { attachment: remote("a1.png") };
        assert_eq!(composer.uploads()[0].status, seeded);
        assert_eq!(composer.mode().editing().map(String::as_str), Some("m1"));
    }

    #[test]
    fn same_message_is_not_reseeded() {
        let mut composer = composer();
        let message = edited_message();
        composer.set_message(Some(Arc::clone(&message)));
        composer.set_text("hi there");

        assert!(composer.set_message(Some(Arc::clone(&message))).is_empty());
        assert_eq!(composer.text(), "hi there");
    }

    #[test]
    fn different_message_reseeds() {
        let mut composer = composer();
        composer.set_message(Some(edited_message()));
        composer.set_text("changed");

        let other = Arc::new(StreamMessage::new("m2", User::new("currentUser")).with_text("other"));
        composer.set_message(Some(other));

        assert_eq!(composer.text(), "other");
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn leaving_edit_mode_clears_draft() {
        let mut composer = composer();
        composer.set_message(Some(edited_message()));

        composer.set_message(None);

        assert_eq!(composer.mode(), &ComposerMode::Compose);
        assert_eq!(composer.text(), "");
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn channel_change_resets_draft_and_authorization() {
        let mut composer = composer();
        composer.set_text("draft");
        composer.files_selected(vec![file("a.png")]);

        composer.handle(ComposerEvent::ActiveChannelChanged(Some(active("other", &[]))));

        assert_eq!(composer.text(), "");
        assert!(composer.uploads().is_empty());
        assert!(!composer.is_file_upload_authorized());
    }

    #[test]
    fn file_selection_queues_pending_uploads() {
        let mut composer = composer();
        let actions = composer.files_selected(vec![file("a.png"), file("b.png")]);

        assert_eq!(upload_ids(&actions), vec![0, 1]);
        assert!(composer.uploads().iter().all(|u| u.status == UploadStatus::Pending));
        assert_eq!(composer.uploads_in_progress(), 2);
        assert_eq!(actions.last(), Some(&ComposerAction::Render));
    }

    #[test]
    fn empty_selection_is_noop() {
        let mut composer = composer();
        assert!(composer.files_selected(Vec::new()).is_empty());
    }

    #[test]
    fn single_upload_mode_keeps_first_file() {
        let config = ComposerConfig { multiple_file_upload_enabled: false, ..Default::default() };
        let mut composer = Composer::new(config);
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(active("c", &["upload-file"]))));

        let actions = composer.files_selected(vec![file("first.png"), file("second.png")]);

        assert_eq!(upload_ids(&actions).len(), 1);
        assert_eq!(composer.uploads()[0].file.name, "first.png");
    }

    #[test]
    fn selection_ignored_without_upload_capability() {
        let mut composer = Composer::new(ComposerConfig::default());
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(active("c", &["read-events"]))));

        assert!(composer.files_selected(vec![file("a.png")]).is_empty());
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn upload_lifecycle_reaches_success() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));

        composer.handle(ComposerEvent::UploadStarted { upload_id: ids[0] });
        assert_eq!(composer.uploads()[0].status, UploadStatus::Uploading);

        let attachment = remote("a.png");
        composer.handle(ComposerEvent::UploadSucceeded { upload_id: ids[0], attachment });
        assert_eq!(composer.uploads()[0].status.attachment(), Some(&remote("a.png")));
        assert_eq!(composer.uploads_in_progress(), 0);
    }

    #[test]
    fn failed_upload_notifies_and_has_no_reference() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("big.png")]));
        composer.handle(ComposerEvent::UploadStarted { upload_id: ids[0] });

        let actions = composer.handle(ComposerEvent::UploadFailed {
            upload_id: ids[0],
            error: UploadError::TooLarge { size: 1024, limit: 10 },
        });

        assert!(matches!(actions.first(), Some(ComposerAction::ShowTemporaryNotification { .. })));
        assert_eq!(composer.uploads()[0].status, UploadStatus::Failed);
        assert_eq!(composer.uploads()[0].status.attachment(), None);
    }

    #[test]
    fn retry_restarts_failed_upload() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));
        composer.handle(ComposerEvent::UploadFailed {
            upload_id: ids[0],
            error: UploadError::Transport("reset".into()),
        });

        let actions = composer.retry_upload(ids[0]);

        assert_eq!(upload_ids(&actions), vec![ids[0]]);
        assert_eq!(composer.uploads()[0].status, UploadStatus::Pending);
        assert!(composer.retry_upload(ids[0]).is_empty());
    }

    #[test]
    fn send_refused_while_uploading_notifies_once() {
        let mut composer = composer();
        composer.set_text("with files");
        composer.files_selected(vec![file("a.png"), file("b.png")]);

        let first = composer.send();
        let second = composer.send();

        let shown = first
            .iter()
            .chain(&second)
            .filter(|a| matches!(a, ComposerAction::ShowPersistentNotification { .. }))
            .count();
        assert_eq!(shown, 1);
        let sent =
            first.iter().chain(&second).any(|a| matches!(a, ComposerAction::SendMessage { .. }));
        assert!(!sent);
        assert_eq!(composer.text(), "with files");
    }

    #[test]
    fn wait_notice_dismissed_when_uploads_settle() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png"), file("b.png")]));
        composer.send();
        assert!(composer.is_waiting_for_uploads());

        let after_first = succeed(&mut composer, ids[0], "a.png");
        let dismissed =
            after_first.iter().any(|a| matches!(a, ComposerAction::DismissNotification { .. }));
        assert!(!dismissed);

        let after_second = composer.handle(ComposerEvent::UploadFailed {
            upload_id: ids[1],
            error: UploadError::Transport("reset".into()),
        });
        assert!(after_second.contains(&ComposerAction::DismissNotification { id: 0 }));
        assert!(!composer.is_waiting_for_uploads());
    }

    #[test]
    fn empty_draft_send_is_noop() {
        let mut composer = composer();
        assert!(composer.send().is_empty());
        assert_eq!(composer.sends_in_flight(), 0);
    }

    #[test]
    fn failed_uploads_do_not_count_as_content() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));
        composer.handle(ComposerEvent::UploadFailed {
            upload_id: ids[0],
            error: UploadError::Rejected { reason: "type".into() },
        });

        assert!(composer.send().is_empty());
    }

    #[test]
    fn compose_send_clears_text_and_resets_on_success() {
        let mut composer = composer();
        composer.set_text("hello");
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));
        succeed(&mut composer, ids[0], "a.png");

        let actions = composer.send();
        assert_eq!(composer.text(), "");
        assert!(matches!(
            actions.first(),
            Some(ComposerAction::SendMessage { text, attachments, .. })
                if text == "hello" && attachments == &vec![remote("a.png")]
        ));

        let done = composer.handle(ComposerEvent::SendSucceeded { ticket: ticket(&actions) });
        assert!(done.contains(&ComposerAction::MessageSubmitted { edited: None }));
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn attachments_sent_in_selection_order() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("1.png"), file("2.png")]));
        succeed(&mut composer, ids[1], "2.png");
        succeed(&mut composer, ids[0], "1.png");

        let actions = composer.send();
        let Some(ComposerAction::SendMessage { attachments, .. }) = actions.first() else {
            panic!("expected send, got {actions:?}");
        };
        assert_eq!(attachments, &vec![remote("1.png"), remote("2.png")]);
    }

    #[test]
    fn compose_failure_is_silent_by_default() {
        let mut composer = composer();
        composer.set_text("hello");
        let actions = composer.send();

        let failed = composer.handle(ComposerEvent::SendFailed {
            ticket: ticket(&actions),
            error: SendError::Transport("offline".into()),
        });

        assert!(failed.is_empty());
        assert_eq!(composer.sends_in_flight(), 0);
    }

    #[test]
    fn compose_failure_reported_when_configured() {
        let config = ComposerConfig { report_compose_failures: true, ..Default::default() };
        let mut composer = Composer::new(config);
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(active("c", &[]))));
        composer.set_text("hello");
        let actions = composer.send();

        let failed = composer.handle(ComposerEvent::SendFailed {
            ticket: ticket(&actions),
            error: SendError::Transport("offline".into()),
        });

        assert!(matches!(failed.as_slice(), [ComposerAction::ShowTemporaryNotification { .. }]));
    }

    #[test]
    fn edit_send_keeps_text_until_done() {
        let mut composer = composer();
        composer.set_message(Some(edited_message()));
        composer.set_text("hi, edited");

        let actions = composer.send();
        assert!(matches!(
            actions.as_slice(),
            [ComposerAction::UpdateMessage { message_id, text, attachments, .. }]
                if message_id == "m1" && text == "hi, edited" && attachments.len() == 1
        ));
        assert_eq!(composer.text(), "hi, edited");

        let done = composer.handle(ComposerEvent::SendSucceeded { ticket: ticket(&actions) });
        assert_eq!(done, vec![ComposerAction::MessageSubmitted { edited: Some("m1".into()) }]);
        assert_eq!(composer.uploads().len(), 1);
    }

    #[test]
    fn edit_failure_shows_notification() {
        let mut composer = composer();
        composer.set_message(Some(edited_message()));
        let actions = composer.send();

        let failed = composer.handle(ComposerEvent::SendFailed {
            ticket: ticket(&actions),
            error: SendError::NotFound { message_id: "m1".into() },
        });

        assert_eq!(
            failed,
            vec![ComposerAction::ShowTemporaryNotification {
                text: ComposerConfig::default().texts.edit_failed,
            }]
        );
    }

    #[test]
    fn stale_upload_results_are_ignored_after_channel_change() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));
        let other = active("other", &["upload-file"]);
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(other)));

        let attachment = remote("a.png");
        let actions =
            composer.handle(ComposerEvent::UploadSucceeded { upload_id: ids[0], attachment });

        assert!(actions.is_empty());
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn success_from_older_draft_keeps_new_uploads() {
        let mut composer = composer();
        composer.set_text("first");
        let actions = composer.send();

        let other = active("other", &["upload-file"]);
        composer.handle(ComposerEvent::ActiveChannelChanged(Some(other)));
        composer.files_selected(vec![file("new.png")]);

        let done = composer.handle(ComposerEvent::SendSucceeded { ticket: ticket(&actions) });
        assert_eq!(done, vec![ComposerAction::MessageSubmitted { edited: None }]);
        assert_eq!(composer.uploads().len(), 1);
    }

    #[test]
    fn removing_last_pending_upload_dismisses_notice() {
        let mut composer = composer();
        let ids = upload_ids(&composer.files_selected(vec![file("a.png")]));
        composer.send();

        let actions = composer.remove_upload(ids[0]);

        assert!(actions.contains(&ComposerAction::DismissNotification { id: 0 }));
        assert!(composer.uploads().is_empty());
    }

    #[test]
    fn seeded_attachment_keeps_kind() {
        let mut composer = composer();
        composer.set_message(Some(edited_message()));
        assert_eq!(composer.uploads()[0].file.kind(), AttachmentKind::Image);
    }
}
