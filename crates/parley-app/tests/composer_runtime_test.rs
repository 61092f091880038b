//! Composer runtime against simulated collaborators.
//!
//! # Oracle Pattern
//!
//! Tests end with oracle checks on what the simulated services recorded:
//! - Messages reach the messenger with the right text and attachments
//! - Notices are shown once and dismissed when uploads settle
//! - Nothing reaches a service the composer should not have called

use std::{sync::Arc, time::Duration};

use parley_app::{
    ComposerConfig, ComposerHandle, ComposerMode, ComposerRuntime, ComposerView, MessageSubmitted,
    UploadStatus,
};
use parley_core::SendError;
use parley_harness::{
    SentMessage, SimActiveChannel, SimMessenger, SimNotifier, SimUploader,
    fixtures::{self, CURRENT_USER, ChannelBuilder},
};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Rig {
    active: Arc<SimActiveChannel>,
    uploader: Arc<SimUploader>,
    messenger: Arc<SimMessenger>,
    notifier: Arc<SimNotifier>,
}

impl Rig {
    fn new(uploader: SimUploader) -> Self {
        let active = Arc::new(SimActiveChannel::new());
        active.register(ChannelBuilder::new("general").simulate());
        active.register(ChannelBuilder::new("other").simulate());
        active.register(ChannelBuilder::new("readonly").capabilities(&["read-events"]).simulate());
        active.activate(Some("general"));
        Self {
            active,
            uploader: Arc::new(uploader),
            messenger: Arc::new(SimMessenger::new()),
            notifier: Arc::new(SimNotifier::new()),
        }
    }

    fn spawn(&self, config: ComposerConfig) -> ComposerHandle {
        ComposerRuntime::spawn(
            config,
            self.active.as_ref(),
            Arc::clone(&self.messenger),
            Arc::clone(&self.uploader),
            Arc::clone(&self.notifier),
        )
    }
}

/// Wait until the published view satisfies `done`.
#[allow(clippy::expect_used, reason = "a timeout fails the calling test")]
async fn settle(handle: &ComposerHandle, done: impl FnMut(&ComposerView) -> bool) -> ComposerView {
    let mut changes = handle.changes();
    let view = tokio::time::timeout(TIMEOUT, changes.wait_for(done))
        .await
        .expect("view did not settle")
        .expect("composer runtime stopped");
    (*view).clone()
}

#[allow(clippy::expect_used, reason = "a timeout fails the calling test")]
async fn eventually(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(TIMEOUT, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached");
}

#[tokio::test]
async fn sends_text_and_notifies_host() {
    let rig = Rig::new(SimUploader::new());
    let handle = rig.spawn(ComposerConfig::default());
    let mut submitted = handle.submitted();
    settle(&handle, |v| v.is_file_upload_authorized).await;

    handle.set_text("hello").unwrap();
    handle.send().unwrap();

    let event = tokio::time::timeout(TIMEOUT, submitted.recv()).await.unwrap().unwrap();
    assert_eq!(event, MessageSubmitted { edited: None });
    assert_eq!(
        rig.messenger.sent(),
        vec![SentMessage {
            cid: "messaging:general".into(),
            edited: None,
            text: "hello".into(),
            attachments: Vec::new(),
        }]
    );
    assert_eq!(handle.view().text, "");
}

#[tokio::test]
async fn send_waits_for_uploads() {
    let rig = Rig::new(SimUploader::gated());
    let handle = rig.spawn(ComposerConfig::default());
    settle(&handle, |v| v.is_file_upload_authorized).await;

    let files = vec![fixtures::image_file("a.png"), fixtures::document_file("b.pdf")];
    handle.files_selected(files).unwrap();
    settle(&handle, |v| v.uploads_in_progress == 2).await;

    handle.send().unwrap();
    handle.send().unwrap();
    settle(&handle, |v| v.is_waiting_for_uploads).await;
    assert_eq!(rig.notifier.persistent().len(), 1);
    assert!(rig.messenger.sent().is_empty());

    rig.uploader.release(2);
    let view = settle(&handle, |v| v.uploads_in_progress == 0).await;
    assert!(!view.is_waiting_for_uploads);
    assert!(rig.notifier.showing().is_empty());

    handle.send().unwrap();
    eventually(|| rig.messenger.sent().len() == 1).await;
    let sent = &rig.messenger.sent()[0];
    let titles: Vec<_> = sent.attachments.iter().filter_map(|a| a.title.as_deref()).collect();
    assert_eq!(titles, vec!["a.png", "b.pdf"]);
}

#[tokio::test]
async fn failed_upload_can_be_retried() {
    let uploader = SimUploader::new();
    uploader.fail_file("big.png");
    let rig = Rig::new(uploader);
    let handle = rig.spawn(ComposerConfig::default());
    settle(&handle, |v| v.is_file_upload_authorized).await;

    handle.files_selected(vec![fixtures::image_file("big.png")]).unwrap();
    let failed = |v: &ComposerView| v.uploads.iter().any(|u| u.status == UploadStatus::Failed);
    let view = settle(&handle, failed).await;
    assert_eq!(
        rig.notifier.temporary(),
        vec![ComposerConfig::default().texts.upload_failed]
    );

    rig.uploader.succeed_file("big.png");
    handle.retry_upload(view.uploads[0].id).unwrap();

    let view = settle(&handle, |v| v.uploads.iter().all(|u| u.status.attachment().is_some())).await;
    assert_eq!(view.uploads.len(), 1);
    assert_eq!(rig.uploader.calls().len(), 2);
}

#[tokio::test]
async fn edit_updates_existing_message() {
    let rig = Rig::new(SimUploader::new());
    let handle = rig.spawn(ComposerConfig::default());
    let mut submitted = handle.submitted();
    let me = fixtures::user(CURRENT_USER, "Me");
    let file = fixtures::image_file("cat.png");
    let message = Arc::new(
        fixtures::message("m1", &me, "typo", 1).with_attachments(vec![fixtures::uploaded(&file)]),
    );

    handle.set_message(Some(Arc::clone(&message))).unwrap();
    let view = settle(&handle, |v| matches!(v.mode, ComposerMode::Edit(_))).await;
    assert_eq!(view.text, "typo");
    assert_eq!(view.uploads.len(), 1);

    handle.set_text("fixed").unwrap();
    handle.send().unwrap();

    let event = tokio::time::timeout(TIMEOUT, submitted.recv()).await.unwrap().unwrap();
    assert_eq!(event, MessageSubmitted { edited: Some("m1".into()) });
    let sent = rig.messenger.sent();
    assert_eq!(sent[0].edited.as_deref(), Some("m1"));
    assert_eq!(sent[0].text, "fixed");
    assert_eq!(sent[0].attachments, vec![fixtures::uploaded(&file)]);
}

#[tokio::test]
async fn failed_edit_shows_notification() {
    let rig = Rig::new(SimUploader::new());
    rig.messenger.fail_with(Some(SendError::Rejected("too late".into())));
    let handle = rig.spawn(ComposerConfig::default());
    let me = fixtures::user(CURRENT_USER, "Me");

    handle.set_message(Some(Arc::new(fixtures::message("m1", &me, "hi", 1)))).unwrap();
    handle.send().unwrap();

    eventually(|| !rig.notifier.temporary().is_empty()).await;
    assert_eq!(rig.notifier.temporary(), vec!["Edit message request failed".to_string()]);
}

#[tokio::test]
async fn failed_compose_is_silent_by_default() {
    let rig = Rig::new(SimUploader::new());
    rig.messenger.fail_with(Some(SendError::Transport("offline".into())));
    let handle = rig.spawn(ComposerConfig::default());
    settle(&handle, |v| v.is_file_upload_authorized).await;

    handle.set_text("lost").unwrap();
    handle.send().unwrap();
    eventually(|| rig.messenger.sent().len() == 1).await;

    // Give the failure a chance to come back before checking nothing showed
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(rig.notifier.temporary().is_empty());
    assert_eq!(handle.view().text, "");
}

#[tokio::test]
async fn uploads_ignored_without_capability() {
    let rig = Rig::new(SimUploader::new());
    rig.active.activate(Some("readonly"));
    let handle = rig.spawn(ComposerConfig::default());

    handle.files_selected(vec![fixtures::image_file("a.png")]).unwrap();
    handle.set_text("marker").unwrap();

    let view = settle(&handle, |v| v.text == "marker").await;
    assert!(!view.is_file_upload_authorized);
    assert!(view.uploads.is_empty());
    assert!(rig.uploader.calls().is_empty());
}

#[tokio::test]
async fn channel_switch_resets_draft() {
    let rig = Rig::new(SimUploader::new());
    let handle = rig.spawn(ComposerConfig::default());
    handle.set_text("draft").unwrap();
    settle(&handle, |v| v.text == "draft").await;

    rig.active.activate(Some("other"));

    let view = settle(&handle, |v| v.text.is_empty()).await;
    assert!(view.uploads.is_empty());
}

#[tokio::test]
async fn shutdown_dismisses_wait_notice() {
    let rig = Rig::new(SimUploader::gated());
    let handle = rig.spawn(ComposerConfig::default());
    settle(&handle, |v| v.is_file_upload_authorized).await;
    handle.files_selected(vec![fixtures::image_file("slow.png")]).unwrap();
    handle.send().unwrap();
    settle(&handle, |v| v.is_waiting_for_uploads).await;
    assert_eq!(rig.notifier.showing().len(), 1);

    handle.shutdown();

    eventually(|| rig.notifier.showing().is_empty()).await;
    assert!(rig.messenger.sent().is_empty());
}
