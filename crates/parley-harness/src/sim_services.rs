//! Simulated upload, messaging and notification services.
//!
//! Each service records every call it receives so tests can assert on what a
//! runtime asked for, and can be told to fail.

use std::{
    collections::BTreeSet,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use parley_core::{
    Attachment, AttachmentUploader, DismissHandle, FileRef, MessageId, MessageSender, Notifier,
    SendError, UploadError,
};
use tokio::sync::Semaphore;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Upload service that succeeds unless told otherwise.
///
/// A gated uploader parks every upload until [`SimUploader::release`] or
/// [`SimUploader::open`] lets it through, which keeps uploads observably in
/// progress.
#[derive(Debug)]
pub struct SimUploader {
    gated: AtomicBool,
    gate: Semaphore,
    /// File names whose uploads fail.
    failing: Mutex<BTreeSet<String>>,
    /// Uploads larger than this fail with `TooLarge`.
    size_limit: Mutex<Option<u64>>,
    calls: Mutex<Vec<(String, FileRef)>>,
}

impl Default for SimUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl SimUploader {
    /// Uploader that completes every upload immediately.
    pub fn new() -> Self {
        Self {
            gated: AtomicBool::new(false),
            gate: Semaphore::new(0),
            failing: Mutex::new(BTreeSet::new()),
            size_limit: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Uploader that parks uploads until released.
    pub fn gated() -> Self {
        let uploader = Self::new();
        uploader.gated.store(true, Ordering::SeqCst);
        uploader
    }

    /// Let `count` parked (or future) uploads through.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// Fail uploads of files named `name`.
    pub fn fail_file(&self, name: impl Into<String>) {
        lock(&self.failing).insert(name.into());
    }

    /// Stop failing uploads of files named `name`.
    pub fn succeed_file(&self, name: &str) {
        lock(&self.failing).remove(name);
    }

    /// Reject files larger than `limit` bytes.
    pub fn set_size_limit(&self, limit: Option<u64>) {
        *lock(&self.size_limit) = limit;
    }

    /// `(cid, file)` of every upload started, in order.
    pub fn calls(&self) -> Vec<(String, FileRef)> {
        lock(&self.calls).clone()
    }

    async fn wait_for_gate(&self) {
        if !self.gated.load(Ordering::SeqCst) {
            return;
        }
        if let Ok(permit) = self.gate.acquire().await {
            permit.forget();
        }
    }
}

#[async_trait]
impl AttachmentUploader for SimUploader {
    async fn upload(&self, cid: &str, file: &FileRef) -> Result<Attachment, UploadError> {
        lock(&self.calls).push((cid.to_string(), file.clone()));
        self.wait_for_gate().await;

        if lock(&self.failing).contains(&file.name) {
            return Err(UploadError::Rejected { reason: format!("{} refused", file.name) });
        }
        if let Some(limit) = *lock(&self.size_limit)
            && file.size > limit
        {
            return Err(UploadError::TooLarge { size: file.size, limit });
        }
        Ok(Attachment::uploaded(file, format!("https://cdn.parley.test/{cid}/{}", file.name)))
    }
}

/// A message the messenger was asked to send or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Target channel.
    pub cid: String,
    /// Updated message. `None` for a new message.
    pub edited: Option<MessageId>,
    /// Message text.
    pub text: String,
    /// Attachments.
    pub attachments: Vec<Attachment>,
}

/// Messaging service that records requests.
#[derive(Debug, Default)]
pub struct SimMessenger {
    failure: Mutex<Option<SendError>>,
    sent: Mutex<Vec<SentMessage>>,
}

impl SimMessenger {
    /// Messenger that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request with `error`, or accept again with `None`.
    pub fn fail_with(&self, error: Option<SendError>) {
        *lock(&self.failure) = error;
    }

    /// Every request received, in order. Includes failed ones.
    pub fn sent(&self) -> Vec<SentMessage> {
        lock(&self.sent).clone()
    }

    fn record(&self, message: SentMessage) -> Result<(), SendError> {
        lock(&self.sent).push(message);
        match lock(&self.failure).clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MessageSender for SimMessenger {
    async fn send_message(
        &self,
        cid: &str,
        text: String,
        attachments: Vec<Attachment>,
    ) -> Result<(), SendError> {
        self.record(SentMessage { cid: cid.to_string(), edited: None, text, attachments })
    }

    async fn update_message(
        &self,
        cid: &str,
        message_id: &str,
        text: String,
        attachments: Vec<Attachment>,
    ) -> Result<(), SendError> {
        self.record(SentMessage {
            cid: cid.to_string(),
            edited: Some(message_id.to_string()),
            text,
            attachments,
        })
    }
}

/// One persistent notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistentNotice {
    /// Notification text.
    pub text: String,
    /// The notice was dismissed.
    pub dismissed: bool,
}

#[derive(Debug, Default)]
struct NotifierState {
    persistent: Vec<PersistentNotice>,
    temporary: Vec<String>,
}

/// Notification service that records what was shown and dismissed.
#[derive(Debug, Default, Clone)]
pub struct SimNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl SimNotifier {
    /// No notifications shown yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persistent notification shown, in order.
    pub fn persistent(&self) -> Vec<PersistentNotice> {
        lock(&self.state).persistent.clone()
    }

    /// Texts of persistent notifications still showing.
    pub fn showing(&self) -> Vec<String> {
        lock(&self.state)
            .persistent
            .iter()
            .filter(|n| !n.dismissed)
            .map(|n| n.text.clone())
            .collect()
    }

    /// Every temporary notification shown, in order.
    pub fn temporary(&self) -> Vec<String> {
        lock(&self.state).temporary.clone()
    }
}

impl Notifier for SimNotifier {
    fn show_persistent(&self, text: &str) -> DismissHandle {
        let index = {
            let mut state = lock(&self.state);
            state.persistent.push(PersistentNotice { text: text.to_string(), dismissed: false });
            state.persistent.len() - 1
        };
        let state = Arc::clone(&self.state);
        DismissHandle::new(move || {
            if let Some(notice) = lock(&state).persistent.get_mut(index) {
                notice.dismissed = true;
            }
        })
    }

    fn show_temporary(&self, text: &str) {
        lock(&self.state).temporary.push(text.to_string());
    }
}
