//! Composer runtime.

use std::{collections::HashMap, sync::Arc};

use parley_core::{
    ActiveChannel, ActiveChannelSource, Attachment, AttachmentUploader, DismissHandle, FileRef,
    MessageId, MessageSender, Notifier, StreamMessage,
};
use tokio::{
    sync::{broadcast, mpsc, watch},
    task::JoinSet,
};

use crate::{
    Composer, ComposerAction, ComposerConfig, ComposerEvent, ComposerView, RuntimeError,
    Subscription,
    state::{NotificationId, SendTicket, UploadId},
};

/// Capacity of the message-submitted broadcast.
const SUBMITTED_CAPACITY: usize = 16;

/// A message was sent or updated successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSubmitted {
    /// Edited message. `None` for a new message.
    pub edited: Option<MessageId>,
}

/// Commands a [`ComposerHandle`] sends to its task.
#[derive(Debug)]
enum Command {
    SetMessage(Option<Arc<StreamMessage>>),
    SetText(String),
    FilesSelected(Vec<FileRef>),
    Send,
    RetryUpload(UploadId),
    RemoveUpload(UploadId),
}

/// Drives one [`Composer`] against live collaborators.
///
/// Uploads and sends run as tasks in a [`JoinSet`]; their outcomes come back
/// through a completion channel and are fed to the composer as events.
/// Stopping the runtime aborts those tasks and dismisses any persistent
/// notification it still shows.
pub struct ComposerRuntime<M: ?Sized, U: ?Sized, N: ?Sized> {
    composer: Composer,
    messenger: Arc<M>,
    uploader: Arc<U>,
    notifier: Arc<N>,
    /// Persistent notifications currently showing.
    notifications: HashMap<NotificationId, DismissHandle>,
    tasks: JoinSet<()>,
    completions: mpsc::UnboundedSender<ComposerEvent>,
    view: watch::Sender<ComposerView>,
    submitted: broadcast::Sender<MessageSubmitted>,
}

impl<M, U, N> ComposerRuntime<M, U, N>
where
    M: MessageSender + ?Sized + 'static,
    U: AttachmentUploader + ?Sized + 'static,
    N: Notifier + ?Sized + 'static,
{
    /// Start a composer that follows the active channel of `active`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<A>(
        config: ComposerConfig,
        active: &A,
        messenger: Arc<M>,
        uploader: Arc<U>,
        notifier: Arc<N>,
    ) -> ComposerHandle
    where
        A: ActiveChannelSource + ?Sized,
    {
        let active = active.subscribe();
        let composer = Composer::new(config);
        let (view, view_rx) = watch::channel(composer.view());
        let (submitted, _) = broadcast::channel(SUBMITTED_CAPACITY);
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (completions, completions_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            composer,
            messenger,
            uploader,
            notifier,
            notifications: HashMap::new(),
            tasks: JoinSet::new(),
            completions,
            view,
            submitted: submitted.clone(),
        };
        let task = tokio::spawn(runtime.run(active, commands_rx, completions_rx));

        ComposerHandle {
            view: view_rx,
            commands,
            submitted,
            subscription: Subscription::new("composer", task.abort_handle()),
        }
    }

    async fn run(
        mut self,
        mut active: watch::Receiver<Option<ActiveChannel>>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<ComposerEvent>,
    ) {
        let initial = active.borrow_and_update().clone();
        let actions = self.composer.handle(ComposerEvent::ActiveChannelChanged(initial));
        self.process_actions(actions);

        let mut active_open = true;
        loop {
            let actions = tokio::select! {
                changed = active.changed(), if active_open => {
                    if changed.is_err() {
                        tracing::debug!("active channel source closed");
                        active_open = false;
                        continue;
                    }
                    let channel = active.borrow_and_update().clone();
                    self.composer.handle(ComposerEvent::ActiveChannelChanged(channel))
                },
                Some(event) = completions.recv() => self.composer.handle(event),
                command = commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(err) = joined
                        && err.is_panic()
                    {
                        tracing::error!(%err, "composer task panicked");
                    }
                    continue;
                },
            };
            self.process_actions(actions);
        }
    }

    fn apply(&mut self, command: Command) -> Vec<ComposerAction> {
        match command {
            Command::SetMessage(message) => self.composer.set_message(message),
            Command::SetText(text) => self.composer.set_text(text),
            Command::FilesSelected(files) => self.composer.files_selected(files),
            Command::Send => self.composer.send(),
            Command::RetryUpload(upload_id) => self.composer.retry_upload(upload_id),
            Command::RemoveUpload(upload_id) => self.composer.remove_upload(upload_id),
        }
    }

    /// Execute actions until the composer stops producing follow-ups.
    fn process_actions(&mut self, initial_actions: Vec<ComposerAction>) {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    ComposerAction::Render => self.publish(),
                    ComposerAction::StartUpload { upload_id, cid, file } => {
                        self.spawn_upload(upload_id, cid, file);
                        let started = ComposerEvent::UploadStarted { upload_id };
                        pending_actions.extend(self.composer.handle(started));
                    },
                    ComposerAction::SendMessage { ticket, cid, text, attachments } => {
                        self.spawn_send(ticket, cid, None, text, attachments);
                    },
                    ComposerAction::UpdateMessage {
                        ticket,
                        cid,
                        message_id,
                        text,
                        attachments,
                    } => {
                        self.spawn_send(ticket, cid, Some(message_id), text, attachments);
                    },
                    ComposerAction::ShowPersistentNotification { id, text } => {
                        let handle = self.notifier.show_persistent(&text);
                        self.notifications.insert(id, handle);
                    },
                    ComposerAction::DismissNotification { id } => {
                        if let Some(handle) = self.notifications.remove(&id) {
                            handle.dismiss();
                        }
                    },
                    ComposerAction::ShowTemporaryNotification { text } => {
                        self.notifier.show_temporary(&text);
                    },
                    ComposerAction::MessageSubmitted { edited } => {
                        // No subscribers is fine
                        let _ = self.submitted.send(MessageSubmitted { edited });
                    },
                }
            }
        }
    }

    fn spawn_upload(&mut self, upload_id: UploadId, cid: String, file: FileRef) {
        let uploader = Arc::clone(&self.uploader);
        let completions = self.completions.clone();
        self.tasks.spawn(async move {
            let event = match uploader.upload(&cid, &file).await {
                Ok(attachment) => ComposerEvent::UploadSucceeded { upload_id, attachment },
                Err(error) => ComposerEvent::UploadFailed { upload_id, error },
            };
            report(&completions, event);
        });
    }

    /// Send a new message, or update `edited` when set.
    fn spawn_send(
        &mut self,
        ticket: SendTicket,
        cid: String,
        edited: Option<MessageId>,
        text: String,
        attachments: Vec<Attachment>,
    ) {
        let messenger = Arc::clone(&self.messenger);
        let completions = self.completions.clone();
        self.tasks.spawn(async move {
            let result = if let Some(message_id) = edited {
                messenger.update_message(&cid, &message_id, text, attachments).await
            } else {
                messenger.send_message(&cid, text, attachments).await
            };
            let event = match result {
                Ok(()) => ComposerEvent::SendSucceeded { ticket },
                Err(error) => ComposerEvent::SendFailed { ticket, error },
            };
            report(&completions, event);
        });
    }

    fn publish(&self) {
        let next = self.composer.view();
        self.view.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

impl<M: ?Sized, U: ?Sized, N: ?Sized> Drop for ComposerRuntime<M, U, N> {
    fn drop(&mut self) {
        for (_, handle) in self.notifications.drain() {
            handle.dismiss();
        }
    }
}

fn report(completions: &mpsc::UnboundedSender<ComposerEvent>, event: ComposerEvent) {
    if completions.send(event).is_err() {
        tracing::trace!("composer stopped before task completed");
    }
}

/// Handle to a running composer.
///
/// Dropping the handle stops the composer: in-flight uploads and sends are
/// aborted and persistent notifications dismissed.
#[derive(Debug)]
pub struct ComposerHandle {
    view: watch::Receiver<ComposerView>,
    commands: mpsc::UnboundedSender<Command>,
    submitted: broadcast::Sender<MessageSubmitted>,
    subscription: Subscription,
}

impl ComposerHandle {
    /// Load a message for editing, or return to compose mode with `None`.
    pub fn set_message(&self, message: Option<Arc<StreamMessage>>) -> Result<(), RuntimeError> {
        self.command(Command::SetMessage(message))
    }

    /// Replace the draft text.
    pub fn set_text(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.command(Command::SetText(text.into()))
    }

    /// The user picked files.
    pub fn files_selected(&self, files: Vec<FileRef>) -> Result<(), RuntimeError> {
        self.command(Command::FilesSelected(files))
    }

    /// Send the draft.
    pub fn send(&self) -> Result<(), RuntimeError> {
        self.command(Command::Send)
    }

    /// Retry a failed upload.
    pub fn retry_upload(&self, upload_id: UploadId) -> Result<(), RuntimeError> {
        self.command(Command::RetryUpload(upload_id))
    }

    /// Drop an attachment from the draft.
    pub fn remove_upload(&self, upload_id: UploadId) -> Result<(), RuntimeError> {
        self.command(Command::RemoveUpload(upload_id))
    }

    /// Current view.
    pub fn view(&self) -> ComposerView {
        self.view.borrow().clone()
    }

    /// Receiver notified whenever the view changes.
    pub fn changes(&self) -> watch::Receiver<ComposerView> {
        self.view.clone()
    }

    /// Subscribe to successful sends and updates.
    pub fn submitted(&self) -> broadcast::Receiver<MessageSubmitted> {
        self.submitted.subscribe()
    }

    /// The composer task is still running.
    pub fn is_running(&self) -> bool {
        !self.subscription.is_finished()
    }

    /// Stop the composer.
    pub fn shutdown(self) {
        self.subscription.release();
    }

    fn command(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands.send(command).map_err(|_| RuntimeError::composer_closed())
    }
}
