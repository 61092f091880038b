//! Preview runtime.

use std::sync::Arc;

use parley_core::{
    ActiveChannel, ActiveChannelSource, ChannelEvent, ChannelHandle, ChannelId, ChannelSelector,
};
use tokio::sync::{broadcast, mpsc, watch};

use crate::{
    ChannelPreview, PreviewAction, PreviewConfig, PreviewEvent, PreviewView, RuntimeError,
    Subscription,
};

/// Commands a [`PreviewHandle`] sends to its task.
#[derive(Debug)]
enum Command {
    Click,
    Rebind,
}

/// Drives one [`ChannelPreview`] against live collaborators.
///
/// Owns the preview state machine and executes its actions. Views are
/// published through a `watch` channel; see [`PreviewHandle::changes`].
pub struct PreviewRuntime<C: ?Sized, S: ?Sized> {
    preview: ChannelPreview,
    channel: Arc<C>,
    selector: Arc<S>,
    view: watch::Sender<PreviewView>,
}

impl<C, S> PreviewRuntime<C, S>
where
    C: ChannelHandle + ?Sized + 'static,
    S: ChannelSelector + ?Sized + 'static,
{
    /// Bind a preview to `channel` and start driving it.
    ///
    /// Subscribes to channel events before taking the initial snapshot so no
    /// event falls between the two. Must be called inside a tokio runtime.
    pub fn spawn<A>(
        config: PreviewConfig,
        channel: Arc<C>,
        active: &A,
        selector: Arc<S>,
    ) -> PreviewHandle
    where
        A: ActiveChannelSource + ?Sized,
    {
        let events = channel.subscribe();
        let mut active = active.subscribe();
        let active_id = active_channel_id(active.borrow_and_update().as_ref());
        let snapshot = channel.snapshot();

        let preview = ChannelPreview::new(config, &snapshot, active_id);
        let channel_id = preview.channel_id().to_string();
        let (view, view_rx) = watch::channel(preview.view().clone());
        let (commands, commands_rx) = mpsc::unbounded_channel();

        tracing::debug!(%channel_id, "binding channel preview");
        let runtime = Self { preview, channel, selector, view };
        let task = tokio::spawn(runtime.run(events, active, commands_rx));

        PreviewHandle {
            channel_id,
            view: view_rx,
            commands,
            subscription: Subscription::new("preview", task.abort_handle()),
        }
    }

    async fn run(
        mut self,
        mut events: broadcast::Receiver<ChannelEvent>,
        mut active: watch::Receiver<Option<ActiveChannel>>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let mut active_open = true;
        loop {
            let actions = tokio::select! {
                changed = active.changed(), if active_open => {
                    if changed.is_err() {
                        tracing::debug!("active channel source closed");
                        active_open = false;
                        continue;
                    }
                    let channel_id = active_channel_id(active.borrow_and_update().as_ref());
                    let snapshot = self.channel.snapshot();
                    let event = PreviewEvent::ActiveChannelChanged { channel_id };
                    self.preview.handle(event, &snapshot)
                },
                event = events.recv() => match event {
                    Ok(event) => {
                        let snapshot = self.channel.snapshot();
                        self.preview.handle(PreviewEvent::Channel(event), &snapshot)
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            channel_id = %self.preview.channel_id(),
                            skipped,
                            "missed channel events, rebinding"
                        );
                        self.preview.bind(&self.channel.snapshot())
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!(channel_id = %self.preview.channel_id(), "channel closed");
                        break;
                    },
                },
                command = commands.recv() => match command {
                    Some(Command::Click) => self.preview.click(),
                    Some(Command::Rebind) => self.preview.bind(&self.channel.snapshot()),
                    None => break,
                },
            };
            self.execute(actions);
        }
    }

    fn execute(&self, actions: Vec<PreviewAction>) {
        for action in actions {
            match action {
                PreviewAction::Render => {
                    let next = self.preview.view();
                    self.view.send_if_modified(|current| {
                        if *current == *next {
                            return false;
                        }
                        *current = next.clone();
                        true
                    });
                },
                PreviewAction::SelectChannel { channel_id } => {
                    tracing::debug!(%channel_id, "selecting channel");
                    self.selector.set_active(&channel_id);
                },
            }
        }
    }
}

fn active_channel_id(active: Option<&ActiveChannel>) -> Option<ChannelId> {
    active.map(|c| c.id.clone())
}

/// Handle to a running preview.
///
/// Dropping the handle stops the preview and releases its subscriptions.
#[derive(Debug)]
pub struct PreviewHandle {
    channel_id: ChannelId,
    view: watch::Receiver<PreviewView>,
    commands: mpsc::UnboundedSender<Command>,
    subscription: Subscription,
}

impl PreviewHandle {
    /// ID of the bound channel.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Current view.
    pub fn view(&self) -> PreviewView {
        self.view.borrow().clone()
    }

    /// Receiver notified whenever the view changes.
    pub fn changes(&self) -> watch::Receiver<PreviewView> {
        self.view.clone()
    }

    /// Forward a click: asks the selector to activate this channel.
    pub fn click(&self) -> Result<(), RuntimeError> {
        self.command(Command::Click)
    }

    /// Recompute the view from a fresh snapshot.
    pub fn rebind(&self) -> Result<(), RuntimeError> {
        self.command(Command::Rebind)
    }

    /// The preview task is still running.
    pub fn is_running(&self) -> bool {
        !self.subscription.is_finished()
    }

    /// Stop the preview and release its subscriptions.
    pub fn shutdown(self) {
        self.subscription.release();
    }

    fn command(&self, command: Command) -> Result<(), RuntimeError> {
        self.commands.send(command).map_err(|_| RuntimeError::preview_closed())
    }
}
