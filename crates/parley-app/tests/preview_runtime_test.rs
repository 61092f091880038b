//! Preview runtime against simulated collaborators.
//!
//! # Oracle Pattern
//!
//! Tests drive the simulated SDK, wait for the published view to settle and
//! then check it against what the channel state implies.

use std::{sync::Arc, time::Duration};

use parley_app::{PreviewConfig, PreviewHandle, PreviewRuntime, PreviewView};
use parley_core::{Channel, ChannelHandle};
use parley_harness::{
    SimActiveChannel, SimChannel,
    fixtures::{self, CURRENT_USER, ChannelBuilder},
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Wait until the published view satisfies `done`.
#[allow(clippy::expect_used, reason = "a timeout fails the calling test")]
async fn settle(handle: &PreviewHandle, done: impl FnMut(&PreviewView) -> bool) -> PreviewView {
    let mut changes = handle.changes();
    let view = tokio::time::timeout(TIMEOUT, changes.wait_for(done))
        .await
        .expect("view did not settle")
        .expect("preview runtime stopped");
    (*view).clone()
}

fn spawn(channel: &Arc<SimChannel>, active: &Arc<SimActiveChannel>) -> PreviewHandle {
    PreviewRuntime::spawn(
        PreviewConfig::new(CURRENT_USER),
        Arc::clone(channel),
        active.as_ref(),
        Arc::clone(active),
    )
}

fn world(builder: ChannelBuilder) -> (Arc<SimChannel>, Arc<SimActiveChannel>) {
    let channel = builder.simulate();
    let active = Arc::new(SimActiveChannel::new());
    active.register(Arc::clone(&channel));
    (channel, active)
}

#[tokio::test]
async fn initial_view_reflects_snapshot() {
    let ada = fixtures::user("ada", "Ada");
    let (channel, active) = world(
        ChannelBuilder::new("general")
            .member(ada.clone())
            .message(fixtures::message("m1", &ada, "morning", 1))
            .unread(3),
    );

    let handle = spawn(&channel, &active);
    let view = handle.view();

    assert_eq!(view.display_title, "Ada");
    assert_eq!(view.display_text, "morning");
    assert!(view.is_unread);
    assert_eq!(view.badge().as_deref(), Some("3"));
    assert!(!view.is_active);
}

#[tokio::test]
async fn new_message_updates_text_and_badge() {
    let ada = fixtures::user("ada", "Ada");
    let (channel, active) = world(ChannelBuilder::new("general").member(ada.clone()));
    let handle = spawn(&channel, &active);
    assert_eq!(handle.view().display_text, "Nothing yet...");

    channel.push_message(fixtures::message("m1", &ada, "ping", 1));

    let view = settle(&handle, |v| v.display_text == "ping").await;
    assert_eq!(view.unread_count, 1);
    assert!(view.is_unread);
}

#[tokio::test]
async fn activation_clears_unread_and_deactivation_restores_it() {
    let ada = fixtures::user("ada", "Ada");
    let (channel, active) = world(ChannelBuilder::new("general").member(ada).unread(2));
    let handle = spawn(&channel, &active);

    active.activate(Some("general"));
    let view = settle(&handle, |v| v.is_active).await;
    assert!(!view.is_unread);
    assert_eq!(view.unread_count, 0);

    active.activate(None);
    let view = settle(&handle, |v| !v.is_active).await;
    assert!(view.is_unread);
    assert_eq!(view.unread_count, 2);
}

#[tokio::test]
async fn click_selects_channel() {
    let (channel, active) = world(ChannelBuilder::new("general").name("General"));
    let handle = spawn(&channel, &active);

    handle.click().unwrap();

    settle(&handle, |v| v.is_active).await;
    assert_eq!(active.requests(), vec!["general".to_string()]);
}

#[tokio::test]
async fn read_event_resets_badge() {
    let ada = fixtures::user("ada", "Ada");
    let (channel, active) = world(ChannelBuilder::new("general").member(ada.clone()));
    let handle = spawn(&channel, &active);
    channel.push_message(fixtures::message("m1", &ada, "ping", 1));
    settle(&handle, |v| v.is_unread).await;

    channel.mark_read(CURRENT_USER);

    let view = settle(&handle, |v| !v.is_unread).await;
    assert_eq!(view.display_text, "ping");
}

#[tokio::test]
async fn missed_events_trigger_rebind() {
    let ada = fixtures::user("ada", "Ada");
    let mut snapshot = Channel::new("busy");
    snapshot.data.own_capabilities = ["read-events"].into_iter().collect();
    let channel = Arc::new(SimChannel::with_capacity(snapshot, CURRENT_USER, 2));
    let active = Arc::new(SimActiveChannel::new());
    let handle = spawn(&channel, &active);

    // The runtime cannot run between these pushes, so its receiver lags
    for seq in 1..=6 {
        let text = format!("msg {seq}");
        channel.push_message(fixtures::message(&format!("m{seq}"), &ada, &text, seq));
    }

    let view = settle(&handle, |v| v.display_text == "msg 6").await;
    assert_eq!(view.unread_count, 6);
}

#[tokio::test]
async fn dropping_handle_releases_subscriptions() {
    let (channel, active) = world(ChannelBuilder::new("general"));
    let handle = spawn(&channel, &active);
    assert_eq!(channel.subscriber_count(), 1);
    assert_eq!(active.subscriber_count(), 1);

    drop(handle);

    tokio::time::timeout(TIMEOUT, async {
        while channel.subscriber_count() > 0 || active.subscriber_count() > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscriptions were not released");
}

#[tokio::test]
async fn shutting_down_a_channel_list_releases_every_channel() {
    let active = Arc::new(SimActiveChannel::new());
    let channels: Vec<_> = ["general", "random", "ops"]
        .into_iter()
        .map(|id| {
            let channel = ChannelBuilder::new(id).simulate();
            active.register(Arc::clone(&channel));
            channel
        })
        .collect();
    let handles: Vec<_> = channels.iter().map(|channel| spawn(channel, &active)).collect();
    assert_eq!(active.subscriber_count(), 3);

    for handle in handles {
        handle.shutdown();
    }

    tokio::time::timeout(TIMEOUT, async {
        while active.subscriber_count() > 0
            || channels.iter().any(|channel| channel.subscriber_count() > 0)
        {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("subscriptions were not released");
}

#[tokio::test]
async fn rebind_recomputes_from_snapshot() {
    let (channel, active) = world(ChannelBuilder::new("general"));
    let handle = spawn(&channel, &active);

    // Counter changes without an event are picked up by an explicit rebind
    channel.set_unread(4);
    handle.rebind().unwrap();

    let view = settle(&handle, |v| v.is_unread).await;
    assert_eq!(view.unread_count, 4);
    assert_eq!(channel.id(), handle.channel_id());
}
