//! Parley demo binary.
//!
//! Plays a seeded stream of channel activity against simulated channels,
//! with one preview runtime per channel. Prints the channel list after the
//! scenario, then selects the first channel and sends a message with
//! attachments from a composer.
//!
//! # Usage
//!
//! ```bash
//! # Four channels, 40 steps of activity from seed 7
//! parley-demo --channels 4 --steps 40 --seed 7
//!
//! # Trace every state transition
//! parley-demo --log-level parley_app=trace
//! ```

use std::{
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use clap::Parser;
use parley_app::{
    ChannelPreview, ComposerConfig, ComposerHandle, ComposerRuntime, ComposerView, PreviewConfig,
    PreviewHandle, PreviewRuntime, RuntimeError,
};
use parley_core::ChannelHandle;
use parley_harness::{
    Activity, ScenarioGenerator, SimWorld,
    fixtures::{self, CURRENT_USER},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for a runtime to publish an expected view.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Parley channel list and composer walkthrough
#[derive(Parser, Debug)]
#[command(name = "parley-demo")]
#[command(about = "Seeded walkthrough of channel previews and the message composer")]
#[command(version)]
struct Args {
    /// Number of simulated channels
    #[arg(short, long, default_value = "4")]
    channels: usize,

    /// Scenario seed
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Number of scenario steps
    #[arg(long, default_value = "40")]
    steps: usize,

    /// Keep only the first file of a selection
    #[arg(long)]
    single_file: bool,

    /// Log filter (trace, debug, info, warn, error, or a directive list)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("output failed: {0}")]
    Output(#[from] io::Error),

    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    run(&args).await?;
    Ok(())
}

async fn run(args: &Args) -> Result<(), DemoError> {
    let mut world = SimWorld::new(args.channels.max(1));
    tracing::info!(channels = world.channels.len(), seed = args.seed, "starting scenario");

    let previews: Vec<PreviewHandle> = world
        .channels
        .iter()
        .map(|channel| {
            PreviewRuntime::spawn(
                PreviewConfig::new(CURRENT_USER),
                Arc::clone(channel),
                world.active.as_ref(),
                Arc::clone(&world.active),
            )
        })
        .collect();

    let mut generator = ScenarioGenerator::for_world(args.seed, &world);
    for activity in generator.take(args.steps) {
        world.apply(&activity);
    }
    settle_previews(&world, &previews).await?;
    print_list("after scenario", &previews)?;

    let config = ComposerConfig {
        multiple_file_upload_enabled: !args.single_file,
        ..ComposerConfig::default()
    };
    compose(config, &mut world, &previews).await?;
    settle_previews(&world, &previews).await?;
    print_list("after sending", &previews)?;

    for preview in previews {
        preview.shutdown();
    }
    Ok(())
}

/// Select the first channel, attach two files and send.
async fn compose(
    config: ComposerConfig,
    world: &mut SimWorld,
    previews: &[PreviewHandle],
) -> Result<(), DemoError> {
    let Some(first) = previews.first() else { return Ok(()) };

    first.click()?;
    let mut changes = first.changes();
    tokio::time::timeout(SETTLE_TIMEOUT, changes.wait_for(|v| v.is_active))
        .await
        .map_err(|_| DemoError::Timeout("channel selection"))?
        .map_err(|_| RuntimeError::Closed { component: "preview" })?;

    // Spawned after selection so the draft starts in the selected channel
    let composer = ComposerRuntime::spawn(
        config,
        world.active.as_ref(),
        Arc::clone(&world.messenger),
        Arc::clone(&world.uploader),
        Arc::clone(&world.notifier),
    );
    let mut submitted = composer.submitted();
    settle_composer(&composer, |v| v.is_file_upload_authorized).await?;

    composer.files_selected(vec![
        fixtures::image_file("whiteboard.png"),
        fixtures::document_file("notes.pdf"),
    ])?;
    let view =
        settle_composer(&composer, |v| !v.uploads.is_empty() && v.uploads_in_progress == 0).await?;
    tracing::info!(uploads = view.uploads.len(), "attachments ready");

    let text = "notes from the standup";
    composer.set_text(text)?;
    composer.send()?;

    let event = tokio::time::timeout(SETTLE_TIMEOUT, submitted.recv())
        .await
        .map_err(|_| DemoError::Timeout("message submission"))?
        .map_err(|_| DemoError::Timeout("message submission"))?;
    tracing::info!(?event, "message submitted");

    let mut out = io::stdout().lock();
    for sent in world.messenger.sent() {
        let titles: Vec<_> = sent.attachments.iter().filter_map(|a| a.title.as_deref()).collect();
        writeln!(out, "sent to {}: {:?} with [{}]", sent.cid, sent.text, titles.join(", "))?;
    }
    drop(out);

    // The simulated messenger does not deliver, so post the message ourselves
    world.apply(&Activity::Post { channel: 0, author: 0, text: text.to_string() });
    composer.shutdown();
    Ok(())
}

/// Wait until every preview shows what a fresh bind to its channel would.
async fn settle_previews(world: &SimWorld, previews: &[PreviewHandle]) -> Result<(), DemoError> {
    let active = world.active.current().map(|c| c.id);
    for (channel, handle) in world.channels.iter().zip(previews) {
        let config = PreviewConfig::new(CURRENT_USER);
        let expected = ChannelPreview::new(config, &channel.snapshot(), active.clone());
        let mut changes = handle.changes();
        tokio::time::timeout(SETTLE_TIMEOUT, changes.wait_for(|v| v == expected.view()))
            .await
            .map_err(|_| DemoError::Timeout("channel previews"))?
            .map_err(|_| RuntimeError::Closed { component: "preview" })?;
    }
    Ok(())
}

async fn settle_composer(
    composer: &ComposerHandle,
    done: impl FnMut(&ComposerView) -> bool,
) -> Result<ComposerView, DemoError> {
    let mut changes = composer.changes();
    let view = tokio::time::timeout(SETTLE_TIMEOUT, changes.wait_for(done))
        .await
        .map_err(|_| DemoError::Timeout("composer"))?
        .map_err(|_| RuntimeError::Closed { component: "composer" })?;
    Ok((*view).clone())
}

fn print_list(heading: &str, previews: &[PreviewHandle]) -> Result<(), DemoError> {
    let mut out = io::stdout().lock();
    writeln!(out, "-- {heading} --")?;
    for preview in previews {
        writeln!(out, "{}", preview.view().summary())?;
    }
    Ok(())
}
