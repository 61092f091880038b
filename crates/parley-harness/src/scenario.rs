//! Seeded channel activity.
//!
//! [`SimWorld`] bundles a set of simulated channels with the services around
//! them. [`ScenarioGenerator`] produces a reproducible stream of
//! [`Activity`] from a seed, and [`SimWorld::apply`] plays it against the
//! simulated SDK.

use std::sync::Arc;

use parley_core::{ChannelHandle, User};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    SimActiveChannel, SimChannel, SimMessenger, SimNotifier, SimUploader,
    fixtures::{self, CURRENT_USER, ChannelBuilder},
};

const WORDS: &[&str] = &[
    "hello", "deploy", "lunch", "review", "ship", "coffee", "standup", "merge", "tests", "green",
];

/// One thing that happens in the simulated SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    /// `author` posts `text` to channel `channel`.
    Post {
        /// Channel index.
        channel: usize,
        /// Author index into [`SimWorld::authors`].
        author: usize,
        /// Message text.
        text: String,
    },
    /// The latest message of `channel` is edited.
    EditLatest {
        /// Channel index.
        channel: usize,
    },
    /// The latest message of `channel` is deleted.
    DeleteLatest {
        /// Channel index.
        channel: usize,
    },
    /// Every message of `channel` is removed.
    Truncate {
        /// Channel index.
        channel: usize,
    },
    /// The viewer reads `channel`.
    Read {
        /// Channel index.
        channel: usize,
    },
    /// The viewer switches to `channel`, or closes the active channel.
    Select {
        /// Channel index. `None` clears the selection.
        channel: Option<usize>,
    },
}

/// Simulated channels plus the services around them.
#[derive(Debug)]
pub struct SimWorld {
    /// Channels in list order.
    pub channels: Vec<Arc<SimChannel>>,
    /// Active-channel service every channel is registered with.
    pub active: Arc<SimActiveChannel>,
    /// Upload service.
    pub uploader: Arc<SimUploader>,
    /// Messaging service.
    pub messenger: Arc<SimMessenger>,
    /// Notification service.
    pub notifier: Arc<SimNotifier>,
    /// Possible message authors. The first one is the viewer.
    pub authors: Vec<User>,
    next_message: i64,
}

impl SimWorld {
    /// `count` channels named `channel-0`, `channel-1`, ... with nothing
    /// active.
    pub fn new(count: usize) -> Self {
        let authors = vec![
            fixtures::user(CURRENT_USER, "Me"),
            fixtures::user("ada", "Ada"),
            fixtures::user("grace", "Grace"),
            fixtures::user("linus", "Linus"),
        ];
        let active = Arc::new(SimActiveChannel::new());
        let channels: Vec<_> = (0..count)
            .map(|i| {
                let mut builder = ChannelBuilder::new(&format!("channel-{i}"));
                // Odd channels are direct conversations without a name
                if i % 2 == 0 {
                    builder = builder.name(&format!("Team {i}"));
                }
                builder.member(authors[1 + i % 3].clone()).simulate()
            })
            .collect();
        for channel in &channels {
            active.register(Arc::clone(channel));
        }

        Self {
            channels,
            active,
            uploader: Arc::new(SimUploader::new()),
            messenger: Arc::new(SimMessenger::new()),
            notifier: Arc::new(SimNotifier::new()),
            authors,
            next_message: 0,
        }
    }

    /// Play `activity` against the simulated SDK.
    ///
    /// Activities naming a channel or message that does not exist are
    /// skipped.
    pub fn apply(&mut self, activity: &Activity) {
        tracing::debug!(?activity, "applying activity");
        match activity {
            Activity::Post { channel, author, text } => {
                let target = (self.channels.get(*channel), self.authors.get(*author));
                let (Some(sim), Some(author)) = target else { return };
                self.next_message += 1;
                let seq = self.next_message;
                sim.push_message(fixtures::message(&format!("msg-{seq}"), author, text, seq));
            },
            Activity::EditLatest { channel } => {
                let Some(sim) = self.channels.get(*channel) else { return };
                if let Some(latest) = sim.snapshot().latest_message() {
                    let mut edited = (**latest).clone();
                    edited.text = Some(format!("{} (edited)", latest.text_or_empty()));
                    sim.update_message(edited);
                }
            },
            Activity::DeleteLatest { channel } => {
                let Some(sim) = self.channels.get(*channel) else { return };
                if let Some(latest) = sim.snapshot().latest_message() {
                    sim.delete_message(&latest.id, fixtures::epoch());
                }
            },
            Activity::Truncate { channel } => {
                if let Some(sim) = self.channels.get(*channel) {
                    sim.truncate();
                }
            },
            Activity::Read { channel } => {
                if let Some(sim) = self.channels.get(*channel) {
                    sim.mark_read(CURRENT_USER);
                }
            },
            Activity::Select { channel } => {
                let id = channel.and_then(|i| self.channels.get(i)).map(|c| c.id().to_string());
                self.active.activate(id.as_deref());
            },
        }
    }
}

/// Reproducible activity stream.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    rng: ChaCha8Rng,
    channels: usize,
    authors: usize,
}

impl ScenarioGenerator {
    /// Generator for a world with `channels` channels and `authors` authors.
    pub fn new(seed: u64, channels: usize, authors: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            channels: channels.max(1),
            authors: authors.max(1),
        }
    }

    /// Generator matching `world`.
    pub fn for_world(seed: u64, world: &SimWorld) -> Self {
        Self::new(seed, world.channels.len(), world.authors.len())
    }

    /// Next activity. Posts dominate; selection changes are rare.
    pub fn next_activity(&mut self) -> Activity {
        let channel = self.rng.gen_range(0..self.channels);
        match self.rng.gen_range(0..100) {
            0..60 => {
                let author = self.rng.gen_range(0..self.authors);
                let words = self.rng.gen_range(1..=4);
                let text = (0..words)
                    .map(|_| WORDS[self.rng.gen_range(0..WORDS.len())])
                    .collect::<Vec<_>>()
                    .join(" ");
                Activity::Post { channel, author, text }
            },
            60..70 => Activity::EditLatest { channel },
            70..77 => Activity::DeleteLatest { channel },
            77..80 => Activity::Truncate { channel },
            80..90 => Activity::Read { channel },
            90..98 => Activity::Select { channel: Some(channel) },
            _ => Activity::Select { channel: None },
        }
    }

    /// The next `count` activities.
    pub fn take(&mut self, count: usize) -> Vec<Activity> {
        (0..count).map(|_| self.next_activity()).collect()
    }
}
