//! Externally invokable commands. Each one mutates state, snapshots it and
//! regenerates the views, in that order, before the next command runs.

use crate::config::{ChatConfig, StatsSource, WelcomePolicy};
use crate::session::codec::{LoadedSnapshot, SnapshotCodec};
use crate::session::stats::StatsAggregate;
use crate::session::store::KeyValueStore;
use crate::session::{Clock, Message, MessageStore, SYSTEM_USERNAME, WELCOME_TEXT};
use crate::view::{ChartBackend, MessageRenderer, PanelState, ViewState, ViewSynchronizer};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

const DEMO_USERNAMES: [&str; 32] = [
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack", "Kate",
    "Leo", "Maya", "Noah", "Olivia", "Pete", "Quinn", "Ruby", "Sam", "Tara", "Uma", "Victor",
    "Wendy", "Xander", "Yara", "Zoe", "Alex", "Blake", "Casey", "Drew", "Emery", "Finley",
];

const DEMO_TEXTS: [&str; 25] = [
    "Hey everyone! 👋",
    "How's everyone doing today?",
    "Just finished a great project!",
    "Anyone else excited about the weekend?",
    "Coffee time! ☕",
    "Working on something cool...",
    "Beautiful day outside! ☀️",
    "Just discovered this amazing chat app!",
    "Quick question - anyone here?",
    "Love the new design! 🎨",
    "Testing this feature out...",
    "Hope everyone is staying safe!",
    "Such a productive day!",
    "Anyone want to collaborate?",
    "This chat is really smooth!",
    "Great to see everyone here!",
    "Just saying hello! 😊",
    "Loving the dark theme!",
    "Quick break from coding...",
    "The stats feature is neat!",
    "Random message time! 🎲",
    "Everything looks so modern!",
    "Nice work on the UI!",
    "Chat bubbles look amazing!",
    "The colors are perfect! 🌈",
];

const DEMO_BATCH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit { username: String, text: String },
    ClearAll,
    ToggleStats,
    CloseStats,
    SeedDemo,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::ClearAll => "clear_all",
            Self::ToggleStats => "toggle_stats",
            Self::CloseStats => "close_stats",
            Self::SeedDemo => "seed_demo",
        }
    }
}

pub struct CommandSurface<S, R: MessageRenderer, B: ChartBackend> {
    messages: MessageStore,
    stats: StatsAggregate,
    codec: SnapshotCodec<S>,
    views: ViewSynchronizer<R, B>,
    welcome: WelcomePolicy,
    warnings: Vec<String>,
}

impl<S, R, B> CommandSurface<S, R, B>
where
    S: KeyValueStore,
    R: MessageRenderer,
    B: ChartBackend,
{
    /// Load the persisted snapshot, seeding a welcome message when nothing
    /// was stored, and render the initial views.
    pub fn start(config: &ChatConfig, store: S, renderer: R, backend: B, clock: Box<dyn Clock>) -> Self {
        let mut surface = Self {
            messages: MessageStore::new(clock),
            stats: StatsAggregate::new(),
            codec: SnapshotCodec::new(store),
            views: ViewSynchronizer::new(renderer, backend),
            welcome: config.welcome,
            warnings: Vec::new(),
        };

        let snapshot = surface.codec.load();
        if snapshot.is_empty() {
            surface.seed_welcome();
        } else {
            surface.restore(snapshot, config.stats_source);
        }

        surface.refresh();
        surface
    }

    fn excluded_author(&self) -> Option<&'static str> {
        match self.welcome {
            WelcomePolicy::Exclude => Some(SYSTEM_USERNAME),
            WelcomePolicy::Count => None,
        }
    }

    fn seed_welcome(&mut self) {
        if self.messages.post_system(WELCOME_TEXT).is_some()
            && self.welcome == WelcomePolicy::Count
        {
            self.stats.record(SYSTEM_USERNAME);
        }
        self.persist();
    }

    fn restore(&mut self, snapshot: LoadedSnapshot, source: StatsSource) {
        let log = snapshot.messages.unwrap_or_default();
        let exclude = self.excluded_author();

        self.stats = match (source, snapshot.stats) {
            (StatsSource::Snapshot, stored) => stored.unwrap_or_default(),
            (StatsSource::Recompute, _) => StatsAggregate::from_log(&log, exclude),
            (StatsSource::Reconcile, stored) => {
                let rebuilt = StatsAggregate::from_log(&log, exclude);
                match stored {
                    Some(stored) if stored == rebuilt => stored,
                    Some(_) => {
                        tracing::warn!(
                            messages = log.len(),
                            "stored stats disagree with message log; rebuilding"
                        );
                        rebuilt
                    }
                    None => {
                        if !log.is_empty() {
                            tracing::warn!(messages = log.len(), "stored stats missing; rebuilding");
                        }
                        rebuilt
                    }
                }
            }
        };
        self.messages.replace(log);
    }

    /// Returns `false` only for a rejected submit.
    pub fn apply(&mut self, command: Command) -> bool {
        tracing::debug!(command = command.name(), "applying command");
        match command {
            Command::Submit { username, text } => return self.submit(&username, &text),
            Command::ClearAll => self.clear_all(),
            Command::ToggleStats => self.toggle_stats(),
            Command::CloseStats => self.close_stats(),
            Command::SeedDemo => self.seed_demo(),
        }
        true
    }

    /// Returns whether the post was accepted. A blank `text` changes nothing.
    pub fn submit(&mut self, username: &str, text: &str) -> bool {
        let Some(message) = self.messages.post(username, text) else {
            tracing::debug!("ignoring submit with empty text");
            return false;
        };
        self.stats.record(&message.username);
        self.persist();
        self.refresh();
        true
    }

    pub fn clear_all(&mut self) {
        self.messages.clear();
        self.stats.reset();
        self.persist();
        self.refresh();
    }

    pub fn toggle_stats(&mut self) {
        self.views.toggle_stats_panel(self.messages.all(), &self.stats);
    }

    pub fn close_stats(&mut self) {
        self.views.close_stats_panel();
    }

    /// Append a fixed batch of sample messages, picked by current log length.
    pub fn seed_demo(&mut self) {
        for _ in 0..DEMO_BATCH {
            let len = self.messages.len();
            let username = DEMO_USERNAMES[len % DEMO_USERNAMES.len()];
            let text = DEMO_TEXTS[len % DEMO_TEXTS.len()];
            if let Some(message) = self.messages.post(username, text) {
                self.stats.record(&message.username);
            }
        }
        self.persist();
        self.refresh();
    }

    fn persist(&mut self) {
        let report = self.codec.save(self.messages.all(), &self.stats);
        self.warnings
            .extend(report.failures().map(|err| format!("failed to persist snapshot: {err}")));
    }

    fn refresh(&mut self) {
        self.views.refresh(self.messages.all(), &self.stats);
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.all()
    }

    pub fn stats(&self) -> &StatsAggregate {
        &self.stats
    }

    pub fn view(&self) -> &ViewState<R::Node> {
        self.views.state()
    }

    pub fn views(&self) -> &ViewSynchronizer<R, B> {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewSynchronizer<R, B> {
        &mut self.views
    }

    pub fn panel(&self) -> PanelState {
        self.views.panel()
    }

    pub fn store(&self) -> &S {
        self.codec.store()
    }

    /// Drain persistence warnings accumulated since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

/// Cloneable handle for enqueueing commands from anywhere in the host.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
}

impl CommandSender {
    pub fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            tracing::warn!("command queue closed; dropping command");
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    pub applied: usize,
    /// Submits the surface accepted.
    pub posted: usize,
}

/// Single-owner queue: commands are applied one at a time, in send order.
pub struct CommandQueue {
    rx: Receiver<Command>,
}

pub fn command_channel() -> (CommandSender, CommandQueue) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandQueue { rx })
}

impl CommandQueue {
    /// Apply every queued command in send order.
    pub fn drain<S, R, B>(&self, surface: &mut CommandSurface<S, R, B>) -> Drained
    where
        S: KeyValueStore,
        R: MessageRenderer,
        B: ChartBackend,
    {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(command) => {
                    let is_submit = matches!(command, Command::Submit { .. });
                    if surface.apply(command) && is_submit {
                        drained.posted += 1;
                    }
                    drained.applied += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }
}
