//! Autoplay driver
//!
//! Runs a [`PlaybackEngine`] inside one tokio task. The task is the only
//! owner of the engine; callers talk to it over an mpsc command channel and
//! observe it through a `watch` snapshot and a broadcast event stream.
//!
//! Timer discipline on every slide change:
//! 1. drop the old interval (cancel)
//! 2. progress is already zeroed by the engine (reset)
//! 3. arm a fresh interval stamped with the new generation (re-arm)
//!
//! On the terminal slide no interval is armed at all.

use super::engine::{PlaybackEngine, SlideChange, TickOutcome};
use crate::export::ExportContext;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tripwrap_common::config::TomlConfig;
use tripwrap_common::events::{StoryEvent, TransitionCause};
use tripwrap_common::time;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

/// User input forwarded to the player task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    /// Tap at horizontal fraction 0.0-1.0
    Tap(f64),
    Next,
    Prev,
    Shutdown,
}

/// Latest observable player state
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub index: usize,
    pub total: usize,
    pub percent: f64,
    pub generation: u64,
    /// On the terminal slide; autoplay is off
    pub finished: bool,
}

impl PlayerSnapshot {
    fn of(engine: &PlaybackEngine) -> Self {
        Self {
            index: engine.index(),
            total: engine.len(),
            percent: engine.progress_percent(),
            generation: engine.generation(),
            finished: engine.is_at_end(),
        }
    }
}

/// Player settings
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub tick_interval: Duration,
    pub profile_name: String,
}

impl From<&TomlConfig> for PlayerOptions {
    fn from(config: &TomlConfig) -> Self {
        Self {
            tick_interval: config.playback.tick_interval(),
            profile_name: config.story.profile_name.clone(),
        }
    }
}

/// Handle to a running autoplay task
pub struct StoryPlayer {
    commands: mpsc::Sender<PlayerCommand>,
    snapshot: watch::Receiver<PlayerSnapshot>,
    events: broadcast::Sender<StoryEvent>,
    profile_name: String,
    task: JoinHandle<()>,
}

impl StoryPlayer {
    /// Start autoplay from the engine's current slide
    pub fn spawn(engine: PlaybackEngine, options: PlayerOptions) -> Self {
        Self::spawn_subscribed(engine, options).0
    }

    /// Start autoplay and return an event receiver that sees every event,
    /// including the initial `SlideChanged` for the starting slide
    pub fn spawn_subscribed(
        engine: PlaybackEngine,
        options: PlayerOptions,
    ) -> (Self, broadcast::Receiver<StoryEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snap_tx, snap_rx) = watch::channel(PlayerSnapshot::of(&engine));
        let (event_tx, event_rx) = broadcast::channel(EVENT_BUFFER);

        let task = PlayerTask {
            engine,
            tick_interval: options.tick_interval.max(Duration::from_millis(1)),
            timer: None,
            last_tick: Instant::now(),
            snapshot: snap_tx,
            events: event_tx.clone(),
        };

        info!("Starting story player");
        let handle = tokio::spawn(task.run(cmd_rx));

        let player = Self {
            commands: cmd_tx,
            snapshot: snap_rx,
            events: event_tx,
            profile_name: options.profile_name,
            task: handle,
        };
        (player, event_rx)
    }

    pub async fn tap(&self, x_fraction: f64) {
        self.send(PlayerCommand::Tap(x_fraction)).await;
    }

    pub async fn next(&self) {
        self.send(PlayerCommand::Next).await;
    }

    pub async fn prev(&self) {
        self.send(PlayerCommand::Prev).await;
    }

    /// Current state without waiting
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every state change
    pub fn watch(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoryEvent> {
        self.events.subscribe()
    }

    /// Context handed to the export side for a snapshot of the current slide
    pub fn export_context(&self) -> ExportContext {
        ExportContext {
            slide_index: self.snapshot.borrow().index,
            profile_name: self.profile_name.clone(),
        }
    }

    /// Resolve once the terminal slide is reached (or the task has exited)
    pub async fn wait_finished(&self) -> PlayerSnapshot {
        let mut rx = self.snapshot.clone();
        let finished = rx.wait_for(|s| s.finished).await.map(|s| s.clone());
        finished.unwrap_or_else(|_| self.snapshot())
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(self) {
        self.send(PlayerCommand::Shutdown).await;
        if let Err(e) = self.task.await {
            warn!("Story player task ended abnormally: {}", e);
        }
    }

    async fn send(&self, command: PlayerCommand) {
        // A closed channel means the task already stopped; nothing to do
        if self.commands.send(command).await.is_err() {
            debug!("Player command {:?} dropped: task stopped", command);
        }
    }
}

struct PlayerTask {
    engine: PlaybackEngine,
    tick_interval: Duration,

    /// Armed interval and the generation it belongs to
    timer: Option<(Interval, u64)>,

    last_tick: Instant,
    snapshot: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<StoryEvent>,
}

impl PlayerTask {
    async fn run(mut self, mut commands: mpsc::Receiver<PlayerCommand>) {
        self.arm();
        self.announce_initial();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(PlayerCommand::Shutdown) => break,
                    Some(command) => self.handle_command(command),
                },
                generation = next_tick(&mut self.timer) => self.handle_tick(generation),
            }
        }

        info!("Story player stopped at slide {}", self.engine.index());
        self.broadcast(StoryEvent::PlayerStopped {
            index: self.engine.index(),
            timestamp: time::now(),
        });
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        let now = Instant::now().into_std();
        let change = match command {
            PlayerCommand::Tap(x) => self.engine.tap_at(x, now),
            PlayerCommand::Next => self.engine.advance(now),
            PlayerCommand::Prev => self.engine.retreat(now),
            PlayerCommand::Shutdown => None,
        };
        match change {
            Some(change) => self.on_change(change, TransitionCause::Manual),
            None => debug!("Command {:?} absorbed", command),
        }
    }

    fn handle_tick(&mut self, generation: u64) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        match self
            .engine
            .tick_generation(generation, now.into_std(), elapsed)
        {
            TickOutcome::Progressed { percent } => {
                self.publish();
                self.broadcast(StoryEvent::SlideProgress {
                    index: self.engine.index(),
                    percent,
                    timestamp: time::now(),
                });
            }
            TickOutcome::Advanced(change) => self.on_change(change, TransitionCause::Timer),
            TickOutcome::Ignored => {
                // Nothing left to time on this slide
                if self.engine.current_duration().is_none() {
                    self.timer = None;
                }
            }
        }
    }

    fn on_change(&mut self, change: SlideChange, cause: TransitionCause) {
        self.arm();
        self.publish();

        if let Some(slide) = self.engine.slide() {
            self.broadcast(StoryEvent::SlideChanged {
                index: change.to,
                total: self.engine.len(),
                kind: slide.kind(),
                cause,
                timestamp: time::now(),
            });
        }
        if self.engine.is_at_end() {
            info!("Story finished at slide {}", change.to);
            self.broadcast(StoryEvent::StoryFinished {
                index: change.to,
                timestamp: time::now(),
            });
        }
    }

    /// Replace whatever timer was running with one for the current slide
    fn arm(&mut self) {
        self.timer = None;
        if self.engine.current_duration().is_none() {
            debug!("Autoplay disarmed at slide {}", self.engine.index());
            return;
        }
        let start = Instant::now();
        let mut interval = interval_at(start + self.tick_interval, self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.last_tick = start;
        self.timer = Some((interval, self.engine.generation()));
    }

    fn announce_initial(&self) {
        if let Some(slide) = self.engine.slide() {
            self.broadcast(StoryEvent::SlideChanged {
                index: self.engine.index(),
                total: self.engine.len(),
                kind: slide.kind(),
                cause: TransitionCause::Manual,
                timestamp: time::now(),
            });
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(PlayerSnapshot::of(&self.engine));
    }

    fn broadcast(&self, event: StoryEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.events.send(event);
    }
}

/// Wait for the armed timer, or forever if none is armed
async fn next_tick(timer: &mut Option<(Interval, u64)>) -> u64 {
    match timer {
        Some((interval, generation)) => {
            interval.tick().await;
            *generation
        }
        None => std::future::pending().await,
    }
}
