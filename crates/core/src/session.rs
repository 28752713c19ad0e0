//! Session module - the game's state machine
//!
//! A [`Session`] owns the grid, the counters and a logical millisecond clock.
//! Callers drive it with two inputs:
//!
//! - [`Session::submit_direction`] for decoded player commands
//! - [`Session::advance_clock`] for elapsed wall-clock time
//!
//! Both return a [`SessionSnapshot`] carrying the events produced since the
//! previous snapshot. All scheduling (countdown, physics cascade, crush
//! deadline) happens on the session's own clock, so restarting replaces every
//! pending timer along with the grid.

use tracing::{debug, info, warn};

use crate::clock::{TimerKind, Timers};
use crate::grid::Grid;
use crate::level::{self, Level};
use crate::physics;
use crate::player::{self, MoveReport};
use crate::rng::SimpleRng;
use crate::snapshot::SessionSnapshot;
use crate::types::*;

/// How physics runs after a player move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeMode {
    /// One tick right away, then one tick per `physics_step_ms` until the
    /// grid rests. Players can act between ticks.
    #[default]
    Staggered,
    /// Settle to rest before the command returns.
    Immediate,
}

/// Per-session tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: u16,
    pub height: u16,
    pub round_seconds: u32,
    pub crush_delay_ms: u32,
    pub physics_step_ms: u32,
    pub exit_hint_ms: u32,
    pub cascade: CascadeMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            round_seconds: ROUND_SECONDS,
            crush_delay_ms: CRUSH_DELAY_MS,
            physics_step_ms: PHYSICS_STEP_MS,
            exit_hint_ms: EXIT_HINT_MS,
            cascade: CascadeMode::Staggered,
        }
    }
}

impl SessionConfig {
    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cascade(mut self, cascade: CascadeMode) -> Self {
        self.cascade = cascade;
        self
    }
}

/// A single run: one level, one countdown, one outcome.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    rng: SimpleRng,
    /// Seed the current level was generated from.
    seed: u32,
    /// Monotonic run id (increments on restart).
    episode_id: u32,
    state: SessionState,
    pub(crate) grid: Grid,
    pub(crate) player: Position,
    exit: Position,
    exit_revealed: bool,
    diamonds_collected: u32,
    diamonds_required: u32,
    time_remaining: u32,
    player_alive: bool,
    clock_ms: u64,
    timers: Timers,
    exit_hint_until: Option<u64>,
    events: Vec<GameEvent>,
}

impl Session {
    /// Create an idle session. Nothing is generated until [`Session::start`].
    pub fn new(config: SessionConfig, seed: u32) -> Self {
        Self {
            config,
            rng: SimpleRng::new(seed),
            seed: 0,
            episode_id: 0,
            state: SessionState::Idle,
            grid: Grid::walled(config.width, config.height),
            player: Position::default(),
            exit: Position::default(),
            exit_revealed: false,
            diamonds_collected: 0,
            diamonds_required: MIN_DIAMONDS_REQUIRED,
            time_remaining: config.round_seconds,
            player_alive: true,
            clock_ms: 0,
            timers: Timers::default(),
            exit_hint_until: None,
            events: Vec::new(),
        }
    }

    /// Start a running session on a prepared level.
    ///
    /// The level's grid must hold a single player tile at `level.spawn`.
    pub fn with_level(config: SessionConfig, level: Level) -> Self {
        let mut session = Self::new(config, 1);
        session.begin(level, 0);
        session
    }

    /// Generate a level and start running.
    ///
    /// No-op unless idle. On failure the session stays idle and a later call
    /// draws a fresh seed.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.state != SessionState::Idle {
            return Ok(());
        }
        let seed = self.rng.next_u32();
        let level = level::generate(self.config.width, self.config.height, &mut SimpleRng::new(seed))
            .inspect_err(|err| warn!(seed, %err, "level generation failed"))?;
        self.begin(level, seed);
        Ok(())
    }

    /// Tear down the current run and start a new one.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.timers.cancel_all();
        self.events.clear();
        self.exit_hint_until = None;
        self.state = SessionState::Idle;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.start()
    }

    fn begin(&mut self, level: Level, seed: u32) {
        self.seed = seed;
        self.grid = level.grid;
        self.player = level.spawn;
        self.exit = level.exit;
        self.exit_revealed = false;
        self.diamonds_collected = 0;
        self.diamonds_required = level.diamonds_required;
        self.time_remaining = self.config.round_seconds;
        self.player_alive = true;
        self.exit_hint_until = None;
        self.timers.cancel_all();
        self.state = SessionState::Running;

        let now = self.clock_ms;
        self.timers
            .schedule(TimerKind::Countdown, now + u64::from(COUNTDOWN_STEP_MS));
        self.events.push(GameEvent::SessionStarted {
            episode_id: self.episode_id,
        });
        info!(
            episode_id = self.episode_id,
            seed,
            diamonds_required = self.diamonds_required,
            "session started"
        );

        self.run_physics();
    }

    /// Apply a decoded direction. Ignored unless running.
    pub fn submit_direction(&mut self, direction: Direction) -> SessionSnapshot {
        self.apply_direction(direction);
        self.take_snapshot()
    }

    /// Like [`Session::submit_direction`], but reports what the move did
    /// instead of building a snapshot.
    pub fn apply_direction(&mut self, direction: Direction) -> MoveReport {
        player::attempt_move(self, direction)
    }

    /// Advance the logical clock, firing every timer that falls due.
    pub fn advance_clock(&mut self, elapsed_ms: u32) -> SessionSnapshot {
        let target = self.clock_ms + u64::from(elapsed_ms);
        while self.state == SessionState::Running {
            let Some((due, kind)) = self.timers.pop_due(target) else {
                break;
            };
            self.clock_ms = due;
            match kind {
                TimerKind::Crush => self.crush_elapsed(),
                TimerKind::Countdown => self.countdown_tick(),
                TimerKind::Physics => self.physics_tick(),
            }
        }
        self.clock_ms = target;
        self.take_snapshot()
    }

    /// Snapshot without draining events.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            episode_id: self.episode_id,
            seed: self.seed,
            clock_ms: self.clock_ms,
            grid: self.grid.clone(),
            player: self.player,
            player_alive: self.player_alive,
            exit: self.exit_revealed.then_some(self.exit),
            exit_revealed: self.exit_revealed,
            exit_hint_visible: self.exit_hint_until.is_some_and(|t| self.clock_ms < t),
            diamonds_collected: self.diamonds_collected,
            diamonds_required: self.diamonds_required,
            time_remaining: self.time_remaining,
            crush_pending: self.crush_pending(),
            settling: self.timers.is_pending(TimerKind::Physics),
            events: Vec::new(),
        }
    }

    /// Snapshot carrying (and clearing) the pending events.
    pub fn take_snapshot(&mut self) -> SessionSnapshot {
        let mut snap = self.snapshot();
        snap.events = std::mem::take(&mut self.events);
        snap
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn player_alive(&self) -> bool {
        self.player_alive
    }

    /// Reserved exit cell (hidden from snapshots until revealed).
    pub fn exit(&self) -> Position {
        self.exit
    }

    pub fn exit_revealed(&self) -> bool {
        self.exit_revealed
    }

    pub fn diamonds_collected(&self) -> u32 {
        self.diamonds_collected
    }

    pub fn diamonds_required(&self) -> u32 {
        self.diamonds_required
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn crush_pending(&self) -> bool {
        self.timers.is_pending(TimerKind::Crush)
    }

    /// Milliseconds until the pending crush fires.
    pub fn crush_remaining_ms(&self) -> Option<u64> {
        self.timers
            .due_at(TimerKind::Crush)
            .map(|due| due.saturating_sub(self.clock_ms))
    }

    pub fn settling(&self) -> bool {
        self.timers.is_pending(TimerKind::Physics)
    }

    /// Count one diamond and reveal the exit the first time the quota is met.
    pub(crate) fn collect_diamond(&mut self, at: Position) {
        self.diamonds_collected += 1;
        self.events.push(GameEvent::DiamondCollected {
            at,
            total: self.diamonds_collected,
        });
        if self.diamonds_collected >= self.diamonds_required && !self.exit_revealed {
            self.reveal_exit();
        }
    }

    fn reveal_exit(&mut self) {
        if let Err(err) = self.grid.set(self.exit, Tile::Exit) {
            warn!(%err, "exit outside the grid");
            return;
        }
        self.exit_revealed = true;
        self.exit_hint_until = Some(self.clock_ms + u64::from(self.config.exit_hint_ms));
        self.events.push(GameEvent::ExitRevealed { at: self.exit });
        debug!(exit = %self.exit, "exit revealed");
    }

    /// Tile left behind when the player steps off `pos`.
    pub(crate) fn vacated_tile(&self, pos: Position) -> Tile {
        if self.exit_revealed && pos == self.exit {
            Tile::Exit
        } else {
            Tile::Empty
        }
    }

    /// Arm the crush timer. Idempotent while one is pending.
    pub(crate) fn arm_crush(&mut self, boulder: Position) {
        let due = self.clock_ms + u64::from(self.config.crush_delay_ms);
        if self.timers.schedule_if_idle(TimerKind::Crush, due) {
            self.events.push(GameEvent::CrushArmed { boulder });
            debug!(%boulder, player = %self.player, "crush timer armed");
        }
    }

    pub(crate) fn cancel_crush(&mut self) {
        if self.timers.cancel(TimerKind::Crush) {
            self.events.push(GameEvent::CrushCancelled);
            debug!(player = %self.player, "crush timer cancelled");
        }
    }

    pub(crate) fn win(&mut self) {
        self.state = SessionState::Won;
        self.timers.cancel_all();
        self.events.push(GameEvent::SessionWon);
        info!(
            episode_id = self.episode_id,
            diamonds = self.diamonds_collected,
            time_remaining = self.time_remaining,
            "session won"
        );
    }

    fn lose(&mut self, cause: LossCause) {
        self.state = SessionState::Lost;
        self.player_alive = false;
        self.timers.cancel_all();
        self.events.push(GameEvent::SessionLost { cause });
        info!(episode_id = self.episode_id, ?cause, "session lost");
    }

    /// Physics after a grid mutation.
    pub(crate) fn run_physics(&mut self) {
        match self.config.cascade {
            CascadeMode::Staggered => {
                let report = physics::step(&mut self.grid);
                self.apply_threat(report.crush_threat);
                if report.changed {
                    let due = self.clock_ms + u64::from(self.config.physics_step_ms);
                    self.timers.schedule_if_idle(TimerKind::Physics, due);
                }
            }
            CascadeMode::Immediate => {
                let cap = (u32::from(self.grid.width()) * u32::from(self.grid.height())).max(64);
                let report = physics::settle(&mut self.grid, cap);
                if !report.settled {
                    warn!(steps = report.steps, "physics did not settle within the step cap");
                }
                self.apply_threat(report.crush_threat);
            }
        }
    }

    fn apply_threat(&mut self, threat: Option<Position>) {
        if let Some(boulder) = threat {
            self.arm_crush(boulder);
        }
    }

    fn physics_tick(&mut self) {
        let report = physics::step(&mut self.grid);
        self.apply_threat(report.crush_threat);
        if report.changed {
            let due = self.clock_ms + u64::from(self.config.physics_step_ms);
            self.timers.schedule(TimerKind::Physics, due);
        } else {
            debug!(clock_ms = self.clock_ms, "physics settled");
        }
    }

    fn countdown_tick(&mut self) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.lose(LossCause::Timeout);
        } else {
            let due = self.clock_ms + u64::from(COUNTDOWN_STEP_MS);
            self.timers.schedule(TimerKind::Countdown, due);
        }
    }

    fn crush_elapsed(&mut self) {
        self.events.push(GameEvent::BoulderCrushed { at: self.player });
        self.lose(LossCause::Crushed);
    }
}
