//! Player movement rules
//!
//! A command is one cardinal step, resolved in priority order:
//!
//! - **Dash**: moving down while the crush timer runs jumps two cells if
//!   neither is wall or boulder, collecting diamonds on the way and cancelling
//!   the timer. A diamond jumped over leaves dirt behind. It is the only escape from a boulder resting on the player.
//! - **Step**: walls block; boulders are pushed into an empty cell beyond;
//!   diamonds are collected; the revealed exit wins once the quota is met;
//!   dirt and empty cells are walked into.
//!
//! Every successful move hands the grid to physics.

use arrayvec::ArrayVec;

use crate::session::Session;
use crate::types::{Direction, Position, Tile};

/// What a command did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Blocked, or the session is not running. Nothing changed.
    Rejected,
    Moved,
    /// Moved and pushed a boulder ahead.
    Pushed,
    /// Two-cell escape from a pending crush.
    Dashed,
    /// Walked into the open exit with the quota met.
    Exited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    /// Cells whose diamond this move collected.
    pub collected: ArrayVec<Position, 2>,
}

impl MoveReport {
    fn rejected() -> Self {
        Self::new(MoveOutcome::Rejected)
    }

    fn new(outcome: MoveOutcome) -> Self {
        Self {
            outcome,
            collected: ArrayVec::new(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome != MoveOutcome::Rejected
    }
}

/// Apply one directional command to a running session.
pub fn attempt_move(session: &mut Session, direction: Direction) -> MoveReport {
    if !session.running() {
        return MoveReport::rejected();
    }

    if direction == Direction::Down && session.crush_pending() {
        if let Some(report) = try_dash(session) {
            session.run_physics();
            return report;
        }
    }

    let report = step(session, direction);
    if matches!(report.outcome, MoveOutcome::Moved | MoveOutcome::Pushed) {
        session.run_physics();
    }
    report
}

fn try_dash(session: &mut Session) -> Option<MoveReport> {
    let from = session.player;
    let mid = session.grid.neighbor(from, 0, 1).ok()?;
    let dest = session.grid.neighbor(from, 0, 2).ok()?;

    let open = |t: Tile| t != Tile::Wall && t != Tile::Boulder;
    let mid_tile = session.grid.tile(mid).filter(|&t| open(t))?;
    let dest_tile = session.grid.tile(dest).filter(|&t| open(t))?;

    let mut report = MoveReport::new(MoveOutcome::Dashed);
    if mid_tile == Tile::Diamond {
        // Jumped-over cells keep supporting whatever falls into the vacated one.
        session.grid.set(mid, Tile::Dirt).ok()?;
        session.collect_diamond(mid);
        report.collected.push(mid);
    }
    if dest_tile == Tile::Diamond {
        session.collect_diamond(dest);
        report.collected.push(dest);
    }

    relocate(session, from, dest)?;
    session.cancel_crush();
    Some(report)
}

fn step(session: &mut Session, direction: Direction) -> MoveReport {
    let from = session.player;
    let (dx, dy) = direction.delta();
    let Ok(target) = session.grid.neighbor(from, dx, dy) else {
        return MoveReport::rejected();
    };
    let Some(tile) = session.grid.tile(target) else {
        return MoveReport::rejected();
    };

    let mut report = MoveReport::new(MoveOutcome::Moved);
    match tile {
        Tile::Wall | Tile::Player => return MoveReport::rejected(),
        Tile::Boulder => {
            let Ok(beyond) = session.grid.neighbor(target, dx, dy) else {
                return MoveReport::rejected();
            };
            if !session.grid.is(beyond, Tile::Empty) {
                return MoveReport::rejected();
            }
            if session.grid.shift(target, beyond, Tile::Empty).is_err() {
                return MoveReport::rejected();
            }
            report.outcome = MoveOutcome::Pushed;
        }
        Tile::Diamond => {
            session.collect_diamond(target);
            report.collected.push(target);
        }
        Tile::Exit => {
            if session.diamonds_collected() >= session.diamonds_required() {
                session.win();
                return MoveReport::new(MoveOutcome::Exited);
            }
            return MoveReport::rejected();
        }
        Tile::Dirt | Tile::Empty => {}
    }

    if relocate(session, from, target).is_none() {
        return MoveReport::rejected();
    }

    // Stepping out from under the boulder defuses the crush.
    let covered = session
        .grid
        .neighbor(target, 0, -1)
        .is_ok_and(|above| session.grid.is(above, Tile::Boulder));
    if session.crush_pending() && !covered {
        session.cancel_crush();
    }

    report
}

fn relocate(session: &mut Session, from: Position, to: Position) -> Option<()> {
    let vacated = session.vacated_tile(from);
    session.grid.set(from, vacated).ok()?;
    session.grid.set(to, Tile::Player).ok()?;
    session.player = to;
    Some(())
}
