use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

use crate::grid::Grid;
use crate::types::{GameEvent, Position, SessionState, Tile};

/// Immutable view of a session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub episode_id: u32,
    pub seed: u32,
    pub clock_ms: u64,
    pub grid: Grid,
    pub player: Position,
    pub player_alive: bool,
    /// Only set once the exit has been revealed.
    pub exit: Option<Position>,
    pub exit_revealed: bool,
    pub exit_hint_visible: bool,
    pub diamonds_collected: u32,
    pub diamonds_required: u32,
    pub time_remaining: u32,
    pub crush_pending: bool,
    /// A physics cascade is still scheduled.
    pub settling: bool,
    /// Events since the previous snapshot, oldest first.
    pub events: Vec<GameEvent>,
}

impl SessionSnapshot {
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.grid.tile(pos)
    }

    pub fn running(&self) -> bool {
        self.state == SessionState::Running
    }
}

/// Grids serialize as ASCII rows, one string per row.
impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows = self.to_ascii();
        let mut seq = serializer.serialize_seq(Some(rows.len()))?;
        for row in &rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
