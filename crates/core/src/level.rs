//! Level generation
//!
//! Builds a fresh playfield: a wall ring, weighted random interior, a player
//! spawn with its boulder-free surroundings, a hidden exit far from the spawn,
//! and the diamond quota.
//!
//! Placement uses rejection sampling with a hard cap, so pathological sizes
//! fail with [`GameError::GenerationFailed`] instead of spinning forever.

use tracing::{debug, warn};

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{
    GameError, Position, Tile, BOULDER_THRESHOLD, DIAMOND_QUOTA_RATIO, DIAMOND_THRESHOLD,
    DIRT_THRESHOLD, EXIT_MIN_DISTANCE, MAX_PLACEMENT_ATTEMPTS, MIN_DIAMONDS_REQUIRED,
    MAX_GRID_SIZE, MIN_GRID_SIZE, SPAWN_INSET,
};

/// A generated level, ready to be handed to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub grid: Grid,
    pub spawn: Position,
    /// Reserved exit cell. Not written into `grid` until revealed.
    pub exit: Position,
    pub diamonds_required: u32,
}

/// Generate a level of the given size.
pub fn generate(width: u16, height: u16, rng: &mut SimpleRng) -> Result<Level, GameError> {
    if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
        return Err(GameError::GenerationFailed {
            reason: format!(
                "grid {width}x{height} is smaller than the {MIN_GRID_SIZE}x{MIN_GRID_SIZE} minimum"
            ),
        });
    }
    if width > MAX_GRID_SIZE || height > MAX_GRID_SIZE {
        return Err(GameError::GenerationFailed {
            reason: format!(
                "grid {width}x{height} exceeds the {MAX_GRID_SIZE}x{MAX_GRID_SIZE} maximum"
            ),
        });
    }

    // Farthest two cells of the inset region can be apart.
    let span_x = (width - 2 * SPAWN_INSET) as u32;
    let span_y = (height - 2 * SPAWN_INSET) as u32;
    if (span_x - 1) + (span_y - 1) <= EXIT_MIN_DISTANCE {
        return Err(GameError::GenerationFailed {
            reason: format!(
                "grid {width}x{height} cannot fit an exit more than {EXIT_MIN_DISTANCE} cells from the spawn"
            ),
        });
    }

    let mut grid = fill(width, height, rng)?;

    let spawn = place(&grid, rng, "spawn", |_| true)?;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let p = grid.neighbor(spawn, dx, dy)?;
            if grid.is(p, Tile::Boulder) {
                grid.set(p, Tile::Dirt)?;
            }
        }
    }
    grid.set(spawn, Tile::Player)?;

    let exit = place(&grid, rng, "exit", |p| p.manhattan(spawn) > EXIT_MIN_DISTANCE)?;

    let diamonds = grid.count(Tile::Diamond) as u32;
    let diamonds_required = diamond_quota(diamonds);

    debug!(
        width,
        height,
        %spawn,
        %exit,
        diamonds,
        diamonds_required,
        "level generated"
    );

    Ok(Level {
        grid,
        spawn,
        exit,
        diamonds_required,
    })
}

/// `max(10, floor(0.8 * diamonds))`
pub fn diamond_quota(diamonds: u32) -> u32 {
    let share = (diamonds as f64 * DIAMOND_QUOTA_RATIO).floor() as u32;
    share.max(MIN_DIAMONDS_REQUIRED)
}

/// Wall ring plus one weighted draw per interior cell.
fn fill(width: u16, height: u16, rng: &mut SimpleRng) -> Result<Grid, GameError> {
    let mut grid = Grid::walled(width, height);
    for y in 1..height as i32 - 1 {
        for x in 1..width as i32 - 1 {
            let roll = rng.next_unit();
            let tile = if roll < DIRT_THRESHOLD {
                Tile::Dirt
            } else if roll < BOULDER_THRESHOLD {
                Tile::Boulder
            } else if roll < DIAMOND_THRESHOLD {
                Tile::Diamond
            } else {
                Tile::Empty
            };
            grid.set(Position::new(x, y), tile)?;
        }
    }
    Ok(grid)
}

/// Sample a cell from the inset region that is not a boulder and passes `accept`.
fn place(
    grid: &Grid,
    rng: &mut SimpleRng,
    what: &str,
    accept: impl Fn(Position) -> bool,
) -> Result<Position, GameError> {
    let span_x = (grid.width() - 2 * SPAWN_INSET) as u32;
    let span_y = (grid.height() - 2 * SPAWN_INSET) as u32;

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let x = SPAWN_INSET as i32 + rng.next_range(span_x) as i32;
        let y = SPAWN_INSET as i32 + rng.next_range(span_y) as i32;
        let p = Position::new(x, y);
        if !grid.is(p, Tile::Boulder) && accept(p) {
            return Ok(p);
        }
    }

    warn!(what, attempts = MAX_PLACEMENT_ATTEMPTS, "placement retry cap hit");
    Err(GameError::GenerationFailed {
        reason: format!("no {what} cell found after {MAX_PLACEMENT_ATTEMPTS} attempts"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GRID_HEIGHT, GRID_WIDTH};

    #[test]
    fn test_default_level_invariants() {
        let mut rng = SimpleRng::new(12345);
        let level = generate(GRID_WIDTH, GRID_HEIGHT, &mut rng).unwrap();

        assert!(level.grid.has_wall_border());
        assert_eq!(level.grid.count(Tile::Player), 1);
        assert_eq!(level.grid.count(Tile::Exit), 0);
        assert_eq!(level.grid.find(Tile::Player), Some(level.spawn));
        assert!(level.diamonds_required >= MIN_DIAMONDS_REQUIRED);
        assert!(level.exit.manhattan(level.spawn) > EXIT_MIN_DISTANCE);
    }

    #[test]
    fn test_spawn_neighbourhood_has_no_boulders() {
        for seed in 1..50 {
            let level = generate(GRID_WIDTH, GRID_HEIGHT, &mut SimpleRng::new(seed)).unwrap();
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let p = level.spawn.offset(dx, dy);
                    assert_ne!(level.grid.tile(p), Some(Tile::Boulder), "seed {seed} at {p}");
                }
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(GRID_WIDTH, GRID_HEIGHT, &mut SimpleRng::new(42)).unwrap();
        let b = generate(GRID_WIDTH, GRID_HEIGHT, &mut SimpleRng::new(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_small_grid_fails() {
        let err = generate(4, 20, &mut SimpleRng::new(1)).unwrap_err();
        assert!(matches!(err, GameError::GenerationFailed { .. }));
    }

    #[test]
    fn test_exit_distance_unreachable_fails_fast() {
        // Inset region is 6x6, so no two cells are more than 10 apart.
        let err = generate(10, 10, &mut SimpleRng::new(1)).unwrap_err();
        assert!(matches!(err, GameError::GenerationFailed { .. }));
    }

    #[test]
    fn test_diamond_quota() {
        assert_eq!(diamond_quota(0), 10);
        assert_eq!(diamond_quota(12), 10);
        assert_eq!(diamond_quota(13), 10);
        assert_eq!(diamond_quota(14), 11);
        assert_eq!(diamond_quota(30), 24);
    }
}
