//! Physics module - gravity and rolling for boulders and diamonds
//!
//! One [`step`] scans the grid bottom-up, left-to-right, and applies the first
//! matching rule to every boulder or diamond:
//!
//! 1. **Fall**: the cell below is empty, so the object drops one row. If the
//!    player stands two rows below the old position, the player is threatened.
//! 2. **Crush**: a boulder (never a diamond) rests directly on the player.
//! 3. **Roll**: a boulder on a boulder or wall slides right, else left, when
//!    both the side cell and the cell under it are empty. A player next to the
//!    landing spot blocks the roll and is threatened instead.
//!
//! Steps are pure grid transforms; the session decides what a threat means
//! (arming the crush timer) and when the next step runs.

use crate::grid::Grid;
use crate::types::{Position, Tile};

/// Result of a single physics step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// At least one object moved.
    pub changed: bool,
    /// Position of the first object that threatened the player this step.
    pub crush_threat: Option<Position>,
}

/// Result of settling a grid to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleReport {
    /// Steps that moved something.
    pub steps: u32,
    pub crush_threat: Option<Position>,
    /// False if the step cap was reached before the grid came to rest.
    pub settled: bool,
}

/// Advance gravity by one tick.
pub fn step(grid: &mut Grid) -> StepReport {
    let mut report = StepReport::default();
    let width = grid.width() as i32;
    let height = grid.height() as i32;

    for y in (0..height - 1).rev() {
        // A boulder rolled right lands on a cell this row has not scanned yet;
        // it must not be processed twice in one tick.
        let mut rolled_into: Option<i32> = None;

        for x in 0..width {
            if rolled_into == Some(x) {
                continue;
            }
            let here = Position::new(x, y);
            let Some(tile) = grid.tile(here).filter(|t| t.is_movable()) else {
                continue;
            };
            let Ok(below) = grid.neighbor(here, 0, 1) else {
                continue;
            };

            match grid.tile(below) {
                Some(Tile::Empty) => {
                    if grid.shift(here, below, Tile::Empty).is_ok() {
                        report.changed = true;
                        if grid.is(here.offset(0, 2), Tile::Player) {
                            report.threaten(below);
                        }
                    }
                }
                Some(Tile::Player) if tile == Tile::Boulder => {
                    report.threaten(here);
                }
                Some(Tile::Boulder | Tile::Wall) if tile == Tile::Boulder => {
                    if let Some((dx, landing)) = roll_target(grid, here) {
                        if player_in_roll_path(grid, here, dx) {
                            report.threaten(here);
                        } else if grid.shift(here, landing, Tile::Empty).is_ok() {
                            report.changed = true;
                            if dx > 0 {
                                rolled_into = Some(landing.x);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    report
}

/// Step until nothing moves or `max_steps` steps have run.
pub fn settle(grid: &mut Grid, max_steps: u32) -> SettleReport {
    let mut report = SettleReport::default();
    while report.steps < max_steps {
        let step = step(grid);
        if report.crush_threat.is_none() {
            report.crush_threat = step.crush_threat;
        }
        if !step.changed {
            report.settled = true;
            return report;
        }
        report.steps += 1;
    }
    report
}

/// Side and landing cell of a roll. Right wins over left when both are open.
fn roll_target(grid: &Grid, at: Position) -> Option<(i32, Position)> {
    [1, -1].into_iter().find_map(|dx| {
        let side = grid.neighbor(at, dx, 0).ok()?;
        let under = grid.neighbor(side, 0, 1).ok()?;
        (grid.is(side, Tile::Empty) && grid.is(under, Tile::Empty)).then_some((dx, side))
    })
}

/// Only the cell past the landing spot and the cell under it are checked.
fn player_in_roll_path(grid: &Grid, at: Position, dx: i32) -> bool {
    grid.is(at.offset(2 * dx, 0), Tile::Player) || grid.is(at.offset(dx, 1), Tile::Player)
}

impl StepReport {
    fn threaten(&mut self, at: Position) {
        if self.crush_threat.is_none() {
            self.crush_threat = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_ascii(rows).unwrap()
    }

    fn ascii(g: &Grid) -> Vec<String> {
        g.to_ascii()
    }

    #[test]
    fn test_boulder_falls_one_row_per_step() {
        let mut g = grid(&["#####", "# o #", "#   #", "#   #", "#####"]);
        let r = step(&mut g);
        assert!(r.changed);
        assert_eq!(ascii(&g)[2], "# o #");
        assert_eq!(ascii(&g)[1], "#   #");

        step(&mut g);
        assert_eq!(ascii(&g)[3], "# o #");

        let r = step(&mut g);
        assert!(!r.changed, "resting on the wall row, nowhere to roll");
    }

    #[test]
    fn test_diamond_falls_but_does_not_roll() {
        let mut g = grid(&["#####", "# * #", "# o #", "#####"]);
        let r = step(&mut g);
        assert!(!r.changed);
        assert_eq!(ascii(&g)[1], "# * #");
    }

    #[test]
    fn test_fall_toward_player_threatens() {
        let mut g = grid(&["#####", "# o #", "#   #", "# P #", "#####"]);
        let r = step(&mut g);
        assert!(r.changed);
        assert_eq!(r.crush_threat, Some(Position::new(2, 2)));
    }

    #[test]
    fn test_boulder_resting_on_player_threatens_without_change() {
        let mut g = grid(&["#####", "# o #", "# P #", "#####"]);
        let r = step(&mut g);
        assert!(!r.changed);
        assert_eq!(r.crush_threat, Some(Position::new(2, 1)));
    }

    #[test]
    fn test_diamond_on_player_is_harmless() {
        let mut g = grid(&["#####", "# * #", "# P #", "#####"]);
        let r = step(&mut g);
        assert_eq!(r, StepReport::default());
    }

    #[test]
    fn test_boulder_rolls_right_first() {
        let mut g = grid(&["#######", "#  o  #", "#  o  #", "#######"]);
        let r = step(&mut g);
        assert!(r.changed);
        assert_eq!(ascii(&g)[1], "#   o #");
        // Rolled, but does not also fall in the same step.
        assert_eq!(ascii(&g)[2], "#  o  #");
    }

    #[test]
    fn test_boulder_rolls_left_when_right_blocked() {
        let mut g = grid(&["######", "#  o.#", "#  o.#", "######"]);
        let r = step(&mut g);
        assert!(r.changed);
        assert_eq!(ascii(&g)[1], "# o .#");
    }

    #[test]
    fn test_player_beside_roll_landing_blocks_roll() {
        let mut g = grid(&["#######", "# o P #", "# o   #", "#######"]);
        let before = g.clone();
        let r = step(&mut g);
        assert!(!r.changed);
        assert_eq!(r.crush_threat, Some(Position::new(2, 1)));
        assert_eq!(g, before);
    }

    #[test]
    fn test_settle_terminates() {
        let mut g = grid(&[
            "########",
            "#oooooo#",
            "#      #",
            "#      #",
            "#  o   #",
            "########",
        ]);
        let r = settle(&mut g, 1000);
        assert!(r.settled);
        assert!(r.steps > 0);
        assert_eq!(g.count(Tile::Boulder), 7);
        // Settled grid stays put.
        assert_eq!(step(&mut g), StepReport::default());
    }

    #[test]
    fn test_settle_respects_step_cap() {
        let mut g = grid(&["###", "#o#", "# #", "# #", "# #", "###"]);
        let r = settle(&mut g, 1);
        assert!(!r.settled);
        assert_eq!(r.steps, 1);
    }
}
