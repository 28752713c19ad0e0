//! Grid tests - bounds and ASCII round trips

use diamond_quest::core::Grid;
use diamond_quest::types::{GameError, Position, Tile};

#[test]
fn test_walled_grid() {
    let grid = Grid::walled(6, 4);
    assert_eq!(grid.width(), 6);
    assert_eq!(grid.height(), 4);
    assert!(grid.has_wall_border());
    assert_eq!(grid.count(Tile::Wall), 2 * 6 + 2 * 2);
    assert_eq!(grid.count(Tile::Empty), 4 * 2);
}

#[test]
fn test_out_of_range_access() {
    let mut grid = Grid::walled(5, 5);
    assert_eq!(grid.tile(Position::new(-1, 0)), None);
    assert_eq!(grid.tile(Position::new(5, 0)), None);
    assert_eq!(
        grid.get(Position::new(0, 5)),
        Err(GameError::OutOfRange {
            x: 0,
            y: 5,
            width: 5,
            height: 5
        })
    );
    assert!(grid.set(Position::new(7, 7), Tile::Dirt).is_err());
    assert!(!grid.is(Position::new(-3, -3), Tile::Wall));
}

#[test]
fn test_ascii_round_trip() {
    let rows = ["#####", "#P.*#", "#oE #", "#####"];
    let grid = Grid::from_ascii(&rows).unwrap();
    assert_eq!(grid.to_ascii(), rows);
    assert_eq!(grid.find(Tile::Exit), Some(Position::new(2, 2)));
}

#[test]
fn test_neighbor_walks_to_the_edge() {
    let grid = Grid::walled(5, 4);
    let mut pos = Position::new(2, 2);
    let mut steps = 0;
    while let Ok(next) = grid.neighbor(pos, 1, 0) {
        pos = next;
        steps += 1;
    }
    assert_eq!((pos, steps), (Position::new(4, 2), 2));
    assert_eq!(
        grid.neighbor(pos, 1, 0),
        Err(GameError::OutOfRange {
            x: 5,
            y: 2,
            width: 5,
            height: 4
        })
    );
    assert_eq!(grid.neighbor(pos, -4, -2), Ok(Position::new(0, 0)));
}
