//! Grid module - the 2-D tile store
//!
//! The grid is a `width x height` array of tiles with no game rules attached.
//! Uses a flat row-major vector for cache locality.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.

use crate::types::{GameError, Position, Tile};

/// Fixed-size tile grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of tiles, row-major order (y * width + x)
    cells: Vec<Tile>,
}

impl Grid {
    /// Create a grid filled with a single tile
    pub fn filled(width: u16, height: u16, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![tile; width as usize * height as usize],
        }
    }

    /// Create an empty grid enclosed by a ring of walls
    pub fn walled(width: u16, height: u16) -> Self {
        let mut grid = Self::filled(width, height, Tile::Empty);
        let (w, h) = (width as usize, height as usize);
        for y in 0..h {
            for x in 0..w {
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    grid.cells[y * w + x] = Tile::Wall;
                }
            }
        }
        grid
    }

    /// Build a grid from ASCII rows (see [`Tile::from_char`]).
    ///
    /// All rows must have the same length.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, GameError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let bad = |reason: String| GameError::GenerationFailed { reason };

        if width == 0 || height == 0 {
            return Err(bad("ascii grid is empty".to_string()));
        }
        if width > u16::MAX as usize || height > u16::MAX as usize {
            return Err(bad(format!("ascii grid {width}x{height} is too large")));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(bad(format!("ascii row {y} is not {width} wide")));
            }
            for (x, c) in row.chars().enumerate() {
                let tile = Tile::from_char(c)
                    .ok_or_else(|| bad(format!("unknown tile {c:?} at ({x}, {y})")))?;
                cells.push(tile);
            }
        }

        Ok(Self {
            width: width as u16,
            height: height as u16,
            cells,
        })
    }

    /// Render back to ASCII rows, one string per row
    pub fn to_ascii(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|t| t.as_char()).collect())
            .collect()
    }

    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    fn out_of_range(&self, pos: Position) -> GameError {
        GameError::OutOfRange {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    /// True for cells on the outer ring
    pub fn is_border(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x == self.width as i32 - 1
                || pos.y == self.height as i32 - 1)
    }

    /// Cell at offset `(dx, dy)` from `pos`, or `OutOfRange` past the edge
    pub fn neighbor(&self, pos: Position, dx: i32, dy: i32) -> Result<Position, GameError> {
        let next = pos.offset(dx, dy);
        if self.in_bounds(next) {
            Ok(next)
        } else {
            Err(self.out_of_range(next))
        }
    }

    /// Get the tile at `pos`
    pub fn get(&self, pos: Position) -> Result<Tile, GameError> {
        self.index(pos)
            .map(|idx| self.cells[idx])
            .ok_or_else(|| self.out_of_range(pos))
    }

    /// Get the tile at `pos`, `None` when out of bounds
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// True when `pos` is in bounds and holds `tile`
    pub fn is(&self, pos: Position, tile: Tile) -> bool {
        self.tile(pos) == Some(tile)
    }

    /// Set the tile at `pos`
    pub fn set(&mut self, pos: Position, tile: Tile) -> Result<(), GameError> {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = tile;
                Ok(())
            }
            None => Err(self.out_of_range(pos)),
        }
    }

    /// Move the tile at `from` into `to`, leaving `vacated` behind
    pub fn shift(&mut self, from: Position, to: Position, vacated: Tile) -> Result<(), GameError> {
        let tile = self.get(from)?;
        self.set(to, tile)?;
        self.set(from, vacated)
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// First cell (row-major) holding `tile`
    pub fn find(&self, tile: Tile) -> Option<Position> {
        let w = self.width as usize;
        self.cells
            .iter()
            .position(|&t| t == tile)
            .map(|idx| Position::new((idx % w) as i32, (idx / w) as i32))
    }

    /// True when the whole outer ring is wall
    pub fn has_wall_border(&self) -> bool {
        self.rows().enumerate().all(|(y, row)| {
            row.iter().enumerate().all(|(x, &tile)| {
                tile == Tile::Wall || !self.is_border(Position::new(x as i32, y as i32))
            })
        })
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}
