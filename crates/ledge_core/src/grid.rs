//! Dense spatial grid mapping integer cells to level objects
//!
//! Cell `(cx, cy)` always covers the world rectangle starting at
//! `origin + (cx * cell_width, cy * cell_height)`. Cell `(0, 0)` is the
//! bottom-left cell and `Direction::Up` increases `cy`.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BoundingRectangle;

/// Integer cell coordinate, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for GridCell {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<GridCell> for [u32; 2] {
    fn from(cell: GridCell) -> Self {
        [cell.x, cell.y]
    }
}

impl From<(u32, u32)> for GridCell {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four grid neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset for this direction
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Errors from grid mutation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(GridCell),
    #[error("cell {0} is already occupied")]
    Occupied(GridCell),
    #[error("cell {0} is empty")]
    Empty(GridCell),
    #[error("world position ({x}, {y}) is outside the grid")]
    PositionOutOfBounds { x: f32, y: f32 },
    #[error("grid cell size must be positive and finite, got {width}x{height}")]
    InvalidCellSize { width: f32, height: f32 },
    #[error("grid of {columns}x{rows} cells exceeds the limit of {} cells", MAX_CELLS)]
    TooLarge { columns: u32, rows: u32 },
}

/// Largest number of cells a grid may hold
pub const MAX_CELLS: usize = 1 << 24;

/// Items that know their own world position
pub trait Positioned {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

/// Fixed-size dense grid of optional items
#[derive(Debug, Clone)]
pub struct SizedGrid<T> {
    origin: Vec2,
    cell_size: Vec2,
    columns: u32,
    rows: u32,
    cells: Vec<Option<T>>,
}

impl<T> SizedGrid<T> {
    /// Create an empty grid.
    ///
    /// # Panics
    ///
    /// Panics where [`SizedGrid::try_new`] would fail.
    pub fn new(origin: Vec2, cell_size: Vec2, columns: u32, rows: u32) -> Self {
        match Self::try_new(origin, cell_size, columns, rows) {
            Ok(grid) => grid,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create an empty grid, failing if the cell size is not strictly
    /// positive and finite or the grid holds more than [`MAX_CELLS`] cells.
    pub fn try_new(
        origin: Vec2,
        cell_size: Vec2,
        columns: u32,
        rows: u32,
    ) -> Result<Self, GridError> {
        if !(cell_size.x > 0.0 && cell_size.y > 0.0 && cell_size.is_finite()) {
            return Err(GridError::InvalidCellSize {
                width: cell_size.x,
                height: cell_size.y,
            });
        }
        let size = (columns as usize)
            .checked_mul(rows as usize)
            .filter(|size| *size <= MAX_CELLS)
            .ok_or(GridError::TooLarge { columns, rows })?;
        let mut cells = Vec::with_capacity(size);
        cells.resize_with(size, || None);
        Ok(Self {
            origin,
            cell_size,
            columns,
            rows,
            cells,
        })
    }

    /// Create an empty grid whose cells cover `bounds`
    pub fn covering(bounds: &BoundingRectangle, cell_size: Vec2) -> Self {
        let columns = (bounds.width() / cell_size.x).ceil().max(0.0) as u32;
        let rows = (bounds.height() / cell_size.y).ceil().max(0.0) as u32;
        Self::new(bounds.min(), cell_size, columns, rows)
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// World rectangle covered by the whole grid
    pub fn bounds(&self) -> BoundingRectangle {
        BoundingRectangle::from_min_size(
            self.origin,
            self.cell_size * Vec2::new(self.columns as f32, self.rows as f32),
        )
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    pub fn contains_cell(&self, cell: GridCell) -> bool {
        cell.x < self.columns && cell.y < self.rows
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        self.contains_cell(cell)
            .then(|| cell.y as usize * self.columns as usize + cell.x as usize)
    }

    /// Cell containing a world position, or `None` outside the grid
    pub fn cell_at(&self, position: Vec2) -> Option<GridCell> {
        let relative = ((position - self.origin) / self.cell_size).floor();
        if relative.x < 0.0 || relative.y < 0.0 {
            return None;
        }
        let cell = GridCell::new(relative.x as u32, relative.y as u32);
        self.contains_cell(cell).then_some(cell)
    }

    /// World position of a cell's bottom-left corner
    pub fn cell_position(&self, cell: GridCell) -> Vec2 {
        self.origin + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }

    /// World rectangle covered by a cell
    pub fn cell_bounds(&self, cell: GridCell) -> BoundingRectangle {
        BoundingRectangle::from_min_size(self.cell_position(cell), self.cell_size)
    }

    pub fn get(&self, cell: GridCell) -> Option<&T> {
        self.index(cell).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, cell: GridCell) -> Option<&mut T> {
        self.index(cell).and_then(|i| self.cells[i].as_mut())
    }

    /// Coordinate of the adjacent cell, or `None` past the grid edge
    pub fn neighbor_cell(&self, cell: GridCell, direction: Direction) -> Option<GridCell> {
        let (dx, dy) = direction.offset();
        let x = u32::try_from(cell.x as i64 + dx).ok()?;
        let y = u32::try_from(cell.y as i64 + dy).ok()?;
        let neighbor = GridCell::new(x, y);
        self.contains_cell(neighbor).then_some(neighbor)
    }

    /// Contents of the adjacent cell
    pub fn neighbor(&self, cell: GridCell, direction: Direction) -> Option<&T> {
        self.neighbor_cell(cell, direction)
            .and_then(|neighbor| self.get(neighbor))
    }

    /// Put an item into a cell, returning whatever it replaced
    pub fn insert(&mut self, cell: GridCell, item: T) -> Result<Option<T>, GridError> {
        let index = self.index(cell).ok_or(GridError::OutOfBounds(cell))?;
        Ok(self.cells[index].replace(item))
    }

    /// Take the item out of a cell
    pub fn remove(&mut self, cell: GridCell) -> Option<T> {
        self.index(cell).and_then(|i| self.cells[i].take())
    }

    /// Move an item between cells; the target must be empty
    pub fn move_item(&mut self, from: GridCell, to: GridCell) -> Result<(), GridError> {
        let from_index = self.index(from).ok_or(GridError::OutOfBounds(from))?;
        let to_index = self.index(to).ok_or(GridError::OutOfBounds(to))?;
        if self.cells[from_index].is_none() {
            return Err(GridError::Empty(from));
        }
        if from_index != to_index && self.cells[to_index].is_some() {
            return Err(GridError::Occupied(to));
        }
        let item = self.cells[from_index].take();
        self.cells[to_index] = item;
        Ok(())
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Every occupied cell as `(cx, cy, item)`.
    ///
    /// Lazy and finite; call again to restart.
    pub fn enumerate_items_with_grid_cells(
        &self,
    ) -> impl Iterator<Item = (u32, u32, &T)> + Clone + '_ {
        let columns = self.columns as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|item| ((i % columns) as u32, (i / columns) as u32, item))
        })
    }

    /// Cells whose area overlaps `rect`, clamped to the grid (broad phase)
    pub fn cells_overlapping(&self, rect: &BoundingRectangle) -> impl Iterator<Item = GridCell> {
        let min = ((rect.min() - self.origin) / self.cell_size).floor();
        let max = ((rect.max() - self.origin) / self.cell_size).ceil() - Vec2::ONE;

        let clamp_axis = |lo: f32, hi: f32, count: u32| -> Option<(u32, u32)> {
            if count == 0 || hi < 0.0 || lo >= count as f32 || hi < lo {
                return None;
            }
            Some((lo.max(0.0) as u32, hi.min(count as f32 - 1.0) as u32))
        };

        let range = clamp_axis(min.x, max.x, self.columns)
            .zip(clamp_axis(min.y, max.y, self.rows));

        range.into_iter().flat_map(|((x0, x1), (y0, y1))| {
            (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| GridCell::new(x, y)))
        })
    }
}

impl<T: Positioned> SizedGrid<T> {
    /// Place an item in the cell under its own position
    pub fn add(&mut self, item: T) -> Result<Option<T>, GridError> {
        let position = item.position();
        let cell = self
            .cell_at(position)
            .ok_or(GridError::PositionOutOfBounds {
                x: position.x,
                y: position.y,
            })?;
        self.insert(cell, item)
    }

    /// Move an item to another cell and snap its position to that cell
    pub fn relocate(&mut self, from: GridCell, to: GridCell) -> Result<(), GridError> {
        self.move_item(from, to)?;
        let position = self.cell_position(to);
        if let Some(item) = self.get_mut(to) {
            item.set_position(position);
        }
        Ok(())
    }

    /// Assert that an item stored at `(cx, cy)` sits in that cell.
    ///
    /// # Panics
    ///
    /// Panics on mismatch: a misplaced item would be saved at the wrong cell.
    pub fn assert_cell_invariant(&self, cx: u32, cy: u32, item: &T) {
        let stored = GridCell::new(cx, cy);
        let actual = self.cell_at(item.position());
        assert_eq!(
            actual,
            Some(stored),
            "grid item stored at {stored} but its position {} maps to {actual:?}",
            item.position()
        );
    }

    /// Check the cell invariant for every occupied cell
    pub fn assert_all_cells_consistent(&self) {
        for (cx, cy, item) in self.enumerate_items_with_grid_cells() {
            self.assert_cell_invariant(cx, cy, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        position: Vec2,
    }

    impl Positioned for Marker {
        fn position(&self) -> Vec2 {
            self.position
        }

        fn set_position(&mut self, position: Vec2) {
            self.position = position;
        }
    }

    fn grid() -> SizedGrid<u32> {
        SizedGrid::new(Vec2::new(-32.0, 0.0), Vec2::new(16.0, 16.0), 4, 3)
    }

    #[test]
    fn test_cell_at() {
        let grid = grid();
        assert_eq!(grid.cell_at(Vec2::new(-32.0, 0.0)), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_at(Vec2::new(-16.0, 15.9)), Some(GridCell::new(1, 0)));
        assert_eq!(grid.cell_at(Vec2::new(31.9, 47.9)), Some(GridCell::new(3, 2)));
        assert_eq!(grid.cell_at(Vec2::new(32.0, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(-32.1, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(0.0, -0.5)), None);
    }

    #[test]
    fn test_cell_position_matches_cell_at() {
        let grid = grid();
        for y in 0..grid.rows() {
            for x in 0..grid.columns() {
                let cell = GridCell::new(x, y);
                assert_eq!(grid.cell_at(grid.cell_position(cell)), Some(cell));
            }
        }
        assert_eq!(grid.cell_position(GridCell::new(2, 1)), Vec2::new(0.0, 16.0));
    }

    #[test]
    fn test_neighbors() {
        let mut grid = grid();
        grid.insert(GridCell::new(1, 1), 7).unwrap();
        grid.insert(GridCell::new(1, 2), 8).unwrap();

        assert_eq!(grid.neighbor(GridCell::new(1, 1), Direction::Up), Some(&8));
        assert_eq!(grid.neighbor(GridCell::new(1, 2), Direction::Down), Some(&7));
        assert_eq!(grid.neighbor(GridCell::new(1, 1), Direction::Left), None);
        assert_eq!(grid.neighbor(GridCell::new(1, 2), Direction::Up), None);
        assert_eq!(grid.neighbor_cell(GridCell::new(0, 0), Direction::Left), None);
        assert_eq!(grid.neighbor_cell(GridCell::new(3, 0), Direction::Right), None);
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let mut grid = grid();
        grid.insert(GridCell::new(0, 0), 1).unwrap();
        grid.insert(GridCell::new(3, 2), 2).unwrap();

        let items = grid.enumerate_items_with_grid_cells();
        let first: Vec<_> = items.clone().collect();
        let second: Vec<_> = items.collect();
        assert_eq!(first, vec![(0, 0, &1), (3, 2, &2)]);
        assert_eq!(first, second);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_insert_out_of_bounds() {
        let mut grid = grid();
        let err = grid.insert(GridCell::new(4, 0), 1).unwrap_err();
        assert_eq!(err, GridError::OutOfBounds(GridCell::new(4, 0)));
    }

    #[test]
    fn test_try_new_limits() {
        let err = SizedGrid::<u8>::try_new(Vec2::ZERO, Vec2::splat(16.0), u32::MAX, u32::MAX)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::TooLarge {
                columns: u32::MAX,
                rows: u32::MAX
            }
        );

        let err = SizedGrid::<u8>::try_new(Vec2::ZERO, Vec2::splat(16.0), 4097, 4096).unwrap_err();
        assert!(matches!(err, GridError::TooLarge { .. }));

        let err = SizedGrid::<u8>::try_new(Vec2::ZERO, Vec2::new(16.0, 0.0), 4, 4).unwrap_err();
        assert!(matches!(err, GridError::InvalidCellSize { .. }));

        let grid = SizedGrid::<u8>::try_new(Vec2::ZERO, Vec2::splat(16.0), 0, 7).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    #[should_panic(expected = "exceeds the limit")]
    fn test_new_panics_on_huge_grid() {
        SizedGrid::<u8>::new(Vec2::ZERO, Vec2::splat(16.0), u32::MAX, 2);
    }

    #[test]
    fn test_move_item() {
        let mut grid = grid();
        grid.insert(GridCell::new(0, 0), 1).unwrap();
        grid.insert(GridCell::new(1, 0), 2).unwrap();

        assert_eq!(
            grid.move_item(GridCell::new(0, 0), GridCell::new(1, 0)),
            Err(GridError::Occupied(GridCell::new(1, 0)))
        );
        assert_eq!(
            grid.move_item(GridCell::new(2, 0), GridCell::new(3, 0)),
            Err(GridError::Empty(GridCell::new(2, 0)))
        );
        grid.move_item(GridCell::new(0, 0), GridCell::new(0, 2)).unwrap();
        assert_eq!(grid.get(GridCell::new(0, 2)), Some(&1));
        assert_eq!(grid.get(GridCell::new(0, 0)), None);
    }

    #[test]
    fn test_cells_overlapping() {
        let grid = grid();
        let rect = BoundingRectangle::new(-20.0, 4.0, 20.0, 14.0);
        let cells: Vec<_> = grid.cells_overlapping(&rect).collect();
        assert_eq!(
            cells,
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(0, 1),
                GridCell::new(1, 1),
            ]
        );

        let outside = BoundingRectangle::new(100.0, 100.0, 5.0, 5.0);
        assert_eq!(grid.cells_overlapping(&outside).count(), 0);

        let everything = BoundingRectangle::new(-1000.0, -1000.0, 2000.0, 2000.0);
        assert_eq!(grid.cells_overlapping(&everything).count(), 12);
    }

    #[test]
    fn test_covering() {
        let bounds = BoundingRectangle::new(0.0, 0.0, 100.0, 40.0);
        let grid: SizedGrid<u8> = SizedGrid::covering(&bounds, Vec2::new(16.0, 16.0));
        assert_eq!(grid.columns(), 7);
        assert_eq!(grid.rows(), 3);
        assert!(grid.bounds().contains_rect(&bounds));
    }

    #[test]
    fn test_add_and_relocate_positioned() {
        let mut grid: SizedGrid<Marker> =
            SizedGrid::new(Vec2::ZERO, Vec2::new(10.0, 10.0), 3, 3);
        grid.add(Marker {
            position: Vec2::new(10.0, 20.0),
        })
        .unwrap();
        assert!(grid.get(GridCell::new(1, 2)).is_some());

        grid.relocate(GridCell::new(1, 2), GridCell::new(2, 0)).unwrap();
        assert_eq!(
            grid.get(GridCell::new(2, 0)).map(|m| m.position),
            Some(Vec2::new(20.0, 0.0))
        );
        grid.assert_all_cells_consistent();
    }

    #[test]
    #[should_panic(expected = "grid item stored at")]
    fn test_cell_invariant_violation_panics() {
        let mut grid: SizedGrid<Marker> =
            SizedGrid::new(Vec2::ZERO, Vec2::new(10.0, 10.0), 3, 3);
        grid.insert(
            GridCell::new(0, 0),
            Marker {
                position: Vec2::new(25.0, 5.0),
            },
        )
        .unwrap();
        grid.assert_all_cells_consistent();
    }
}
