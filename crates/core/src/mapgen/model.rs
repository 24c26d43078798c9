//! Maze cell and grid models.
//!
//! The grid is a flat arena indexed by `y * width + x`. It serializes as an
//! array of rows so snapshots keep the row-major shape peers exchange.

use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::types::{Direction, Pos};

use super::grid::{cell_index, in_bounds, neighbor_index};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls { top: true, right: true, bottom: true, left: true };

    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    pub(crate) fn open(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.top = false,
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }

    pub fn open_count(&self) -> usize {
        Direction::ALL.into_iter().filter(|direction| !self.has(*direction)).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(flatten)]
    pub pos: Pos,
    pub walls: Walls,
    pub visited: bool,
    #[serde(default)]
    pub is_exit: bool,
}

impl Cell {
    pub(crate) fn closed(pos: Pos) -> Self {
        Self { pos, walls: Walls::CLOSED, visited: false, is_exit: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Cell>>", try_from = "Vec<Vec<Cell>>")]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Maze {
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        in_bounds(self.width, self.height, pos)
    }

    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells.get(cell_index(self.width, pos))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// True when the side of `pos` facing `direction` is walled, or `pos` is off the grid.
    pub fn has_wall(&self, pos: Pos, direction: Direction) -> bool {
        self.cell(pos).is_none_or(|cell| cell.walls.has(direction))
    }

    pub fn is_exit(&self, pos: Pos) -> bool {
        self.cell(pos).is_some_and(|cell| cell.is_exit)
    }

    pub fn exit(&self) -> Option<Pos> {
        self.cells.iter().find(|cell| cell.is_exit).map(|cell| cell.pos)
    }

    /// Open passages between in-bounds neighbors, each counted once.
    pub fn open_edge_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|direction| {
                        !cell.walls.has(*direction)
                            && neighbor_index(self.width, self.height, cell.pos, *direction)
                                .is_some()
                    })
                    .count()
            })
            .sum()
    }

    fn check_wall_symmetry(&self) -> Result<(), MazeError> {
        for cell in &self.cells {
            for direction in [Direction::Right, Direction::Down] {
                let Some(index) = neighbor_index(self.width, self.height, cell.pos, direction)
                else {
                    continue;
                };
                let neighbor = &self.cells[index];
                if cell.walls.has(direction) != neighbor.walls.has(direction.opposite()) {
                    return Err(MazeError::AsymmetricWall { a: cell.pos, b: neighbor.pos });
                }
            }
        }
        Ok(())
    }
}

impl From<Maze> for Vec<Vec<Cell>> {
    fn from(maze: Maze) -> Self {
        maze.cells.chunks(maze.width).map(<[Cell]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Maze {
    type Error = MazeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions { width, height });
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(MazeError::RaggedGrid);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            for (column_index, cell) in row.into_iter().enumerate() {
                if cell.pos != Pos::new(column_index as i32, row_index as i32) {
                    return Err(MazeError::CellOutOfPlace {
                        row: row_index,
                        column: column_index,
                        reported: cell.pos,
                    });
                }
                cells.push(cell);
            }
        }

        let exits = cells.iter().filter(|cell| cell.is_exit).count();
        if exits != 1 {
            return Err(MazeError::ExitCount(exits));
        }

        let maze = Self { width, height, cells };
        maze.check_wall_symmetry()?;
        Ok(maze)
    }
}
