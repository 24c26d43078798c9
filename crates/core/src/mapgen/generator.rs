//! Randomized depth-first backtracker over the cell arena.

use tracing::debug;

use crate::error::MazeError;
use crate::seed::RandomSource;
use crate::types::{Direction, Pos};

use super::grid::{cell_index, neighbor_index, pos_of};
use super::model::{Cell, Maze};

pub struct MazeGenerator {
    width: usize,
    height: usize,
}

impl MazeGenerator {
    pub fn new(width: usize, height: usize) -> Result<Self, MazeError> {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyDimensions { width, height });
        }
        let fits_coordinates = i32::try_from(width).is_ok() && i32::try_from(height).is_ok();
        if !fits_coordinates || width.checked_mul(height).is_none() {
            return Err(MazeError::TooLarge { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Maze {
        let mut cells: Vec<Cell> = (0..self.width * self.height)
            .map(|index| Cell::closed(pos_of(self.width, index)))
            .collect();

        let mut stack = Vec::new();
        let mut candidates: Vec<(Direction, usize)> = Vec::with_capacity(4);
        let mut current = 0_usize;
        cells[current].visited = true;

        loop {
            candidates.clear();
            let here = cells[current].pos;
            for direction in Direction::ALL {
                if let Some(index) = neighbor_index(self.width, self.height, here, direction)
                    && !cells[index].visited
                {
                    candidates.push((direction, index));
                }
            }

            if !candidates.is_empty() {
                let (direction, next) = candidates[rng.pick(candidates.len())];
                stack.push(current);
                cells[current].walls.open(direction);
                cells[next].walls.open(direction.opposite());
                cells[next].visited = true;
                current = next;
            } else if let Some(previous) = stack.pop() {
                current = previous;
            } else {
                break;
            }
        }

        let exit = cell_index(self.width, Pos::new(self.width as i32 - 1, self.height as i32 - 1));
        cells[exit].is_exit = true;

        debug!(width = self.width, height = self.height, "maze generated");
        Maze::from_cells(self.width, self.height, cells)
    }
}
