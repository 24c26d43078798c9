//! Index arithmetic over the flat cell arena.

use crate::types::{Direction, Pos};

pub(crate) fn in_bounds(width: usize, height: usize, pos: Pos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

pub(crate) fn cell_index(width: usize, pos: Pos) -> usize {
    (pos.y as usize) * width + (pos.x as usize)
}

pub(crate) fn pos_of(width: usize, index: usize) -> Pos {
    Pos::new((index % width) as i32, (index / width) as i32)
}

pub(crate) fn neighbor_index(
    width: usize,
    height: usize,
    pos: Pos,
    direction: Direction,
) -> Option<usize> {
    let next = pos.step(direction);
    in_bounds(width, height, next).then(|| cell_index(width, next))
}
