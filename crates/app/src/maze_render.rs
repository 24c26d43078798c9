//! Rendering for the maze, racers and side panel. Reads state only.

use app::{format_seed, format_snapshot_hash, parse_hex_color, position_lines, status_text};
use macroquad::prelude::*;
use race_core::sync::SyncChannel;
use race_core::{Direction, GameState, Maze, Pos, Session};

const MARGIN: f32 = 20.0;
const STATUS_HEIGHT: f32 = 40.0;
const PANEL_WIDTH: f32 = 260.0;
const LINE_HEIGHT: f32 = 22.0;
const FONT_SIZE: f32 = 20.0;
const WALL_THICKNESS: f32 = 2.0;
const WALL_COLOR: Color = Color { r: 0.85, g: 0.85, b: 0.85, a: 1.0 };
const EXIT_COLOR: Color = Color { r: 0.2, g: 0.7, b: 0.3, a: 1.0 };
const PANEL_BORDER: Color = Color { r: 0.2, g: 0.2, b: 0.2, a: 1.0 };

/// Where the grid sits on screen and how big each cell is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MazeLayout {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell: f32,
}

impl MazeLayout {
    /// Fits square cells into the area left of the side panel and below the status line.
    pub fn fit(screen_w: f32, screen_h: f32, maze: &Maze) -> Self {
        let avail_w = (screen_w - PANEL_WIDTH - MARGIN * 3.0).max(0.0);
        let avail_h = (screen_h - STATUS_HEIGHT - MARGIN * 2.0).max(0.0);
        let cell = (avail_w / maze.width() as f32).min(avail_h / maze.height() as f32);
        Self { origin_x: MARGIN, origin_y: MARGIN + STATUS_HEIGHT, cell }
    }

    pub fn cell_origin(&self, pos: Pos) -> (f32, f32) {
        (self.origin_x + pos.x as f32 * self.cell, self.origin_y + pos.y as f32 * self.cell)
    }

    pub fn cell_center(&self, pos: Pos) -> (f32, f32) {
        let (x, y) = self.cell_origin(pos);
        (x + self.cell / 2.0, y + self.cell / 2.0)
    }

    fn right_edge(&self, maze: &Maze) -> f32 {
        self.origin_x + maze.width() as f32 * self.cell
    }
}

pub fn draw_frame<C: SyncChannel>(session: &Session<C>) {
    let state = session.state();
    let layout = MazeLayout::fit(screen_width(), screen_height(), state.maze());

    draw_text(
        &status_text(state, session.local_player()),
        MARGIN,
        MARGIN + FONT_SIZE,
        FONT_SIZE * 1.2,
        WHITE,
    );
    draw_exit(state, &layout);
    draw_walls(state.maze(), &layout);
    draw_players(state, &layout);
    draw_side_panel(session, &layout);
}

fn draw_exit(state: &GameState, layout: &MazeLayout) {
    if let Some(exit) = state.maze().exit() {
        let (x, y) = layout.cell_origin(exit);
        draw_rectangle(x, y, layout.cell, layout.cell, EXIT_COLOR);
    }
}

fn draw_walls(maze: &Maze, layout: &MazeLayout) {
    for cell in maze.cells() {
        let (x, y) = layout.cell_origin(cell.pos);
        let size = layout.cell;
        for direction in Direction::ALL {
            if !cell.walls.has(direction) {
                continue;
            }
            let (x1, y1, x2, y2) = match direction {
                Direction::Up => (x, y, x + size, y),
                Direction::Right => (x + size, y, x + size, y + size),
                Direction::Down => (x, y + size, x + size, y + size),
                Direction::Left => (x, y, x, y + size),
            };
            draw_line(x1, y1, x2, y2, WALL_THICKNESS, WALL_COLOR);
        }
    }
}

fn draw_players(state: &GameState, layout: &MazeLayout) {
    let radius = layout.cell * 0.35;
    for player in state.players() {
        let (cx, cy) = layout.cell_center(player.pos);
        draw_circle(cx, cy, radius, player_color(&player.color));
    }
}

fn player_color(raw: &str) -> Color {
    match parse_hex_color(raw) {
        Some([r, g, b]) => Color::from_rgba(r, g, b, 255),
        None => GRAY,
    }
}

fn draw_side_panel<C: SyncChannel>(session: &Session<C>, layout: &MazeLayout) {
    let state = session.state();
    let panel_x = layout.right_edge(state.maze()) + MARGIN;
    let panel_y = layout.origin_y;
    let panel_h = (screen_height() - panel_y - MARGIN).max(0.0);
    draw_rectangle_lines(panel_x, panel_y, PANEL_WIDTH, panel_h, 1.0, PANEL_BORDER);

    let text_x = panel_x + 15.0;
    let mut text_y = panel_y + 25.0;

    let (indicator, label) = if session.is_connected() {
        (GREEN, "Peer: connected")
    } else {
        (DARKGRAY, "Peer: offline")
    };
    draw_circle(text_x + 5.0, text_y - 6.0, 5.0, indicator);
    draw_text(label, text_x + 18.0, text_y, FONT_SIZE, WHITE);
    text_y += LINE_HEIGHT * 1.5;

    for (line, player) in position_lines(state).iter().zip(state.players()) {
        draw_circle(text_x + 5.0, text_y - 6.0, 5.0, player_color(&player.color));
        draw_text(line, text_x + 18.0, text_y, FONT_SIZE, WHITE);
        text_y += LINE_HEIGHT;
    }
    text_y += LINE_HEIGHT / 2.0;

    for line in [
        format!("Seed: {}", format_seed(session.seed())),
        format!("Revision: {}", state.revision()),
        format!("Hash: {}", format_snapshot_hash(state.snapshot_hash())),
    ] {
        draw_text(&line, text_x, text_y, FONT_SIZE * 0.8, LIGHTGRAY);
        text_y += LINE_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_core::generate_seeded;

    #[test]
    fn layout_uses_the_tighter_axis() {
        let maze = generate_seeded(10, 5, 1).expect("maze");
        let layout = MazeLayout::fit(1000.0, 750.0, &maze);
        let avail_w = 1000.0 - PANEL_WIDTH - MARGIN * 3.0;
        assert_eq!(layout.cell, avail_w / 10.0);
        assert!(layout.cell * 5.0 <= 750.0 - STATUS_HEIGHT - MARGIN * 2.0);
    }

    #[test]
    fn cell_centers_step_by_one_cell() {
        let maze = generate_seeded(4, 4, 1).expect("maze");
        let layout = MazeLayout::fit(1000.0, 750.0, &maze);
        let (x0, y0) = layout.cell_center(Pos::new(0, 0));
        let (x1, y1) = layout.cell_center(Pos::new(1, 2));
        assert_eq!(x1 - x0, layout.cell);
        assert_eq!(y1 - y0, layout.cell * 2.0);
    }

    #[test]
    fn tiny_window_collapses_to_zero_sized_cells() {
        let maze = generate_seeded(3, 3, 1).expect("maze");
        assert_eq!(MazeLayout::fit(10.0, 10.0, &maze).cell, 0.0);
    }
}
