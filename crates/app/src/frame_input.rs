//! Keyboard input collection for one rendered frame.

use macroquad::prelude::{KeyCode, is_key_pressed};

const ARROW_KEYS: [KeyCode; 4] = [KeyCode::Up, KeyCode::Right, KeyCode::Down, KeyCode::Left];

#[derive(Default)]
pub struct FrameInput {
    pub keys_pressed: Vec<KeyCode>,
    pub quit: bool,
}

pub fn capture_frame_input() -> FrameInput {
    let keys_pressed = ARROW_KEYS.into_iter().filter(|key| is_key_pressed(*key)).collect();
    FrameInput { keys_pressed, quit: is_key_pressed(KeyCode::Escape) }
}
