use macroquad::prelude::*;

/// One frame of input: held directions plus one-shot presses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub mute: bool,
    pub quit: bool,
}

impl InputSnapshot {
    pub fn poll() -> Self {
        Self {
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            attack: is_key_pressed(KeyCode::Space),
            mute: is_key_pressed(KeyCode::M),
            quit: is_key_pressed(KeyCode::Escape),
        }
    }
}
