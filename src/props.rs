use macroquad::prelude::*;

use crate::cave::CaveKind;
use crate::config::{EXIT_SIZE, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, TILE_SIZE, WALL_THICKNESS};
use crate::helpers::{any_overlap, within_walls, Direction};
use crate::rng::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Rock,
    Water,
    Tree,
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, pos: Vec2) -> Self {
        Self {
            kind,
            rect: Rect::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE),
        }
    }
}

/// A tile-sized block that slides one tile, once, in the direction it is
/// pushed. `pushable` gates it from outside, e.g. until a boss falls.
#[derive(Clone, Debug)]
pub struct PushableBlock {
    pub rect: Rect,
    pub has_been_pushed: bool,
    pub pushable: bool,
}

impl PushableBlock {
    pub fn new(pos: Vec2, pushable: bool) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE),
            has_been_pushed: false,
            pushable,
        }
    }

    pub fn pushed_rect(&self, dir: Direction) -> Rect {
        let offset = dir.delta() * TILE_SIZE;
        Rect::new(self.rect.x + offset.x, self.rect.y + offset.y, self.rect.w, self.rect.h)
    }

    pub fn can_be_pushed(&self, dir: Direction, blockers: &[Rect]) -> bool {
        if !self.pushable || self.has_been_pushed {
            return false;
        }
        let next = self.pushed_rect(dir);
        within_walls(&next) && !any_overlap(&next, blockers)
    }

    pub fn try_push(&mut self, dir: Direction, blockers: &[Rect]) -> bool {
        if !self.can_be_pushed(dir, blockers) {
            return false;
        }
        self.rect = self.pushed_rect(dir);
        self.has_been_pushed = true;
        true
    }
}

#[derive(Clone, Debug)]
pub struct HiddenStairs {
    pub rect: Rect,
    pub revealed: bool,
    pub reveal_timer: u32,
    pub reveal_delay: u32,
}

impl HiddenStairs {
    pub fn new(pos: Vec2, reveal_delay: u32) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE),
            revealed: false,
            reveal_timer: 0,
            reveal_delay,
        }
    }

    pub fn reveal(&mut self) {
        if !self.revealed {
            self.revealed = true;
            self.reveal_timer = 0;
        }
    }

    pub fn update(&mut self) {
        if self.revealed && self.reveal_timer < self.reveal_delay {
            self.reveal_timer += 1;
        }
    }

    pub fn can_enter(&self) -> bool {
        self.revealed && self.reveal_timer >= self.reveal_delay
    }
}

/// Decoration only. The timer drives the flicker.
#[derive(Clone, Debug)]
pub struct Fire {
    pub rect: Rect,
    pub timer: u32,
    pub phase: u32,
}

impl Fire {
    pub fn new(pos: Vec2, phase: u32) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, 20.0, 25.0),
            timer: 0,
            phase,
        }
    }

    pub fn update(&mut self) {
        self.timer = self.timer.wrapping_add(1);
    }

    pub fn is_tall(&self) -> bool {
        (self.timer + self.phase) % 20 < 10
    }
}

#[derive(Clone, Debug)]
pub struct OldMan {
    pub rect: Rect,
    pub visible: bool,
    pub lines: [&'static str; 2],
}

impl OldMan {
    pub fn new(pos: Vec2, lines: [&'static str; 2]) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, 40.0, 40.0),
            visible: true,
            lines,
        }
    }
}

/// Door into a cave, sunk into one of the overworld room's walls.
#[derive(Clone, Debug)]
pub struct CaveEntrance {
    pub kind: CaveKind,
    pub side: Direction,
    pub rect: Rect,
    /// Where the player's center should land when walking back out.
    pub return_point: Vec2,
}

impl CaveEntrance {
    /// Picks a wall and a spot on it that keeps clear of the central exit zone.
    pub fn random(kind: CaveKind, rng: &mut GameRng) -> Self {
        let side = rng.direction();
        let long = EXIT_SIZE / 2.0;
        let clearance = EXIT_SIZE / 2.0 + 100.0;
        let left_of_zone = rng.chance(0.5);

        let along = |rng: &mut GameRng, lo: f32, mid: f32, hi: f32| -> f32 {
            if left_of_zone {
                rng.range(lo as i32, (mid - clearance - long) as i32) as f32
            } else {
                rng.range((mid + clearance) as i32, (hi - long) as i32) as f32
            }
        };

        match side {
            Direction::Up => {
                let x = along(rng, WALL_THICKNESS, GAME_WIDTH / 2.0, GAME_WIDTH - WALL_THICKNESS);
                let rect = Rect::new(x, HUD_HEIGHT, long, WALL_THICKNESS);
                Self::placed(kind, side, rect, vec2(x + long / 2.0, HUD_HEIGHT + WALL_THICKNESS + 80.0))
            }
            Direction::Down => {
                let x = along(rng, WALL_THICKNESS, GAME_WIDTH / 2.0, GAME_WIDTH - WALL_THICKNESS);
                let y = HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS;
                let rect = Rect::new(x, y, long, WALL_THICKNESS);
                Self::placed(kind, side, rect, vec2(x + long / 2.0, y - 50.0))
            }
            Direction::Left => {
                let y = along(
                    rng,
                    HUD_HEIGHT + WALL_THICKNESS,
                    HUD_HEIGHT + GAME_HEIGHT / 2.0,
                    HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS,
                );
                let rect = Rect::new(0.0, y, WALL_THICKNESS, long);
                Self::placed(kind, side, rect, vec2(WALL_THICKNESS + 50.0, y + long / 2.0))
            }
            Direction::Right => {
                let y = along(
                    rng,
                    HUD_HEIGHT + WALL_THICKNESS,
                    HUD_HEIGHT + GAME_HEIGHT / 2.0,
                    HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS,
                );
                let x = GAME_WIDTH - WALL_THICKNESS;
                let rect = Rect::new(x, y, WALL_THICKNESS, long);
                Self::placed(kind, side, rect, vec2(x - 50.0, y + long / 2.0))
            }
        }
    }

    fn placed(kind: CaveKind, side: Direction, rect: Rect, return_point: Vec2) -> Self {
        Self {
            kind,
            side,
            rect,
            return_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{in_gap_span, overlaps};

    #[test]
    fn block_pushes_once() {
        let mut block = PushableBlock::new(vec2(240.0, 300.0), true);
        assert!(block.try_push(Direction::Up, &[]));
        assert_eq!(block.rect.y, 250.0);
        assert!(block.has_been_pushed);
        assert!(!block.try_push(Direction::Up, &[]));
        assert_eq!(block.rect.y, 250.0);
    }

    #[test]
    fn block_respects_gate_walls_and_blockers() {
        let mut gated = PushableBlock::new(vec2(240.0, 300.0), false);
        assert!(!gated.try_push(Direction::Left, &[]));
        gated.pushable = true;

        let wall_side = PushableBlock::new(vec2(40.0, 300.0), true);
        assert!(!wall_side.can_be_pushed(Direction::Left, &[]));

        let rock = Rect::new(290.0, 300.0, 50.0, 50.0);
        assert!(!gated.can_be_pushed(Direction::Right, &[rock]));
        assert!(gated.can_be_pushed(Direction::Down, &[rock]));
    }

    #[test]
    fn stairs_wait_before_entry() {
        let mut stairs = HiddenStairs::new(vec2(300.0, 300.0), 90);
        stairs.update();
        assert!(!stairs.can_enter());
        stairs.reveal();
        for _ in 0..89 {
            stairs.update();
        }
        assert!(!stairs.can_enter());
        stairs.update();
        assert!(stairs.can_enter());
    }

    #[test]
    fn cave_entrances_avoid_the_exit_gap() {
        let mut rng = GameRng::new(21);
        for _ in 0..200 {
            let entrance = CaveEntrance::random(CaveKind::Hint, &mut rng);
            let gap_probe = Rect::new(
                entrance.rect.x,
                entrance.rect.y,
                entrance.rect.w,
                entrance.rect.h,
            );
            assert!(!in_gap_span(entrance.side, &gap_probe, EXIT_SIZE + 200.0));
            let play = Rect::new(0.0, HUD_HEIGHT, GAME_WIDTH, GAME_HEIGHT);
            assert!(overlaps(&entrance.rect, &play));
        }
    }
}
