use macroquad::prelude::*;

use crate::config::{EXIT_SIZE, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, WALL_THICKNESS};
use crate::entity::Enemy;
use crate::helpers::{any_overlap, in_gap_span, overlaps, Direction};
use crate::player::Player;
use crate::room::Exits;

const DOOR_REACH: f32 = 20.0;

/// Result of holding a proposed player position against the room walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallCheck {
    pub pos: Vec2,
    /// Set when the player walked out through an open gap.
    pub crossing: Option<Direction>,
}

/// Reverts the player to `old` when the new box hits a blocker, or an enemy
/// the player was not already touching. Returns true on rollback.
pub fn rollback_player(player: &mut Player, old: Vec2, blockers: &[Rect], enemies: &[Enemy]) -> bool {
    let rect = player.rect();
    let old_rect = player.body.rect_at(old);
    let hit_enemy = enemies
        .iter()
        .filter(|enemy| enemy.alive)
        .map(Enemy::rect)
        .any(|other| overlaps(&rect, &other) && !overlaps(&old_rect, &other));

    if any_overlap(&rect, blockers) || hit_enemy {
        player.body.pos = old;
        return true;
    }
    false
}

/// Clamps a box to the inner wall lines. A side only lets the box past when
/// its exit is passable and the box center is inside the gap span; leaving the
/// outer edge there reports a crossing instead of clamping.
pub fn clamp_to_room(pos: Vec2, size: Vec2, exits: &Exits, gap: f32) -> WallCheck {
    let mut pos = pos;
    let rect = Rect::new(pos.x, pos.y, size.x, size.y);
    let open = |dir: Direction| exits.is_passable(dir) && in_gap_span(dir, &rect, gap);

    let left = WALL_THICKNESS;
    let right = GAME_WIDTH - WALL_THICKNESS - size.x;
    let top = HUD_HEIGHT + WALL_THICKNESS;
    let bottom = HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - size.y;

    if pos.x < left {
        if !open(Direction::Left) {
            pos.x = left;
        } else if pos.x < 0.0 {
            return WallCheck { pos, crossing: Some(Direction::Left) };
        }
    }
    if pos.x > right {
        if !open(Direction::Right) {
            pos.x = right;
        } else if pos.x + size.x > GAME_WIDTH {
            return WallCheck { pos, crossing: Some(Direction::Right) };
        }
    }
    if pos.y < top {
        if !open(Direction::Up) {
            pos.y = top;
        } else if pos.y < HUD_HEIGHT {
            return WallCheck { pos, crossing: Some(Direction::Up) };
        }
    }
    if pos.y > bottom {
        if !open(Direction::Down) {
            pos.y = bottom;
        } else if pos.y + size.y > HUD_HEIGHT + GAME_HEIGHT {
            return WallCheck { pos, crossing: Some(Direction::Down) };
        }
    }

    WallCheck { pos, crossing: None }
}

/// Strip in front of a door, reaching a little way into the room.
pub fn door_interaction_rect(dir: Direction) -> Rect {
    let reach = WALL_THICKNESS + DOOR_REACH;
    let mid_x = GAME_WIDTH * 0.5;
    let mid_y = HUD_HEIGHT + GAME_HEIGHT * 0.5;
    let half = EXIT_SIZE * 0.5;
    match dir {
        Direction::Up => Rect::new(mid_x - half, HUD_HEIGHT, half * 2.0, reach),
        Direction::Down => Rect::new(mid_x - half, HUD_HEIGHT + GAME_HEIGHT - reach, half * 2.0, reach),
        Direction::Left => Rect::new(0.0, mid_y - half, reach, half * 2.0),
        Direction::Right => Rect::new(GAME_WIDTH - reach, mid_y - half, reach, half * 2.0),
    }
}
