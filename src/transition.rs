use macroquad::prelude::*;

use crate::cave::CaveKind;
use crate::config::{GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, WALL_THICKNESS};
use crate::helpers::{any_overlap, rect_centered, within_walls, Direction};

const SEARCH_RADII: [f32; 5] = [0.0, 60.0, 80.0, 100.0, 120.0];
const DIAGONAL: f32 = 0.7;
const STAIRS_CLEARANCE: f32 = 10.0;
const BLOCK_ALIGN_SLACK: f32 = 10.0;
const BLOCK_BELOW_REACH: f32 = 70.0;

/// A zone or room change decided during the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Room(Direction),
    EnterCave(CaveKind),
    LeaveCave(CaveKind),
    EnterDungeon,
    LeaveDungeon,
}

/// Expanding-ring search around `preferred` for a box of `size` that sits
/// inside the walls and clear of `blockers`. Both points are box centers.
/// Falls back to `preferred` untouched.
pub fn find_safe_position(preferred: Vec2, size: Vec2, blockers: &[Rect]) -> Vec2 {
    let fits = |center: Vec2| {
        let rect = rect_centered(center, size);
        within_walls(&rect) && !any_overlap(&rect, blockers)
    };

    for radius in SEARCH_RADII {
        if radius == 0.0 {
            if fits(preferred) {
                return preferred;
            }
            continue;
        }
        let d = radius * DIAGONAL;
        let ring = [
            vec2(0.0, -radius),
            vec2(radius, 0.0),
            vec2(0.0, radius),
            vec2(-radius, 0.0),
            vec2(d, -d),
            vec2(d, d),
            vec2(-d, d),
            vec2(-d, -d),
        ];
        if let Some(offset) = ring.into_iter().find(|offset| fits(preferred + *offset)) {
            return preferred + offset;
        }
    }

    log::debug!("no safe spot near ({}, {}), using it anyway", preferred.x, preferred.y);
    preferred
}

/// Where a box that just left through `dir` appears in the next room: flush
/// against the wall it came in through, same position along that wall.
pub fn arrival_position(pos: Vec2, size: Vec2, dir: Direction) -> Vec2 {
    match dir {
        Direction::Left => vec2(GAME_WIDTH - WALL_THICKNESS - size.x, pos.y),
        Direction::Right => vec2(WALL_THICKNESS, pos.y),
        Direction::Up => vec2(pos.x, HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - size.y),
        Direction::Down => vec2(pos.x, HUD_HEIGHT + WALL_THICKNESS),
    }
}

/// Preferred center for a player coming up the stairs: above them when the
/// block sits right below, below them otherwise.
pub fn stairs_exit_point(stairs: &Rect, block: Option<&Rect>, size: Vec2) -> Vec2 {
    let block_below = block.is_some_and(|block| {
        let dy = block.y - stairs.y;
        (block.x - stairs.x).abs() < BLOCK_ALIGN_SLACK && dy > 0.0 && dy < BLOCK_BELOW_REACH
    });
    let x = stairs.x + stairs.w * 0.5;
    let top = if block_below {
        stairs.y - size.y - STAIRS_CLEARANCE
    } else {
        stairs.y + stairs.h + STAIRS_CLEARANCE
    };
    vec2(x, top + size.y * 0.5)
}
