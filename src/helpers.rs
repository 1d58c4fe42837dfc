use macroquad::prelude::*;

use crate::config::{GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, WALL_THICKNESS};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn delta(self) -> Vec2 {
        match self {
            Self::Up => vec2(0.0, -1.0),
            Self::Down => vec2(0.0, 1.0),
            Self::Left => vec2(-1.0, 0.0),
            Self::Right => vec2(1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Direction of the dominant component of `v`. Ties go horizontal.
    pub fn dominant(v: Vec2) -> Self {
        if v.x.abs() >= v.y.abs() {
            if v.x >= 0.0 { Self::Right } else { Self::Left }
        } else if v.y > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// Room position inside a zone. North is negative y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomCoord {
    pub x: i32,
    pub y: i32,
}

impl RoomCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        match dir {
            Direction::Up => Self::new(self.x, self.y - 1),
            Direction::Down => Self::new(self.x, self.y + 1),
            Direction::Left => Self::new(self.x - 1, self.y),
            Direction::Right => Self::new(self.x + 1, self.y),
        }
    }
}

/// Top-left position plus size. The box is always derived from the
/// current position, never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn rect_at(&self, pos: Vec2) -> Rect {
        Rect::new(pos.x, pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
    }
}

/// Strict box overlap: boxes that only share an edge do not touch.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.x >= b.x + b.w || a.x + a.w <= b.x || a.y >= b.y + b.h || a.y + a.h <= b.y)
}

pub fn first_blocking<'a>(rect: &Rect, blockers: &'a [Rect]) -> Option<&'a Rect> {
    blockers.iter().find(|other| overlaps(rect, other))
}

pub fn any_overlap(rect: &Rect, blockers: &[Rect]) -> bool {
    first_blocking(rect, blockers).is_some()
}

/// Indices of every rect in `others` that overlaps `rect`.
pub fn all_overlapping(rect: &Rect, others: impl IntoIterator<Item = Rect>) -> Vec<usize> {
    others
        .into_iter()
        .enumerate()
        .filter(|(_, other)| overlaps(rect, other))
        .map(|(i, _)| i)
        .collect()
}

/// Grows the rect by `amount` on every side.
pub fn inflate(rect: &Rect, amount: f32) -> Rect {
    Rect::new(
        rect.x - amount,
        rect.y - amount,
        rect.w + amount * 2.0,
        rect.h + amount * 2.0,
    )
}

pub fn rect_centered(center: Vec2, size: Vec2) -> Rect {
    Rect::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
}

pub fn rect_center(rect: &Rect) -> Vec2 {
    vec2(rect.x + rect.w * 0.5, rect.y + rect.h * 0.5)
}

pub fn room_center() -> Vec2 {
    vec2(GAME_WIDTH * 0.5, HUD_HEIGHT + GAME_HEIGHT * 0.5)
}

pub fn within_walls_x(rect: &Rect) -> bool {
    rect.x >= WALL_THICKNESS && rect.x + rect.w <= GAME_WIDTH - WALL_THICKNESS
}

pub fn within_walls_y(rect: &Rect) -> bool {
    rect.y >= HUD_HEIGHT + WALL_THICKNESS && rect.y + rect.h <= HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS
}

pub fn within_walls(rect: &Rect) -> bool {
    within_walls_x(rect) && within_walls_y(rect)
}

/// Whole playfield below the HUD, walls included.
pub fn in_playfield(point: Vec2) -> bool {
    point.x >= 0.0 && point.x <= GAME_WIDTH && point.y >= HUD_HEIGHT && point.y <= HUD_HEIGHT + GAME_HEIGHT
}

/// The opening punched into the wall on `side`, `gap` pixels wide.
pub fn exit_gap_rect(side: Direction, gap: f32) -> Rect {
    let mid_x = GAME_WIDTH * 0.5;
    let mid_y = HUD_HEIGHT + GAME_HEIGHT * 0.5;
    match side {
        Direction::Up => Rect::new(mid_x - gap * 0.5, HUD_HEIGHT, gap, WALL_THICKNESS),
        Direction::Down => Rect::new(
            mid_x - gap * 0.5,
            HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS,
            gap,
            WALL_THICKNESS,
        ),
        Direction::Left => Rect::new(0.0, mid_y - gap * 0.5, WALL_THICKNESS, gap),
        Direction::Right => Rect::new(GAME_WIDTH - WALL_THICKNESS, mid_y - gap * 0.5, WALL_THICKNESS, gap),
    }
}

/// True when the center of `rect` lies strictly inside the gap span on `side`.
pub fn in_gap_span(side: Direction, rect: &Rect, gap: f32) -> bool {
    let center = rect_center(rect);
    let mid = room_center();
    let half = gap * 0.5;
    if side.is_vertical() {
        center.x > mid.x - half && center.x < mid.x + half
    } else {
        center.y > mid.y - half && center.y < mid.y + half
    }
}
