use macroquad::prelude::*;

use crate::helpers::{any_overlap, within_walls, within_walls_x, within_walls_y, Body, Direction};
use crate::rng::GameRng;

/// Straight-line walking that picks a new cardinal heading on a timer, and
/// right away whenever a step gets rolled back.
#[derive(Clone, Debug)]
pub struct Wander {
    pub heading: Direction,
    pub timer: u32,
    pub interval: u32,
    pub speed: f32,
    pub interval_range: (u32, u32),
}

impl Wander {
    pub fn new(speed: f32, interval_range: (u32, u32), rng: &mut GameRng) -> Self {
        Self {
            heading: rng.direction(),
            timer: 0,
            interval: rng.range_u32(interval_range.0, interval_range.1),
            speed,
            interval_range,
        }
    }

    /// Returns false when the step was rolled back.
    pub fn step(&mut self, body: &mut Body, blockers: &[Rect], rng: &mut GameRng) -> bool {
        self.timer += 1;
        if self.timer >= self.interval {
            self.heading = rng.direction();
            self.timer = 0;
            self.interval = rng.range_u32(self.interval_range.0, self.interval_range.1);
        }

        let old = body.pos;
        body.pos += self.heading.delta() * self.speed;
        let rect = body.rect();
        if !within_walls(&rect) || any_overlap(&rect, blockers) {
            body.pos = old;
            self.heading = rng.direction();
            self.timer = 0;
            return false;
        }
        true
    }
}

/// Free 8-way flutter. Hitting a wall or blocker flips the offending axis.
#[derive(Clone, Debug)]
pub struct Erratic {
    pub heading: Vec2,
    pub timer: u32,
    pub interval: u32,
    pub speed: f32,
    pub interval_range: (u32, u32),
}

impl Erratic {
    pub fn new(heading: Vec2, speed: f32, interval_range: (u32, u32), rng: &mut GameRng) -> Self {
        Self {
            heading,
            timer: 0,
            interval: rng.range_u32(interval_range.0, interval_range.1),
            speed,
            interval_range,
        }
    }

    pub fn step(&mut self, body: &mut Body, blockers: &[Rect], rng: &mut GameRng) {
        self.timer += 1;
        if self.timer >= self.interval {
            let (x, y) = rng.erratic_heading();
            self.heading = vec2(x, y);
            self.timer = 0;
            self.interval = rng.range_u32(self.interval_range.0, self.interval_range.1);
        }

        let mut next = body.pos + self.heading * self.speed;

        let x_rect = body.rect_at(vec2(next.x, body.pos.y));
        if !within_walls_x(&x_rect) || any_overlap(&x_rect, blockers) {
            self.heading.x = -self.heading.x;
            next.x = body.pos.x;
        }

        let y_rect = body.rect_at(next);
        if !within_walls_y(&y_rect) || any_overlap(&y_rect, blockers) {
            self.heading.y = -self.heading.y;
            next.y = body.pos.y;
        }

        body.pos = next;
    }
}

/// Horizontal back-and-forth between `origin_x` and `origin_x + range`.
#[derive(Clone, Debug)]
pub struct Patrol {
    pub origin_x: f32,
    pub range: f32,
    pub heading: f32,
    pub speed: f32,
}

impl Patrol {
    pub fn new(origin_x: f32, range: f32, speed: f32) -> Self {
        Self {
            origin_x,
            range,
            heading: 1.0,
            speed,
        }
    }

    pub fn step(&mut self, body: &mut Body) {
        body.pos.x += self.speed * self.heading;
        if self.heading > 0.0 && body.pos.x >= self.origin_x + self.range {
            self.heading = -1.0;
        } else if self.heading < 0.0 && body.pos.x <= self.origin_x {
            self.heading = 1.0;
        }
    }
}
