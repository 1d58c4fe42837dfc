use macroquad::prelude::*;

use crate::config::GameConfig;
use crate::helpers::{Body, Direction};
use crate::input::InputSnapshot;

pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 40.0);
const PLAYER_SPEED: f32 = 3.0;
const ATTACK_COOLDOWN: u32 = 30;
const ATTACK_DURATION: u32 = 10;
const SWORD_LENGTH: f32 = 40.0;
const SWORD_WIDTH: f32 = 40.0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub has_sword: bool,
    pub has_shield: bool,
    pub has_key: bool,
    pub rupees: u32,
}

pub struct Player {
    pub body: Body,
    pub facing: Direction,
    pub health: u32,
    pub max_health: u32,
    pub alive: bool,
    pub invincible_timer: u32,
    pub attacking: bool,
    pub attack_cooldown: u32,
    pub attack_timer: u32,
    pub inventory: Inventory,
    invincibility_ticks: u32,
}

impl Player {
    pub fn new(pos: Vec2, config: &GameConfig) -> Self {
        Self {
            body: Body::new(pos, PLAYER_SIZE),
            facing: Direction::Down,
            health: config.player_max_health,
            max_health: config.player_max_health,
            alive: true,
            invincible_timer: 0,
            attacking: false,
            attack_cooldown: 0,
            attack_timer: 0,
            inventory: Inventory::default(),
            invincibility_ticks: config.invincibility_ticks,
        }
    }

    /// Moves by the held directions and counts every timer down one tick.
    /// Collision is resolved afterwards by the caller.
    pub fn update(&mut self, input: &InputSnapshot) {
        let mut delta = Vec2::ZERO;
        if input.left {
            delta.x = -PLAYER_SPEED;
            self.facing = Direction::Left;
        }
        if input.right {
            delta.x = PLAYER_SPEED;
            self.facing = Direction::Right;
        }
        if input.up {
            delta.y = -PLAYER_SPEED;
            self.facing = Direction::Up;
        }
        if input.down {
            delta.y = PLAYER_SPEED;
            self.facing = Direction::Down;
        }
        self.body.pos += delta;

        self.invincible_timer = self.invincible_timer.saturating_sub(1);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        if self.attack_timer > 0 {
            self.attack_timer -= 1;
            if self.attack_timer == 0 {
                self.attacking = false;
            }
        }
    }

    /// Starts a swing. Returns false without a sword or while cooling down.
    pub fn attack(&mut self) -> bool {
        if !self.inventory.has_sword || self.attack_cooldown > 0 || !self.alive {
            return false;
        }
        self.attacking = true;
        self.attack_timer = ATTACK_DURATION;
        self.attack_cooldown = ATTACK_COOLDOWN;
        true
    }

    /// Returns true when the damage actually landed.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive || self.invincible_timer > 0 || amount == 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            log::info!("player died");
        } else {
            self.invincible_timer = self.invincibility_ticks;
        }
        true
    }

    pub fn heal(&mut self, amount: u32) {
        if !self.alive {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    /// One extra heart, and a full refill.
    pub fn add_heart_container(&mut self) {
        self.max_health += 2;
        self.health = self.max_health;
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn position(&self) -> Vec2 {
        self.body.pos
    }

    /// Sword box in front of the body on the facing side.
    pub fn attack_rect(&self) -> Rect {
        let Body { pos, size } = self.body;
        match self.facing {
            Direction::Left => Rect::new(pos.x - SWORD_LENGTH, pos.y, SWORD_LENGTH, SWORD_WIDTH),
            Direction::Right => Rect::new(pos.x + size.x, pos.y, SWORD_LENGTH, SWORD_WIDTH),
            Direction::Up => Rect::new(pos.x, pos.y - SWORD_LENGTH, SWORD_WIDTH, SWORD_LENGTH),
            Direction::Down => Rect::new(pos.x, pos.y + size.y, SWORD_WIDTH, SWORD_LENGTH),
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.invincible_timer > 0 && (self.invincible_timer / 5) % 2 == 0
    }
}
