use macroquad::prelude::*;
use serde::Deserialize;

const DROP_SIZE: f32 = 16.0;
const BLINK_THRESHOLD: u32 = 60;
const BLINK_PERIOD: u32 = 10;

pub const HEALTH_DROP_HEAL: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    Sword,
    Shield,
    HeartContainer,
    Key,
    Triforce,
}

impl PickupKind {
    pub fn size(self) -> Vec2 {
        match self {
            Self::Sword => vec2(12.0, 30.0),
            Self::Shield | Self::HeartContainer | Self::Key => vec2(30.0, 30.0),
            Self::Triforce => vec2(40.0, 35.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sword => "sword",
            Self::Shield => "shield",
            Self::HeartContainer => "heart container",
            Self::Key => "key",
            Self::Triforce => "triforce",
        }
    }
}

/// A one-off item placed in a room. Hidden ones stay untouchable until revealed.
#[derive(Clone, Debug)]
pub struct Pickup {
    pub kind: PickupKind,
    pub rect: Rect,
    pub revealed: bool,
    pub collected: bool,
}

impl Pickup {
    pub fn new(kind: PickupKind, pos: Vec2) -> Self {
        let size = kind.size();
        Self {
            kind,
            rect: Rect::new(pos.x, pos.y, size.x, size.y),
            revealed: true,
            collected: false,
        }
    }

    pub fn hidden(kind: PickupKind, pos: Vec2) -> Self {
        Self {
            revealed: false,
            ..Self::new(kind, pos)
        }
    }

    pub fn is_available(&self) -> bool {
        self.revealed && !self.collected
    }

    /// Returns true only on the call that flips `collected`.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropKind {
    Health,
    Rupee { value: u32 },
}

/// Health or rupee left behind by a dead enemy. Runs out after `lifetime` ticks.
#[derive(Clone, Debug)]
pub struct TimedDrop {
    pub kind: DropKind,
    pub rect: Rect,
    pub lifetime: u32,
    pub collected: bool,
}

impl TimedDrop {
    pub fn new(kind: DropKind, pos: Vec2, lifetime: u32) -> Self {
        Self {
            kind,
            rect: Rect::new(pos.x, pos.y, DROP_SIZE, DROP_SIZE),
            lifetime,
            collected: false,
        }
    }

    pub fn update(&mut self) {
        if self.collected {
            return;
        }
        self.lifetime = self.lifetime.saturating_sub(1);
        if self.lifetime == 0 {
            self.collected = true;
        }
    }

    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    pub fn is_visible(&self) -> bool {
        if self.collected {
            return false;
        }
        self.lifetime >= BLINK_THRESHOLD || (self.lifetime / BLINK_PERIOD) % 2 == 1
    }
}

fn default_health() -> u32 {
    15
}

fn default_low_rupee() -> u32 {
    30
}

fn default_high_rupee() -> u32 {
    15
}

fn default_low_value() -> u32 {
    1
}

fn default_high_value() -> u32 {
    5
}

/// Percent bands over a 1..=100 roll, in the order health, low rupee,
/// high rupee. Whatever is left is no drop.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LootTable {
    pub health: u32,
    pub low_rupee: u32,
    pub high_rupee: u32,
    pub low_value: u32,
    pub high_value: u32,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            health: default_health(),
            low_rupee: default_low_rupee(),
            high_rupee: default_high_rupee(),
            low_value: default_low_value(),
            high_value: default_high_value(),
        }
    }
}

impl LootTable {
    pub fn total(&self) -> u32 {
        self.health + self.low_rupee + self.high_rupee
    }

    pub fn outcome(&self, roll: u32) -> Option<DropKind> {
        let mut upper = self.health;
        if roll <= upper {
            return Some(DropKind::Health);
        }
        upper += self.low_rupee;
        if roll <= upper {
            return Some(DropKind::Rupee { value: self.low_value });
        }
        upper += self.high_rupee;
        if roll <= upper {
            return Some(DropKind::Rupee { value: self.high_value });
        }
        None
    }
}
