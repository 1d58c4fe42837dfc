use macroquad::prelude::*;

use crate::config::{GameConfig, CAVE_EXIT_SIZE, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, WALL_THICKNESS};
use crate::helpers::{overlaps, room_center};
use crate::interact::{apply_pickup, InteractContext};
use crate::items::{Pickup, PickupKind};
use crate::props::{Fire, OldMan};
use crate::rng::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaveKind {
    Sword,
    Hint,
    Shop,
}

impl CaveKind {
    fn lines(self) -> [&'static str; 2] {
        match self {
            Self::Sword => ["IT'S DANGEROUS TO GO ALONE!", "TAKE THIS."],
            Self::Hint => ["THERE IS HEALTH IN THE SOUTHWEST", "AND THERE IS A SECRET IN THE SOUTHEAST."],
            Self::Shop => ["BUY EXTRA HEALTH HERE", ""],
        }
    }
}

/// A single-screen cave: an old man, two fires and one thing on offer.
#[derive(Clone, Debug)]
pub struct CaveRoom {
    pub kind: CaveKind,
    pub old_man: OldMan,
    pub fires: Vec<Fire>,
    pub offer: Pickup,
    /// Rupees asked for the offer. Zero means free.
    pub price: u32,
}

impl CaveRoom {
    pub const ENTRY_POS: Vec2 = Vec2::new(380.0, 520.0);

    pub fn new(kind: CaveKind, config: &GameConfig, rng: &mut GameRng) -> Self {
        let center = room_center();
        let fires = [center + vec2(-60.0, -40.0), center + vec2(40.0, -40.0)]
            .into_iter()
            .map(|pos| Fire::new(pos, rng.range_u32(0, 10)))
            .collect();

        let (man_pos, offer, price) = match kind {
            CaveKind::Sword => (
                vec2(380.0, 300.0),
                Pickup::new(PickupKind::Sword, vec2(394.0, 380.0)),
                0,
            ),
            CaveKind::Hint => (
                vec2(380.0, 300.0),
                Pickup::new(PickupKind::Shield, vec2(385.0, 380.0)),
                0,
            ),
            CaveKind::Shop => (
                vec2(380.0, 180.0),
                Pickup::new(PickupKind::HeartContainer, vec2(385.0, 310.0)),
                config.shop_price,
            ),
        };

        Self {
            kind,
            old_man: OldMan::new(man_pos, kind.lines()),
            fires,
            offer,
            price,
        }
    }

    /// Narrow gap in the bottom wall leading back outside.
    pub fn exit_rect() -> Rect {
        Rect::new(
            (GAME_WIDTH - CAVE_EXIT_SIZE) * 0.5,
            HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS,
            CAVE_EXIT_SIZE,
            WALL_THICKNESS,
        )
    }

    pub fn update(&mut self) {
        for fire in self.fires.iter_mut() {
            fire.update();
        }
    }

    /// Hands over the offer when the player stands on it and can pay.
    pub fn try_take(&mut self, ctx: &mut InteractContext<'_>) -> Option<PickupKind> {
        if !self.offer.is_available() || !overlaps(&ctx.player.rect(), &self.offer.rect) {
            return None;
        }
        if ctx.player.inventory.rupees < self.price {
            return None;
        }
        let taken = apply_pickup(ctx, &mut self.offer)?;
        ctx.player.inventory.rupees -= self.price;
        if self.kind == CaveKind::Sword {
            self.old_man.visible = false;
        }
        Some(taken)
    }
}

pub struct Caves {
    sword: CaveRoom,
    hint: CaveRoom,
    shop: CaveRoom,
}

impl Caves {
    pub fn new(config: &GameConfig, rng: &mut GameRng) -> Self {
        Self {
            sword: CaveRoom::new(CaveKind::Sword, config, rng),
            hint: CaveRoom::new(CaveKind::Hint, config, rng),
            shop: CaveRoom::new(CaveKind::Shop, config, rng),
        }
    }

    pub fn get(&self, kind: CaveKind) -> &CaveRoom {
        match kind {
            CaveKind::Sword => &self.sword,
            CaveKind::Hint => &self.hint,
            CaveKind::Shop => &self.shop,
        }
    }

    pub fn get_mut(&mut self, kind: CaveKind) -> &mut CaveRoom {
        match kind {
            CaveKind::Sword => &mut self.sword,
            CaveKind::Hint => &mut self.hint,
            CaveKind::Shop => &mut self.shop,
        }
    }
}
