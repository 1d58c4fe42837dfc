use macroquad::prelude::*;

use crate::collision::door_interaction_rect;
use crate::helpers::{overlaps, Direction};
use crate::items::{DropKind, Pickup, PickupKind, TimedDrop, HEALTH_DROP_HEAL};
use crate::player::Player;
use crate::props::PushableBlock;
use crate::room::Exits;
use crate::sound::{AudioSink, Cue};

/// What an interaction may touch: the player and the audio hooks.
pub struct InteractContext<'a> {
    pub player: &'a mut Player,
    pub audio: &'a mut dyn AudioSink,
}

impl<'a> InteractContext<'a> {
    pub fn new(player: &'a mut Player, audio: &'a mut dyn AudioSink) -> Self {
        Self { player, audio }
    }
}

/// Picks up every live drop under the player.
pub fn collect_drops(ctx: &mut InteractContext<'_>, drops: &mut [TimedDrop]) {
    let rect = ctx.player.rect();
    for drop in drops.iter_mut() {
        if drop.collected || !overlaps(&rect, &drop.rect) {
            continue;
        }
        if !drop.collect() {
            continue;
        }
        match drop.kind {
            DropKind::Health => {
                ctx.player.heal(HEALTH_DROP_HEAL);
                ctx.audio.play(Cue::HeartPickup);
            }
            DropKind::Rupee { value } => {
                ctx.player.inventory.rupees += value;
                ctx.audio.play(Cue::RupeePickup);
            }
        }
    }
}

/// Collects a revealed pickup the player is standing on and applies it.
/// The triforce has no effect here; the caller ends the game on it.
pub fn apply_pickup(ctx: &mut InteractContext<'_>, pickup: &mut Pickup) -> Option<PickupKind> {
    if !pickup.is_available() || !overlaps(&ctx.player.rect(), &pickup.rect) {
        return None;
    }
    if !pickup.collect() {
        return None;
    }
    let inventory = &mut ctx.player.inventory;
    match pickup.kind {
        PickupKind::Sword => inventory.has_sword = true,
        PickupKind::Shield => inventory.has_shield = true,
        PickupKind::Key => inventory.has_key = true,
        PickupKind::HeartContainer => ctx.player.add_heart_container(),
        PickupKind::Triforce => {}
    }
    ctx.audio.play(Cue::ItemGet);
    log::info!("picked up {}", pickup.kind.name());
    Some(pickup.kind)
}

/// Shoves the block one tile along the player's facing when the player has
/// walked into it. `blockers` must not contain the block itself.
pub fn try_push_block(player: &Player, block: &mut PushableBlock, blockers: &[Rect]) -> bool {
    if !overlaps(&player.rect(), &block.rect) {
        return false;
    }
    let pushed = block.try_push(player.facing, blockers);
    if pushed {
        log::debug!("block pushed {:?} to ({}, {})", player.facing, block.rect.x, block.rect.y);
    }
    pushed
}

/// Spends the key on the first locked door the player is standing at.
pub fn try_unlock_door(ctx: &mut InteractContext<'_>, exits: &mut Exits) -> Option<Direction> {
    if !ctx.player.inventory.has_key {
        return None;
    }
    let rect = ctx.player.rect();
    let door = Direction::ALL
        .into_iter()
        .find(|dir| exits.is_locked(*dir) && overlaps(&rect, &door_interaction_rect(*dir)))?;
    exits.unlock(door);
    ctx.player.inventory.has_key = false;
    ctx.audio.play(Cue::Secret);
    log::debug!("unlocked {door:?} door");
    Some(door)
}
