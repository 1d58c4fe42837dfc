use std::collections::HashMap;

use macroquad::prelude::*;

use crate::config::{GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, TILE_SIZE, WALL_THICKNESS};
use crate::entity::{Enemy, EnemyContext};
use crate::helpers::{Direction, RoomCoord};
use crate::items::{Pickup, PickupKind, TimedDrop};
use crate::props::{Fire, PushableBlock};
use crate::room::Exits;
use crate::rng::GameRng;
use crate::sound::{AudioSink, Cue};

const FLOOR_TILE: f32 = 32.0;
const FLOOR_MARGIN: f32 = 80.0;
const ENEMY_X: (i32, i32) = (90, 685);
const ENEMY_Y: (i32, i32) = (150, 550);
const BOSS_POS: Vec2 = Vec2::new(560.0, 150.0);
const ENCLOSURE_ORIGIN: Vec2 = Vec2::new(WALL_THICKNESS, HUD_HEIGHT + WALL_THICKNESS);
const PRIZE_POS: Vec2 = Vec2::new(385.0, 345.0);

/// A hand-built dungeon screen. Nothing in here respawns.
#[derive(Clone, Debug)]
pub struct DungeonRoom {
    pub coord: RoomCoord,
    pub exits: Exits,
    pub enemies: Vec<Enemy>,
    pub barriers: Vec<Rect>,
    pub block: Option<PushableBlock>,
    pub pickups: Vec<Pickup>,
    pub fires: Vec<Fire>,
    pub floor_tiles: Vec<Rect>,
    pub drops: Vec<TimedDrop>,
    pub visited: bool,
}

impl DungeonRoom {
    fn new(coord: RoomCoord, exits: &[Direction]) -> Self {
        Self {
            coord,
            exits: Exits::with_open(exits),
            enemies: Vec::new(),
            barriers: Vec::new(),
            block: None,
            pickups: Vec::new(),
            fires: Vec::new(),
            floor_tiles: Vec::new(),
            drops: Vec::new(),
            visited: false,
        }
    }

    pub fn blocking_rects(&self) -> Vec<Rect> {
        self.barriers
            .iter()
            .copied()
            .chain(self.block.iter().map(|block| block.rect))
            .collect()
    }

    pub fn update(&mut self, target: Vec2, rng: &mut GameRng, audio: &mut dyn AudioSink) {
        let blockers = self.blocking_rects();
        let ctx = EnemyContext {
            blockers: &blockers,
            target,
        };
        for enemy in self.enemies.iter_mut() {
            enemy.update(&ctx, rng, audio);
        }
        for drop in self.drops.iter_mut() {
            drop.update();
        }
        self.drops.retain(|drop| !drop.collected);
        for fire in self.fires.iter_mut() {
            fire.update();
        }
    }

    fn group_cleared(&self, member: fn(&Enemy) -> bool) -> bool {
        let mut group = self.enemies.iter().filter(|enemy| member(enemy)).peekable();
        group.peek().is_some() && group.all(|enemy| !enemy.alive)
    }

    /// Shows the key once the bats are gone and the heart container once the
    /// slimes are gone. Returns true when something new appeared.
    pub fn check_reveals(&mut self, audio: &mut dyn AudioSink) -> bool {
        let bats_cleared = self.group_cleared(Enemy::is_bat);
        let slimes_cleared = self.group_cleared(Enemy::is_slime);
        let mut revealed = false;
        for pickup in self.pickups.iter_mut().filter(|pickup| !pickup.revealed) {
            let ready = match pickup.kind {
                PickupKind::Key => bats_cleared,
                PickupKind::HeartContainer => slimes_cleared,
                _ => false,
            };
            if ready {
                pickup.revealed = true;
                revealed = true;
                log::debug!("{} revealed in dungeon room ({}, {})", pickup.kind.name(), self.coord.x, self.coord.y);
            }
        }
        if revealed {
            audio.play(Cue::Secret);
        }
        revealed
    }

    /// Frees the block guarding the triforce.
    pub fn release_block(&mut self, audio: &mut dyn AudioSink) {
        if let Some(block) = &mut self.block {
            if !block.pushable {
                block.pushable = true;
                audio.play(Cue::Secret);
            }
        }
    }
}

/// Plus-shaped five-room dungeon around the crossroads at (0, 0).
pub struct Dungeon {
    rooms: HashMap<RoomCoord, DungeonRoom>,
}

impl Dungeon {
    pub const START: RoomCoord = RoomCoord::new(0, 1);
    pub const ENTRY_POS: Vec2 = Vec2::new(380.0, 570.0);

    pub fn build(rng: &mut GameRng) -> Self {
        let rooms = [
            start_room(rng),
            crossroads(rng),
            boss_room(),
            bat_room(rng),
            slime_room(rng),
        ];
        Self {
            rooms: rooms.into_iter().map(|room| (room.coord, room)).collect(),
        }
    }

    pub fn contains(&self, coord: RoomCoord) -> bool {
        self.rooms.contains_key(&coord)
    }

    pub fn room(&self, coord: RoomCoord) -> Option<&DungeonRoom> {
        self.rooms.get(&coord)
    }

    pub fn room_mut(&mut self, coord: RoomCoord) -> Option<&mut DungeonRoom> {
        self.rooms.get_mut(&coord)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &DungeonRoom> {
        self.rooms.values()
    }

    pub fn visited(&self, coord: RoomCoord) -> bool {
        self.rooms.get(&coord).is_some_and(|room| room.visited)
    }
}

fn random_spot(rng: &mut GameRng) -> Vec2 {
    vec2(
        rng.range(ENEMY_X.0, ENEMY_X.1) as f32,
        rng.range(ENEMY_Y.0, ENEMY_Y.1) as f32,
    )
}

fn start_room(rng: &mut GameRng) -> DungeonRoom {
    let mut room = DungeonRoom::new(Dungeon::START, &[Direction::Up, Direction::Down]);

    let door_x = GAME_WIDTH * 0.5;
    let fire_y = HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - 60.0;
    for x in [door_x - 60.0, door_x + 40.0] {
        room.fires.push(Fire::new(vec2(x, fire_y), rng.range_u32(0, 10)));
    }

    let step = FLOOR_TILE * 2.0;
    let left = FLOOR_MARGIN;
    let right = GAME_WIDTH - FLOOR_MARGIN - FLOOR_TILE;
    let top = HUD_HEIGHT + FLOOR_MARGIN;
    let bottom = HUD_HEIGHT + GAME_HEIGHT - FLOOR_MARGIN - FLOOR_TILE;
    let middle = vec2(
        (GAME_WIDTH - FLOOR_TILE * 3.0) * 0.5,
        HUD_HEIGHT + (GAME_HEIGHT - FLOOR_TILE * 3.0) * 0.5,
    );
    let groups = [
        (vec2(left, top), vec2(step, step)),
        (vec2(right, top), vec2(-step, step)),
        (middle, vec2(step, step)),
        (vec2(left, bottom), vec2(step, -step)),
        (vec2(right, bottom), vec2(-step, -step)),
    ];
    for (corner, stride) in groups {
        for i in 0..2 {
            for j in 0..2 {
                let pos = corner + vec2(i as f32 * stride.x, j as f32 * stride.y);
                room.floor_tiles.push(Rect::new(pos.x, pos.y, FLOOR_TILE, FLOOR_TILE));
            }
        }
    }
    room
}

fn crossroads(rng: &mut GameRng) -> DungeonRoom {
    let mut room = DungeonRoom::new(RoomCoord::new(0, 0), &Direction::ALL);
    room.exits.lock(Direction::Up);
    for _ in 0..2 {
        let pos = random_spot(rng);
        room.enemies.push(Enemy::bat(pos, rng));
    }
    room
}

fn boss_room() -> DungeonRoom {
    let mut room = DungeonRoom::new(RoomCoord::new(0, -1), &[Direction::Down]);
    room.enemies.push(Enemy::boss(BOSS_POS));

    let origin = ENCLOSURE_ORIGIN;
    let row_y = origin.y + TILE_SIZE * 4.0;
    for i in [0, 2, 3, 4] {
        room.barriers.push(Rect::new(origin.x + TILE_SIZE * i as f32, row_y, TILE_SIZE, TILE_SIZE));
    }
    let column_x = origin.x + TILE_SIZE * 4.0;
    for i in 0..4 {
        room.barriers.push(Rect::new(column_x, origin.y + TILE_SIZE * i as f32, TILE_SIZE, TILE_SIZE));
    }

    room.block = Some(PushableBlock::new(vec2(origin.x + TILE_SIZE, row_y - TILE_SIZE), false));
    room.pickups.push(Pickup::new(PickupKind::Triforce, vec2(120.0, 140.0)));
    room
}

fn bat_room(rng: &mut GameRng) -> DungeonRoom {
    let mut room = DungeonRoom::new(RoomCoord::new(1, 0), &[Direction::Left]);
    for _ in 0..3 {
        let pos = random_spot(rng);
        room.enemies.push(Enemy::bat(pos, rng));
    }
    room.pickups.push(Pickup::hidden(PickupKind::Key, PRIZE_POS));
    room
}

fn slime_room(rng: &mut GameRng) -> DungeonRoom {
    let mut room = DungeonRoom::new(RoomCoord::new(-1, 0), &[Direction::Right]);
    for _ in 0..3 {
        let pos = random_spot(rng);
        room.enemies.push(Enemy::slime(pos, true, rng));
    }
    room.pickups.push(Pickup::hidden(PickupKind::HeartContainer, PRIZE_POS));
    room
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::overlaps;
    use crate::sound::CueRecorder;

    fn dungeon() -> Dungeon {
        Dungeon::build(&mut GameRng::new(17))
    }

    #[test]
    fn plus_shape_with_locked_north() {
        let dungeon = dungeon();
        for coord in [(0, 1), (0, 0), (0, -1), (1, 0), (-1, 0)] {
            assert!(dungeon.contains(RoomCoord::new(coord.0, coord.1)));
        }
        assert!(!dungeon.contains(RoomCoord::new(1, 1)));
        let centre = dungeon.room(RoomCoord::new(0, 0)).unwrap();
        assert!(centre.exits.is_locked(Direction::Up));
        assert!(centre.exits.is_passable(Direction::Left));
        assert_eq!(dungeon.room(Dungeon::START).unwrap().fires.len(), 2);
    }

    #[test]
    fn boss_room_encloses_triforce_behind_block() {
        let dungeon = dungeon();
        let room = dungeon.room(RoomCoord::new(0, -1)).unwrap();
        assert_eq!(room.barriers.len(), 8);
        let block = room.block.as_ref().unwrap();
        assert_eq!(block.rect, Rect::new(90.0, 250.0, 50.0, 50.0));
        assert!(!block.pushable);
        let gap = Rect::new(90.0, 300.0, 50.0, 50.0);
        assert!(room.barriers.iter().all(|barrier| !overlaps(barrier, &gap)));
        let triforce = &room.pickups[0];
        assert!(triforce.is_available());
        assert!(room.barriers.iter().all(|barrier| !overlaps(barrier, &triforce.rect)));
    }

    #[test]
    fn key_appears_when_bats_are_gone() {
        let mut dungeon = dungeon();
        let mut audio = CueRecorder::default();
        let room = dungeon.room_mut(RoomCoord::new(1, 0)).unwrap();
        assert!(!room.check_reveals(&mut audio));

        room.enemies[0].take_hit();
        room.enemies[1].take_hit();
        assert!(!room.check_reveals(&mut audio));
        room.enemies[2].take_hit();
        assert!(room.check_reveals(&mut audio));
        assert!(room.pickups[0].is_available());
        assert!(!room.check_reveals(&mut audio));
        assert_eq!(audio.cues, vec![Cue::Secret]);
    }

    #[test]
    fn heart_waits_for_split_slimes_too() {
        let mut dungeon = dungeon();
        let mut audio = CueRecorder::default();
        let mut rng = GameRng::new(2);
        let room = dungeon.room_mut(RoomCoord::new(-1, 0)).unwrap();
        for slime in room.enemies.iter_mut() {
            slime.take_hit();
        }
        room.enemies.push(Enemy::slime(vec2(300.0, 300.0), false, &mut rng));
        assert!(!room.check_reveals(&mut audio));
        room.enemies[3].take_hit();
        assert!(room.check_reveals(&mut audio));
    }

    #[test]
    fn releasing_the_block_plays_once() {
        let mut dungeon = dungeon();
        let mut audio = CueRecorder::default();
        let room = dungeon.room_mut(RoomCoord::new(0, -1)).unwrap();
        room.release_block(&mut audio);
        room.release_block(&mut audio);
        assert!(room.block.as_ref().unwrap().pushable);
        assert_eq!(audio.cues, vec![Cue::Secret]);
    }
}
