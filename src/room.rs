use std::collections::HashMap;

use macroquad::prelude::*;

use crate::cave::CaveKind;
use crate::config::{GameConfig, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, TILE_SIZE, WALL_THICKNESS};
use crate::entity::{Enemy, EnemyContext};
use crate::helpers::{any_overlap, inflate, overlaps, rect_centered, room_center, Direction, RoomCoord};
use crate::items::TimedDrop;
use crate::props::{CaveEntrance, HiddenStairs, Obstacle, ObstacleKind, PushableBlock};
use crate::rng::GameRng;
use crate::sound::AudioSink;

const SAFE_DISTANCE_FROM_EXIT: i32 = 3;
const EXIT_HALF_SPAN: i32 = 2;
const OBSTACLE_COUNT: (i32, i32) = (5, 8);
const OBSTACLE_ATTEMPTS: usize = 100;
const ENEMY_COUNT: (i32, i32) = (2, 4);
const SPAWN_ROOM_ENEMY_COUNT: (i32, i32) = (1, 2);
const ENEMY_ATTEMPTS: usize = 50;
const STAIRS_ATTEMPTS: usize = 50;
const ARCHER_CHANCE: f64 = 0.3;
const ENEMY_PADDING: f32 = 20.0;
const ENEMY_SIZE_HINT: Vec2 = Vec2::new(30.0, 30.0);
const START_CLEARANCE: Vec2 = Vec2::new(120.0, 120.0);

/// Which walls have a gap, and which of those gaps are locked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exits {
    open: [bool; 4],
    locked: [bool; 4],
}

impl Exits {
    pub fn with_open(dirs: &[Direction]) -> Self {
        let mut exits = Self::default();
        for dir in dirs {
            exits.open(*dir);
        }
        exits
    }

    pub fn open(&mut self, dir: Direction) {
        self.open[dir.index()] = true;
    }

    pub fn lock(&mut self, dir: Direction) {
        self.locked[dir.index()] = true;
    }

    /// Returns true when the door was locked before the call.
    pub fn unlock(&mut self, dir: Direction) -> bool {
        std::mem::replace(&mut self.locked[dir.index()], false)
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        self.open[dir.index()]
    }

    pub fn is_locked(&self, dir: Direction) -> bool {
        self.open[dir.index()] && self.locked[dir.index()]
    }

    pub fn is_passable(&self, dir: Direction) -> bool {
        self.is_open(dir) && !self.is_locked(dir)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnKind {
    Monster,
    Archer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub kind: SpawnKind,
    pub pos: Vec2,
}

impl SpawnPoint {
    fn build(&self, rng: &mut GameRng) -> Enemy {
        match self.kind {
            SpawnKind::Monster => Enemy::monster(self.pos, rng),
            SpawnKind::Archer => Enemy::archer(self.pos, rng),
        }
    }
}

/// What a room needs to know about its place in the world before generation.
#[derive(Clone, Copy, Debug)]
pub struct RoomPlan {
    pub coord: RoomCoord,
    pub exits: Exits,
    pub is_spawn: bool,
    pub cave: Option<CaveKind>,
    pub has_stairs: bool,
}

/// One overworld screen.
#[derive(Clone, Debug)]
pub struct Room {
    pub coord: RoomCoord,
    pub exits: Exits,
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub spawns: Vec<SpawnPoint>,
    pub block: Option<PushableBlock>,
    pub stairs: Option<HiddenStairs>,
    pub cave: Option<CaveEntrance>,
    pub drops: Vec<TimedDrop>,
    pub visited: bool,
    respawn_timer: u32,
    respawn_delay: u32,
}

/// Tile grid between the walls, used only while placing things.
struct TileGrid {
    width: i32,
    height: i32,
    occupied: Vec<bool>,
}

impl TileGrid {
    fn new() -> Self {
        let width = ((GAME_WIDTH - WALL_THICKNESS * 2.0) / TILE_SIZE) as i32;
        let height = ((GAME_HEIGHT - WALL_THICKNESS * 2.0) / TILE_SIZE) as i32;
        Self {
            width,
            height,
            occupied: vec![false; (width * height) as usize],
        }
    }

    fn index(&self, gx: i32, gy: i32) -> usize {
        (gy * self.width + gx) as usize
    }

    fn is_taken(&self, gx: i32, gy: i32) -> bool {
        self.occupied[self.index(gx, gy)]
    }

    fn take(&mut self, gx: i32, gy: i32) {
        let i = self.index(gx, gy);
        self.occupied[i] = true;
    }

    fn origin(gx: i32, gy: i32) -> Vec2 {
        vec2(
            WALL_THICKNESS + gx as f32 * TILE_SIZE,
            HUD_HEIGHT + WALL_THICKNESS + gy as f32 * TILE_SIZE,
        )
    }
}

/// The strip in front of an open exit that generation keeps empty:
/// `SAFE_DISTANCE_FROM_EXIT` tiles deep from the inner wall face and
/// `2 * EXIT_HALF_SPAN + 1` tiles wide, centred on the gap.
fn exit_margin(side: Direction) -> Rect {
    let depth = SAFE_DISTANCE_FROM_EXIT as f32 * TILE_SIZE;
    let span = (2 * EXIT_HALF_SPAN + 1) as f32 * TILE_SIZE;
    let center = room_center();
    match side {
        Direction::Up => Rect::new(center.x - span / 2.0, HUD_HEIGHT + WALL_THICKNESS, span, depth),
        Direction::Down => Rect::new(
            center.x - span / 2.0,
            HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - depth,
            span,
            depth,
        ),
        Direction::Left => Rect::new(WALL_THICKNESS, center.y - span / 2.0, depth, span),
        Direction::Right => Rect::new(GAME_WIDTH - WALL_THICKNESS - depth, center.y - span / 2.0, depth, span),
    }
}

fn exit_margins(exits: &Exits) -> Vec<Rect> {
    Direction::ALL
        .into_iter()
        .filter(|dir| exits.is_open(*dir))
        .map(exit_margin)
        .collect()
}

impl Room {
    pub fn empty(coord: RoomCoord, exits: Exits, config: &GameConfig) -> Self {
        Self {
            coord,
            exits,
            obstacles: Vec::new(),
            enemies: Vec::new(),
            spawns: Vec::new(),
            block: None,
            stairs: None,
            cave: None,
            drops: Vec::new(),
            visited: false,
            respawn_timer: 0,
            respawn_delay: config.respawn_delay,
        }
    }

    /// Obstacles first, then the stairs, then enemies, each validated
    /// against what is already there. A placement that runs out of attempts
    /// is dropped.
    pub fn generate(plan: &RoomPlan, config: &GameConfig, rng: &mut GameRng) -> Self {
        let mut room = Self::empty(plan.coord, plan.exits, config);
        room.cave = plan.cave.map(|kind| CaveEntrance::random(kind, rng));

        let mut grid = TileGrid::new();
        room.place_obstacles(&mut grid, plan, rng);
        if plan.has_stairs {
            room.place_stairs(&mut grid, config, rng);
        }
        room.place_enemies(plan, rng);
        room.enemies = room.spawns.iter().map(|spawn| spawn.build(rng)).collect();

        log::debug!(
            "room ({}, {}): {} obstacles, {} enemies",
            plan.coord.x,
            plan.coord.y,
            room.obstacles.len(),
            room.spawns.len()
        );
        room
    }

    fn place_obstacles(&mut self, grid: &mut TileGrid, plan: &RoomPlan, rng: &mut GameRng) {
        let mut keep_clear = self.keep_clear_zones();
        if plan.is_spawn {
            keep_clear.push(rect_centered(room_center(), START_CLEARANCE));
        }
        let count = rng.range(OBSTACLE_COUNT.0, OBSTACLE_COUNT.1);

        for _ in 0..count {
            let mut placed = false;
            for _ in 0..OBSTACLE_ATTEMPTS {
                let gx = rng.range(0, grid.width - 1);
                let gy = rng.range(0, grid.height - 1);
                if grid.is_taken(gx, gy) {
                    continue;
                }
                let pos = TileGrid::origin(gx, gy);
                let tile = Rect::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE);
                if any_overlap(&tile, &keep_clear) {
                    continue;
                }

                let roll = rng.percentile();
                let kind = if roll <= 40 {
                    ObstacleKind::Rock
                } else if roll <= 70 {
                    ObstacleKind::Water
                } else {
                    ObstacleKind::Tree
                };
                self.obstacles.push(Obstacle::new(kind, pos));
                grid.take(gx, gy);
                placed = true;
                break;
            }
            if !placed {
                log::debug!("gave up placing an obstacle in room ({}, {})", self.coord.x, self.coord.y);
            }
        }
    }

    fn place_stairs(&mut self, grid: &mut TileGrid, config: &GameConfig, rng: &mut GameRng) {
        let keep_clear = self.keep_clear_zones();
        for _ in 0..STAIRS_ATTEMPTS {
            let gx = rng.range(2, grid.width - 3);
            let gy = rng.range(2, grid.height - 3);
            if grid.is_taken(gx, gy) {
                continue;
            }
            let pos = TileGrid::origin(gx, gy);
            if any_overlap(&Rect::new(pos.x, pos.y, TILE_SIZE, TILE_SIZE), &keep_clear) {
                continue;
            }
            self.stairs = Some(HiddenStairs::new(pos, config.stairs_reveal_delay));
            self.block = Some(PushableBlock::new(pos, true));
            grid.take(gx, gy);
            return;
        }
        log::warn!("no free tile for the hidden stairs in room ({}, {})", self.coord.x, self.coord.y);
    }

    fn place_enemies(&mut self, plan: &RoomPlan, rng: &mut GameRng) {
        let range = if plan.is_spawn { SPAWN_ROOM_ENEMY_COUNT } else { ENEMY_COUNT };
        let count = rng.range(range.0, range.1);
        let blockers = self.blocking_rects();
        let keep_clear = self.keep_clear_zones();

        for _ in 0..count {
            let mut placed = false;
            for _ in 0..ENEMY_ATTEMPTS {
                let pos = if plan.is_spawn { corner_spawn(rng) } else { open_spawn(rng) };
                let rect = Rect::new(pos.x, pos.y, ENEMY_SIZE_HINT.x, ENEMY_SIZE_HINT.y);
                let crowded = self.spawns.iter().any(|other| {
                    let taken = Rect::new(other.pos.x, other.pos.y, ENEMY_SIZE_HINT.x, ENEMY_SIZE_HINT.y);
                    overlaps(&rect, &inflate(&taken, ENEMY_PADDING))
                });
                if any_overlap(&rect, &blockers) || any_overlap(&rect, &keep_clear) || crowded {
                    continue;
                }
                let kind = if !plan.is_spawn && rng.chance(ARCHER_CHANCE) {
                    SpawnKind::Archer
                } else {
                    SpawnKind::Monster
                };
                self.spawns.push(SpawnPoint { kind, pos });
                placed = true;
                break;
            }
            if !placed {
                log::debug!("gave up placing an enemy in room ({}, {})", self.coord.x, self.coord.y);
            }
        }
    }

    /// Exit margins and the area around the cave mouth. Nothing is generated
    /// inside these.
    fn keep_clear_zones(&self) -> Vec<Rect> {
        let mut zones = exit_margins(&self.exits);
        zones.extend(self.cave.iter().map(|cave| inflate(&cave.rect, TILE_SIZE)));
        zones
    }

    /// Everything solid for walkers: obstacles plus the block.
    pub fn blocking_rects(&self) -> Vec<Rect> {
        self.obstacles
            .iter()
            .map(|obstacle| obstacle.rect)
            .chain(self.block.iter().map(|block| block.rect))
            .collect()
    }

    pub fn obstacle_rects(&self) -> Vec<Rect> {
        self.obstacles.iter().map(|obstacle| obstacle.rect).collect()
    }

    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|enemy| !enemy.alive)
    }

    fn respawn_due(&self) -> bool {
        !self.spawns.is_empty() && self.all_enemies_dead() && self.respawn_timer >= self.respawn_delay
    }

    /// One tick for the active room: enemy AI, drop lifetimes, stairs delay,
    /// and the respawn countdown once the room is cleared.
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

        if let Some(stairs) = &mut self.stairs {
            stairs.update();
        }

        if self.spawns.is_empty() || !self.all_enemies_dead() {
            self.respawn_timer = 0;
            return;
        }
        self.respawn_timer += 1;
        if self.respawn_due() {
            self.respawn(rng);
        }
    }

    /// Rebuilds every enemy at its spawn point and clears the floor.
    pub fn respawn(&mut self, rng: &mut GameRng) {
        self.enemies = self.spawns.iter().map(|spawn| spawn.build(rng)).collect();
        self.drops.clear();
        self.respawn_timer = 0;
        log::debug!("room ({}, {}) respawned {} enemies", self.coord.x, self.coord.y, self.enemies.len());
    }

    pub fn on_player_enter(&mut self, rng: &mut GameRng) {
        self.visited = true;
        if self.respawn_due() {
            self.respawn(rng);
        }
    }

    /// Reveals the stairs once their block has moved. True on the reveal tick.
    pub fn uncover_stairs(&mut self) -> bool {
        let moved = self.block.as_ref().is_some_and(|block| block.has_been_pushed);
        match &mut self.stairs {
            Some(stairs) if moved && !stairs.revealed => {
                stairs.reveal();
                true
            }
            _ => false,
        }
    }
}

fn open_spawn(rng: &mut GameRng) -> Vec2 {
    let x = rng.range((WALL_THICKNESS + 50.0) as i32, (GAME_WIDTH - WALL_THICKNESS - 100.0) as i32);
    let y = rng.range(
        (HUD_HEIGHT + WALL_THICKNESS + 50.0) as i32,
        (HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - 100.0) as i32,
    );
    vec2(x as f32, y as f32)
}

/// Somewhere in one of the four corners, away from where the player starts.
fn corner_spawn(rng: &mut GameRng) -> Vec2 {
    let center = room_center();
    let west = ((WALL_THICKNESS + 50.0) as i32, (center.x - 150.0) as i32);
    let east = ((center.x + 150.0) as i32, (GAME_WIDTH - WALL_THICKNESS - 100.0) as i32);
    let north = ((HUD_HEIGHT + WALL_THICKNESS + 50.0) as i32, (center.y - 100.0) as i32);
    let south = ((center.y + 100.0) as i32, (HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS - 100.0) as i32);

    let (xs, ys) = match rng.range(0, 3) {
        0 => (west, north),
        1 => (east, north),
        2 => (west, south),
        _ => (east, south),
    };
    vec2(rng.range(xs.0, xs.1) as f32, rng.range(ys.0, ys.1) as f32)
}

/// The grid of overworld rooms, keyed by coordinate.
pub struct Overworld {
    rooms: HashMap<RoomCoord, Room>,
    width: i32,
    height: i32,
}

impl Overworld {
    pub const SPAWN: RoomCoord = RoomCoord::new(1, 1);

    pub fn generate(config: &GameConfig, rng: &mut GameRng) -> Self {
        let (width, height) = (config.world_width, config.world_height);
        let mut world = Self {
            rooms: HashMap::new(),
            width,
            height,
        };
        let hint_room = world.cave_room(CaveKind::Hint);
        let shop_room = world.cave_room(CaveKind::Shop);
        let stairs_room = world.stairs_room();

        for y in 0..height {
            for x in 0..width {
                let coord = RoomCoord::new(x, y);
                let mut exits = Exits::default();
                for dir in Direction::ALL {
                    if world.in_bounds(coord.step(dir)) {
                        exits.open(dir);
                    }
                }
                let cave = if coord == Self::SPAWN {
                    Some(CaveKind::Sword)
                } else if coord == hint_room {
                    Some(CaveKind::Hint)
                } else if coord == shop_room {
                    Some(CaveKind::Shop)
                } else {
                    None
                };
                let plan = RoomPlan {
                    coord,
                    exits,
                    is_spawn: coord == Self::SPAWN,
                    cave,
                    has_stairs: coord == stairs_room,
                };
                world.rooms.insert(coord, Room::generate(&plan, config, rng));
            }
        }

        log::info!("generated {width}x{height} overworld");
        world
    }

    fn in_bounds(&self, coord: RoomCoord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    pub fn contains(&self, coord: RoomCoord) -> bool {
        self.rooms.contains_key(&coord)
    }

    pub fn room(&self, coord: RoomCoord) -> Option<&Room> {
        self.rooms.get(&coord)
    }

    pub fn room_mut(&mut self, coord: RoomCoord) -> Option<&mut Room> {
        self.rooms.get_mut(&coord)
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn visited(&self, coord: RoomCoord) -> bool {
        self.rooms.get(&coord).is_some_and(|room| room.visited)
    }

    pub fn stairs_room(&self) -> RoomCoord {
        RoomCoord::new(self.width - 1, self.height - 1)
    }

    /// Room holding the entrance to the given cave.
    pub fn cave_room(&self, kind: CaveKind) -> RoomCoord {
        match kind {
            CaveKind::Sword => Self::SPAWN,
            CaveKind::Hint => RoomCoord::new(self.width - 1, 0),
            CaveKind::Shop => RoomCoord::new(0, self.height - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::CueRecorder;

    fn world(seed: u64) -> Overworld {
        let config = GameConfig::default();
        Overworld::generate(&config, &mut GameRng::new(seed))
    }

    #[test]
    fn exits_connect_neighbours_only() {
        let world = world(7);
        let corner = world.room(RoomCoord::new(0, 0)).unwrap();
        assert!(corner.exits.is_open(Direction::Right));
        assert!(corner.exits.is_open(Direction::Down));
        assert!(!corner.exits.is_open(Direction::Up));
        assert!(!corner.exits.is_open(Direction::Left));
        let centre = world.room(Overworld::SPAWN).unwrap();
        assert!(Direction::ALL.iter().all(|dir| centre.exits.is_passable(*dir)));
    }

    #[test]
    fn generated_rooms_never_overlap_and_keep_exits_clear() {
        for seed in 0..20 {
            let world = world(seed);
            for y in 0..3 {
                for x in 0..3 {
                    let room = world.room(RoomCoord::new(x, y)).unwrap();
                    let solids = room.blocking_rects();
                    for (i, a) in room.obstacles.iter().enumerate() {
                        for b in &room.obstacles[i + 1..] {
                            assert!(!overlaps(&a.rect, &b.rect));
                        }
                        for dir in Direction::ALL {
                            if room.exits.is_open(dir) {
                                let mouth = crate::collision::door_interaction_rect(dir);
                                assert!(!overlaps(&a.rect, &mouth));
                            }
                        }
                    }
                    for spawn in &room.spawns {
                        let rect = Rect::new(spawn.pos.x, spawn.pos.y, 30.0, 30.0);
                        assert!(!any_overlap(&rect, &solids));
                    }
                    assert!(room.spawns.len() <= 4);
                }
            }
        }
    }

    #[test]
    fn spawn_room_is_gentle() {
        for seed in 0..20 {
            let world = world(seed);
            let room = world.room(Overworld::SPAWN).unwrap();
            assert!(room.spawns.len() <= 2);
            assert!(room.spawns.iter().all(|spawn| spawn.kind == SpawnKind::Monster));
            let start = rect_centered(room_center(), vec2(40.0, 40.0));
            assert!(!any_overlap(&start, &room.obstacle_rects()));
            assert!(room.cave.as_ref().is_some_and(|cave| cave.kind == CaveKind::Sword));
        }
    }

    fn every_room(world: &Overworld) -> impl Iterator<Item = &Room> {
        let (width, height) = world.size();
        (0..height).flat_map(move |y| (0..width).filter_map(move |x| world.room(RoomCoord::new(x, y))))
    }

    fn spawn_rect(spawn: &SpawnPoint) -> Rect {
        Rect::new(spawn.pos.x, spawn.pos.y, ENEMY_SIZE_HINT.x, ENEMY_SIZE_HINT.y)
    }

    #[test]
    fn exit_margin_sits_in_front_of_the_gap() {
        assert_eq!(exit_margin(Direction::Up), Rect::new(275.0, 100.0, 250.0, 150.0));
        assert_eq!(exit_margin(Direction::Down), Rect::new(275.0, 470.0, 250.0, 150.0));
        assert_eq!(exit_margin(Direction::Left), Rect::new(40.0, 235.0, 150.0, 250.0));
        assert_eq!(exit_margin(Direction::Right), Rect::new(610.0, 235.0, 150.0, 250.0));
    }

    #[test]
    fn enemy_spawns_avoid_exit_margins_and_cave_mouth() {
        for seed in 0..200 {
            let world = world(seed);
            for room in every_room(&world) {
                let margins = exit_margins(&room.exits);
                let cave_zone = room.cave.as_ref().map(|cave| inflate(&cave.rect, TILE_SIZE));
                for spawn in &room.spawns {
                    let rect = spawn_rect(spawn);
                    assert!(!any_overlap(&rect, &margins), "seed {seed} room {:?} spawn {:?}", room.coord, spawn.pos);
                    assert!(cave_zone.is_none_or(|zone| !overlaps(&rect, &zone)));
                }
            }
        }
    }

    #[test]
    fn obstacles_and_stairs_avoid_exit_margins_and_cave_mouth() {
        for seed in 0..100 {
            let world = world(seed);
            for room in every_room(&world) {
                let mut zones = exit_margins(&room.exits);
                zones.extend(room.cave.iter().map(|cave| inflate(&cave.rect, TILE_SIZE)));
                for obstacle in &room.obstacles {
                    assert!(!any_overlap(&obstacle.rect, &zones), "seed {seed} room {:?}", room.coord);
                }
                if let Some(block) = &room.block {
                    assert!(!any_overlap(&block.rect, &zones));
                }
            }
        }
    }

    #[test]
    fn rooms_get_their_share_of_obstacles_and_enemies() {
        for seed in 0..50 {
            let world = world(seed);
            for room in every_room(&world) {
                assert!((5..=8).contains(&room.obstacles.len()), "seed {seed} room {:?}", room.coord);
                assert_eq!(room.enemies.len(), room.spawns.len());
                if room.coord == Overworld::SPAWN {
                    assert!((1..=2).contains(&room.spawns.len()));
                    assert!(room.spawns.iter().all(|spawn| spawn.kind == SpawnKind::Monster));
                } else {
                    assert!((2..=4).contains(&room.spawns.len()), "seed {seed} room {:?}", room.coord);
                }
            }
        }
    }

    #[test]
    fn archers_show_up_outside_the_spawn_room() {
        let mut archers = 0;
        for seed in 0..20 {
            let world = world(seed);
            for room in every_room(&world) {
                archers += room.spawns.iter().filter(|spawn| spawn.kind == SpawnKind::Archer).count();
            }
        }
        assert!(archers > 0);
    }

    #[test]
    fn stairs_start_under_the_block() {
        let world = world(3);
        let room = world.room(world.stairs_room()).unwrap();
        let (stairs, block) = (room.stairs.as_ref().unwrap(), room.block.as_ref().unwrap());
        assert_eq!(stairs.rect, block.rect);
        assert!(!stairs.revealed);
    }

    #[test]
    fn cleared_room_respawns_after_delay() {
        let config = GameConfig::default();
        let mut rng = GameRng::new(4);
        let mut audio = CueRecorder::default();
        let mut room = Room::empty(RoomCoord::new(0, 0), Exits::default(), &config);
        room.spawns = vec![
            SpawnPoint { kind: SpawnKind::Monster, pos: vec2(100.0, 200.0) },
            SpawnPoint { kind: SpawnKind::Monster, pos: vec2(500.0, 400.0) },
        ];
        room.respawn(&mut rng);
        for enemy in room.enemies.iter_mut() {
            enemy.take_hit();
            enemy.take_hit();
        }
        assert!(room.all_enemies_dead());

        let target = vec2(400.0, 360.0);
        for _ in 0..config.respawn_delay - 1 {
            room.update(target, &mut rng, &mut audio);
        }
        assert!(room.all_enemies_dead());
        room.update(target, &mut rng, &mut audio);

        assert_eq!(room.enemies.len(), 2);
        let positions: Vec<_> = room.enemies.iter().map(|enemy| enemy.body.pos).collect();
        assert_eq!(positions, vec![vec2(100.0, 200.0), vec2(500.0, 400.0)]);
        assert!(room.enemies.iter().all(|enemy| enemy.alive && enemy.health == 2));
        assert!(room.drops.is_empty());
    }
}
