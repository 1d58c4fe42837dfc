use macroquad::prelude::*;

use crate::cave::{CaveKind, CaveRoom, Caves};
use crate::collision::{clamp_to_room, rollback_player};
use crate::combat::{self, LootRules};
use crate::config::{GameConfig, CAVE_EXIT_SIZE, EXIT_SIZE, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, WALL_THICKNESS};
use crate::dungeon::Dungeon;
use crate::helpers::{overlaps, room_center, Direction, RoomCoord};
use crate::input::InputSnapshot;
use crate::interact::{self, InteractContext};
use crate::items::PickupKind;
use crate::player::{Player, PLAYER_SIZE};
use crate::rng::GameRng;
use crate::room::{Exits, Overworld};
use crate::sound::{AudioSink, Cue, MusicTrack};
use crate::transition::{arrival_position, find_safe_position, stairs_exit_point, Transition};

/// Which kind of space the player is in, and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Overworld(RoomCoord),
    Cave(CaveKind),
    Dungeon(RoomCoord),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    GameOver,
    Won,
}

/// The whole simulation. One `update` per frame.
pub struct GameState {
    pub config: GameConfig,
    pub player: Player,
    pub zone: Zone,
    pub overworld: Overworld,
    pub dungeon: Dungeon,
    pub caves: Caves,
    pub won: bool,
    pub tick: u64,
    rng: GameRng,
}

pub fn player_start() -> Vec2 {
    room_center() - PLAYER_SIZE * 0.5
}

fn dungeon_exit_rect() -> Rect {
    Rect::new(
        (GAME_WIDTH - EXIT_SIZE) * 0.5,
        HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS,
        EXIT_SIZE,
        WALL_THICKNESS,
    )
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, mut rng: GameRng) -> Self {
        log::info!("starting world with seed {}", rng.seed());
        let mut overworld = Overworld::generate(&config, &mut rng);
        let dungeon = Dungeon::build(&mut rng);
        let caves = Caves::new(&config, &mut rng);
        if let Some(room) = overworld.room_mut(Overworld::SPAWN) {
            room.on_player_enter(&mut rng);
        }
        Self {
            player: Player::new(player_start(), &config),
            zone: Zone::Overworld(Overworld::SPAWN),
            overworld,
            dungeon,
            caves,
            won: false,
            tick: 0,
            rng,
            config,
        }
    }

    pub fn status(&self) -> Status {
        if self.won {
            Status::Won
        } else if !self.player.alive {
            Status::GameOver
        } else {
            Status::Playing
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Advances one tick. Does nothing once the game is won or lost.
    pub fn update(&mut self, input: &InputSnapshot, audio: &mut dyn AudioSink) {
        if self.status() != Status::Playing {
            return;
        }
        self.tick += 1;

        if input.attack && self.player.attack() {
            audio.play(Cue::SwordSwing);
        }
        let old = self.player.position();
        self.player.update(input);

        let transition = match self.zone {
            Zone::Overworld(coord) => self.update_overworld(coord, old, audio),
            Zone::Cave(kind) => self.update_cave(kind, audio),
            Zone::Dungeon(coord) => self.update_dungeon(coord, old, audio),
        };
        if let Some(transition) = transition {
            self.apply_transition(transition, audio);
        }

        match self.status() {
            Status::GameOver => log::info!("game over after {} ticks", self.tick),
            Status::Won => log::info!("triforce recovered after {} ticks", self.tick),
            Status::Playing => {}
        }
    }

    fn update_overworld(&mut self, coord: RoomCoord, old: Vec2, audio: &mut dyn AudioSink) -> Option<Transition> {
        let loot = LootRules {
            table: &self.config.loot,
            lifetime: self.config.drop_lifetime,
        };
        let room = self.overworld.room_mut(coord)?;
        room.update(self.player.center(), &mut self.rng, audio);

        let obstacles = room.obstacle_rects();
        if let Some(block) = room.block.as_mut() {
            interact::try_push_block(&self.player, block, &obstacles);
        }
        if room.uncover_stairs() {
            audio.play(Cue::Secret);
        }
        let blockers = room.blocking_rects();
        rollback_player(&mut self.player, old, &blockers, &room.enemies);

        combat::resolve_sword_hits(&self.player, &mut room.enemies, &mut room.drops, &loot, &mut self.rng);
        combat::cull_arrows(&mut room.enemies, &blockers);
        combat::resolve_contact_damage(&mut self.player, &mut room.enemies, audio);
        combat::resolve_projectile_hits(&mut self.player, &mut room.enemies, audio);

        let mut ctx = InteractContext::new(&mut self.player, audio);
        interact::collect_drops(&mut ctx, &mut room.drops);

        let rect = self.player.rect();
        if let Some(cave) = room.cave.as_ref().filter(|cave| overlaps(&rect, &cave.rect)) {
            return Some(Transition::EnterCave(cave.kind));
        }
        if room
            .stairs
            .as_ref()
            .is_some_and(|stairs| stairs.can_enter() && overlaps(&rect, &stairs.rect))
        {
            return Some(Transition::EnterDungeon);
        }

        let exits = room.exits;
        let reachable = Direction::ALL.map(|dir| self.overworld.contains(coord.step(dir)));
        self.hold_inside(exits, EXIT_SIZE, reachable).map(Transition::Room)
    }

    fn update_cave(&mut self, kind: CaveKind, audio: &mut dyn AudioSink) -> Option<Transition> {
        let cave = self.caves.get_mut(kind);
        cave.update();
        let mut ctx = InteractContext::new(&mut self.player, audio);
        cave.try_take(&mut ctx);

        if overlaps(&self.player.rect(), &CaveRoom::exit_rect()) {
            return Some(Transition::LeaveCave(kind));
        }
        let exits = Exits::with_open(&[Direction::Down]);
        self.hold_inside(exits, CAVE_EXIT_SIZE, [true; 4])
            .map(|_| Transition::LeaveCave(kind))
    }

    fn update_dungeon(&mut self, coord: RoomCoord, old: Vec2, audio: &mut dyn AudioSink) -> Option<Transition> {
        let loot = LootRules {
            table: &self.config.loot,
            lifetime: self.config.drop_lifetime,
        };
        let room = self.dungeon.room_mut(coord)?;
        room.update(self.player.center(), &mut self.rng, audio);

        if let Some(block) = room.block.as_mut() {
            interact::try_push_block(&self.player, block, &room.barriers);
        }
        let blockers = room.blocking_rects();
        rollback_player(&mut self.player, old, &blockers, &room.enemies);

        let report = combat::resolve_sword_hits(&self.player, &mut room.enemies, &mut room.drops, &loot, &mut self.rng);
        if report.boss_defeated {
            room.release_block(audio);
        }
        combat::cull_arrows(&mut room.enemies, &blockers);
        combat::resolve_contact_damage(&mut self.player, &mut room.enemies, audio);
        combat::resolve_projectile_hits(&mut self.player, &mut room.enemies, audio);
        room.check_reveals(audio);

        let mut ctx = InteractContext::new(&mut self.player, audio);
        interact::collect_drops(&mut ctx, &mut room.drops);
        for pickup in room.pickups.iter_mut() {
            if interact::apply_pickup(&mut ctx, pickup) == Some(PickupKind::Triforce) {
                self.won = true;
            }
        }
        interact::try_unlock_door(&mut ctx, &mut room.exits);

        if coord == Dungeon::START && overlaps(&self.player.rect(), &dungeon_exit_rect()) {
            return Some(Transition::LeaveDungeon);
        }
        let exits = room.exits;
        let reachable = Direction::ALL.map(|dir| self.dungeon.contains(coord.step(dir)));
        self.hold_inside(exits, EXIT_SIZE, reachable).map(Transition::Room)
    }

    /// Clamps the player to the current room. A crossing only counts when the
    /// side is `reachable` (indexed by `Direction::index`); otherwise it is a wall.
    fn hold_inside(&mut self, exits: Exits, gap: f32, reachable: [bool; 4]) -> Option<Direction> {
        let size = self.player.body.size;
        let check = clamp_to_room(self.player.position(), size, &exits, gap);
        self.player.body.pos = check.pos;
        match check.crossing {
            Some(dir) if reachable[dir.index()] => Some(dir),
            Some(dir) => {
                let mut walled = exits;
                walled.lock(dir);
                self.player.body.pos = clamp_to_room(check.pos, size, &walled, gap).pos;
                None
            }
            None => None,
        }
    }

    fn apply_transition(&mut self, transition: Transition, audio: &mut dyn AudioSink) {
        let size = self.player.body.size;
        match (transition, self.zone) {
            (Transition::Room(dir), Zone::Overworld(coord)) => {
                let next = coord.step(dir);
                self.player.body.pos = arrival_position(self.player.position(), size, dir);
                if let Some(room) = self.overworld.room_mut(next) {
                    room.on_player_enter(&mut self.rng);
                }
                self.zone = Zone::Overworld(next);
                log::info!("overworld room ({}, {})", next.x, next.y);
            }
            (Transition::Room(dir), Zone::Dungeon(coord)) => {
                let next = coord.step(dir);
                self.player.body.pos = arrival_position(self.player.position(), size, dir);
                if let Some(room) = self.dungeon.room_mut(next) {
                    room.visited = true;
                }
                self.zone = Zone::Dungeon(next);
                log::info!("dungeon room ({}, {})", next.x, next.y);
            }
            (Transition::EnterCave(kind), _) => {
                self.player.body.pos = CaveRoom::ENTRY_POS;
                self.zone = Zone::Cave(kind);
                log::info!("entered {kind:?} cave");
            }
            (Transition::LeaveCave(kind), _) => {
                let coord = self.overworld.cave_room(kind);
                let Some(room) = self.overworld.room_mut(coord) else {
                    return;
                };
                let preferred = room.cave.as_ref().map_or_else(room_center, |cave| cave.return_point);
                let center = find_safe_position(preferred, size, &room.blocking_rects());
                self.player.body.set_center(center);
                room.on_player_enter(&mut self.rng);
                self.zone = Zone::Overworld(coord);
                log::info!("left {kind:?} cave into room ({}, {})", coord.x, coord.y);
            }
            (Transition::EnterDungeon, _) => {
                self.player.body.pos = Dungeon::ENTRY_POS;
                if let Some(room) = self.dungeon.room_mut(Dungeon::START) {
                    room.visited = true;
                }
                self.zone = Zone::Dungeon(Dungeon::START);
                audio.switch_music(MusicTrack::Dungeon);
                log::info!("entered the dungeon");
            }
            (Transition::LeaveDungeon, _) => {
                let coord = self.overworld.stairs_room();
                let Some(room) = self.overworld.room_mut(coord) else {
                    return;
                };
                let center = match &room.stairs {
                    Some(stairs) => {
                        let block = room.block.as_ref().map(|block| block.rect);
                        let preferred = stairs_exit_point(&stairs.rect, block.as_ref(), size);
                        let mut blockers = room.blocking_rects();
                        blockers.push(stairs.rect);
                        find_safe_position(preferred, size, &blockers)
                    }
                    None => room_center(),
                };
                self.player.body.set_center(center);
                room.on_player_enter(&mut self.rng);
                self.zone = Zone::Overworld(coord);
                audio.switch_music(MusicTrack::Overworld);
                log::info!("left the dungeon into room ({}, {})", coord.x, coord.y);
            }
            (Transition::Room(_), Zone::Cave(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TILE_SIZE;
    use crate::helpers::{any_overlap, rect_center};
    use crate::sound::CueRecorder;

    fn game() -> GameState {
        GameState::with_rng(GameConfig::default(), GameRng::new(7))
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    fn holding(dir: Direction) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        match dir {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    fn quiet_overworld_room(game: &mut GameState, coord: RoomCoord) {
        let room = game.overworld.room_mut(coord).unwrap();
        room.enemies.clear();
        room.spawns.clear();
        room.obstacles.clear();
    }

    /// Runs until the zone changes or `limit` ticks pass.
    fn walk(game: &mut GameState, input: &InputSnapshot, audio: &mut CueRecorder, limit: usize) {
        let zone = game.zone;
        for _ in 0..limit {
            game.update(input, audio);
            if game.zone != zone {
                return;
            }
        }
    }

    #[test]
    fn new_game_starts_in_the_spawn_room() {
        let game = GameState::new(GameConfig::with_seed(7));
        assert_eq!(game.seed(), 7);
        assert_eq!(game.zone, Zone::Overworld(Overworld::SPAWN));
        assert_eq!(game.player.position(), player_start());
        assert_eq!(game.status(), Status::Playing);
        assert!(game.overworld.visited(Overworld::SPAWN));
    }

    #[test]
    fn walking_through_the_north_gap_changes_room() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        quiet_overworld_room(&mut game, Overworld::SPAWN);
        game.player.body.pos = vec2(380.0, 102.0);

        walk(&mut game, &holding(Direction::Up), &mut audio, 40);
        assert_eq!(game.zone, Zone::Overworld(RoomCoord::new(1, 0)));
        assert_eq!(game.player.position(), vec2(380.0, 580.0));
        assert!(game.overworld.visited(RoomCoord::new(1, 0)));
    }

    #[test]
    fn world_edge_is_a_wall() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        let corner = RoomCoord::new(0, 0);
        quiet_overworld_room(&mut game, corner);
        game.zone = Zone::Overworld(corner);
        game.player.body.pos = vec2(380.0, 110.0);

        walk(&mut game, &holding(Direction::Up), &mut audio, 40);
        assert_eq!(game.zone, Zone::Overworld(corner));
        assert_eq!(game.player.position().y, HUD_HEIGHT + WALL_THICKNESS);
    }

    #[test]
    fn sword_cave_round_trip() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        quiet_overworld_room(&mut game, Overworld::SPAWN);
        let entrance = game.overworld.room(Overworld::SPAWN).unwrap().cave.clone().unwrap();
        assert_eq!(entrance.kind, CaveKind::Sword);

        game.player.body.set_center(rect_center(&entrance.rect));
        game.update(&idle(), &mut audio);
        assert_eq!(game.zone, Zone::Cave(CaveKind::Sword));
        assert_eq!(game.player.position(), CaveRoom::ENTRY_POS);

        game.player.body.pos = game.caves.get(CaveKind::Sword).offer.rect.point();
        game.update(&idle(), &mut audio);
        assert!(game.player.inventory.has_sword);
        assert_eq!(audio.cues, vec![Cue::ItemGet]);

        game.player.body.pos = CaveRoom::ENTRY_POS;
        walk(&mut game, &holding(Direction::Down), &mut audio, 40);
        assert_eq!(game.zone, Zone::Overworld(Overworld::SPAWN));
        assert!(!overlaps(&game.player.rect(), &entrance.rect));
    }

    /// Moves the stairs-room block off the stairs as if it had been pushed,
    /// and parks the player on them.
    fn stand_on_uncovered_stairs(game: &mut GameState) {
        let coord = game.overworld.stairs_room();
        quiet_overworld_room(game, coord);
        game.zone = Zone::Overworld(coord);
        let room = game.overworld.room_mut(coord).unwrap();
        let stairs = room.stairs.as_ref().unwrap().rect;
        let block = room.block.as_mut().unwrap();
        block.rect.x = stairs.x + TILE_SIZE * 2.0;
        block.has_been_pushed = true;
        game.player.body.set_center(rect_center(&stairs));
    }

    #[test]
    fn stairs_open_after_the_reveal_delay() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        stand_on_uncovered_stairs(&mut game);
        let delay = game.config.stairs_reveal_delay as usize;

        for _ in 0..delay {
            game.update(&idle(), &mut audio);
        }
        assert!(matches!(game.zone, Zone::Overworld(_)));
        assert_eq!(audio.cues, vec![Cue::Secret]);

        game.update(&idle(), &mut audio);
        assert_eq!(game.zone, Zone::Dungeon(Dungeon::START));
        assert_eq!(game.player.position(), Dungeon::ENTRY_POS);
        assert_eq!(audio.music, vec![MusicTrack::Dungeon]);
    }

    #[test]
    fn leaving_the_dungeon_lands_beside_the_stairs() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        game.zone = Zone::Dungeon(Dungeon::START);
        game.player.body.pos = vec2(380.0, 575.0);

        walk(&mut game, &holding(Direction::Down), &mut audio, 20);
        let coord = game.overworld.stairs_room();
        assert_eq!(game.zone, Zone::Overworld(coord));
        assert_eq!(audio.music, vec![MusicTrack::Overworld]);

        let room = game.overworld.room(coord).unwrap();
        let rect = game.player.rect();
        assert!(!overlaps(&rect, &room.stairs.as_ref().unwrap().rect));
        assert!(!any_overlap(&rect, &room.blocking_rects()));
    }

    #[test]
    fn key_opens_the_crossroads_door() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        let crossroads = RoomCoord::new(0, 0);
        game.dungeon.room_mut(crossroads).unwrap().enemies.clear();
        game.zone = Zone::Dungeon(crossroads);
        game.player.body.pos = vec2(380.0, 110.0);

        walk(&mut game, &holding(Direction::Up), &mut audio, 30);
        assert_eq!(game.zone, Zone::Dungeon(crossroads));
        assert!(audio.cues.is_empty());

        game.player.inventory.has_key = true;
        game.update(&idle(), &mut audio);
        assert!(!game.player.inventory.has_key);
        assert!(!game.dungeon.room(crossroads).unwrap().exits.is_locked(Direction::Up));
        assert_eq!(audio.cues, vec![Cue::Secret]);

        walk(&mut game, &holding(Direction::Up), &mut audio, 30);
        assert_eq!(game.zone, Zone::Dungeon(RoomCoord::new(0, -1)));
    }

    #[test]
    fn killing_the_boss_frees_the_block() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        let lair = RoomCoord::new(0, -1);
        game.zone = Zone::Dungeon(lair);
        game.player.inventory.has_sword = true;
        game.player.body.pos = vec2(515.0, 160.0);
        game.player.facing = Direction::Right;
        game.dungeon.room_mut(lair).unwrap().enemies[0].health = 1;

        let mut input = idle();
        input.attack = true;
        game.update(&input, &mut audio);

        let room = game.dungeon.room(lair).unwrap();
        assert!(room.enemies.iter().all(|enemy| !enemy.alive));
        assert!(room.block.as_ref().unwrap().pushable);
        assert_eq!(audio.cues, vec![Cue::SwordSwing, Cue::BossRoar, Cue::Secret]);
    }

    #[test]
    fn triforce_wins_and_freezes_the_game() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        let lair = RoomCoord::new(0, -1);
        game.dungeon.room_mut(lair).unwrap().enemies.clear();
        game.zone = Zone::Dungeon(lair);
        game.player.body.pos = vec2(120.0, 140.0);

        game.update(&idle(), &mut audio);
        assert_eq!(game.status(), Status::Won);
        assert_eq!(audio.cues, vec![Cue::ItemGet]);

        let (pos, tick) = (game.player.position(), game.tick);
        game.update(&holding(Direction::Right), &mut audio);
        assert_eq!(game.player.position(), pos);
        assert_eq!(game.tick, tick);
    }

    #[test]
    fn dead_player_stops_the_simulation() {
        let mut game = game();
        let mut audio = CueRecorder::default();
        game.player.health = 1;
        assert!(game.player.take_damage(1));
        assert_eq!(game.status(), Status::GameOver);

        let pos = game.player.position();
        game.update(&holding(Direction::Left), &mut audio);
        assert_eq!(game.player.position(), pos);
        assert_eq!(game.tick, 0);
    }
}
