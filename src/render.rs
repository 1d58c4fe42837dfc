use macroquad::prelude::*;

use crate::cave::CaveRoom;
use crate::config::{CAVE_EXIT_SIZE, EXIT_SIZE, GAME_HEIGHT, GAME_WIDTH, HUD_HEIGHT, SCREEN_HEIGHT, WALL_THICKNESS};
use crate::dungeon::DungeonRoom;
use crate::entity::{Enemy, EnemyKind, Projectile, ProjectileKind, FIREBALL_RADIUS};
use crate::game::{GameState, Status, Zone};
use crate::helpers::{exit_gap_rect, rect_center, Direction, RoomCoord};
use crate::items::{DropKind, Pickup, PickupKind, TimedDrop};
use crate::props::{Fire, ObstacleKind, OldMan};
use crate::room::{Exits, Room};

const GRASS: Color = Color::new(0.99, 0.85, 0.66, 1.0);
const TREE_GREEN: Color = Color::new(0.0, 0.55, 0.2, 1.0);
const ROCK_BROWN: Color = Color::new(0.55, 0.35, 0.15, 1.0);
const WATER_BLUE: Color = Color::new(0.2, 0.45, 0.95, 1.0);
const DUNGEON_FLOOR: Color = Color::new(0.1, 0.3, 0.35, 1.0);
const DUNGEON_WALL: Color = Color::new(0.05, 0.15, 0.2, 1.0);
const FLOOR_TILE: Color = Color::new(0.15, 0.4, 0.45, 1.0);
const BARRIER: Color = Color::new(0.25, 0.5, 0.55, 1.0);
const DOOR: Color = Color::new(0.45, 0.3, 0.1, 1.0);
const BLOCK: Color = Color::new(0.6, 0.5, 0.35, 1.0);
const STAIRS: Color = Color::new(0.2, 0.2, 0.2, 1.0);
const CAVE_MOUTH: Color = BLACK;
const PLAYER_GREEN: Color = Color::new(0.3, 0.75, 0.2, 1.0);
const SWORD_STEEL: Color = Color::new(0.85, 0.85, 0.9, 1.0);
const FIRE_ORANGE: Color = Color::new(1.0, 0.45, 0.0, 1.0);
const OLD_MAN_RED: Color = Color::new(0.75, 0.15, 0.1, 1.0);
const HEART_RED: Color = Color::new(0.9, 0.1, 0.15, 1.0);
const HEART_EMPTY: Color = Color::new(0.35, 0.1, 0.1, 1.0);
const RUPEE_GREEN: Color = Color::new(0.1, 0.8, 0.3, 1.0);
const RUPEE_BLUE: Color = Color::new(0.2, 0.4, 1.0, 1.0);
const KEY_GOLD: Color = Color::new(1.0, 0.8, 0.1, 1.0);
const SHIELD_BLUE: Color = Color::new(0.3, 0.4, 0.8, 1.0);
const TRIFORCE_GOLD: Color = Color::new(1.0, 0.85, 0.2, 1.0);
const MAP_VISITED: Color = Color::new(0.5, 0.5, 0.5, 1.0);
const MAP_UNSEEN: Color = Color::new(0.15, 0.15, 0.15, 1.0);
const OVERLAY: Color = Color::new(0.0, 0.0, 0.0, 0.7);

const HEART_SIZE: f32 = 16.0;
const HEART_SPACING: f32 = 20.0;
const MAP_CELL: Vec2 = Vec2::new(16.0, 10.0);
const MAP_ORIGIN: Vec2 = Vec2::new(660.0, 8.0);
const TEXT_SIZE: f32 = 24.0;

/// Drawing primitives the game needs. Nothing drawn feeds back into the game.
pub trait RenderSink {
    fn rect(&mut self, rect: Rect, color: Color);
    fn rect_lines(&mut self, rect: Rect, thickness: f32, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Convex polygon, drawn as a fan from the first point.
    fn polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color);
}

pub struct MacroquadSink;

impl RenderSink for MacroquadSink {
    fn rect(&mut self, rect: Rect, color: Color) {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, color);
    }

    fn rect_lines(&mut self, rect: Rect, thickness: f32, color: Color) {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, color);
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        draw_circle(center.x, center.y, radius, color);
    }

    fn polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            draw_triangle(first, pair[0], pair[1], color);
        }
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color) {
        draw_text(text, pos.x, pos.y, size, color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HeartFill {
    Full,
    Half,
    Empty,
}

/// Heart `index` of a health bar counted in half hearts.
fn heart_fill(health: u32, index: u32) -> HeartFill {
    let full_at = (index + 1) * 2;
    if health >= full_at {
        HeartFill::Full
    } else if health + 1 == full_at {
        HeartFill::Half
    } else {
        HeartFill::Empty
    }
}

/// The solid parts of one wall. An open side is split around its gap.
fn wall_segments(side: Direction, exits: &Exits, gap: f32) -> Vec<Rect> {
    let full = match side {
        Direction::Up => Rect::new(0.0, HUD_HEIGHT, GAME_WIDTH, WALL_THICKNESS),
        Direction::Down => Rect::new(0.0, HUD_HEIGHT + GAME_HEIGHT - WALL_THICKNESS, GAME_WIDTH, WALL_THICKNESS),
        Direction::Left => Rect::new(0.0, HUD_HEIGHT, WALL_THICKNESS, GAME_HEIGHT),
        Direction::Right => Rect::new(GAME_WIDTH - WALL_THICKNESS, HUD_HEIGHT, WALL_THICKNESS, GAME_HEIGHT),
    };
    if !exits.is_open(side) {
        return vec![full];
    }
    let hole = exit_gap_rect(side, gap);
    if side.is_vertical() {
        vec![
            Rect::new(full.x, full.y, hole.x - full.x, full.h),
            Rect::new(hole.right(), full.y, full.right() - hole.right(), full.h),
        ]
    } else {
        vec![
            Rect::new(full.x, full.y, full.w, hole.y - full.y),
            Rect::new(full.x, hole.bottom(), full.w, full.bottom() - hole.bottom()),
        ]
    }
}

fn draw_walls(sink: &mut dyn RenderSink, exits: &Exits, gap: f32, color: Color) {
    for side in Direction::ALL {
        for segment in wall_segments(side, exits, gap) {
            sink.rect(segment, color);
        }
        if exits.is_locked(side) {
            sink.rect(exit_gap_rect(side, gap), DOOR);
        }
    }
}

fn draw_floor(sink: &mut dyn RenderSink, color: Color) {
    sink.rect(Rect::new(0.0, HUD_HEIGHT, GAME_WIDTH, GAME_HEIGHT), color);
}

fn diamond(center: Vec2, half: Vec2) -> [Vec2; 4] {
    [
        center + vec2(0.0, -half.y),
        center + vec2(half.x, 0.0),
        center + vec2(0.0, half.y),
        center + vec2(-half.x, 0.0),
    ]
}

fn draw_projectile(sink: &mut dyn RenderSink, projectile: &Projectile) {
    match projectile.kind {
        ProjectileKind::Arrow => sink.rect(projectile.rect(), SWORD_STEEL),
        ProjectileKind::Fireball => sink.circle(projectile.pos, FIREBALL_RADIUS, FIRE_ORANGE),
    }
}

fn draw_enemy(sink: &mut dyn RenderSink, enemy: &Enemy) {
    if !enemy.alive {
        return;
    }
    let rect = enemy.rect();
    match &enemy.kind {
        EnemyKind::Monster(_) => sink.rect(rect, RED),
        EnemyKind::Archer { .. } => sink.rect(rect, ORANGE),
        EnemyKind::Bat(_) => {
            let c = rect_center(&rect);
            sink.polygon(&[vec2(rect.x, rect.y), c, vec2(rect.x, rect.bottom())], DARKPURPLE);
            sink.polygon(&[vec2(rect.right(), rect.y), vec2(rect.right(), rect.bottom()), c], DARKPURPLE);
            sink.circle(c, rect.h * 0.3, DARKPURPLE);
        }
        EnemyKind::Slime { .. } => sink.circle(rect_center(&rect), rect.w * 0.5, LIME),
        EnemyKind::Boss { hit_flash, .. } => {
            let color = if *hit_flash > 0 { WHITE } else { DARKGREEN };
            sink.rect(rect, color);
            sink.rect_lines(rect, 3.0, BLACK);
        }
    }
    for projectile in enemy.projectiles() {
        draw_projectile(sink, projectile);
    }
}

fn draw_drop(sink: &mut dyn RenderSink, drop: &TimedDrop) {
    if !drop.is_visible() {
        return;
    }
    let center = rect_center(&drop.rect);
    match drop.kind {
        DropKind::Health => sink.rect(drop.rect, HEART_RED),
        DropKind::Rupee { value } => {
            let color = if value > 1 { RUPEE_BLUE } else { RUPEE_GREEN };
            sink.polygon(&diamond(center, drop.rect.size() * 0.5), color);
        }
    }
}

fn draw_pickup(sink: &mut dyn RenderSink, pickup: &Pickup) {
    if !pickup.is_available() {
        return;
    }
    let rect = pickup.rect;
    match pickup.kind {
        PickupKind::Sword => sink.rect(rect, SWORD_STEEL),
        PickupKind::Shield => sink.rect(rect, SHIELD_BLUE),
        PickupKind::HeartContainer => {
            sink.rect(rect, HEART_RED);
            sink.rect_lines(rect, 2.0, WHITE);
        }
        PickupKind::Key => sink.rect(rect, KEY_GOLD),
        PickupKind::Triforce => sink.polygon(
            &[
                vec2(rect.x + rect.w * 0.5, rect.y),
                vec2(rect.right(), rect.bottom()),
                vec2(rect.x, rect.bottom()),
            ],
            TRIFORCE_GOLD,
        ),
    }
}

fn draw_fire(sink: &mut dyn RenderSink, fire: &Fire) {
    let rect = fire.rect;
    let tip = if fire.is_tall() { rect.y } else { rect.y + rect.h * 0.3 };
    sink.polygon(
        &[
            vec2(rect.x + rect.w * 0.5, tip),
            vec2(rect.right(), rect.bottom()),
            vec2(rect.x, rect.bottom()),
        ],
        FIRE_ORANGE,
    );
}

fn draw_old_man(sink: &mut dyn RenderSink, old_man: &OldMan) {
    if !old_man.visible {
        return;
    }
    sink.rect(old_man.rect, OLD_MAN_RED);
    for (row, line) in old_man.lines.iter().filter(|line| !line.is_empty()).enumerate() {
        let width = line.len() as f32 * TEXT_SIZE * 0.45;
        let pos = vec2((GAME_WIDTH - width) * 0.5, old_man.rect.y - 50.0 + row as f32 * TEXT_SIZE);
        sink.text(line, pos, TEXT_SIZE, WHITE);
    }
}

fn draw_overworld_room(sink: &mut dyn RenderSink, room: &Room) {
    draw_floor(sink, GRASS);
    draw_walls(sink, &room.exits, EXIT_SIZE, TREE_GREEN);
    if let Some(cave) = &room.cave {
        sink.rect(cave.rect, CAVE_MOUTH);
    }
    if let Some(stairs) = room.stairs.as_ref().filter(|stairs| stairs.revealed) {
        sink.rect(stairs.rect, STAIRS);
    }
    for obstacle in &room.obstacles {
        match obstacle.kind {
            ObstacleKind::Rock => sink.rect(obstacle.rect, ROCK_BROWN),
            ObstacleKind::Water => sink.rect(obstacle.rect, WATER_BLUE),
            ObstacleKind::Tree => sink.circle(rect_center(&obstacle.rect), obstacle.rect.w * 0.5, TREE_GREEN),
        }
    }
    if let Some(block) = &room.block {
        sink.rect(block.rect, BLOCK);
    }
    for drop in &room.drops {
        draw_drop(sink, drop);
    }
    for enemy in &room.enemies {
        draw_enemy(sink, enemy);
    }
}

fn draw_cave(sink: &mut dyn RenderSink, cave: &CaveRoom) {
    draw_floor(sink, BLACK);
    draw_walls(sink, &Exits::with_open(&[Direction::Down]), CAVE_EXIT_SIZE, ROCK_BROWN);
    for fire in &cave.fires {
        draw_fire(sink, fire);
    }
    draw_old_man(sink, &cave.old_man);
    draw_pickup(sink, &cave.offer);
    if cave.price > 0 && cave.offer.is_available() {
        let pos = vec2(cave.offer.rect.x - 4.0, cave.offer.rect.bottom() + TEXT_SIZE);
        sink.text(&cave.price.to_string(), pos, TEXT_SIZE, WHITE);
    }
}

fn draw_dungeon_room(sink: &mut dyn RenderSink, room: &DungeonRoom) {
    draw_floor(sink, DUNGEON_FLOOR);
    draw_walls(sink, &room.exits, EXIT_SIZE, DUNGEON_WALL);
    for tile in &room.floor_tiles {
        sink.rect(*tile, FLOOR_TILE);
    }
    for fire in &room.fires {
        draw_fire(sink, fire);
    }
    for barrier in &room.barriers {
        sink.rect(*barrier, BARRIER);
    }
    if let Some(block) = &room.block {
        sink.rect(block.rect, BLOCK);
    }
    for pickup in &room.pickups {
        draw_pickup(sink, pickup);
    }
    for drop in &room.drops {
        draw_drop(sink, drop);
    }
    for enemy in &room.enemies {
        draw_enemy(sink, enemy);
    }
}

fn draw_player(sink: &mut dyn RenderSink, game: &GameState) {
    let player = &game.player;
    if !player.alive || player.is_blinking() {
        return;
    }
    sink.rect(player.rect(), PLAYER_GREEN);
    if player.attacking {
        sink.rect(player.attack_rect(), SWORD_STEEL);
    }
}

/// Lays rooms out on the minimap, `origin` being the top-left room coordinate.
fn draw_minimap(sink: &mut dyn RenderSink, rooms: &[(RoomCoord, bool)], origin: RoomCoord, current: Option<RoomCoord>) {
    for &(coord, visited) in rooms {
        let cell = Rect::new(
            MAP_ORIGIN.x + (coord.x - origin.x) as f32 * MAP_CELL.x,
            MAP_ORIGIN.y + (coord.y - origin.y) as f32 * MAP_CELL.y,
            MAP_CELL.x - 2.0,
            MAP_CELL.y - 2.0,
        );
        let color = if Some(coord) == current {
            PLAYER_GREEN
        } else if visited {
            MAP_VISITED
        } else {
            MAP_UNSEEN
        };
        sink.rect(cell, color);
    }
}

fn draw_hud(sink: &mut dyn RenderSink, game: &GameState) {
    let player = &game.player;
    sink.rect(Rect::new(0.0, 0.0, GAME_WIDTH, HUD_HEIGHT), BLACK);

    for index in 0..player.max_health / 2 {
        let rect = Rect::new(20.0 + index as f32 * HEART_SPACING, 12.0, HEART_SIZE, HEART_SIZE);
        match heart_fill(player.health, index) {
            HeartFill::Full => sink.rect(rect, HEART_RED),
            HeartFill::Half => {
                sink.rect(rect, HEART_EMPTY);
                sink.rect(Rect::new(rect.x, rect.y, rect.w * 0.5, rect.h), HEART_RED);
            }
            HeartFill::Empty => sink.rect(rect, HEART_EMPTY),
        }
    }

    let rupee = vec2(30.0, 45.0);
    sink.polygon(&diamond(rupee, vec2(6.0, 9.0)), RUPEE_GREEN);
    sink.text(&format!("x{}", player.inventory.rupees), rupee + vec2(12.0, 7.0), 22.0, WHITE);

    let slot = |i: f32| Rect::new(300.0 + i * 40.0, 15.0, 24.0, 30.0);
    if player.inventory.has_sword {
        sink.rect(Rect::new(slot(0.0).x + 9.0, 15.0, 6.0, 30.0), SWORD_STEEL);
    }
    if player.inventory.has_shield {
        sink.rect(slot(1.0), SHIELD_BLUE);
    }
    if player.inventory.has_key {
        sink.rect(Rect::new(slot(2.0).x + 4.0, 22.0, 16.0, 16.0), KEY_GOLD);
    }

    let current = match game.zone {
        Zone::Overworld(coord) => coord,
        Zone::Cave(kind) => game.overworld.cave_room(kind),
        Zone::Dungeon(coord) => {
            let rooms: Vec<_> = game
                .dungeon
                .rooms()
                .map(|room| (room.coord, game.dungeon.visited(room.coord)))
                .collect();
            draw_minimap(sink, &rooms, RoomCoord::new(-1, -1), Some(coord));
            return;
        }
    };
    let (width, height) = game.overworld.size();
    let rooms: Vec<_> = (0..height)
        .flat_map(|y| (0..width).map(move |x| RoomCoord::new(x, y)))
        .map(|coord| (coord, game.overworld.visited(coord)))
        .collect();
    draw_minimap(sink, &rooms, RoomCoord::new(0, 0), Some(current));
}

fn draw_overlay(sink: &mut dyn RenderSink, title: &str, color: Color) {
    sink.rect(Rect::new(0.0, 0.0, GAME_WIDTH, SCREEN_HEIGHT), OVERLAY);
    let width = title.len() as f32 * 48.0 * 0.45;
    sink.text(title, vec2((GAME_WIDTH - width) * 0.5, SCREEN_HEIGHT * 0.5), 48.0, color);
    sink.text("press escape to quit", vec2(300.0, SCREEN_HEIGHT * 0.5 + 40.0), TEXT_SIZE, GRAY);
}

/// Draws one frame: the active room, the player, the HUD and any end overlay.
pub fn draw_game(game: &GameState, sink: &mut dyn RenderSink) {
    match game.zone {
        Zone::Overworld(coord) => {
            if let Some(room) = game.overworld.room(coord) {
                draw_overworld_room(sink, room);
            }
        }
        Zone::Cave(kind) => draw_cave(sink, game.caves.get(kind)),
        Zone::Dungeon(coord) => {
            if let Some(room) = game.dungeon.room(coord) {
                draw_dungeon_room(sink, room);
            }
        }
    }
    draw_player(sink, game);
    draw_hud(sink, game);

    match game.status() {
        Status::GameOver => draw_overlay(sink, "GAME OVER", HEART_RED),
        Status::Won => draw_overlay(sink, "YOU FOUND THE TRIFORCE!", TRIFORCE_GOLD),
        Status::Playing => {}
    }
}
