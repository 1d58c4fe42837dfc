use macroquad::prelude::*;

use crate::entity::{Enemy, HitOutcome, ProjectileKind, CONTACT_COOLDOWN, CONTACT_DAMAGE, SMALL_SLIME_SIZE};
use crate::helpers::{all_overlapping, any_overlap, overlaps, within_walls, Direction};
use crate::items::{LootTable, TimedDrop};
use crate::player::Player;
use crate::rng::GameRng;
use crate::sound::{AudioSink, Cue};

const SPLIT_OFFSETS: [[Vec2; 2]; 4] = [
    [Vec2::new(-40.0, 0.0), Vec2::new(40.0, 0.0)],
    [Vec2::new(0.0, -40.0), Vec2::new(0.0, 40.0)],
    [Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0)],
    [Vec2::new(-30.0, 30.0), Vec2::new(30.0, -30.0)],
];
const SPLIT_FALLBACK: [Vec2; 2] = [Vec2::new(-50.0, 0.0), Vec2::new(50.0, 0.0)];
const DROP_HALF: Vec2 = Vec2::new(8.0, 8.0);

/// Drop settings for whichever room the fight happens in.
pub struct LootRules<'a> {
    pub table: &'a LootTable,
    pub lifetime: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwordReport {
    pub kills: u32,
    pub splits: u32,
    pub boss_defeated: bool,
}

/// Applies the active sword box to every live enemy it touches. Large slimes
/// are replaced by two small ones and never drop loot.
pub fn resolve_sword_hits(
    player: &Player,
    enemies: &mut Vec<Enemy>,
    drops: &mut Vec<TimedDrop>,
    loot: &LootRules<'_>,
    rng: &mut GameRng,
) -> SwordReport {
    let mut report = SwordReport::default();
    if !player.attacking {
        return report;
    }

    let sword = player.attack_rect();
    let player_rect = player.rect();
    let mut spawned = Vec::new();

    for index in all_overlapping(&sword, enemies.iter().map(Enemy::rect)) {
        let enemy = &mut enemies[index];
        match enemy.take_hit() {
            HitOutcome::Ignored | HitOutcome::Wounded => {}
            HitOutcome::Killed => {
                report.kills += 1;
                log::debug!("{} killed", enemy.name());
                if enemy.is_boss() {
                    report.boss_defeated = true;
                    log::info!("boss defeated");
                }
                roll_loot(enemy.body.center() - DROP_HALF, drops, loot, rng);
            }
            HitOutcome::Split => {
                report.splits += 1;
                let [a, b] = find_split_positions(enemy.body.pos, &player_rect);
                spawned.push(Enemy::slime(a, false, rng));
                spawned.push(Enemy::slime(b, false, rng));
            }
        }
    }

    enemies.extend(spawned);
    report
}

fn roll_loot(pos: Vec2, drops: &mut Vec<TimedDrop>, loot: &LootRules<'_>, rng: &mut GameRng) {
    if let Some(kind) = loot.table.outcome(rng.percentile()) {
        drops.push(TimedDrop::new(kind, pos, loot.lifetime));
    }
}

/// First offset pair whose small-slime boxes both stay inside the walls and
/// clear of the player.
pub fn find_split_positions(origin: Vec2, player_rect: &Rect) -> [Vec2; 2] {
    let fits = |pos: Vec2| {
        let rect = Rect::new(pos.x, pos.y, SMALL_SLIME_SIZE.x, SMALL_SLIME_SIZE.y);
        within_walls(&rect) && !overlaps(&rect, player_rect)
    };
    SPLIT_OFFSETS
        .iter()
        .map(|[a, b]| [origin + *a, origin + *b])
        .find(|[a, b]| fits(*a) && fits(*b))
        .unwrap_or([origin + SPLIT_FALLBACK[0], origin + SPLIT_FALLBACK[1]])
}

/// Body contact. Each enemy only bites again once its own cooldown runs out.
pub fn resolve_contact_damage(player: &mut Player, enemies: &mut [Enemy], audio: &mut dyn AudioSink) -> bool {
    let player_rect = player.rect();
    let mut hurt = false;
    for enemy in enemies.iter_mut() {
        if !enemy.alive || enemy.contact_cooldown > 0 || !overlaps(&player_rect, &enemy.rect()) {
            continue;
        }
        enemy.contact_cooldown = CONTACT_COOLDOWN;
        if player.take_damage(CONTACT_DAMAGE) {
            audio.play(Cue::Hurt);
            hurt = true;
        }
    }
    hurt
}

/// Arrows and fireballs touching the player are consumed. A shield stops an
/// arrow flying straight at the way the player faces.
pub fn resolve_projectile_hits(player: &mut Player, enemies: &mut [Enemy], audio: &mut dyn AudioSink) {
    let player_rect = player.rect();
    for enemy in enemies.iter_mut() {
        let Some(projectiles) = enemy.projectiles_mut() else {
            continue;
        };
        projectiles.retain(|projectile| {
            if !overlaps(&projectile.rect(), &player_rect) {
                return true;
            }
            let shielded = projectile.kind == ProjectileKind::Arrow
                && player.inventory.has_shield
                && player.facing == Direction::dominant(projectile.vel).opposite();
            if shielded {
                audio.play(Cue::ShieldBlock);
            } else if player.take_damage(projectile.damage()) {
                audio.play(Cue::Hurt);
            }
            false
        });
    }
}

pub fn cull_arrows(enemies: &mut [Enemy], blockers: &[Rect]) {
    for enemy in enemies.iter_mut() {
        if let Some(projectiles) = enemy.projectiles_mut() {
            projectiles.retain(|p| p.kind != ProjectileKind::Arrow || !any_overlap(&p.rect(), blockers));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::entity::{EnemyContext, EnemyKind, Projectile};
    use crate::sound::CueRecorder;

    fn rules(table: &LootTable) -> LootRules<'_> {
        LootRules { table, lifetime: 240 }
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(pos, &GameConfig::default())
    }

    fn archer_with_arrow(rng: &mut GameRng, arrow: Projectile) -> Enemy {
        let mut archer = Enemy::archer(vec2(100.0, 500.0), rng);
        if let EnemyKind::Archer { arrows, .. } = &mut archer.kind {
            arrows.push(arrow);
        }
        archer
    }

    #[test]
    fn shield_blocks_arrow_flying_into_facing() {
        let mut rng = GameRng::new(5);
        let mut audio = CueRecorder::default();
        let mut player = player_at(vec2(300.0, 300.0));
        player.facing = Direction::Left;
        player.inventory.has_shield = true;
        let arrow = Projectile {
            kind: ProjectileKind::Arrow,
            pos: vec2(305.0, 320.0),
            vel: vec2(1.0, 0.0),
        };
        let mut enemies = vec![archer_with_arrow(&mut rng, arrow)];

        resolve_projectile_hits(&mut player, &mut enemies, &mut audio);
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.invincible_timer, 0);
        assert!(enemies[0].projectiles().is_empty());
        assert_eq!(audio.cues, vec![Cue::ShieldBlock]);
    }

    #[test]
    fn shield_facing_wrong_way_still_hurts() {
        let mut rng = GameRng::new(5);
        let mut audio = CueRecorder::default();
        let mut player = player_at(vec2(300.0, 300.0));
        player.facing = Direction::Right;
        player.inventory.has_shield = true;
        let arrow = Projectile {
            kind: ProjectileKind::Arrow,
            pos: vec2(305.0, 320.0),
            vel: vec2(4.0, 0.0),
        };
        let mut enemies = vec![archer_with_arrow(&mut rng, arrow)];

        resolve_projectile_hits(&mut player, &mut enemies, &mut audio);
        assert_eq!(player.health, player.max_health - 1);
        assert!(enemies[0].projectiles().is_empty());
    }

    #[test]
    fn overlapping_monster_bites_once_per_cooldown() {
        let mut rng = GameRng::new(8);
        let mut audio = CueRecorder::default();
        let mut player = player_at(vec2(300.0, 300.0));
        let spot = vec2(310.0, 310.0);
        let mut enemies = vec![Enemy::monster(spot, &mut rng)];
        let ctx = EnemyContext {
            blockers: &[],
            target: player.center(),
        };

        let mut bites = Vec::new();
        for tick in 0..=CONTACT_COOLDOWN {
            enemies[0].update(&ctx, &mut rng, &mut audio);
            // Pin the monster and keep the player vulnerable so only the
            // enemy cooldown gates.
            enemies[0].body.pos = spot;
            player.invincible_timer = 0;
            if resolve_contact_damage(&mut player, &mut enemies, &mut audio) {
                bites.push(tick);
            }
        }
        assert_eq!(bites, vec![0, CONTACT_COOLDOWN]);
        assert_eq!(player.health, player.max_health - 2);
    }

    #[test]
    fn large_slime_split_conserves_and_drops_nothing() {
        let mut rng = GameRng::new(13);
        let table = LootTable::default();
        let mut player = player_at(vec2(300.0, 300.0));
        player.inventory.has_sword = true;
        player.facing = Direction::Right;
        assert!(player.attack());

        let mut enemies = vec![Enemy::slime(vec2(345.0, 305.0), true, &mut rng)];
        let mut drops = Vec::new();
        let report = resolve_sword_hits(&player, &mut enemies, &mut drops, &rules(&table), &mut rng);

        assert_eq!(report.splits, 1);
        assert!(drops.is_empty());
        assert!(!enemies[0].alive);
        let small: Vec<_> = enemies.iter().filter(|e| e.alive).collect();
        assert_eq!(small.len(), 2);
        for slime in small {
            assert_eq!(slime.health, 1);
            assert!(matches!(slime.kind, EnemyKind::Slime { is_large: false, .. }));
        }
    }

    #[test]
    fn small_slime_death_drops_at_most_once() {
        let mut rng = GameRng::new(13);
        let table = LootTable::default();
        let mut player = player_at(vec2(300.0, 300.0));
        player.inventory.has_sword = true;
        player.facing = Direction::Right;
        assert!(player.attack());

        let mut enemies = vec![Enemy::slime(vec2(345.0, 310.0), false, &mut rng)];
        let mut drops = Vec::new();
        let report = resolve_sword_hits(&player, &mut enemies, &mut drops, &rules(&table), &mut rng);
        assert_eq!(report.kills, 1);
        assert_eq!(report.splits, 0);
        assert!(drops.len() <= 1);
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn split_avoids_player_side() {
        // The horizontal pair would put a slime on the player.
        let player_rect = Rect::new(300.0, 300.0, 40.0, 40.0);
        let [a, b] = find_split_positions(vec2(345.0, 305.0), &player_rect);
        assert_eq!([a, b], [vec2(345.0, 265.0), vec2(345.0, 345.0)]);

        // Pinned in a corner with the player next to it: fixed fallback.
        let cornered = Rect::new(40.0, 100.0, 100.0, 100.0);
        let [a, b] = find_split_positions(vec2(45.0, 105.0), &cornered);
        assert_eq!([a, b], [vec2(-5.0, 105.0), vec2(95.0, 105.0)]);
    }

    #[test]
    fn arrows_stop_at_obstacles_fireballs_do_not() {
        let mut rng = GameRng::new(1);
        let arrow = Projectile {
            kind: ProjectileKind::Arrow,
            pos: vec2(210.0, 210.0),
            vel: vec2(4.0, 0.0),
        };
        let mut enemies = vec![archer_with_arrow(&mut rng, arrow), Enemy::boss(vec2(560.0, 150.0))];
        if let Some(fireballs) = enemies[1].projectiles_mut() {
            fireballs.push(Projectile {
                kind: ProjectileKind::Fireball,
                pos: vec2(220.0, 220.0),
                vel: vec2(0.0, 3.0),
            });
        }
        cull_arrows(&mut enemies, &[Rect::new(200.0, 200.0, 50.0, 50.0)]);
        assert!(enemies[0].projectiles().is_empty());
        assert_eq!(enemies[1].projectiles().len(), 1);
    }
}
