use macroquad::prelude::*;

use crate::helpers::{in_playfield, rect_centered, Body};
use crate::movement::{Erratic, Patrol, Wander};
use crate::rng::GameRng;
use crate::sound::{AudioSink, Cue};

pub const CONTACT_COOLDOWN: u32 = 60;
pub const CONTACT_DAMAGE: u32 = 1;

const MONSTER_SIZE: Vec2 = Vec2::new(30.0, 30.0);
const MONSTER_SPEED: f32 = 1.5;
const MONSTER_HEALTH: i32 = 2;
const WANDER_INTERVAL: (u32, u32) = (60, 180);

const ARCHER_SPEED: f32 = 1.0;
const ARCHER_HEALTH: i32 = 2;
const ARCHER_SHOOT_COOLDOWN: u32 = 120;

const BAT_SIZE: Vec2 = Vec2::new(25.0, 20.0);
const BAT_SPEED: f32 = 2.0;
const BAT_INTERVAL: (u32, u32) = (30, 60);

const LARGE_SLIME_SIZE: Vec2 = Vec2::new(40.0, 35.0);
pub const SMALL_SLIME_SIZE: Vec2 = Vec2::new(20.0, 18.0);
const LARGE_SLIME_SPEED: f32 = 0.8;
const SMALL_SLIME_SPEED: f32 = 1.2;
const SLIME_INTERVAL: (u32, u32) = (60, 120);

const BOSS_SIZE: Vec2 = Vec2::new(60.0, 70.0);
const BOSS_HEALTH: i32 = 3;
const BOSS_SPEED: f32 = 1.0;
const BOSS_PATROL_RANGE: f32 = 150.0;
const BOSS_SHOOT_COOLDOWN: u32 = 180;
const BOSS_HIT_COOLDOWN: u32 = 30;
const BOSS_HIT_FLASH: u32 = 15;

const ARROW_SPEED: f32 = 4.0;
const ARROW_SIZE: Vec2 = Vec2::new(12.0, 4.0);
const ARROW_DAMAGE: u32 = 1;
const FIREBALL_SPEED: f32 = 3.0;
pub const FIREBALL_RADIUS: f32 = 8.0;
const FIREBALL_DAMAGE: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Arrow,
    Fireball,
}

/// Position is the projectile's center.
#[derive(Clone, Debug)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    /// Aims from `origin` at `target`. A zero-length aim fires straight down.
    pub fn aimed(kind: ProjectileKind, origin: Vec2, target: Vec2) -> Self {
        let speed = match kind {
            ProjectileKind::Arrow => ARROW_SPEED,
            ProjectileKind::Fireball => FIREBALL_SPEED,
        };
        let dir = (target - origin).try_normalize().unwrap_or(vec2(0.0, 1.0));
        Self {
            kind,
            pos: origin,
            vel: dir * speed,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    pub fn rect(&self) -> Rect {
        match self.kind {
            ProjectileKind::Arrow => rect_centered(self.pos, ARROW_SIZE),
            ProjectileKind::Fireball => rect_centered(self.pos, Vec2::splat(FIREBALL_RADIUS * 2.0)),
        }
    }

    pub fn damage(&self) -> u32 {
        match self.kind {
            ProjectileKind::Arrow => ARROW_DAMAGE,
            ProjectileKind::Fireball => FIREBALL_DAMAGE,
        }
    }

    pub fn in_bounds(&self) -> bool {
        in_playfield(self.pos)
    }
}

#[derive(Clone, Debug)]
pub enum EnemyKind {
    Monster(Wander),
    Archer {
        wander: Wander,
        arrows: Vec<Projectile>,
        shoot_cooldown: u32,
    },
    Bat(Erratic),
    Slime {
        erratic: Erratic,
        is_large: bool,
        has_split: bool,
    },
    Boss {
        patrol: Patrol,
        fireballs: Vec<Projectile>,
        shoot_cooldown: u32,
        hit_cooldown: u32,
        hit_flash: u32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// The hit landed during the boss's hit cooldown.
    Ignored,
    Wounded,
    Killed,
    /// A large slime died and wants two small slimes in its place.
    Split,
}

pub struct EnemyContext<'a> {
    pub blockers: &'a [Rect],
    pub target: Vec2,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub health: i32,
    pub alive: bool,
    pub contact_cooldown: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    fn with_kind(pos: Vec2, size: Vec2, health: i32, kind: EnemyKind) -> Self {
        Self {
            body: Body::new(pos, size),
            health,
            alive: true,
            contact_cooldown: 0,
            kind,
        }
    }

    pub fn monster(pos: Vec2, rng: &mut GameRng) -> Self {
        let wander = Wander::new(MONSTER_SPEED, WANDER_INTERVAL, rng);
        Self::with_kind(pos, MONSTER_SIZE, MONSTER_HEALTH, EnemyKind::Monster(wander))
    }

    pub fn archer(pos: Vec2, rng: &mut GameRng) -> Self {
        let wander = Wander::new(ARCHER_SPEED, WANDER_INTERVAL, rng);
        Self::with_kind(
            pos,
            MONSTER_SIZE,
            ARCHER_HEALTH,
            EnemyKind::Archer {
                wander,
                arrows: Vec::new(),
                shoot_cooldown: ARCHER_SHOOT_COOLDOWN,
            },
        )
    }

    pub fn bat(pos: Vec2, rng: &mut GameRng) -> Self {
        let (x, y) = rng.diagonal_heading();
        let erratic = Erratic::new(vec2(x, y), BAT_SPEED, BAT_INTERVAL, rng);
        Self::with_kind(pos, BAT_SIZE, 1, EnemyKind::Bat(erratic))
    }

    pub fn slime(pos: Vec2, is_large: bool, rng: &mut GameRng) -> Self {
        let (size, speed) = if is_large {
            (LARGE_SLIME_SIZE, LARGE_SLIME_SPEED)
        } else {
            (SMALL_SLIME_SIZE, SMALL_SLIME_SPEED)
        };
        let (x, y) = rng.erratic_heading();
        let erratic = Erratic::new(vec2(x, y), speed, SLIME_INTERVAL, rng);
        Self::with_kind(
            pos,
            size,
            1,
            EnemyKind::Slime {
                erratic,
                is_large,
                has_split: false,
            },
        )
    }

    pub fn boss(pos: Vec2) -> Self {
        Self::with_kind(
            pos,
            BOSS_SIZE,
            BOSS_HEALTH,
            EnemyKind::Boss {
                patrol: Patrol::new(pos.x, BOSS_PATROL_RANGE, BOSS_SPEED),
                fireballs: Vec::new(),
                shoot_cooldown: 0,
                hit_cooldown: 0,
                hit_flash: 0,
            },
        )
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_bat(&self) -> bool {
        matches!(self.kind, EnemyKind::Bat(_))
    }

    pub fn is_slime(&self) -> bool {
        matches!(self.kind, EnemyKind::Slime { .. })
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            EnemyKind::Monster(_) => "monster",
            EnemyKind::Archer { .. } => "archer",
            EnemyKind::Bat(_) => "bat",
            EnemyKind::Slime { is_large: true, .. } => "large slime",
            EnemyKind::Slime { .. } => "small slime",
            EnemyKind::Boss { .. } => "boss",
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        match &self.kind {
            EnemyKind::Archer { arrows, .. } => arrows,
            EnemyKind::Boss { fireballs, .. } => fireballs,
            _ => &[],
        }
    }

    pub fn projectiles_mut(&mut self) -> Option<&mut Vec<Projectile>> {
        match &mut self.kind {
            EnemyKind::Archer { arrows, .. } => Some(arrows),
            EnemyKind::Boss { fireballs, .. } => Some(fireballs),
            _ => None,
        }
    }

    pub fn update(&mut self, ctx: &EnemyContext<'_>, rng: &mut GameRng, audio: &mut dyn AudioSink) {
        if !self.alive {
            return;
        }
        self.contact_cooldown = self.contact_cooldown.saturating_sub(1);

        let body = &mut self.body;
        match &mut self.kind {
            EnemyKind::Monster(wander) => {
                wander.step(body, ctx.blockers, rng);
            }
            EnemyKind::Archer {
                wander,
                arrows,
                shoot_cooldown,
            } => {
                wander.step(body, ctx.blockers, rng);
                if *shoot_cooldown > 0 {
                    *shoot_cooldown -= 1;
                } else {
                    arrows.push(Projectile::aimed(ProjectileKind::Arrow, body.center(), ctx.target));
                    *shoot_cooldown = ARCHER_SHOOT_COOLDOWN;
                }
                advance_projectiles(arrows);
            }
            EnemyKind::Bat(erratic) => {
                // Bats fly over obstacles.
                erratic.step(body, &[], rng);
            }
            EnemyKind::Slime { erratic, .. } => {
                erratic.step(body, ctx.blockers, rng);
            }
            EnemyKind::Boss {
                patrol,
                fireballs,
                shoot_cooldown,
                hit_cooldown,
                hit_flash,
            } => {
                *hit_cooldown = hit_cooldown.saturating_sub(1);
                *hit_flash = hit_flash.saturating_sub(1);
                patrol.step(body);
                if *shoot_cooldown > 0 {
                    *shoot_cooldown -= 1;
                } else {
                    fireballs.push(Projectile::aimed(ProjectileKind::Fireball, body.center(), ctx.target));
                    *shoot_cooldown = BOSS_SHOOT_COOLDOWN;
                    audio.play(Cue::BossRoar);
                }
                advance_projectiles(fireballs);
            }
        }
    }

    /// Applies one sword hit.
    pub fn take_hit(&mut self) -> HitOutcome {
        if !self.alive {
            return HitOutcome::Ignored;
        }
        if let EnemyKind::Boss {
            hit_cooldown,
            hit_flash,
            ..
        } = &mut self.kind
        {
            if *hit_cooldown > 0 {
                return HitOutcome::Ignored;
            }
            *hit_cooldown = BOSS_HIT_COOLDOWN;
            *hit_flash = BOSS_HIT_FLASH;
        }

        self.health -= 1;
        if self.health > 0 {
            return HitOutcome::Wounded;
        }

        self.health = 0;
        self.alive = false;
        if let Some(projectiles) = self.projectiles_mut() {
            projectiles.clear();
        }
        match &mut self.kind {
            EnemyKind::Slime {
                is_large: true,
                has_split,
                ..
            } if !*has_split => {
                *has_split = true;
                HitOutcome::Split
            }
            _ => HitOutcome::Killed,
        }
    }
}

fn advance_projectiles(projectiles: &mut Vec<Projectile>) {
    for projectile in projectiles.iter_mut() {
        projectile.update();
    }
    projectiles.retain(Projectile::in_bounds);
}
