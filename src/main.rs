use macroquad::prelude::*;

mod cave;
mod collision;
mod combat;
mod config;
mod dungeon;
mod entity;
mod error;
mod game;
mod helpers;
mod input;
mod interact;
mod items;
mod movement;
mod player;
mod props;
mod render;
mod rng;
mod room;
mod sound;
mod transition;

use config::{GameConfig, SCREEN_HEIGHT, SCREEN_WIDTH, TICKS_PER_SECOND};
use game::GameState;
use input::InputSnapshot;
use render::{draw_game, MacroquadSink};
use sound::{AudioSink, MusicTrack, SoundSystem};

const CONFIG_PATH: &str = "config.yaml";
const TICK: f32 = 1.0 / TICKS_PER_SECOND as f32;
const MAX_BACKLOG: f32 = TICK * 4.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Triquest".to_owned(),
        window_width: SCREEN_WIDTH as i32,
        window_height: SCREEN_HEIGHT as i32,
        window_resizable: false,
        sample_count: 1,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load_or_default(CONFIG_PATH);
    let mut sounds = SoundSystem::load_from(&config.audio).await.unwrap_or_else(|err| {
        log::warn!("audio disabled: {err}");
        SoundSystem::empty()
    });
    sounds.switch_music(MusicTrack::Overworld);

    let mut game = GameState::new(config);

    let mut sink = MacroquadSink;
    let mut backlog = 0.0;
    let mut pending_attack = false;

    loop {
        let input = InputSnapshot::poll();
        if input.quit {
            break;
        }
        if input.mute {
            sounds.toggle_mute();
            log::info!("audio {}", if sounds.is_muted() { "muted" } else { "unmuted" });
        }

        // Presses between ticks are held until the next tick sees them.
        pending_attack |= input.attack;
        backlog = (backlog + get_frame_time()).min(MAX_BACKLOG);
        if backlog >= TICK {
            backlog -= TICK;
            let input = InputSnapshot {
                attack: pending_attack,
                ..input
            };
            pending_attack = false;
            game.update(&input, &mut sounds);
        }

        clear_background(BLACK);
        draw_game(&game, &mut sink);
        next_frame().await;
    }

    log::info!("quit after {} ticks of seed {}", game.tick, game.seed());
}
