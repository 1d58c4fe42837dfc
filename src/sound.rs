use std::collections::HashMap;

use macroquad::audio::{load_sound, play_sound, set_sound_volume, stop_sound, PlaySoundParams, Sound};
use macroquad::file::load_string;
use serde::Deserialize;

use crate::config::AudioConfig;
use crate::error::AssetError;

const MANIFEST_NAME: &str = "sounds.yaml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    SwordSwing,
    Hurt,
    ItemGet,
    Secret,
    HeartPickup,
    RupeePickup,
    BossRoar,
    ShieldBlock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicTrack {
    Overworld,
    Dungeon,
}

/// Fire-and-forget audio hooks. Nothing played here feeds back into the game.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
    fn switch_music(&mut self, track: MusicTrack);
}

#[derive(Deserialize, Default)]
struct SoundManifest {
    #[serde(default)]
    cues: HashMap<Cue, String>,
    #[serde(default)]
    music: HashMap<MusicTrack, String>,
}

pub struct SoundSystem {
    effects: HashMap<Cue, Sound>,
    music: HashMap<MusicTrack, Sound>,
    current_music: Option<MusicTrack>,
    muted: bool,
    music_volume: f32,
    effects_volume: f32,
}

impl SoundSystem {
    pub fn empty() -> Self {
        Self {
            effects: HashMap::new(),
            music: HashMap::new(),
            current_music: None,
            muted: false,
            music_volume: 0.0,
            effects_volume: 0.0,
        }
    }

    /// Loads every sound listed in `<sound_dir>/sounds.yaml`. Only a missing
    /// or malformed manifest is an error; a broken file leaves its cue silent.
    pub async fn load_from(config: &AudioConfig) -> Result<Self, AssetError> {
        let manifest_path = format!("{}/{}", config.sound_dir, MANIFEST_NAME);
        let raw = load_string(&manifest_path)
            .await
            .map_err(|err| AssetError::Read {
                path: manifest_path.clone(),
                reason: format!("{err:?}"),
            })?;
        let manifest: SoundManifest = serde_yaml::from_str(&raw)?;

        let mut system = Self {
            muted: config.start_muted,
            music_volume: config.music_volume,
            effects_volume: config.effects_volume,
            ..Self::empty()
        };

        for (cue, file) in manifest.cues {
            if let Some(sound) = load_one(&config.sound_dir, &file).await {
                system.effects.insert(cue, sound);
            }
        }
        for (track, file) in manifest.music {
            if let Some(sound) = load_one(&config.sound_dir, &file).await {
                system.music.insert(track, sound);
            }
        }

        log::info!(
            "loaded {} sound effects and {} music tracks from '{}'",
            system.effects.len(),
            system.music.len(),
            config.sound_dir
        );
        Ok(system)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        if let Some(sound) = self.current_music.and_then(|track| self.music.get(&track)) {
            let volume = if self.muted { 0.0 } else { self.music_volume };
            set_sound_volume(sound, volume);
        }
    }
}

impl AudioSink for SoundSystem {
    fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        if let Some(sound) = self.effects.get(&cue) {
            play_sound(
                sound,
                PlaySoundParams {
                    looped: false,
                    volume: self.effects_volume,
                },
            );
        }
    }

    fn switch_music(&mut self, track: MusicTrack) {
        if self.current_music == Some(track) {
            return;
        }
        if let Some(sound) = self.current_music.and_then(|current| self.music.get(&current)) {
            stop_sound(sound);
        }
        self.current_music = Some(track);
        if let Some(sound) = self.music.get(&track) {
            let volume = if self.muted { 0.0 } else { self.music_volume };
            play_sound(sound, PlaySoundParams { looped: true, volume });
        }
    }
}

async fn load_one(dir: &str, file: &str) -> Option<Sound> {
    let path = format!("{dir}/{file}");
    match load_sound(&path).await {
        Ok(sound) => Some(sound),
        Err(err) => {
            log::warn!("sound '{path}' failed to load, cue disabled: {err:?}");
            None
        }
    }
}

/// Records everything the game asks for.
#[cfg(test)]
#[derive(Default, Debug)]
pub struct CueRecorder {
    pub cues: Vec<Cue>,
    pub music: Vec<MusicTrack>,
}

#[cfg(test)]
impl AudioSink for CueRecorder {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn switch_music(&mut self, track: MusicTrack) {
        self.music.push(track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_parses_snake_case_keys() {
        let manifest: SoundManifest = serde_yaml::from_str(
            "cues:\n  sword_swing: sword.ogg\n  boss_roar: roar.ogg\nmusic:\n  dungeon: dungeon.ogg\n",
        )
        .unwrap();
        assert_eq!(manifest.cues.get(&Cue::SwordSwing).map(String::as_str), Some("sword.ogg"));
        assert_eq!(manifest.cues.len(), 2);
        assert!(manifest.music.contains_key(&MusicTrack::Dungeon));
    }

    #[test]
    fn empty_system_is_silent_noop() {
        let mut sounds = SoundSystem::empty();
        sounds.play(Cue::Hurt);
        sounds.switch_music(MusicTrack::Dungeon);
        sounds.toggle_mute();
        assert!(sounds.is_muted());
    }
}
