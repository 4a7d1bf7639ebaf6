// snd_music.rs - background music track state
//
// Stopped <-> Playing through start/stop. Override is a flag owned by an
// external driver (demo playback, cinematics); while it is set, ordinary
// start/stop requests are refused and only the driver may change the track.

use myq2_common::common::{com_dprintf, com_printf};
use myq2_common::q_shared::{com_default_extension, q_strncpyz, MAX_QPATH};

use crate::sound_types::{MusicBackend, DEFAULT_SOUND_EXTENSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundState {
    Stopped,
    Playing,
    Overridden,
}

#[derive(Debug, Clone, Default)]
pub struct BackgroundTrack {
    pub start_name: String,
    pub loop_name: String,
    pub playing: bool,
    /// One-shot: restart the stream instead of continuing it. Cleared every frame.
    pub reload: bool,
    pub overridden: bool,
    /// The music backend was fed last frame and still needs a stop.
    streaming: bool,
}

fn track_name(name: &str) -> String {
    let mut out = q_strncpyz(name, MAX_QPATH - DEFAULT_SOUND_EXTENSION.len()).to_string();
    com_default_extension(&mut out, DEFAULT_SOUND_EXTENSION);
    out
}

impl BackgroundTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BackgroundState {
        if self.overridden {
            BackgroundState::Overridden
        } else if self.playing {
            BackgroundState::Playing
        } else {
            BackgroundState::Stopped
        }
    }

    fn set_track(&mut self, intro: &str, loop_name: &str) {
        let loop_name = if loop_name.is_empty() { intro } else { loop_name };

        com_dprintf(&format!("S_StartBackgroundTrack( {}, {} )\n", intro, loop_name));

        self.playing = true;
        self.reload = true;
        self.start_name = track_name(intro);
        self.loop_name = track_name(loop_name);
    }

    /// User-side start. An empty `loop_name` loops the intro. Returns true if
    /// the track changed.
    pub fn start(&mut self, intro: &str, loop_name: &str, music_volume: f32) -> bool {
        if self.overridden {
            com_printf("Can't start music in override mode\n");
            return false;
        }
        if intro.is_empty() || music_volume == 0.0 {
            return false;
        }
        self.set_track(intro, loop_name);
        true
    }

    /// User-side stop. Ignored while overridden.
    pub fn stop(&mut self) {
        if !self.overridden {
            self.playing = false;
        }
    }

    pub fn set_override(&mut self, enable: bool) {
        self.overridden = enable;
    }

    /// Driver-side start, only honored while overridden.
    pub fn override_start(&mut self, intro: &str, loop_name: &str) -> bool {
        if !self.overridden || intro.is_empty() {
            return false;
        }
        self.set_track(intro, loop_name);
        true
    }

    /// Driver-side stop, only honored while overridden.
    pub fn override_stop(&mut self) {
        if self.overridden {
            self.playing = false;
        }
    }

    /// Unconditional teardown. Leaves override mode and stops the backend
    /// if it was streaming.
    pub fn shutdown(&mut self, music: &mut dyn MusicBackend) {
        self.overridden = false;
        self.playing = false;
        self.dispatch(music);
    }

    /// Feed the music backend for this frame and consume the reload signal.
    pub fn dispatch(&mut self, music: &mut dyn MusicBackend) {
        if self.playing {
            music.update(&self.start_name, &self.loop_name, self.reload);
            self.streaming = true;
        } else if self.streaming {
            music.stop();
            self.streaming = false;
        }
        self.reload = false;
    }
}
