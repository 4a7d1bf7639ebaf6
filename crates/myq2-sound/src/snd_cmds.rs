// snd_cmds.rs - sound console commands

use myq2_common::common::com_printf;

use crate::snd_main::SoundState;
use crate::sound_types::{CHAN_LOCAL_SOUND, DEFAULT_SOUND_EXTENSION, INVALID_SFX};

/// Commands the host should route to `s_execute_command`.
pub const SOUND_COMMANDS: [&str; 5] = ["play", "music", "soundlist", "soundinfo", "soundstop"];

impl SoundState {
    /// Run a tokenized console command. Returns false if `argv[0]` is not a
    /// sound command.
    pub fn s_execute_command(&mut self, argv: &[&str]) -> bool {
        match argv.first().copied() {
            Some("play") => self.s_play_f(argv),
            Some("music") => self.s_music_f(argv),
            Some("soundlist") => self.s_sound_list_f(),
            Some("soundinfo") => self.s_sound_info_f(),
            Some("soundstop") => self.s_stop_all_sounds(),
            _ => return false,
        }
        true
    }

    /// `play <sound> [...]`
    pub fn s_play_f(&mut self, argv: &[&str]) {
        for arg in argv.iter().skip(1) {
            let name = if arg.contains('.') {
                arg.to_string()
            } else {
                format!("{}{}", arg, DEFAULT_SOUND_EXTENSION)
            };
            let handle = self.s_register_sound(&name);
            if handle != INVALID_SFX && self.s_start_local_sound(handle, CHAN_LOCAL_SOUND).is_err() {
                return;
            }
        }
    }

    /// `music <intro> [loop]`
    pub fn s_music_f(&mut self, argv: &[&str]) {
        if self.background.overridden {
            com_printf("Can't start music in override mode\n");
            return;
        }

        match argv {
            [_, intro] => {
                self.s_start_background_track(intro, intro);
            }
            [_, intro, loop_name] => {
                self.s_start_background_track(intro, loop_name);
            }
            _ => com_printf("music <musicfile> [loopfile]\n"),
        }
    }

    pub fn s_sound_list_f(&self) {
        for (handle, name) in self.registry.iter() {
            com_printf(&format!("{:4} : {}\n", handle, name));
        }
        com_printf(&format!("Total registered: {}\n", self.registry.len()));
    }

    pub fn s_sound_info_f(&self) {
        com_printf("----- Sound Info -----\n");
        if !self.sound_started {
            com_printf("sound system not started\n");
        } else {
            if self.sound_muted {
                com_printf("sound system is muted\n");
            }

            for mixer in self.mixers() {
                com_printf(&format!("mixer: {}\n", mixer.name()));
                if let Some(dma) = mixer.info() {
                    com_printf(&format!("{:5} stereo\n", dma.channels - 1));
                    com_printf(&format!("{:5} samples\n", dma.samples));
                    com_printf(&format!("{:5} samplebits\n", dma.samplebits));
                    com_printf(&format!("{:5} submission_chunk\n", dma.submission_chunk));
                    com_printf(&format!("{:5} speed\n", dma.speed));
                }
            }

            if self.background.playing {
                com_printf(&format!("Background file: {}\n", self.background.loop_name));
            } else {
                com_printf("No background file.\n");
            }
        }
        com_printf("----------------------\n");
    }
}
