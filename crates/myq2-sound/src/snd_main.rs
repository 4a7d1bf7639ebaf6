// snd_main.rs - main control for the sound front-end
//
// Gameplay and UI code talk to `SoundState`; it keeps the registry, the two
// frame queues, listener state and the background track, and hands one
// borrowed `SoundFrame` per frame to every attached mixer.

use myq2_common::common::{com_dprintf, com_error, com_printf};
use myq2_common::cvar::CvarContext;
use myq2_common::q_shared::{
    Axis, Vec3, CVAR_ARCHIVE, CVAR_NOSET, CVAR_ZERO, ERR_DROP, VEC3_ORIGIN,
};

use crate::snd_listener::{check_entnum, EntitySounds, ListenerState};
use crate::snd_music::BackgroundTrack;
use crate::snd_queue::{ChannelQueue, LoopQueue};
use crate::snd_registry::SfxRegistry;
use crate::sound_types::{
    AssetStore, LoopEntry, LoopOwner, MixerBackend, MusicBackend, NullMusic, SfxHandle,
    SoundError, SoundEvent, SoundFrame, CHAN_AMBIENT, INVALID_SFX,
};

/// Volume used for listener-relative sounds.
pub const LOCAL_SOUND_VOLUME: u8 = 255;

/// Entity number recorded on ambient loops, which have no owner.
pub const AMBIENT_LOOP_ENTITY: i32 = -1;

// ============================================================
// Configuration
// ============================================================

/// Cached values of the sound cvars.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundConfig {
    pub volume: f32,
    pub volume_voice: f32,
    /// Zero disables background tracks.
    pub music_volume: f32,
    pub doppler: bool,
    pub doppler_speed: f32,
    pub doppler_factor: f32,
    pub attenuate: f32,
    /// `s_timescale`: let the simulation time scale affect playback.
    pub timescale_enabled: bool,
    pub force_scale: f32,
    pub init_sound: bool,
    /// Global `timescale`, owned by the host.
    pub timescale: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            volume_voice: 1.0,
            music_volume: 0.0,
            doppler: true,
            doppler_speed: 4000.0,
            doppler_factor: 1.0,
            attenuate: 1.0,
            timescale_enabled: true,
            force_scale: 0.0,
            init_sound: true,
            timescale: 1.0,
        }
    }
}

impl SoundConfig {
    /// Create the sound cvars if missing and read them back.
    pub fn register(cvars: &mut CvarContext) -> Self {
        cvars.get("s_volume", "0.5", CVAR_ARCHIVE);
        cvars.get("s_volumeVoice", "1.0", CVAR_ARCHIVE);
        cvars.get("s_musicvolume", "0", CVAR_ARCHIVE);
        cvars.get("s_doppler", "1", CVAR_ARCHIVE);
        cvars.get("s_dopplerSpeed", "4000", CVAR_ARCHIVE);
        cvars.get("s_dopplerFactor", "1", CVAR_ARCHIVE);
        cvars.get("s_attenuate", "1.0", CVAR_ARCHIVE);
        cvars.get("s_timescale", "1", CVAR_ARCHIVE);
        cvars.get("s_forceScale", "0", CVAR_ZERO);
        cvars.get("s_initsound", "1", CVAR_NOSET);
        cvars.get("timescale", "1", CVAR_ZERO);
        Self::from_cvars(cvars)
    }

    pub fn from_cvars(cvars: &CvarContext) -> Self {
        Self {
            volume: cvars.variable_value("s_volume"),
            volume_voice: cvars.variable_value("s_volumeVoice"),
            music_volume: cvars.variable_value("s_musicvolume"),
            doppler: cvars.variable_integer("s_doppler") != 0,
            doppler_speed: cvars.variable_value("s_dopplerSpeed"),
            doppler_factor: cvars.variable_value("s_dopplerFactor"),
            attenuate: cvars.variable_value("s_attenuate"),
            timescale_enabled: cvars.variable_integer("s_timescale") != 0,
            force_scale: cvars.variable_value("s_forceScale"),
            init_sound: cvars.variable_integer("s_initsound") != 0,
            timescale: cvars.variable_value("timescale"),
        }
    }
}

// ============================================================
// Sound state
// ============================================================

pub struct SoundState {
    pub config: SoundConfig,
    pub registry: SfxRegistry,
    pub channel_queue: ChannelQueue,
    pub loop_queue: LoopQueue,
    pub entity_sounds: EntitySounds,
    pub listener: ListenerState,
    pub background: BackgroundTrack,
    pub sound_started: bool,
    pub sound_muted: bool,

    assets: Box<dyn AssetStore>,
    mixers: Vec<Box<dyn MixerBackend>>,
    music: Box<dyn MusicBackend>,
}

impl SoundState {
    pub fn new(assets: Box<dyn AssetStore>) -> Self {
        Self {
            config: SoundConfig::default(),
            registry: SfxRegistry::new(),
            channel_queue: ChannelQueue::new(),
            loop_queue: LoopQueue::new(),
            entity_sounds: EntitySounds::new(),
            listener: ListenerState::default(),
            background: BackgroundTrack::new(),
            sound_started: false,
            sound_muted: false,
            assets,
            mixers: Vec::new(),
            music: Box::new(NullMusic),
        }
    }

    /// Attach a mixer. Mixers attached before `s_init` are initialized there.
    pub fn add_mixer(&mut self, mixer: Box<dyn MixerBackend>) {
        self.mixers.push(mixer);
    }

    pub fn mixers(&self) -> &[Box<dyn MixerBackend>] {
        &self.mixers
    }

    pub fn set_music_backend(&mut self, music: Box<dyn MusicBackend>) {
        self.music = music;
    }

    /// Started and not muted. Every trigger entry point is a no-op otherwise.
    pub fn is_active(&self) -> bool {
        self.sound_started && !self.sound_muted
    }

    // ---- lifecycle ----

    pub fn s_init(&mut self, cvars: &mut CvarContext) {
        com_printf("\n------- sound initialization -------\n");

        self.config = SoundConfig::register(cvars);
        if !self.config.init_sound {
            com_printf("not initializing.\n");
            com_printf("------------------------------------\n");
            return;
        }

        self.mixers.retain_mut(|mixer| {
            if mixer.init() {
                true
            } else {
                com_printf(&format!("{}: not initializing.\n", mixer.name()));
                false
            }
        });

        self.sound_started = true;
        // nothing plays until the first registration epoch
        self.sound_muted = true;
        self.s_stop_all_sounds();
        self.s_sound_info_f();

        com_printf("------------------------------------\n");
    }

    pub fn s_shutdown(&mut self) {
        if !self.sound_started {
            return;
        }

        self.background.shutdown(self.music.as_mut());
        for mixer in &mut self.mixers {
            mixer.shutdown();
        }

        self.sound_started = false;
        self.channel_queue.clear();
        self.loop_queue.clear();
        self.registry.begin_epoch();
    }

    /// Re-read the sound cvars. Called by the host once per frame.
    pub fn s_apply_cvars(&mut self, cvars: &CvarContext) {
        self.config = SoundConfig::from_cvars(cvars);
    }

    /// Stop everything and stay silent until the next registration epoch.
    pub fn s_disable_sounds(&mut self) {
        self.s_stop_all_sounds();
        self.sound_muted = true;
    }

    /// Start a new registration epoch. Previously issued handles become invalid.
    pub fn s_begin_registration(&mut self) {
        self.sound_muted = false;
        self.registry.begin_epoch();
        for mixer in &mut self.mixers {
            mixer.mix_init();
        }
    }

    // ---- registration ----

    pub fn s_register_sound(&mut self, name: &str) -> SfxHandle {
        if !self.sound_started {
            return INVALID_SFX;
        }
        self.registry.register(name, self.assets.as_ref())
    }

    /// Precache a batch of sounds. Same handles as registering one at a time.
    pub fn s_register_sound_list(&mut self, names: &[&str]) -> Vec<SfxHandle> {
        if !self.sound_started {
            return vec![INVALID_SFX; names.len()];
        }
        self.registry.register_list(names, self.assets.as_ref())
    }

    // ---- one-shot sounds ----

    fn queue_sound(
        &mut self,
        func: &'static str,
        origin: Option<Vec3>,
        entnum: i32,
        entchannel: i32,
        volume: u8,
        handle: SfxHandle,
    ) -> Result<(), SoundError> {
        if !self.is_active() {
            return Ok(());
        }
        if origin.is_none() {
            if let Err(err) = check_entnum(func, entnum) {
                com_error(ERR_DROP, &err.to_string());
                return Err(err);
            }
        }
        if self.channel_queue.is_full() {
            com_printf(&format!("{}: Queue overflow, dropping\n", func));
            return Ok(());
        }
        if !self.registry.is_valid(handle) {
            com_dprintf(&format!("{}: Illegal sfxhandle {}\n", func, handle));
            return Ok(());
        }

        self.channel_queue.push(SoundEvent {
            ent_num: entnum,
            ent_chan: entchannel,
            handle,
            volume,
            origin,
        });
        Ok(())
    }

    /// Queue a one-shot sound. With no `origin` the sound follows `entnum`.
    pub fn s_start_sound(
        &mut self,
        origin: Option<Vec3>,
        entnum: i32,
        entchannel: i32,
        volume: u8,
        handle: SfxHandle,
    ) -> Result<(), SoundError> {
        self.queue_sound("S_StartSound", origin, entnum, entchannel, volume, handle)
    }

    pub fn s_start_ambient_sound(
        &mut self,
        origin: Option<Vec3>,
        entnum: i32,
        volume: u8,
        handle: SfxHandle,
    ) -> Result<(), SoundError> {
        self.queue_sound("S_StartAmbientSound", origin, entnum, CHAN_AMBIENT, volume, handle)
    }

    /// Full-volume sound on the listener entity, for menus and voice.
    pub fn s_start_local_sound(&mut self, handle: SfxHandle, channel: i32) -> Result<(), SoundError> {
        let entnum = self.listener.entity();
        self.queue_sound("S_StartLocalSound", None, entnum, channel, LOCAL_SOUND_VOLUME, handle)
    }

    pub fn s_stop_sound(&mut self, entnum: i32, entchannel: i32, handle: SfxHandle) {
        for mixer in &mut self.mixers {
            mixer.stop_sound(entnum, entchannel, handle);
        }
    }

    /// Drop everything that is playing, e.g. on a level change.
    pub fn s_clear_sound_buffer(&mut self) {
        if !self.is_active() {
            return;
        }
        self.listener.reset();
        self.entity_sounds.clear();
        for mixer in &mut self.mixers {
            mixer.clear_buffer();
        }
    }

    pub fn s_stop_all_sounds(&mut self) {
        if !self.sound_started {
            return;
        }
        self.s_stop_background_track();
        self.s_clear_sound_buffer();
    }

    // ---- looping sounds ----

    pub fn s_clear_looping_sounds(&mut self) {
        self.loop_queue.clear();
    }

    fn queue_loop(&mut self, func: &str, entry: LoopEntry) {
        if !self.is_active() {
            return;
        }
        if !self.registry.is_valid(entry.handle) {
            com_dprintf(&format!("{}: Illegal sfxhandle {}\n", func, entry.handle));
            return;
        }
        if !self.loop_queue.push(entry) {
            com_printf(&format!("{}: Queue overflow {}\n", func, entry.handle));
        }
    }

    /// Keep a loop sounding for this frame. Loops not re-added next frame stop.
    pub fn s_add_looping_sound(
        &mut self,
        owner: LoopOwner,
        entnum: i32,
        origin: &Vec3,
        velocity: &Vec3,
        handle: SfxHandle,
        volume: u8,
    ) {
        let entry = LoopEntry {
            owner,
            ent_num: entnum,
            handle,
            origin: *origin,
            velocity: *velocity,
            volume,
        };
        self.queue_loop("S_AddLoopingSound", entry);
    }

    /// Fixed-position world loop with no owner and no velocity.
    pub fn s_add_ambient_looping_sound(&mut self, origin: &Vec3, volume: u8, handle: SfxHandle) {
        let entry = LoopEntry {
            owner: LoopOwner::Ambient,
            ent_num: AMBIENT_LOOP_ENTITY,
            handle,
            origin: *origin,
            velocity: VEC3_ORIGIN,
            volume,
        };
        self.queue_loop("S_AddAmbientLoopingSound", entry);
    }

    // ---- listener ----

    pub fn s_update_entity_position(&mut self, entnum: i32, origin: &Vec3) -> Result<(), SoundError> {
        self.entity_sounds.update(entnum, origin).map_err(|err| {
            com_error(ERR_DROP, &err.to_string());
            err
        })
    }

    /// Set the listener for this frame. Call once per frame before `s_update`.
    pub fn s_respatialize(
        &mut self,
        entnum: i32,
        head: &Vec3,
        axis: &Axis,
        inwater: bool,
        frametime_msec: i32,
    ) {
        let timescale = self.config.timescale;
        self.listener
            .respatialize(entnum, head, axis, inwater, frametime_msec, timescale);
    }

    pub fn s_update_pitch(&mut self, pitch: f32) {
        let scale = if self.config.timescale_enabled {
            if self.config.force_scale > 0.0 {
                self.config.force_scale
            } else {
                pitch
            }
        } else {
            1.0
        };
        self.listener.set_play_scale(scale);
    }

    // ---- background music ----

    pub fn s_start_background_track(&mut self, intro: &str, loop_name: &str) -> bool {
        let music_volume = self.config.music_volume;
        self.background.start(intro, loop_name, music_volume)
    }

    pub fn s_stop_background_track(&mut self) {
        self.background.stop();
    }

    /// Hand background music to an external driver, or take it back.
    pub fn s_set_music_override(&mut self, enable: bool) {
        self.background.set_override(enable);
    }

    /// Driver-side track change while overridden. An empty `intro` stops the track.
    pub fn s_override_background_track(&mut self, intro: &str, loop_name: &str) -> bool {
        if intro.is_empty() {
            self.background.override_stop();
            return false;
        }
        self.background.override_start(intro, loop_name)
    }

    // ---- per frame ----

    /// Playback time scale for this frame.
    pub fn effective_scale(&self) -> f32 {
        if !self.config.timescale_enabled {
            1.0
        } else if self.listener.had_spatialize {
            self.listener.play_scale
        } else {
            self.config.timescale
        }
    }

    /// Flush this frame's queues to the mixers and start the next frame.
    pub fn s_update(&mut self) {
        if !self.is_active() {
            com_dprintf("S_Update: not started or muted\n");
            self.channel_queue.clear();
            self.loop_queue.clear();
            return;
        }

        let scale = self.effective_scale();
        self.listener.had_spatialize = false;

        let frame = SoundFrame {
            events: self.channel_queue.as_slice(),
            loops: self.loop_queue.as_slice(),
            listener: &self.listener,
            entities: &self.entity_sounds,
            registry: &self.registry,
            config: &self.config,
            scale,
        };
        for mixer in &mut self.mixers {
            mixer.update(&frame);
        }
        self.background.dispatch(self.music.as_mut());

        self.channel_queue.clear();
        self.loop_queue.clear();
        self.listener.under_water = false;
    }
}
