// sound_types.rs - handles, queue entries, and the interfaces the front-end drives

use myq2_common::q_shared::Vec3;
use thiserror::Error;

use crate::snd_listener::{EntitySounds, ListenerState};
use crate::snd_main::SoundConfig;
use crate::snd_registry::SfxRegistry;

// ============================================================
// Handles and limits
// ============================================================

/// Index of a registered sound. Only valid within one registration epoch.
pub type SfxHandle = i32;

/// Never assigned to a real sound.
pub const INVALID_SFX: SfxHandle = 0;

/// Hash bucket count for the registry. Must be a power of two.
pub const SFX_HASH: usize = 256;
/// Registry capacity, including the reserved slot 0.
pub const SFX_SOUNDS: usize = 4096;

pub const MAX_SNDQUEUE: usize = 128;
pub const MAX_LOOPQUEUE: usize = 128;

pub const DEFAULT_SOUND_EXTENSION: &str = ".wav";

// ============================================================
// Logical channels
// ============================================================

/// Never overrides a sound already playing on the same entity.
pub const CHAN_AUTO: i32 = 0;
/// Menu sounds, etc.
pub const CHAN_LOCAL: i32 = 1;
pub const CHAN_WEAPON: i32 = 2;
pub const CHAN_VOICE: i32 = 3;
/// Voice with attenuation.
pub const CHAN_VOICE_ATTEN: i32 = 4;
pub const CHAN_ITEM: i32 = 5;
pub const CHAN_BODY: i32 = 6;
pub const CHAN_AMBIENT: i32 = 7;
/// Chat messages, etc.
pub const CHAN_LOCAL_SOUND: i32 = 8;
pub const CHAN_ANNOUNCER: i32 = 9;
/// Less attenuation, for guns and such.
pub const CHAN_LESS_ATTEN: i32 = 10;
pub const CHAN_MENU1: i32 = 11;
/// Voice heard everywhere.
pub const CHAN_VOICE_GLOBAL: i32 = 12;
pub const CHAN_MUSIC: i32 = 13;

// ============================================================
// Errors
// ============================================================

/// Caller-contract violations. These abandon the operation; they never
/// describe runtime conditions like a full queue or an unloaded sound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    #[error("{func}: bad entitynum {entnum}")]
    BadEntityNum { func: &'static str, entnum: i32 },
}

// ============================================================
// Queue entries
// ============================================================

/// A one-shot sound request, snapshotted at the time of the call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    pub ent_num: i32,
    pub ent_chan: i32,
    pub handle: SfxHandle,
    pub volume: u8,
    /// `None` means the sound follows `ent_num` through the entity position table.
    pub origin: Option<Vec3>,
}

impl SoundEvent {
    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }
}

/// Who a looping sound belongs to. Only ever compared for identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopOwner {
    Entity(i32),
    /// Fixed-position world ambience with no owning object.
    Ambient,
}

/// One continuously sounding source for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopEntry {
    pub owner: LoopOwner,
    pub ent_num: i32,
    pub handle: SfxHandle,
    pub origin: Vec3,
    pub velocity: Vec3,
    pub volume: u8,
}

// ============================================================
// Collaborator interfaces
// ============================================================

/// Answers whether a sound resource exists. `name` is lowercase, uses '/'
/// separators and has no extension; the store decides which extensions to try.
pub trait AssetStore: Sync {
    fn sound_exists(&self, name: &str) -> bool;
}

impl<F> AssetStore for F
where
    F: Fn(&str) -> bool + Sync,
{
    fn sound_exists(&self, name: &str) -> bool {
        self(name)
    }
}

/// Output format reported by a mixer, for `soundinfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmaInfo {
    pub channels: i32,
    pub samples: i32,
    pub samplebits: i32,
    pub submission_chunk: i32,
    pub speed: i32,
}

/// Everything a mixer sees for one frame. All borrowed; nothing outlives the call.
pub struct SoundFrame<'a> {
    pub events: &'a [SoundEvent],
    pub loops: &'a [LoopEntry],
    pub listener: &'a ListenerState,
    pub entities: &'a EntitySounds,
    pub registry: &'a SfxRegistry,
    pub config: &'a SoundConfig,
    /// Effective playback time scale for pitch and doppler.
    pub scale: f32,
}

/// A low-level mixer. Several can be attached; each receives the same frame.
pub trait MixerBackend {
    fn name(&self) -> &str;
    fn init(&mut self) -> bool {
        true
    }
    fn shutdown(&mut self) {}
    /// Start of a registration epoch; every previously issued handle is dead.
    fn mix_init(&mut self) {}
    fn update(&mut self, frame: &SoundFrame<'_>);
    fn stop_sound(&mut self, _entnum: i32, _entchannel: i32, _handle: SfxHandle) {}
    fn clear_buffer(&mut self) {}
    fn info(&self) -> Option<DmaInfo> {
        None
    }
}

/// Streamed background music.
pub trait MusicBackend {
    /// Called every frame a track is playing. `reload` asks for a restart of the stream.
    fn update(&mut self, intro: &str, loop_name: &str, reload: bool);
    /// Called once when playback ends.
    fn stop(&mut self) {}
}

/// Mixer for headless hosts.
#[derive(Debug, Default)]
pub struct NullMixer;

impl MixerBackend for NullMixer {
    fn name(&self) -> &str {
        "null"
    }

    fn update(&mut self, _frame: &SoundFrame<'_>) {}
}

#[derive(Debug, Default)]
pub struct NullMusic;

impl MusicBackend for NullMusic {
    fn update(&mut self, _intro: &str, _loop_name: &str, _reload: bool) {}
}
