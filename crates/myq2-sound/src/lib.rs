#![allow(clippy::too_many_arguments, clippy::float_cmp)]
// Sound front-end: registry, per-frame queues, listener, background music
pub mod sound_types;
pub mod snd_registry;
pub mod snd_queue;
pub mod snd_listener;
pub mod snd_music;
pub mod snd_mem;
pub mod snd_main;
pub mod snd_cmds;

#[cfg(test)]
mod test_util;

pub use snd_main::{SoundConfig, SoundState};
pub use snd_mem::FsAssetStore;
pub use sound_types::{
    AssetStore, LoopOwner, MixerBackend, MusicBackend, NullMixer, NullMusic, SfxHandle,
    SoundError, SoundFrame, INVALID_SFX,
};
