//! Recording collaborators shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use myq2_common::cvar::CvarContext;

use crate::snd_main::SoundState;
use crate::sound_types::{
    DmaInfo, LoopEntry, MixerBackend, MusicBackend, SfxHandle, SoundEvent, SoundFrame,
};

/// What a mixer saw in one `update` call.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub events: Vec<SoundEvent>,
    pub loops: Vec<LoopEntry>,
    /// Registry names of the queued events, in queue order.
    pub names: Vec<String>,
    pub scale: f32,
    pub under_water: bool,
}

#[derive(Debug, Default)]
pub struct MixerLog {
    pub frames: Vec<FrameRecord>,
    pub stops: Vec<(i32, i32, SfxHandle)>,
    pub clears: usize,
    pub mix_inits: usize,
    pub shutdowns: usize,
}

pub struct RecordingMixer {
    name: String,
    init_ok: bool,
    info: Option<DmaInfo>,
    log: Rc<RefCell<MixerLog>>,
}

impl RecordingMixer {
    pub fn new(name: &str) -> (Self, Rc<RefCell<MixerLog>>) {
        Self::build(name, true, None)
    }

    pub fn failing(name: &str) -> (Self, Rc<RefCell<MixerLog>>) {
        Self::build(name, false, None)
    }

    pub fn with_info(name: &str, info: DmaInfo) -> (Self, Rc<RefCell<MixerLog>>) {
        Self::build(name, true, Some(info))
    }

    fn build(name: &str, init_ok: bool, info: Option<DmaInfo>) -> (Self, Rc<RefCell<MixerLog>>) {
        let log = Rc::new(RefCell::new(MixerLog::default()));
        let mixer = Self { name: name.to_string(), init_ok, info, log: Rc::clone(&log) };
        (mixer, log)
    }
}

impl MixerBackend for RecordingMixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self) -> bool {
        self.init_ok
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shutdowns += 1;
    }

    fn mix_init(&mut self) {
        self.log.borrow_mut().mix_inits += 1;
    }

    fn update(&mut self, frame: &SoundFrame<'_>) {
        let names = frame
            .events
            .iter()
            .filter_map(|ev| frame.registry.name(ev.handle).map(str::to_string))
            .collect();
        self.log.borrow_mut().frames.push(FrameRecord {
            events: frame.events.to_vec(),
            loops: frame.loops.to_vec(),
            names,
            scale: frame.scale,
            under_water: frame.listener.under_water,
        });
    }

    fn stop_sound(&mut self, entnum: i32, entchannel: i32, handle: SfxHandle) {
        self.log.borrow_mut().stops.push((entnum, entchannel, handle));
    }

    fn clear_buffer(&mut self) {
        self.log.borrow_mut().clears += 1;
    }

    fn info(&self) -> Option<DmaInfo> {
        self.info
    }
}

#[derive(Debug, Default)]
pub struct MusicLog {
    pub updates: Vec<(String, String, bool)>,
    pub stops: usize,
}

pub struct RecordingMusic {
    log: Rc<RefCell<MusicLog>>,
}

impl RecordingMusic {
    pub fn new() -> (Self, Rc<RefCell<MusicLog>>) {
        let log = Rc::new(RefCell::new(MusicLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl MusicBackend for RecordingMusic {
    fn update(&mut self, intro: &str, loop_name: &str, reload: bool) {
        self.log
            .borrow_mut()
            .updates
            .push((intro.to_string(), loop_name.to_string(), reload));
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }
}

/// A started, unmuted state with one recording mixer and a recording music
/// backend, inside its first registration epoch.
pub fn active_state<F>(assets: F) -> (SoundState, Rc<RefCell<MixerLog>>, Rc<RefCell<MusicLog>>)
where
    F: Fn(&str) -> bool + Sync + 'static,
{
    let mut state = SoundState::new(Box::new(assets));
    let (mixer, mixer_log) = RecordingMixer::new("recorder");
    let (music, music_log) = RecordingMusic::new();
    state.add_mixer(Box::new(mixer));
    state.set_music_backend(Box::new(music));

    let mut cvars = CvarContext::new();
    state.s_init(&mut cvars);
    state.s_begin_registration();
    (state, mixer_log, music_log)
}
