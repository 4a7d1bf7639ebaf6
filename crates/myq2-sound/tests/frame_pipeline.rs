// Drives the public sound API across whole frames.

use std::cell::RefCell;
use std::rc::Rc;

use myq2_common::cvar::CvarContext;
use myq2_common::q_shared::AXIS_DEFAULT;
use myq2_sound::sound_types::{CHAN_WEAPON, MAX_SNDQUEUE};
use myq2_sound::{FsAssetStore, LoopOwner, MixerBackend, SoundFrame, SoundState, INVALID_SFX};

#[derive(Default)]
struct Seen {
    frames: usize,
    events: usize,
    loops: Vec<usize>,
    scales: Vec<f32>,
}

struct CountingMixer(Rc<RefCell<Seen>>);

impl MixerBackend for CountingMixer {
    fn name(&self) -> &str {
        "counting"
    }

    fn update(&mut self, frame: &SoundFrame<'_>) {
        let mut seen = self.0.borrow_mut();
        seen.frames += 1;
        seen.events += frame.events.len();
        seen.loops.push(frame.loops.len());
        seen.scales.push(frame.scale);
    }
}

fn started(assets: FsAssetStore) -> (SoundState, Rc<RefCell<Seen>>) {
    let seen = Rc::new(RefCell::new(Seen::default()));
    let mut state = SoundState::new(Box::new(assets));
    state.add_mixer(Box::new(CountingMixer(Rc::clone(&seen))));
    let mut cvars = CvarContext::new();
    state.s_init(&mut cvars);
    state.s_begin_registration();
    (state, seen)
}

fn game_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("sound")).unwrap();
    std::fs::write(dir.path().join("sound/foo.wav"), b"RIFF").unwrap();
    std::fs::write(dir.path().join("sound/hum.wav"), b"RIFF").unwrap();
    dir
}

#[test]
fn register_queue_and_flush_one_frame() {
    let dir = game_dir();
    let mut assets = FsAssetStore::new();
    assets.add_search_path(dir.path());
    let (mut state, seen) = started(assets);

    let foo = state.s_register_sound("sound/foo");
    assert_ne!(foo, INVALID_SFX);
    assert_eq!(state.s_register_sound("sound/bar"), INVALID_SFX);

    state.s_start_sound(Some([0.0, 0.0, 0.0]), 0, CHAN_WEAPON, 200, foo).unwrap();
    assert_eq!(state.channel_queue.len(), 1);

    state.s_update();

    assert_eq!(state.channel_queue.len(), 0);
    let seen = seen.borrow();
    assert_eq!(seen.frames, 1);
    assert_eq!(seen.events, 1);
    assert_eq!(seen.scales, vec![1.0]);
}

#[test]
fn loops_stop_when_not_re_added() {
    let dir = game_dir();
    let mut assets = FsAssetStore::new();
    assets.add_search_path(dir.path());
    let (mut state, seen) = started(assets);
    let hum = state.s_register_sound("sound/hum.wav");

    state.s_add_looping_sound(LoopOwner::Entity(3), 3, &[0.0; 3], &[0.0; 3], hum, 255);
    state.s_add_ambient_looping_sound(&[64.0, 0.0, 0.0], 127, hum);
    state.s_update();
    assert!(state.loop_queue.is_empty());
    state.s_update();

    assert_eq!(seen.borrow().loops, vec![2, 0]);
}

#[test]
fn muted_frames_discard_queued_work() {
    let dir = game_dir();
    let mut assets = FsAssetStore::new();
    assets.add_search_path(dir.path());
    let (mut state, seen) = started(assets);
    let foo = state.s_register_sound("sound/foo");

    for i in 0..(MAX_SNDQUEUE + 3) as i32 {
        state.s_start_sound(None, i, CHAN_WEAPON, 255, foo).unwrap();
    }
    assert_eq!(state.channel_queue.len(), MAX_SNDQUEUE);

    state.sound_muted = true;
    state.s_update();
    assert!(state.channel_queue.is_empty());
    assert_eq!(seen.borrow().frames, 0);

    // back to normal after the next registration epoch
    state.s_begin_registration();
    assert_eq!(state.s_register_sound("sound/foo"), 1);
    state.s_update();
    assert_eq!(seen.borrow().frames, 1);
    assert_eq!(seen.borrow().events, 0);
}

#[test]
fn spatialized_frame_uses_accumulated_scale() {
    let (mut state, seen) = started(FsAssetStore::new());
    state.config.timescale = 0.5;

    state.s_respatialize(1, &[0.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100);
    state.s_respatialize(1, &[10.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100);
    assert!((state.listener.velocity[0] - 100.0).abs() < 1e-3);
    state.s_update();

    state.s_respatialize(2, &[50.0, 0.0, 0.0], &AXIS_DEFAULT, false, 100);
    assert_eq!(state.listener.velocity, [0.0, 0.0, 0.0]);

    // two spatialize calls in one frame compound
    assert_eq!(seen.borrow().scales, vec![0.25]);
}
