// snd_queue.rs - frame-scoped request queues
//
// Both queues are plain fixed-capacity arrays whose length is reset at each
// frame boundary. A push onto a full queue is refused; nothing ever grows.

use arrayvec::ArrayVec;

use crate::sound_types::{LoopEntry, SoundEvent, MAX_LOOPQUEUE, MAX_SNDQUEUE};

#[derive(Debug, Clone)]
pub struct FrameQueue<T, const N: usize> {
    items: ArrayVec<T, N>,
}

impl<T, const N: usize> Default for FrameQueue<T, N> {
    fn default() -> Self {
        Self { items: ArrayVec::new() }
    }
}

impl<T, const N: usize> FrameQueue<T, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append in arrival order. Returns false and drops `item` when full.
    pub fn push(&mut self, item: T) -> bool {
        self.items.try_push(item).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

/// Pending one-shot sounds.
pub type ChannelQueue = FrameQueue<SoundEvent, MAX_SNDQUEUE>;

/// Loops sounding this frame. Rebuilt from scratch every frame.
pub type LoopQueue = FrameQueue<LoopEntry, MAX_LOOPQUEUE>;
