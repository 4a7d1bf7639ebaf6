// snd_registry.rs - sound name interning
//
// Names are interned into a fixed arena of entries chained off a fixed
// bucket array. Nothing is allocated per registration, and the whole table
// is dropped at the start of each registration epoch.

use arrayvec::ArrayString;
use rayon::prelude::*;

use myq2_common::common::com_printf;
use myq2_common::q_shared::{com_strip_extension, MAX_QPATH};

use crate::sound_types::{AssetStore, SfxHandle, INVALID_SFX, SFX_HASH, SFX_SOUNDS};

pub type SfxName = ArrayString<MAX_QPATH>;

#[derive(Debug, Clone, Default)]
struct SfxEntry {
    name: SfxName,
    /// Next entry in the same hash bucket.
    next: Option<u16>,
}

/// Lowercase, '/'-separated, at most `MAX_QPATH - 1` bytes, extension stripped.
pub fn normalize_sound_name(name: &str) -> SfxName {
    let mut out = SfxName::new();
    for c in name.chars() {
        let c = if c == '\\' { '/' } else { c.to_ascii_lowercase() };
        if out.len() + c.len_utf8() > MAX_QPATH - 1 {
            break;
        }
        out.push(c);
    }
    let len = com_strip_extension(&out).len();
    out.truncate(len);
    out
}

/// Rolling hash over the normalized bytes, folded into `SFX_HASH` buckets.
pub fn sfx_hash(name: &str) -> usize {
    let mut h: u32 = 0;
    for &c in name.as_bytes() {
        h = (h << 5) ^ (h >> 27) ^ c as u32;
    }
    ((h ^ (h >> 10) ^ (h >> 20)) as usize) & (SFX_HASH - 1)
}

pub struct SfxRegistry {
    entries: Box<[SfxEntry]>,
    hash: [Option<u16>; SFX_HASH],
    /// High-water mark. Slot 0 is reserved, so this starts at 1.
    count: usize,
}

impl Default for SfxRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SfxRegistry {
    pub fn new() -> Self {
        Self::with_capacity(SFX_SOUNDS)
    }

    /// `capacity` counts the reserved slot 0 and is clamped to [1, SFX_SOUNDS].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, SFX_SOUNDS);
        Self {
            entries: vec![SfxEntry::default(); capacity].into_boxed_slice(),
            hash: [None; SFX_HASH],
            count: 1,
        }
    }

    /// Start a new registration epoch. Every handle issued so far becomes invalid.
    pub fn begin_epoch(&mut self) {
        self.hash = [None; SFX_HASH];
        for entry in &mut self.entries[..self.count] {
            *entry = SfxEntry::default();
        }
        self.count = 1;
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of slots in use, counting the reserved slot 0.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of registered sounds.
    pub fn len(&self) -> usize {
        self.count - 1
    }

    pub fn is_empty(&self) -> bool {
        self.count == 1
    }

    /// True for handles in [1, count).
    pub fn is_valid(&self, handle: SfxHandle) -> bool {
        handle > 0 && (handle as usize) < self.count
    }

    pub fn name(&self, handle: SfxHandle) -> Option<&str> {
        self.is_valid(handle)
            .then(|| self.entries[handle as usize].name.as_str())
    }

    /// Registered sounds in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (SfxHandle, &str)> {
        self.entries[1..self.count]
            .iter()
            .enumerate()
            .map(|(i, e)| ((i + 1) as SfxHandle, e.name.as_str()))
    }

    fn find_hashed(&self, name: &str, bucket: usize) -> Option<SfxHandle> {
        let mut link = self.hash[bucket];
        while let Some(idx) = link {
            let entry = &self.entries[idx as usize];
            if entry.name.as_str() == name {
                return Some(idx as SfxHandle);
            }
            link = entry.next;
        }
        None
    }

    /// Lookup without touching the asset store.
    pub fn find(&self, name: &str) -> Option<SfxHandle> {
        let name = normalize_sound_name(name);
        self.find_hashed(&name, sfx_hash(&name))
    }

    fn insert(&mut self, name: SfxName, bucket: usize) -> SfxHandle {
        if self.count >= self.entries.len() {
            com_printf(&format!("SFX:Sound max {} reached\n", self.entries.len()));
            return INVALID_SFX;
        }
        let idx = self.count;
        self.entries[idx] = SfxEntry {
            name,
            next: self.hash[bucket],
        };
        self.hash[bucket] = Some(idx as u16);
        self.count += 1;
        idx as SfxHandle
    }

    /// Intern `name`, returning its handle, or `INVALID_SFX` if the name is
    /// empty, the sound does not exist, or the table is full. Misses are not
    /// cached; asking again probes the store again.
    pub fn register(&mut self, name: &str, assets: &dyn AssetStore) -> SfxHandle {
        let key = normalize_sound_name(name);
        if key.is_empty() {
            com_printf("S_RegisterSound: empty name\n");
            return INVALID_SFX;
        }

        let bucket = sfx_hash(&key);
        if let Some(handle) = self.find_hashed(&key, bucket) {
            return handle;
        }
        if !assets.sound_exists(&key) {
            return INVALID_SFX;
        }
        self.insert(key, bucket)
    }

    /// Register a batch of names. Existence probing runs in parallel; handles
    /// are assigned sequentially in input order, so the result matches calling
    /// `register` on each name in turn.
    pub fn register_list(&mut self, names: &[&str], assets: &dyn AssetStore) -> Vec<SfxHandle> {
        let keys: Vec<(SfxName, usize)> = names
            .iter()
            .map(|name| {
                let key = normalize_sound_name(name);
                let bucket = sfx_hash(&key);
                (key, bucket)
            })
            .collect();

        let table = &*self;
        let exists: Vec<bool> = keys
            .par_iter()
            .map(|(key, bucket)| {
                !key.is_empty()
                    && (table.find_hashed(key, *bucket).is_some() || assets.sound_exists(key))
            })
            .collect();

        keys.into_iter()
            .zip(exists)
            .map(|((key, bucket), exists)| {
                if key.is_empty() {
                    com_printf("S_RegisterSound: empty name\n");
                    return INVALID_SFX;
                }
                if !exists {
                    return INVALID_SFX;
                }
                match self.find_hashed(&key, bucket) {
                    Some(handle) => handle,
                    None => self.insert(key, bucket),
                }
            })
            .collect()
    }
}
