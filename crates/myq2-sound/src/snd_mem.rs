// snd_mem.rs - sound asset lookup on the game filesystem

use std::path::PathBuf;

use myq2_common::common::com_dprintf;

use crate::sound_types::AssetStore;

/// Extensions tried, in order, when a name has none.
pub const SOUND_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Asset store over a list of loose-file search directories. Earlier
/// directories win, like the game search path.
#[derive(Debug, Clone, Default)]
pub struct FsAssetStore {
    search_paths: Vec<PathBuf>,
}

impl FsAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_search_path(&mut self, dir: impl Into<PathBuf>) {
        self.search_paths.push(dir.into());
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// First file on the search path matching `name` as given or with one of
    /// `SOUND_EXTENSIONS` appended.
    pub fn find_sound(&self, name: &str) -> Option<PathBuf> {
        for dir in &self.search_paths {
            let bare = dir.join(name);
            if bare.is_file() {
                return Some(bare);
            }
            for ext in SOUND_EXTENSIONS {
                let path = dir.join(format!("{}.{}", name, ext));
                if path.is_file() {
                    return Some(path);
                }
            }
        }
        None
    }
}

impl AssetStore for FsAssetStore {
    fn sound_exists(&self, name: &str) -> bool {
        match self.find_sound(name) {
            Some(path) => {
                com_dprintf(&format!("FindFile: {}\n", path.display()));
                true
            }
            None => {
                com_dprintf(&format!("FindFile: can't find {}\n", name));
                false
            }
        }
    }
}
