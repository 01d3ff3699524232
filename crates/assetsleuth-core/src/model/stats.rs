/// Per-folder rollup of unused assets.
use serde::Serialize;

/// Unused counts and total byte size for one folder prefix.
///
/// `Default` is the all-zero aggregate a folder reports once every
/// unused asset beneath it has been removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    pub unused_files: u64,
    pub unused_scenes: u64,
    pub unused_size: u64,
}

impl FolderStats {
    pub fn new(unused_files: u64, unused_scenes: u64, unused_size: u64) -> Self {
        Self {
            unused_files,
            unused_scenes,
            unused_size,
        }
    }

    /// Total number of unused assets (files and scenes).
    #[inline]
    pub fn total(&self) -> u64 {
        self.unused_files + self.unused_scenes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
