/// Data model shared by the index and the analysis passes.
pub mod asset_id;
pub mod size;
pub mod stats;

pub use asset_id::{AssetId, SEPARATOR};
pub use stats::FolderStats;
