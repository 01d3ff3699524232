/// Analysis passes over the backlink index.

pub mod backlinks;
pub mod unused;

pub use backlinks::{files_that_reference, scenes_that_contain};
pub use unused::{update_unused_assets, UnusedSnapshot};
