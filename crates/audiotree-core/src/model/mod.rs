//! Data model for the audio library tree.
//!
//! Re-exports the id-addressed arena and supporting types.

pub mod entry;
pub mod sparse;
pub mod tree;

pub use entry::{join_path, Entry, EntryId, IdSession};
pub use sparse::SparseIdIndex;
pub use tree::DirectoryTree;
