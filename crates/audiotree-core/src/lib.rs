//! audiotree core — tree building, pruning, and persistence.
//!
//! This crate contains all business logic and never writes to the terminal.
//! It mirrors a directory subtree as an in-memory tree that keeps only
//! directories and audio files, and stores that tree in a flat file so it
//! can be reloaded without walking the filesystem again.
//!
//! # Modules
//!
//! - [`model`] — Id-addressed entry arena and supporting types.
//! - [`builder`] — Filesystem walk with filtering and sibling ordering.
//! - [`prune`] — Removal of directories left empty by filtering.
//! - [`persist`] — Tab-separated flat-file writer and reader.
//! - [`filter`] — Audio extension allow-list.
//! - [`config`] — JSON library configuration.
//! - [`display`] — Plain-text tree rendering.
//! - [`error`] — Shared error type.

pub mod builder;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod model;
pub mod persist;
pub mod prune;

pub use builder::{create_directory_tree, LibraryScan, TreeBuilder};
pub use config::LibraryConfig;
pub use error::{Result, TreeError};
pub use filter::AudioExtensions;
pub use model::{DirectoryTree, Entry, EntryId};
