//! Flat-file persistence of a [`DirectoryTree`](crate::model::DirectoryTree).
//!
//! One record per line, four tab-separated fields, no header:
//!
//! ```text
//! id<TAB>name<TAB>is_dir<TAB>parent_id
//! ```
//!
//! `is_dir` is `0` or `1`; `parent_id` is [`NO_PARENT`] for the root. Records
//! are written in pre-order, so a parent always precedes its descendants,
//! which is what lets the reader wire children up in a single pass.

pub mod reader;
pub mod writer;

pub use reader::{
    reconstruct_tree, reconstruct_tree_from_file, reconstruct_tree_into, Reconstruction,
};
pub use writer::{free_and_write, write_subtree, write_tree, write_tree_to_path, SaveError};

/// Persisted parent id of the root.
pub const NO_PARENT: i64 = -1;

/// Fields per record.
pub const FIELD_COUNT: usize = 4;

/// `true` if `name` can be stored in one field: non-empty, with no tab, CR
/// or LF.
pub fn is_representable_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['\t', '\n', '\r'])
}

pub(crate) fn tsv_reader<R: std::io::Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

pub(crate) fn tsv_writer<W: std::io::Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink)
}
