//! `gridmark-markdown` turns a [`TableRecord`](gridmark_model::TableRecord)
//! back into pipe-table text.
//!
//! Serialization is differential: untouched tables round-trip byte-for-byte,
//! value edits rewrite only the affected cell spans, and only structurally
//! edited tables are regenerated from scratch.

mod escape;
mod serialize;
mod span;

pub use escape::escape_pipes;
pub use serialize::serialize_table;
pub use span::split_pipe_spans;
