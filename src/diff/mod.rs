//! Unified-diff parsing primitives (the diff adapter).
//!
//! Turns the diff section of a patch into per-file change records. The
//! core never runs git; everything it knows about the touched files comes
//! from these records:
//! - new/old path per file (rename pairs when the diff carries rename
//!   headers; their absence only reduces matching power, it is no error)
//! - added/deleted flags
//!
//! The parsing is deterministic and line-based.

mod helpers;
mod parser;

#[cfg(test)]
mod tests;

// Re-export public API
pub use parser::{parse_file_changes, FileChange};
