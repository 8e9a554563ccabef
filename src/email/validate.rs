//! Formatting rules applied to changelog block lines.
//!
//! Every rule is a pure function from a line to at most one violation;
//! the stanza parser decides which rules apply where. Rule categories
//! never short-circuit each other.

use super::types::{CheckError, ErrorKind};
use crate::diff::FileChange;
use crate::project;

/// Visible width limit per block line.
pub(crate) const LINE_LIMIT: usize = 100;

/// Columns a tab occupies when measuring visible width.
const TAB_WIDTH: usize = 8;

/// Visible width of a line with tabs expanded.
fn visible_width(line: &str) -> usize {
    line.chars()
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

/// Whole-line checks run on every non-blank block line: trailing
/// whitespace and the width limit. Returns the right-trimmed line that
/// parsing continues with.
pub(super) fn check_line<'a>(raw: &'a str, errors: &mut Vec<CheckError>) -> &'a str {
    let line = raw.trim_end();
    if line != raw {
        errors.push(CheckError::with_line(ErrorKind::TrailingWhitespace, raw));
    }
    if visible_width(line) > LINE_LIMIT {
        errors.push(CheckError::with_line(ErrorKind::LineLimit, line));
    }
    line
}

/// Shape check for an entry body line. `first` is true for the line that
/// opens a stanza body, which must read `\t* file: description`.
pub(super) fn entry_line_error(line: &str, first: bool) -> Option<CheckError> {
    if !line.starts_with('\t') {
        return Some(CheckError::with_line(ErrorKind::TabMissing, line));
    }
    if let Some(rest) = line.strip_prefix("\t*") {
        if !rest.starts_with(' ') {
            return Some(CheckError::with_line(ErrorKind::SpaceAfterAsterisk, line));
        }
        return None;
    }
    if first {
        return Some(CheckError::with_line(ErrorKind::FirstLineFormat, line));
    }
    None
}

/// Strict-mode hygiene rule: true when the diff touches process files
/// (ChangeLog, DATESTAMP, BASE-VER, DEV-PHASE) *and* normal files in the
/// same commit. A diff touching only process files is clean.
pub(super) fn mixes_process_files(changes: &[FileChange]) -> bool {
    let process = changes
        .iter()
        .filter(|c| project::is_process_file(&c.path))
        .count();
    process > 0 && process < changes.len()
}
