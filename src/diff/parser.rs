//! Core diff parsing logic.

use super::helpers::{normalize_path, parse_diff_git_line};

/// A single file touched by a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path after the change (forward slashes).
    pub path: String,
    /// Previous path, set only when the diff carries rename headers.
    pub old_path: Option<String>,
    /// File is created by the patch.
    pub is_new: bool,
    /// File is removed by the patch.
    pub is_deleted: bool,
}

impl FileChange {
    /// A plain in-place modification.
    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            old_path: None,
            is_new: false,
            is_deleted: false,
        }
    }

    /// A newly created file.
    pub fn added(path: impl Into<String>) -> Self {
        Self {
            is_new: true,
            ..Self::modified(path)
        }
    }

    /// A removed file.
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            is_deleted: true,
            ..Self::modified(path)
        }
    }

    /// A rename from `old` to `new`.
    pub fn renamed(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old_path: Some(old.into()),
            ..Self::modified(new)
        }
    }

    /// True when the adapter reported a rename for this file.
    pub fn is_rename(&self) -> bool {
        self.old_path.is_some()
    }
}

/// Parse per-file change records from raw unified diff output.
///
/// Only the file-level headers are interpreted; hunk content is skipped.
/// Unrecognized lines are ignored, so feeding the full `git format-patch`
/// tail (diffstat included) is fine.
pub fn parse_file_changes(diff_output: &str) -> Vec<FileChange> {
    let mut result: Vec<FileChange> = Vec::new();
    let mut current: Option<FileChange> = None;
    let mut in_hunk = false;

    for line in diff_output.lines() {
        // "diff --git a/path b/path" starts the next file record.
        if let Some(rest) = line.strip_prefix("diff --git ") {
            if let Some(change) = current.take() {
                result.push(change);
            }
            current = parse_diff_git_line(rest).map(FileChange::modified);
            in_hunk = false;
            continue;
        }

        let Some(change) = current.as_mut() else {
            continue;
        };

        if line.starts_with("@@ ") {
            in_hunk = true;
            continue;
        }
        if in_hunk {
            // Hunk content can legitimately start with "---"/"+++".
            continue;
        }

        if line.starts_with("new file mode ") {
            change.is_new = true;
        } else if line.starts_with("deleted file mode ") {
            change.is_deleted = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            change.old_path = Some(normalize_path(path));
        } else if let Some(path) = line.strip_prefix("rename to ") {
            change.path = normalize_path(path);
        } else if let Some(rest) = line.strip_prefix("--- ") {
            if rest == "/dev/null" {
                change.is_new = true;
            }
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            if rest == "/dev/null" {
                change.is_deleted = true;
            } else if let Some(path) = rest.strip_prefix("b/") {
                change.path = normalize_path(path);
            }
        }
    }

    if let Some(change) = current.take() {
        result.push(change);
    }

    result
}
