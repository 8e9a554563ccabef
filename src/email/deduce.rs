//! Folder deduction and diff cross-referencing.
//!
//! Deduction is a deterministic fallback over the diff's file records:
//! no scoring, every input maps to a defined `(folder, errors)` outcome.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

use super::types::{ChangelogEntry, CheckError, ErrorKind};
use crate::diff::FileChange;
use crate::project;

/// Every path a mentioned file can resolve against: new paths plus
/// rename sources when the adapter reported them.
fn diff_paths(changes: &[FileChange]) -> Vec<&str> {
    let mut out = Vec::new();
    for change in changes {
        out.push(change.path.as_str());
        if let Some(old) = &change.old_path {
            out.push(old.as_str());
        }
    }
    out
}

/// The folder implied by citing `file` relative to `path`, when the
/// suffix lines up on a component boundary.
fn implied_folder(path: &str, file: &str) -> Option<String> {
    if path == file {
        return Some(String::new());
    }
    let prefix = path.strip_suffix(file)?.strip_suffix('/')?;
    Some(prefix.to_string())
}

fn join_path(folder: &str, file: &str) -> String {
    if folder.is_empty() {
        file.to_string()
    } else {
        format!("{folder}/{file}")
    }
}

/// A stanza with no body at all has nothing to say about the change.
pub(super) fn check_descriptions(entries: &[ChangelogEntry], errors: &mut Vec<CheckError>) {
    for entry in entries {
        if entry.lines.is_empty() && !entry.broken {
            errors.push(CheckError::new(ErrorKind::MissingChangeDescription));
        }
    }
}

/// Fill in folders for entries without an explicit marker.
pub(super) fn deduce_folders(entries: &mut [ChangelogEntry], changes: &[FileChange]) {
    let paths = diff_paths(changes);

    // Locations of the source files the patch touches; a single location
    // makes file-less stanzas unambiguous.
    let source_locations: HashSet<String> = changes
        .iter()
        .filter(|c| !project::is_process_file(&c.path) && !project::in_ignored_location(&c.path))
        .map(|c| project::changelog_location_for(&c.path))
        .collect();

    for entry in entries.iter_mut() {
        if entry.folder.is_some() || entry.broken || entry.lines.is_empty() {
            continue;
        }

        let mut deduced: Option<String> = None;
        let mut consistent = true;

        if entry.files.is_empty() && entry.file_patterns.is_empty() {
            if source_locations.len() == 1 {
                deduced = source_locations.iter().next().cloned();
            }
        } else {
            for file in &entry.files {
                for path in &paths {
                    let Some(folder) = implied_folder(path, file) else {
                        continue;
                    };
                    if !folder.is_empty() && !project::is_changelog_location(&folder) {
                        continue;
                    }
                    match &deduced {
                        None => deduced = Some(folder),
                        Some(existing) if *existing != folder => consistent = false,
                        Some(_) => {}
                    }
                }
            }
        }

        if consistent {
            entry.folder = deduced;
        }
    }
}

/// Cross-reference mentioned files against the diff. Runs only when the
/// email is otherwise clean, mirroring the review workflow: structural
/// problems are fixed before file lists are trusted.
pub(super) fn cross_check(
    entries: &mut Vec<ChangelogEntry>,
    changes: &[FileChange],
    errors: &mut Vec<CheckError>,
) {
    let changed: HashSet<&str> = diff_paths(changes).into_iter().collect();
    let patterns = build_patterns(entries);

    // Mentioned files resolved to full paths, entry order.
    let mut mentioned: Vec<String> = Vec::new();
    for entry in entries.iter() {
        let Some(folder) = &entry.folder else { continue };
        for file in &entry.files {
            let full = join_path(folder, file);
            if !project::is_changelog_filename(&full) {
                mentioned.push(full);
            }
        }
    }

    for full in &mentioned {
        if !changed.contains(full.as_str()) {
            errors.push(CheckError::with_line(ErrorKind::FileNotChanged, full));
        }
    }

    add_entries_for_new_files(entries, changes, &mentioned, &patterns);

    // Every mention must live under the ChangeLog it was filed against.
    for entry in entries.iter() {
        let Some(folder) = &entry.folder else { continue };
        for file in &entry.files {
            let full = join_path(folder, file);
            if project::is_changelog_filename(&full) || !changed.contains(full.as_str()) {
                continue;
            }
            let expected = project::changelog_location_for(&full);
            if expected != *folder {
                errors.push(CheckError::with_line(
                    ErrorKind::WrongChangelogLocation {
                        given: folder.clone(),
                        expected,
                    },
                    &full,
                ));
            }
        }
    }
}

fn build_patterns(entries: &[ChangelogEntry]) -> Option<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for entry in entries {
        let Some(folder) = &entry.folder else { continue };
        for pattern in &entry.file_patterns {
            if let Ok(glob) = Glob::new(&join_path(folder, pattern)) {
                builder.add(glob);
                any = true;
            }
        }
    }
    if !any {
        return None;
    }
    builder.build().ok()
}

/// A new file nothing mentions still deserves an entry: append a
/// `New file.` line under its governing ChangeLog, creating the entry
/// (with the first stanza's authors and references) when missing.
fn add_entries_for_new_files(
    entries: &mut Vec<ChangelogEntry>,
    changes: &[FileChange],
    mentioned: &[String],
    patterns: &Option<GlobSet>,
) {
    if entries.is_empty() {
        return;
    }
    let mentioned_set: HashSet<&str> = mentioned.iter().map(|s| s.as_str()).collect();
    let loose_files: Vec<String> = entries
        .iter()
        .filter(|e| e.folder.is_none())
        .flat_map(|e| e.files.iter().cloned())
        .collect();

    let new_paths: Vec<String> = changes
        .iter()
        .filter(|c| {
            c.is_new
                && !project::is_process_file(&c.path)
                && !project::in_ignored_location(&c.path)
        })
        .map(|c| c.path.clone())
        .collect();

    for path in new_paths {
        let covered = mentioned_set.contains(path.as_str())
            || loose_files
                .iter()
                .any(|f| implied_folder(&path, f).is_some())
            || patterns.as_ref().is_some_and(|p| p.is_match(&path));
        if covered {
            continue;
        }

        let location = project::changelog_location_for(&path);
        let relative = if location.is_empty() {
            path.clone()
        } else {
            path[location.len() + 1..].to_string()
        };

        let index = match entries
            .iter()
            .position(|e| e.folder.as_deref() == Some(location.as_str()))
        {
            Some(i) => i,
            None => {
                let author_lines = entries[0].author_lines.clone();
                let prs = entries[0].prs.clone();
                entries.push(ChangelogEntry::new(Some(location), author_lines, prs));
                entries.len() - 1
            }
        };
        entries[index].lines.push(format!("\t* {relative}: New file."));
        entries[index].files.push(relative);
    }
}
