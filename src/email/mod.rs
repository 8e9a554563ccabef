//! Commit message and diff cross-validation.
//!
//! [`GitEmail`] consumes one patch payload (`git format-patch` output)
//! and produces the extracted ChangeLog entries, the accumulated rule
//! violations and, on demand, the regenerated per-directory ChangeLog
//! text. Construction is total: any syntactically-terminated input maps
//! to a result, never a panic or an `Err`. Instances share no state and
//! are independently re-entrant.

mod deduce;
mod lexer;
mod render;
mod stanza;
mod types;
mod validate;


// Re-export public API
pub use types::{AuthorLine, ChangelogEntry, CheckError, ErrorKind};

use crate::diff::{self, FileChange};
use crate::project;
use log::debug;

/// Subject of the nightly auto-commit that bumps the date stamp; it
/// carries no entries by design.
const DAILY_BUMP_SUBJECT: &str = "Daily bump.";

/// A fully parsed and validated patch.
#[derive(Debug, Clone)]
pub struct GitEmail {
    /// Commit subject with the `[PATCH]` tag removed.
    pub subject: String,
    /// Author from the `From:` header, normalized to `Name  <email>`.
    pub author: Option<String>,
    /// ISO date from the `Date:` header.
    pub date: Option<String>,
    /// Accumulated violations, in source order.
    pub errors: Vec<CheckError>,
    /// Extracted entries, in source order (auto-added ones last).
    pub changelog_entries: Vec<ChangelogEntry>,
    /// `Co-authored-by:` trailers, encounter order, deduplicated.
    pub co_authors: Vec<String>,
    changes: Vec<FileChange>,
}

impl GitEmail {
    /// Parse and validate one patch. `strict` adds the commit-hygiene
    /// rules used on release branches.
    pub fn new(patch: &str, strict: bool) -> Self {
        let parts = lexer::split_patch(patch);
        let changes = diff::parse_file_changes(&parts.diff_text);
        let mut email = GitEmail {
            subject: parts.subject,
            author: parts.author,
            date: parts.date,
            errors: Vec::new(),
            changelog_entries: Vec::new(),
            co_authors: lexer::collect_co_authors(&parts.message),
            changes,
        };

        if email.subject == DAILY_BUMP_SUBJECT {
            return email;
        }

        let process = email
            .changes
            .iter()
            .filter(|c| project::is_process_file(&c.path))
            .count();
        if !email.changes.is_empty() && process == email.changes.len() {
            // A correction to the ChangeLog files themselves; no entry
            // needed.
            return email;
        }
        if strict && validate::mixes_process_files(&email.changes) {
            email.errors.push(CheckError::new(ErrorKind::MixedProcessCommit));
            return email;
        }

        let Some(start) = lexer::changelog_block_start(&parts.message) else {
            return email;
        };
        debug!("changelog block starts at message line {start}");

        let outcome = stanza::parse_stanzas(&parts.message[start..]);
        email.changelog_entries = outcome.entries;
        email.errors.extend(outcome.errors);

        for entry in &mut email.changelog_entries {
            entry.parse_file_names();
        }
        deduce::check_descriptions(&email.changelog_entries, &mut email.errors);
        deduce::deduce_folders(&mut email.changelog_entries, &email.changes);

        if email.errors.is_empty() {
            deduce::cross_check(
                &mut email.changelog_entries,
                &email.changes,
                &mut email.errors,
            );
        }
        debug!(
            "parsed {} entries, {} errors",
            email.changelog_entries.len(),
            email.errors.len()
        );
        email
    }

    /// True when the patch passed every check.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// The files the patch touches, as reported by the diff adapter.
    pub fn changed_files(&self) -> &[FileChange] {
        &self.changes
    }

    /// Regenerated ChangeLog text, one `(folder, text)` pair per target
    /// directory in first-encountered order. Lazy, restartable and pure
    /// over the parsed state.
    pub fn to_changelog_entries(&self) -> impl Iterator<Item = (String, String)> + '_ {
        render::folders(self)
            .into_iter()
            .map(|folder| {
                let text = render::render_folder(self, &folder);
                (folder, text)
            })
    }
}
