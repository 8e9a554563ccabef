//! Stanza parsing: groups changelog-block lines into entries.
//!
//! The block is a permissive free-text grammar: author lines, directory
//! markers, PR/DR references and tab-prefixed entry bodies. Parsing never
//! fails; everything that does not fit the grammar either accumulates a
//! violation or is ignored, and whatever could be recovered is kept.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::lexer::CO_AUTHORED_BY_PREFIX;
use super::types::{AuthorLine, ChangelogEntry, CheckError, ErrorKind};
use super::validate;
use crate::project;

/// `Name  <email>`, optionally followed by two spaces and an ISO date.
/// Only stanza-opening author lines match; continuations are tab-indented.
static AUTHOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<name>\S[^\t<]*?) +<(?P<email>[^<>@ ]+@[^<> ]+)>(?:  (?P<date>\d{4}-\d{2}-\d{2}))?$",
    )
    .unwrap()
});

/// The same author line in the on-disk ChangeLog convention, date first.
static DATED_AUTHOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>\d{4}-\d{2}-\d{2})  (?P<name>\S[^\t<]*?) +<(?P<email>[^<>@ ]+@[^<> ]+)>$",
    )
    .unwrap()
});

/// A continuation author line: tab, captured spaces, `Name  <email>`.
static ADDITIONAL_AUTHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\t(?P<spaces> *)(?P<name>\S[^\t<]*?) +<(?P<email>[^<>@ ]+@[^<> ]+)>$").unwrap()
});

/// `gcc/ChangeLog:`-style markers, including the bare root `ChangeLog:`.
static CHANGELOG_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[Ff]or +)?(?P<folder>[\w.+-]+(?:/[\w.+-]+)*/)?ChangeLog:?$").unwrap()
});

static PR_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\tPR (?P<component>[a-z+-]+)/(?P<number>[0-9]+)$").unwrap());

static PR_WITHOUT_COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\tPR [0-9]+$").unwrap());

static DR_REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\tDR [0-9]+$").unwrap());

/// Review trailers that may sit inside the block without being entries.
const REVIEW_PREFIXES: &[&str] = &[
    "signed-off-by:",
    "acked-by:",
    "tested-by:",
    "reviewed-by:",
    "reviewed-on:",
    "suggested-by:",
    "reported-by:",
    "cc:",
];

const CHERRY_PICK_PREFIX: &str = "(cherry picked from commit ";

/// True for lines that can open the changelog block.
pub(super) fn starts_block(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    changelog_marker(line).is_some()
        || DATED_AUTHOR_LINE.is_match(line)
        || AUTHOR_LINE.is_match(line)
        || ADDITIONAL_AUTHOR.is_match(line)
        || line.starts_with("\t*")
        || PR_REFERENCE.is_match(line)
        || PR_WITHOUT_COMPONENT.is_match(line)
        || DR_REFERENCE.is_match(line)
        || lower.starts_with(CO_AUTHORED_BY_PREFIX)
}

/// The directory named by a marker line, if any. `Some("")` is the
/// repository root.
fn changelog_marker(line: &str) -> Option<String> {
    if let Some(caps) = CHANGELOG_MARKER.captures(line) {
        return Some(
            caps.name("folder")
                .map(|m| m.as_str().trim_end_matches('/').to_string())
                .unwrap_or_default(),
        );
    }
    let bare = line.trim_end_matches(':').trim_end_matches('/');
    if project::is_changelog_location(bare) {
        return Some(bare.to_string());
    }
    None
}

pub(super) struct StanzaOutcome {
    pub entries: Vec<ChangelogEntry>,
    pub errors: Vec<CheckError>,
}

/// Parse the changelog block into entries.
pub(super) fn parse_stanzas(changes: &[String]) -> StanzaOutcome {
    let mut entries: Vec<ChangelogEntry> = Vec::new();
    let mut errors: Vec<CheckError> = Vec::new();

    // Author lines and references seen before an entry opens seed every
    // entry of the current stanza group.
    let mut top_authors: Vec<AuthorLine> = Vec::new();
    let mut top_prs: Vec<String> = Vec::new();
    // A fresh top-level author after entries were made starts a new group.
    let mut stale_authors = false;

    let mut open: Option<usize> = None;
    let mut open_implicit = false;

    for raw in changes {
        if raw.trim().is_empty() {
            // A blank line ends an entry we opened without a marker; a
            // marker entry may span paragraphs.
            if open_implicit {
                open = None;
                open_implicit = false;
            }
            continue;
        }

        let line = validate::check_line(raw, &mut errors);

        let lower = line.to_ascii_lowercase();
        if lower.starts_with(CO_AUTHORED_BY_PREFIX) {
            continue; // captured by the lexer
        }
        if REVIEW_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            continue;
        }
        if line.starts_with(CHERRY_PICK_PREFIX) {
            continue;
        }

        if let Some(folder) = changelog_marker(line) {
            entries.push(ChangelogEntry::new(
                Some(folder),
                top_authors.clone(),
                top_prs.clone(),
            ));
            open = Some(entries.len() - 1);
            open_implicit = false;
            stale_authors = true;
            continue;
        }

        if let Some(caps) = DATED_AUTHOR_LINE
            .captures(line)
            .or_else(|| AUTHOR_LINE.captures(line))
        {
            if stale_authors {
                top_authors.clear();
                top_prs.clear();
                stale_authors = false;
            }
            let author = AuthorLine::new(
                format!("{}  <{}>", caps["name"].trim(), &caps["email"]),
                caps.name("date").map(|m| m.as_str().to_string()),
            );
            if !top_authors.contains(&author) {
                top_authors.push(author);
            }
            open = None;
            open_implicit = false;
            continue;
        }

        if let Some(caps) = ADDITIONAL_AUTHOR.captures(line) {
            if caps["spaces"].len() != 4 {
                errors.push(CheckError::with_line(
                    ErrorKind::AdditionalAuthorIndent,
                    line,
                ));
                continue;
            }
            let author = AuthorLine::new(
                format!("{}  <{}>", caps["name"].trim(), &caps["email"]),
                None,
            );
            match open {
                Some(i) => {
                    if !entries[i].author_lines.contains(&author) {
                        entries[i].author_lines.push(author);
                    }
                }
                None => {
                    if !top_authors.contains(&author) {
                        top_authors.push(author);
                    }
                }
            }
            continue;
        }

        if let Some(caps) = PR_REFERENCE.captures(line) {
            if !project::is_bug_component(&caps["component"]) {
                errors.push(CheckError::with_line(ErrorKind::InvalidPrComponent, line));
                continue;
            }
            push_reference(&mut entries, &mut top_prs, open, line);
            continue;
        }
        if PR_WITHOUT_COMPONENT.is_match(line) {
            errors.push(CheckError::with_line(ErrorKind::MissingPrComponent, line));
            continue;
        }
        if DR_REFERENCE.is_match(line) {
            push_reference(&mut entries, &mut top_prs, open, line);
            continue;
        }

        // Everything else is entry content, mis-indented content, or
        // stray prose.
        let tabbed = line.starts_with('\t');
        let indented = line.starts_with(' ');
        let starred = line.starts_with('*');
        let bare_token = !line.contains(' ');

        match open {
            Some(i) if tabbed || indented || starred || bare_token => {
                let first = entries[i].lines.is_empty();
                if let Some(err) = validate::entry_line_error(line, first) {
                    errors.push(err);
                }
                entries[i].lines.push(line.to_string());
            }
            Some(i) if open_implicit => {
                // Prose ran straight into a deduced entry with no blank
                // line between; the entry boundary is lost.
                errors.push(CheckError::with_line(ErrorKind::UndeducibleChangelog, line));
                entries[i].broken = true;
                open = None;
                open_implicit = false;
            }
            Some(i) => {
                errors.push(CheckError::with_line(ErrorKind::TabMissing, line));
                entries[i].lines.push(line.to_string());
            }
            None if tabbed || indented || starred || bare_token => {
                let mut entry =
                    ChangelogEntry::new(None, top_authors.clone(), top_prs.clone());
                if let Some(err) = validate::entry_line_error(line, true) {
                    errors.push(err);
                }
                entry.lines.push(line.to_string());
                entries.push(entry);
                open = Some(entries.len() - 1);
                open_implicit = true;
                stale_authors = true;
            }
            None => {} // stray prose outside any entry
        }
    }

    // A reference is cited once per email: later duplicates drop out.
    let mut seen: HashSet<String> = HashSet::new();
    for entry in &mut entries {
        entry.prs.retain(|pr| seen.insert(pr.clone()));
    }

    StanzaOutcome { entries, errors }
}

fn push_reference(
    entries: &mut [ChangelogEntry],
    top_prs: &mut Vec<String>,
    open: Option<usize>,
    line: &str,
) {
    let reference = line.trim_start().to_string();
    match open {
        Some(i) => entries[i].prs.push(reference),
        None => top_prs.push(reference),
    }
}
