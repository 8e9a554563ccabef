//! ChangeLog text regeneration.
//!
//! A pure function over the parsed, validated state: no further checks,
//! never fails, byte-identical on re-iteration.

use super::GitEmail;
use super::types::ChangelogEntry;

/// Distinct target folders across all entries, first-encountered order.
pub(super) fn folders(email: &GitEmail) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in &email.changelog_entries {
        if let Some(folder) = &entry.folder {
            if !out.contains(folder) {
                out.push(folder.clone());
            }
        }
    }
    out
}

/// The ChangeLog text for one folder, assembled from every contributing
/// entry: date + author block, co-authors, then per-entry references and
/// body lines.
pub(super) fn render_folder(email: &GitEmail, folder: &str) -> String {
    let entries: Vec<&ChangelogEntry> = email
        .changelog_entries
        .iter()
        .filter(|e| e.folder.as_deref() == Some(folder))
        .collect();

    let date = entries
        .first()
        .and_then(|e| e.author_lines.first())
        .and_then(|a| a.date.clone())
        .or_else(|| email.date.clone())
        .unwrap_or_default();

    let mut authors: Vec<String> = Vec::new();
    for entry in &entries {
        for author in entry.authors() {
            if !authors.iter().any(|a| a == author) {
                authors.push(author.to_string());
            }
        }
    }
    if authors.is_empty() {
        if let Some(author) = &email.author {
            authors.push(author.clone());
        }
    }

    let mut out = String::new();
    for (i, author) in authors.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{date}  {author}\n"));
        } else {
            out.push_str(&format!("\t    {author}\n"));
        }
    }
    for co_author in &email.co_authors {
        if !authors.contains(co_author) {
            out.push_str(&format!("\t    {co_author}\n"));
        }
    }
    out.push('\n');

    for entry in &entries {
        for pr in &entry.prs {
            out.push_str(&format!("\t{pr}\n"));
        }
        for line in &entry.lines {
            out.push_str(line);
            out.push('\n');
        }
    }

    out.trim_end().to_string()
}
