//! Splits a patch payload into mail headers, message body and diff text.
//!
//! Accepts `git format-patch` output (mbox separator, RFC-822 headers,
//! `---` scissors before the diffstat) as well as a bare commit message
//! followed by a diff. Header recovery is best-effort; a missing or
//! unparsable header only costs the fallback metadata the renderer uses.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use super::stanza;

/// Trailer prefix collecting co-authors, matched case-insensitively.
pub(super) const CO_AUTHORED_BY_PREFIX: &str = "co-authored-by:";

static SUBJECT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[PATCH[^\]]*\]\s*").unwrap());

static GIT_AUTHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>.*?)\s*<(?P<email>[^<>]*)>\s*$").unwrap());

/// The pieces of one patch payload.
pub(super) struct PatchParts {
    /// Subject with any `[PATCH ...]` tag removed.
    pub subject: String,
    /// Normalized `From:` author.
    pub author: Option<String>,
    /// ISO date from the `Date:` header.
    pub date: Option<String>,
    /// Message body lines between the headers and the diff.
    pub message: Vec<String>,
    /// Everything from the diff separator on.
    pub diff_text: String,
}

pub(super) fn split_patch(text: &str) -> PatchParts {
    let (head, diff_text) = split_at_diff(text);
    let lines: Vec<&str> = head.lines().collect();

    let mut subject = String::new();
    let mut author = None;
    let mut date = None;
    let mut i = 0;

    if is_mbox_separator(lines.first().copied()) {
        i = 1;
    }

    if has_mail_headers(&lines[i..]) {
        while i < lines.len() && !lines[i].is_empty() {
            let line = lines[i];
            if let Some(value) = line.strip_prefix("From: ") {
                author = Some(format_git_author(value));
            } else if let Some(value) = line.strip_prefix("Date: ") {
                date = iso_date(value);
            } else if let Some(value) = line.strip_prefix("Subject: ") {
                let mut folded = value.to_string();
                // RFC-822 folding: continuation lines start with whitespace.
                while i + 1 < lines.len()
                    && (lines[i + 1].starts_with(' ') || lines[i + 1].starts_with('\t'))
                {
                    i += 1;
                    folded.push(' ');
                    folded.push_str(lines[i].trim_start());
                }
                subject = folded;
            }
            i += 1;
        }
        if i < lines.len() {
            i += 1; // the blank header/body separator
        }
    } else {
        if let Some(first) = lines.get(i) {
            subject = first.to_string();
            i += 1;
        }
        if lines.get(i).is_some_and(|l| l.is_empty()) {
            i += 1;
        }
    }

    let subject = SUBJECT_TAG.replace(&subject, "").to_string();
    let message: Vec<String> = lines[i..].iter().map(|s| s.to_string()).collect();

    PatchParts {
        subject,
        author,
        date,
        message,
        diff_text: diff_text.to_string(),
    }
}

/// Index of the first message line that belongs to the changelog block:
/// the maximal suffix of the body matching the changelog grammar.
pub(super) fn changelog_block_start(message: &[String]) -> Option<usize> {
    for (i, raw) in message.iter().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        if stanza::starts_block(line) {
            return Some(i);
        }
    }
    None
}

/// All `Co-authored-by:` trailers of the message, in encounter order,
/// normalized and deduplicated.
pub(super) fn collect_co_authors(message: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in message {
        let line = raw.trim_end();
        let Some((prefix, rest)) = line.split_at_checked(CO_AUTHORED_BY_PREFIX.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(CO_AUTHORED_BY_PREFIX) {
            continue;
        }
        let co_author = format_git_author(rest);
        if !out.contains(&co_author) {
            out.push(co_author);
        }
    }
    out
}

/// Normalize `Name <email>` to the canonical `Name  <email>` form used
/// in ChangeLog files (two spaces before the address).
pub(super) fn format_git_author(value: &str) -> String {
    match GIT_AUTHOR.captures(value.trim()) {
        Some(caps) => format!("{}  <{}>", caps["name"].trim(), &caps["email"]),
        None => value.trim().to_string(),
    }
}

fn iso_date(value: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn is_mbox_separator(line: Option<&str>) -> bool {
    line.and_then(|l| l.strip_prefix("From "))
        .and_then(|rest| rest.split_whitespace().next())
        .is_some_and(|token| token.len() == 40 && token.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn has_mail_headers(lines: &[&str]) -> bool {
    lines
        .iter()
        .take_while(|l| !l.is_empty())
        .any(|l| l.starts_with("From: ") || l.starts_with("Date: ") || l.starts_with("Subject: "))
}

/// Cut the payload at the `---` scissors line or the first `diff --git`
/// header, whichever comes first.
fn split_at_diff(text: &str) -> (&str, &str) {
    let mut pos = 0;
    loop {
        let end = text[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(text.len());
        let line = &text[pos..end];
        if line == "---" || line.starts_with("diff --git ") {
            return (&text[..pos], &text[pos..]);
        }
        if end == text.len() {
            return (text, "");
        }
        pos = end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATCH: &str = "From 1234567890abcdef1234567890abcdef12345678 Mon Sep 17 00:00:00 2001\n\
         From: Martin Liska <mliska@suse.cz>\n\
         Date: Thu, 16 Apr 2020 21:40:15 +0200\n\
         Subject: [PATCH 2/3] Fix handling of something\n\
         \n\
         Some prose.\n\
         \n\
         Co-authored-by: Jakub Jelinek <jakub@redhat.com>\n\
         ---\n\
         diff --git a/gcc/foo.c b/gcc/foo.c\n";

    #[test]
    fn splits_format_patch_payload() {
        let parts = split_patch(PATCH);
        assert_eq!(parts.subject, "Fix handling of something");
        assert_eq!(
            parts.author.as_deref(),
            Some("Martin Liska  <mliska@suse.cz>")
        );
        assert_eq!(parts.date.as_deref(), Some("2020-04-16"));
        assert_eq!(parts.message.len(), 3);
        assert!(parts.diff_text.starts_with("---\n"));
    }

    #[test]
    fn accepts_bare_commit_message() {
        let parts = split_patch("Fix a typo\n\nLonger explanation.\n");
        assert_eq!(parts.subject, "Fix a typo");
        assert_eq!(parts.message, vec!["Longer explanation.".to_string()]);
        assert!(parts.author.is_none());
        assert!(parts.diff_text.is_empty());
    }

    #[test]
    fn empty_input_is_fine() {
        let parts = split_patch("");
        assert!(parts.subject.is_empty());
        assert!(parts.message.is_empty());
    }

    #[test]
    fn folded_subject_lines_are_joined() {
        let patch = "From: A <a@b.c>\n\
                     Subject: [PATCH] aarch64: Add an and/ior-based\n\
                     \x20movk pattern\n\
                     \n\
                     Body.\n";
        let parts = split_patch(patch);
        assert_eq!(parts.subject, "aarch64: Add an and/ior-based movk pattern");
    }

    #[test]
    fn author_normalization() {
        assert_eq!(
            format_git_author("John Miller <jm@example.com>"),
            "John Miller  <jm@example.com>"
        );
        assert_eq!(
            format_git_author("  John Miller2 <jm2@example.com>  "),
            "John Miller2  <jm2@example.com>"
        );
    }

    #[test]
    fn co_author_formats_and_dedup() {
        let message: Vec<String> = [
            "Co-authored-by: Jakub Jelinek <jakub@redhat.com>",
            "Co-Authored-By: John Miller <jm@example.com>",
            "co-authored-by: John Miller2  <jm2@example.com>",
            "Co-authored-by: Jakub Jelinek <jakub@redhat.com>",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let co_authors = collect_co_authors(&message);
        assert_eq!(
            co_authors,
            vec![
                "Jakub Jelinek  <jakub@redhat.com>",
                "John Miller  <jm@example.com>",
                "John Miller2  <jm2@example.com>",
            ]
        );
    }
}
