//! Data model for parsed commit messages.

use std::fmt;

use super::validate::LINE_LIMIT;

/// One author attribution line of a stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorLine {
    /// Normalized author string: `Name  <email>`.
    pub author: String,
    /// ISO date; present only on the first author line of a stanza.
    pub date: Option<String>,
}

impl AuthorLine {
    pub fn new(author: impl Into<String>, date: Option<String>) -> Self {
        Self {
            author: author.into(),
            date,
        }
    }
}

/// One logical ChangeLog entry extracted from a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Target ChangeLog directory; `None` when it could not be deduced.
    pub folder: Option<String>,
    /// Author lines in stanza order; only the first may carry a date.
    pub author_lines: Vec<AuthorLine>,
    /// PR/DR references, deduplicated across the whole email.
    pub prs: Vec<String>,
    /// Raw tab-prefixed entry body, used verbatim for rendering.
    pub lines: Vec<String>,
    /// Files named in asterisk lines, insertion order, deduplicated.
    pub files: Vec<String>,
    /// File tokens containing `*`, matched as globs against the diff.
    pub file_patterns: Vec<String>,
    /// Structure was too damaged to deduce a folder for this entry.
    pub(crate) broken: bool,
}

impl ChangelogEntry {
    pub(crate) fn new(
        folder: Option<String>,
        author_lines: Vec<AuthorLine>,
        prs: Vec<String>,
    ) -> Self {
        Self {
            folder,
            author_lines,
            prs,
            lines: Vec::new(),
            files: Vec::new(),
            file_patterns: Vec::new(),
            broken: false,
        }
    }

    /// Author strings in stanza order, deduplicated.
    pub fn authors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for line in &self.author_lines {
            if !out.contains(&line.author.as_str()) {
                out.push(&line.author);
            }
        }
        out
    }

    /// Extract `files` and `file_patterns` from the entry body.
    ///
    /// An asterisk line opens a comma-separated file list that runs until
    /// a `:` or an opening paren (the symbol list), possibly spanning
    /// continuation lines.
    pub(crate) fn parse_file_names(&mut self) {
        let mut in_file_list = false;
        let lines = self.lines.clone();
        for line in &lines {
            let content = match star_content(line) {
                Some(rest) => {
                    in_file_list = true;
                    rest
                }
                None if in_file_list => line.trim(),
                None => continue,
            };
            let end = content.find([':', '(']);
            let list_part = match end {
                Some(i) => &content[..i],
                None => content,
            };
            for token in list_part.split([',', ' ']) {
                let token = token.trim();
                if !token.is_empty() {
                    self.add_file(token);
                }
            }
            if end.is_some() {
                in_file_list = false;
            }
        }
    }

    fn add_file(&mut self, token: &str) {
        if token.contains('*') {
            if !self.file_patterns.iter().any(|p| p == token) {
                self.file_patterns.push(token.to_string());
            }
        } else if !self.files.iter().any(|f| f == token) {
            self.files.push(token.to_string());
        }
    }
}

/// The content of an asterisk entry line, with the `\t*` prefix and any
/// following spaces removed.
fn star_content(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("\t*")?;
    Some(rest.trim_start_matches(' '))
}

/// The closed vocabulary of ChangeLog violations.
///
/// The rendered `message()` strings are a wire contract: consumers match
/// on them, so rewording any of them is a breaking change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An entry body line does not start with a tab.
    TabMissing,
    /// The first body line of a stanza is not `\t* `.
    FirstLineFormat,
    /// `\t*` not followed by exactly one space.
    SpaceAfterAsterisk,
    /// A block line carries trailing whitespace.
    TrailingWhitespace,
    /// A block line exceeds the visible width limit.
    LineLimit,
    /// A second author line is not indented with tab + 4 spaces.
    AdditionalAuthorIndent,
    /// `PR <number>` without a component.
    MissingPrComponent,
    /// `PR <component>/<number>` with an unknown component.
    InvalidPrComponent,
    /// A stanza has no entry body at all.
    MissingChangeDescription,
    /// A mentioned file does not appear in the diff.
    FileNotChanged,
    /// A mentioned file lives under a different ChangeLog.
    WrongChangelogLocation { given: String, expected: String },
    /// Entry structure too damaged to resolve a target ChangeLog.
    UndeducibleChangelog,
    /// Strict mode: process files mixed with normal changes.
    MixedProcessCommit,
}

impl ErrorKind {
    /// The fixed message string for this violation.
    pub fn message(&self) -> String {
        match self {
            ErrorKind::TabMissing => "line should start with a tab".to_string(),
            ErrorKind::FirstLineFormat => {
                "first line should start with a tab, asterisk and space".to_string()
            }
            ErrorKind::SpaceAfterAsterisk => "one space should follow asterisk".to_string(),
            ErrorKind::TrailingWhitespace => "trailing whitespace".to_string(),
            ErrorKind::LineLimit => {
                format!("line limit exceeds {LINE_LIMIT} characters")
            }
            ErrorKind::AdditionalAuthorIndent => {
                "additional author must prepend with tab and 4 spaces".to_string()
            }
            ErrorKind::MissingPrComponent => "missing PR component".to_string(),
            ErrorKind::InvalidPrComponent => "invalid PR component".to_string(),
            ErrorKind::MissingChangeDescription => "missing description of a change".to_string(),
            ErrorKind::FileNotChanged => "file not changed in a patch".to_string(),
            ErrorKind::WrongChangelogLocation { given, expected } => {
                format!("wrong ChangeLog location \"{given}\", should be \"{expected}\"")
            }
            ErrorKind::UndeducibleChangelog => "could not deduce ChangeLog file".to_string(),
            ErrorKind::MixedProcessCommit => {
                "ChangeLog, DATESTAMP, BASE-VER and DEV-PHASE updates should be done \
                 separately from normal commits"
                    .to_string()
            }
        }
    }
}

/// A single accumulated violation; never aborts parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub kind: ErrorKind,
    /// The offending raw line, when one applies.
    pub line: Option<String>,
}

impl CheckError {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    pub fn with_line(kind: ErrorKind, line: &str) -> Self {
        Self {
            kind,
            line: Some(line.to_string()),
        }
    }

    /// The fixed message string for this violation.
    pub fn message(&self) -> String {
        self.kind.message()
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(f, "{}: \"{}\"", self.kind.message(), line),
            None => write!(f, "{}", self.kind.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_list_stops_at_colon() {
        let mut entry = ChangelogEntry::new(None, Vec::new(), Vec::new());
        entry
            .lines
            .push("\t* pt.c (tsubst): Use build_converted_constant_expr.".to_string());
        entry.parse_file_names();
        assert_eq!(entry.files, vec!["pt.c"]);
    }

    #[test]
    fn file_list_stops_at_paren() {
        let mut entry = ChangelogEntry::new(None, Vec::new(), Vec::new());
        entry
            .lines
            .push("\t* config/aarch64/aarch64-protos.h (aarch64_bit_mask): Declare.".to_string());
        entry.parse_file_names();
        assert_eq!(entry.files, vec!["config/aarch64/aarch64-protos.h"]);
    }

    #[test]
    fn file_list_spans_lines() {
        let mut entry = ChangelogEntry::new(None, Vec::new(), Vec::new());
        entry.lines = vec![
            "\t* contracts.adb, einfo.adb, exp_ch9.adb, sem_ch12.adb, sem_ch4.adb,".to_string(),
            "\tsem_ch7.adb, sem_ch8.adb, sem_elab.adb, sem_type.adb, sem_util.adb".to_string(),
            "\t(Is_Package_Or_Generic_Package): Reuse where possible.".to_string(),
        ];
        entry.parse_file_names();
        assert_eq!(
            entry.files,
            vec![
                "contracts.adb",
                "einfo.adb",
                "exp_ch9.adb",
                "sem_ch12.adb",
                "sem_ch4.adb",
                "sem_ch7.adb",
                "sem_ch8.adb",
                "sem_elab.adb",
                "sem_type.adb",
                "sem_util.adb",
            ]
        );
    }

    #[test]
    fn wildcard_tokens_become_patterns() {
        let mut entry = ChangelogEntry::new(None, Vec::new(), Vec::new());
        entry
            .lines
            .push("\t* gcc.target/aarch64/advsimd-intrinsics/*.c: Update.".to_string());
        entry.parse_file_names();
        assert!(entry.files.is_empty());
        assert_eq!(
            entry.file_patterns,
            vec!["gcc.target/aarch64/advsimd-intrinsics/*.c"]
        );
    }

    #[test]
    fn duplicate_mentions_collapse() {
        let mut entry = ChangelogEntry::new(None, Vec::new(), Vec::new());
        entry.lines = vec![
            "\t* pt.c (tsubst): Fix.".to_string(),
            "\t* pt.c (tsubst_copy): Likewise.".to_string(),
        ];
        entry.parse_file_names();
        assert_eq!(entry.files, vec!["pt.c"]);
    }

    #[test]
    fn authors_deduplicate_preserving_order() {
        let entry = ChangelogEntry::new(
            None,
            vec![
                AuthorLine::new("A  <a@b.c>", Some("2020-01-01".to_string())),
                AuthorLine::new("B  <b@c.d>", None),
                AuthorLine::new("A  <a@b.c>", None),
            ],
            Vec::new(),
        );
        assert_eq!(entry.authors(), vec!["A  <a@b.c>", "B  <b@c.d>"]);
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            ErrorKind::LineLimit.message(),
            "line limit exceeds 100 characters"
        );
        assert_eq!(
            ErrorKind::WrongChangelogLocation {
                given: "gcc".to_string(),
                expected: "gcc/testsuite".to_string(),
            }
            .message(),
            "wrong ChangeLog location \"gcc\", should be \"gcc/testsuite\""
        );
        assert_eq!(
            ErrorKind::MixedProcessCommit.message(),
            "ChangeLog, DATESTAMP, BASE-VER and DEV-PHASE updates should be done \
             separately from normal commits"
        );
    }
}
