//! The `check` command: validate patches and report violations.

use crate::cli::{CheckArgs, OutputFormat};
use crate::email::GitEmail;
use crate::error::{ChlogError, Result};
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// JSON report for one checked patch.
#[derive(Serialize)]
struct PatchReport {
    patch: String,
    ok: bool,
    errors: Vec<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<String>,
}

pub(super) fn cmd_check(args: CheckArgs) -> Result<()> {
    let mut failed = 0usize;
    let mut reports: Vec<PatchReport> = Vec::new();

    for path in &args.patches {
        let email = read_email(path, args.strict)?;
        debug!(
            "{}: {} changed files, {} entries, {} errors",
            path.display(),
            email.changed_files().len(),
            email.changelog_entries.len(),
            email.errors.len()
        );
        if !email.success() {
            failed += 1;
        }
        match args.format {
            OutputFormat::Text => print_text(path, &email),
            OutputFormat::Json => reports.push(report(path, &email)),
        }
    }

    if args.format == OutputFormat::Json {
        let rendered = serde_json::to_string_pretty(&reports)
            .map_err(|e| ChlogError::UserError(format!("cannot render report: {e}")))?;
        println!("{rendered}");
    }

    if failed > 0 {
        return Err(ChlogError::ValidationError(format!(
            "{failed} of {} patch(es) failed",
            args.patches.len()
        )));
    }
    Ok(())
}

pub(super) fn read_email(path: &Path, strict: bool) -> Result<GitEmail> {
    let text = fs::read_to_string(path)
        .map_err(|e| ChlogError::UserError(format!("cannot read {}: {e}", path.display())))?;
    Ok(GitEmail::new(&text, strict))
}

fn print_text(path: &Path, email: &GitEmail) {
    if email.success() {
        println!("OK: {}", path.display());
        return;
    }
    println!("FAILED: {}", path.display());
    for err in &email.errors {
        println!("  ERR: {err}");
    }
}

fn report(path: &Path, email: &GitEmail) -> PatchReport {
    PatchReport {
        patch: path.display().to_string(),
        ok: email.success(),
        errors: email
            .errors
            .iter()
            .map(|e| ErrorReport {
                message: e.message(),
                line: e.line.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CheckArgs, OutputFormat};
    use crate::exit_codes;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CLEAN_PATCH: &str = "From 1234567890abcdef1234567890abcdef12345678 Mon Sep 17 00:00:00 2001\n\
         From: Martin Liska <mliska@suse.cz>\n\
         Date: Thu, 16 Apr 2020 21:40:15 +0200\n\
         Subject: [PATCH] Fix quoting\n\
         \n\
         gcc/ChangeLog:\n\
         \n\
         \t* collect2.c (main): Fix quoting.\n\
         ---\n\
         diff --git a/gcc/collect2.c b/gcc/collect2.c\n\
         index 1111111..2222222 100644\n\
         --- a/gcc/collect2.c\n\
         +++ b/gcc/collect2.c\n\
         @@ -1 +1 @@\n\
         -old\n\
         +new\n";

    const BROKEN_PATCH: &str = "From 1234567890abcdef1234567890abcdef12345678 Mon Sep 17 00:00:00 2001\n\
         From: Martin Liska <mliska@suse.cz>\n\
         Date: Thu, 16 Apr 2020 21:40:15 +0200\n\
         Subject: [PATCH] Fix quoting\n\
         \n\
         gcc/ChangeLog:\n\
         \n\
         \tPR 12345\n\
         \t* collect2.c (main): Fix quoting.\n\
         ---\n\
         diff --git a/gcc/collect2.c b/gcc/collect2.c\n\
         index 1111111..2222222 100644\n\
         --- a/gcc/collect2.c\n\
         +++ b/gcc/collect2.c\n\
         @@ -1 +1 @@\n\
         -old\n\
         +new\n";

    fn write_patch(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn check_args(path: &std::path::Path, format: OutputFormat) -> CheckArgs {
        CheckArgs {
            patches: vec![path.to_path_buf()],
            strict: false,
            format,
        }
    }

    #[test]
    fn clean_patch_passes() {
        let file = write_patch(CLEAN_PATCH);
        let result = cmd_check(check_args(file.path(), OutputFormat::Text));
        assert!(result.is_ok());
    }

    #[test]
    fn broken_patch_fails_with_validation_exit_code() {
        let file = write_patch(BROKEN_PATCH);
        let result = cmd_check(check_args(file.path(), OutputFormat::Text));
        let err = result.unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_FAILURE);
        assert!(err.to_string().contains("1 of 1 patch(es) failed"));
    }

    #[test]
    fn json_format_also_fails_on_errors() {
        let file = write_patch(BROKEN_PATCH);
        let result = cmd_check(check_args(file.path(), OutputFormat::Json));
        assert_eq!(
            result.unwrap_err().exit_code(),
            exit_codes::VALIDATION_FAILURE
        );
    }

    #[test]
    fn missing_file_is_a_user_error() {
        let args = CheckArgs {
            patches: vec!["/nonexistent/nope.patch".into()],
            strict: false,
            format: OutputFormat::Text,
        };
        let err = cmd_check(args).unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("cannot read"));
    }
}
