//! The `print` command: regenerate ChangeLog text from a patch.

use crate::cli::PrintArgs;
use crate::error::{ChlogError, Result};

use super::check::read_email;

pub(super) fn cmd_print(args: PrintArgs) -> Result<()> {
    let email = read_email(&args.patch, false)?;
    if !email.success() {
        return Err(ChlogError::ValidationError(format!(
            "{} carries {} ChangeLog error(s); run `chlog check` first",
            args.patch.display(),
            email.errors.len()
        )));
    }

    for (folder, text) in email.to_changelog_entries() {
        let header = if folder.is_empty() {
            "ChangeLog:".to_string()
        } else {
            format!("{folder}/ChangeLog:")
        };
        println!("{header}");
        println!();
        println!("{text}");
        println!();
    }
    Ok(())
}
