use super::*;

fn modified_diff(path: &str) -> String {
    format!(
        "diff --git a/{path} b/{path}\n\
         index 1111111..2222222 100644\n\
         --- a/{path}\n\
         +++ b/{path}\n\
         @@ -1,2 +1,2 @@\n\
         -old line\n\
         +new line\n"
    )
}

#[test]
fn parses_modified_file() {
    let changes = parse_file_changes(&modified_diff("gcc/cp/pt.c"));
    assert_eq!(changes, vec![FileChange::modified("gcc/cp/pt.c")]);
}

#[test]
fn parses_new_file() {
    let diff = "diff --git a/gcc/testsuite/gcc.dg/pr1.c b/gcc/testsuite/gcc.dg/pr1.c\n\
                new file mode 100644\n\
                index 0000000..2222222\n\
                --- /dev/null\n\
                +++ b/gcc/testsuite/gcc.dg/pr1.c\n\
                @@ -0,0 +1 @@\n\
                +int main () { return 0; }\n";
    let changes = parse_file_changes(diff);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].is_new);
    assert!(!changes[0].is_deleted);
    assert_eq!(changes[0].path, "gcc/testsuite/gcc.dg/pr1.c");
}

#[test]
fn parses_deleted_file() {
    let diff = "diff --git a/gcc/obsolete.c b/gcc/obsolete.c\n\
                deleted file mode 100644\n\
                index 1111111..0000000\n\
                --- a/gcc/obsolete.c\n\
                +++ /dev/null\n\
                @@ -1 +0,0 @@\n\
                -int unused;\n";
    let changes = parse_file_changes(diff);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].is_deleted);
    assert_eq!(changes[0].path, "gcc/obsolete.c");
}

#[test]
fn parses_rename_pair() {
    let diff = "diff --git a/gcc/doc/old.texi b/gcc/doc/new.texi\n\
                similarity index 98%\n\
                rename from gcc/doc/old.texi\n\
                rename to gcc/doc/new.texi\n\
                index 1111111..2222222 100644\n\
                --- a/gcc/doc/old.texi\n\
                +++ b/gcc/doc/new.texi\n\
                @@ -1 +1 @@\n\
                -@node Old\n\
                +@node New\n";
    let changes = parse_file_changes(diff);
    assert_eq!(
        changes,
        vec![FileChange::renamed("gcc/doc/old.texi", "gcc/doc/new.texi")]
    );
    assert!(changes[0].is_rename());
}

#[test]
fn parses_multiple_files() {
    let diff = format!(
        "{}{}",
        modified_diff("gcc/cp/pt.c"),
        modified_diff("gcc/cp/call.c")
    );
    let changes = parse_file_changes(&diff);
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].path, "gcc/cp/pt.c");
    assert_eq!(changes[1].path, "gcc/cp/call.c");
}

#[test]
fn hunk_content_does_not_confuse_headers() {
    // A removed line that itself starts with "--- " must not reset the
    // current record.
    let diff = "diff --git a/gcc/foo.c b/gcc/foo.c\n\
                index 1111111..2222222 100644\n\
                --- a/gcc/foo.c\n\
                +++ b/gcc/foo.c\n\
                @@ -1,2 +1,2 @@\n\
                --- /dev/null\n\
                +-- kept\n";
    let changes = parse_file_changes(diff);
    assert_eq!(changes, vec![FileChange::modified("gcc/foo.c")]);
    assert!(!changes[0].is_new);
}

#[test]
fn empty_input_yields_no_changes() {
    assert!(parse_file_changes("").is_empty());
    assert!(parse_file_changes("not a diff at all\n").is_empty());
}
