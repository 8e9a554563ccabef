//! Fixed vocabulary of the monitored project tree.
//!
//! The gate validates commits against a known set of ChangeLog-carrying
//! directories, a known set of bug-tracker components, and a handful of
//! imported subtrees that keep their upstream logs. The tables mirror the
//! project's maintainer documentation; extending them is a data change,
//! not a code change.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Files maintained by automation. Strict mode rejects commits that touch
/// them together with normal source changes.
pub const PROCESS_FILES: &[&str] = &["gcc/DATESTAMP", "gcc/BASE-VER", "gcc/DEV-PHASE"];

/// Imported subtrees that keep their upstream changelogs; files here never
/// need an entry.
pub const IGNORED_PREFIXES: &[&str] = &[
    "gcc/d/dmd/",
    "gcc/go/gofrontend/",
    "libgo/",
    "libphobos/libdruntime/",
    "libphobos/src/",
    "libsanitizer/",
];

/// Directories that carry their own ChangeLog file.
static CHANGELOG_LOCATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "c++tools",
        "config",
        "contrib",
        "contrib/header-tools",
        "contrib/reghunt",
        "contrib/regression",
        "fixincludes",
        "gcc",
        "gcc/ada",
        "gcc/analyzer",
        "gcc/brig",
        "gcc/c",
        "gcc/c-family",
        "gcc/cp",
        "gcc/d",
        "gcc/fortran",
        "gcc/go",
        "gcc/jit",
        "gcc/lto",
        "gcc/m2",
        "gcc/objc",
        "gcc/objcp",
        "gcc/po",
        "gcc/rust",
        "gcc/testsuite",
        "gnattools",
        "gotools",
        "include",
        "intl",
        "libada",
        "libatomic",
        "libbacktrace",
        "libcc1",
        "libcody",
        "libcpp",
        "libcpp/po",
        "libdecnumber",
        "libffi",
        "libgcc",
        "libgcc/config/avr/libf7",
        "libgcc/config/libbid",
        "libgfortran",
        "libgm2",
        "libgomp",
        "libhsail-rt",
        "libiberty",
        "libitm",
        "libobjc",
        "libphobos",
        "libquadmath",
        "libsanitizer",
        "libssp",
        "libstdc++-v3",
        "libvtv",
        "lto-plugin",
        "maintainer-scripts",
        "zlib",
    ]
    .into_iter()
    .collect()
});

/// Components accepted in `PR <component>/<number>` references.
static BUG_COMPONENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ada",
        "analyzer",
        "boehm-gc",
        "bootstrap",
        "c",
        "c++",
        "d",
        "debug",
        "demangler",
        "driver",
        "fastjar",
        "fortran",
        "gcov-profile",
        "go",
        "hsa",
        "inline-asm",
        "ipa",
        "java",
        "jit",
        "libbacktrace",
        "libf2c",
        "libffi",
        "libfortran",
        "libgcc",
        "libgcj",
        "libgomp",
        "libitm",
        "libobjc",
        "libquadmath",
        "libstdc++",
        "lto",
        "middle-end",
        "modula2",
        "objc",
        "objc++",
        "other",
        "pch",
        "pending",
        "plugins",
        "preprocessor",
        "regression",
        "rtl-optimization",
        "rust",
        "sanitizer",
        "spam",
        "target",
        "testsuite",
        "translation",
        "tree-optimization",
        "web",
    ]
    .into_iter()
    .collect()
});

/// True for directories that carry their own ChangeLog.
pub fn is_changelog_location(dir: &str) -> bool {
    CHANGELOG_LOCATIONS.contains(dir)
}

/// True for components accepted in PR references.
pub fn is_bug_component(name: &str) -> bool {
    BUG_COMPONENTS.contains(name)
}

/// True for ChangeLog files themselves (`ChangeLog`, `ChangeLog.jit`, ...).
pub fn is_changelog_filename(path: &str) -> bool {
    let base = path.rsplit('/').next().unwrap_or(path);
    base == "ChangeLog" || base.starts_with("ChangeLog.")
}

/// True for ChangeLog files and automation-maintained process files.
pub fn is_process_file(path: &str) -> bool {
    is_changelog_filename(path) || PROCESS_FILES.contains(&path)
}

/// True for files inside an imported subtree.
pub fn in_ignored_location(path: &str) -> bool {
    IGNORED_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The directory whose ChangeLog governs `path`: the longest known
/// location that prefixes it, or the repository root (empty string).
pub fn changelog_location_for(path: &str) -> String {
    let mut dir = match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    };
    loop {
        if CHANGELOG_LOCATIONS.contains(dir) {
            return dir.to_string();
        }
        match dir.rfind('/') {
            Some(i) => dir = &dir[..i],
            None => return String::new(),
        }
    }
}
