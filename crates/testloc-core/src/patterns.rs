//! # Debug-info file patterns
//!
//! Where the debug information of an executable lives.
//!
//! Besides the executable's own debug info, users can point at additional
//! files with glob patterns such as `$(ExecutableDir)/*.pdb.bak`. Placeholder
//! expansion is a pure string transform ([`expand_placeholders`]); only
//! [`find_matching_files`] touches the file system.

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::error::{LocatorError, LocatorResult};

/// Expands to the directory containing the executable.
pub const EXECUTABLE_DIR_PLACEHOLDER: &str = "$(ExecutableDir)";
/// Expands to the executable's file name without extension.
pub const EXECUTABLE_PLACEHOLDER: &str = "$(Executable)";

/// Separator between patterns in a settings string.
pub const PATTERN_SEPARATOR: char = ';';

/// Extension of the debug-info file that sits next to an executable.
pub const DEFAULT_DEBUG_INFO_EXTENSION: &str = "pdb";

/// Split a settings string into patterns and expand placeholders for `executable`.
///
/// Empty segments are dropped. On non-Windows hosts backslashes are turned
/// into forward slashes so patterns written for Windows keep working.
/// Substituted path text is glob-escaped, and a bare executable name has
/// `.` as its directory.
///
/// ## Example
///
/// ```rust
/// use std::path::Path;
/// use testloc_core::patterns::expand_placeholders;
///
/// let patterns = expand_placeholders("$(ExecutableDir)/*.pdb.bak; ;extra/$(Executable).pdb", Path::new("/out/tests.exe"));
/// assert_eq!(patterns, ["/out/*.pdb.bak", "extra/tests.pdb"]);
/// ```
pub fn expand_placeholders(patterns: &str, executable: &Path) -> Vec<String>
{
    let dir = glob::Pattern::escape(&executable_dir(executable).display().to_string());
    let executable_name = executable
        .file_stem()
        .map(|stem| glob::Pattern::escape(&stem.to_string_lossy()))
        .unwrap_or_default();

    patterns
        .split(PATTERN_SEPARATOR)
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(|pattern| {
            let expanded = pattern
                .replace(EXECUTABLE_DIR_PLACEHOLDER, &dir)
                .replace(EXECUTABLE_PLACEHOLDER, &executable_name);
            normalize_separators(&expanded)
        })
        .collect()
}

/// The debug-info file an executable's toolchain writes next to it.
pub fn default_debug_info_path(executable: &Path) -> PathBuf
{
    executable.with_extension(DEFAULT_DEBUG_INFO_EXTENSION)
}

/// Directory holding `executable`, `.` for a bare file name.
pub fn executable_dir(executable: &Path) -> &Path
{
    executable
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Anchor a relative pattern at `base_dir`.
///
/// `base_dir` is a literal path; glob metacharacters in it are escaped.
pub fn anchor_pattern(pattern: &str, base_dir: &Path) -> String
{
    if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let base = glob::Pattern::escape(&base_dir.display().to_string());
        normalize_separators(&Path::new(&base).join(pattern).display().to_string())
    }
}

/// Files matched by `pattern`, relative patterns evaluated against `base_dir`.
///
/// Results are in the order `glob` yields them (sorted by path). Directories
/// and entries that cannot be read are skipped.
///
/// ## Errors
///
/// [`LocatorError::MalformedPattern`] when `pattern` is not a valid glob.
pub fn find_matching_files(pattern: &str, base_dir: &Path) -> LocatorResult<Vec<PathBuf>>
{
    let anchored = anchor_pattern(pattern, base_dir);
    let options = MatchOptions {
        case_sensitive: !cfg!(windows),
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let paths = glob::glob_with(&anchored, options).map_err(|err| LocatorError::MalformedPattern {
        pattern: anchored.clone(),
        reason: err.to_string(),
    })?;

    Ok(paths.filter_map(Result::ok).filter(|path| path.is_file()).collect())
}

fn normalize_separators(pattern: &str) -> String
{
    if cfg!(windows) {
        pattern.to_string()
    } else {
        pattern.replace('\\', "/")
    }
}
