//! Resolution of `exclude` and `parse` patterns into concrete file lists.
//!
//! Two forms are understood:
//!
//! * a plain glob (`*`, `?`, `[...]` never cross a `/`), matched against paths
//!   rooted at the given directory;
//! * a pseudo-recursive glob containing the `**/` marker. The text before the
//!   first marker selects a traversal root, and the text after it is applied as a
//!   plain glob inside every directory found below that root (the root included).
//!
//! Only regular files are ever returned. Braces carry no glob meaning, and as
//! in a shell a wildcard does not match a leading dot.

use globset::GlobBuilder;
use log::debug;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Marker splitting a pattern into a traversal prefix and a per-directory suffix.
pub const RECURSIVE_MARKER: &str = "**/";

const GLOB_META: [char; 3] = ['*', '?', '['];

/// Resolves `pattern` against `root` into a list of file paths.
///
/// # Arguments
/// * `pattern` - Plain or pseudo-recursive glob pattern
/// * `root` - Directory the pattern is rooted at
///
/// # Returns
/// * `Result<Vec<PathBuf>>` - Matching regular files, in traversal order
///
/// # Errors
/// * `Error::ConfigError` if the glob part of the pattern is malformed
///
/// # Example
/// ```no_run
/// # use strata::pattern::resolve;
/// let logs = resolve("dir/**/*.log", "/tmp/template").unwrap();
/// ```
pub fn resolve<P: AsRef<Path>>(pattern: &str, root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    match pattern.split_once(RECURSIVE_MARKER) {
        Some((prefix, suffix)) => resolve_recursive(prefix, suffix, root),
        None => resolve_plain(pattern, root),
    }
}

fn resolve_recursive(prefix: &str, suffix: &str, root: &Path) -> Result<Vec<PathBuf>> {
    let traversal_root = normalize_path(&root.join(prefix));
    debug!("Expanding '{}**/{}' below {}", prefix, suffix, traversal_root.display());

    let mut matches = Vec::new();
    for entry in WalkDir::new(&traversal_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {e}");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            matches.extend(resolve_plain(suffix, entry.path())?);
        }
    }
    Ok(matches)
}

fn resolve_plain(pattern: &str, root: &Path) -> Result<Vec<PathBuf>> {
    // Leading literal components are folded into the walk base so that only the
    // globbing tail has to be matched.
    let mut base = root.to_path_buf();
    let mut glob_parts: Vec<OsString> = Vec::new();
    for component in Path::new(pattern).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if glob_parts.is_empty() => {
                base.pop();
            }
            Component::Prefix(_) => base = PathBuf::from(component.as_os_str()),
            Component::RootDir => base.push(component.as_os_str()),
            Component::Normal(part)
                if glob_parts.is_empty() && !part.to_string_lossy().contains(GLOB_META) =>
            {
                base.push(part);
            }
            other => glob_parts.push(other.as_os_str().to_os_string()),
        }
    }

    if glob_parts.is_empty() {
        return Ok(if base.is_file() { vec![base] } else { Vec::new() });
    }

    let parts: Vec<String> =
        glob_parts.iter().map(|part| part.to_string_lossy().into_owned()).collect();
    let glob = parts.iter().map(|part| escape_braces(part)).collect::<Vec<_>>().join("/");
    let matcher = GlobBuilder::new(&glob)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::ConfigError(format!("Invalid pattern '{pattern}': {e}")))?
        .compile_matcher();

    let depth = glob_parts.len();
    let matches = WalkDir::new(&base)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(&base)
                .map(|relative| {
                    matcher.is_match(relative) && !hides_dot_entries(relative, &parts)
                })
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    Ok(matches)
}

/// Braces are plain characters in patterns; globset would read them as alternation.
fn escape_braces(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    let mut in_class = false;
    for c in part.chars() {
        match c {
            '[' if !in_class => {
                in_class = true;
                escaped.push(c);
            }
            ']' if in_class => {
                in_class = false;
                escaped.push(c);
            }
            '{' | '}' if !in_class => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A dot-prefixed name only matches a pattern component that starts with a dot.
fn hides_dot_entries(relative: &Path, parts: &[String]) -> bool {
    relative.components().zip(parts).any(|(component, part)| {
        component.as_os_str().to_string_lossy().starts_with('.') && !part.starts_with('.')
    })
}

/// Lexically normalizes a path, folding `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component.as_os_str());
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
