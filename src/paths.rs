//! Separator- and case-insensitive path helpers.
//!
//! Registry data always uses Windows paths, while recognizers see whatever
//! the caller passed in. These helpers treat `/` and `\` alike so the same
//! logic works for both, regardless of the host platform.

use std::path::{Path, PathBuf};

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalize a path into a comparison key.
///
/// Backslashes become forward slashes, repeated separators collapse,
/// trailing separators are dropped and the result is lowercased.
pub fn normalize(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = false;
    for c in raw.trim().chars() {
        if is_separator(c) {
            if !last_was_sep {
                out.push('/');
            }
            last_was_sep = true;
        } else {
            out.extend(c.to_lowercase());
            last_was_sep = false;
        }
    }
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Whether two paths name the same location.
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Whether `child` lies strictly beneath `parent`.
pub fn is_within(child: &Path, parent: &Path) -> bool {
    let parent = normalize(parent);
    let child = normalize(child);
    if parent.is_empty() {
        return false;
    }
    if parent == "/" {
        return child.len() > 1 && child.starts_with('/');
    }
    child.len() > parent.len() && child.starts_with(&parent) && child[parent.len()..].starts_with('/')
}

/// Components of `child` below `parent`, in original case.
pub fn relative_components(child: &Path, parent: &Path) -> Option<Vec<String>> {
    if !is_within(child, parent) {
        return None;
    }
    let skip = components(parent).len();
    Some(components(child).into_iter().skip(skip).collect())
}

/// Path components split on either separator.
pub fn components(path: &Path) -> Vec<String> {
    path.to_string_lossy()
        .split(is_separator)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Last component of a path.
pub fn file_name(path: &Path) -> Option<String> {
    components(path).pop()
}

/// Directory containing `path`.
pub fn parent_dir(path: &Path) -> Option<PathBuf> {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(is_separator);
    let idx = trimmed.rfind(is_separator)?;
    let parent = trimmed[..idx].trim_end_matches(is_separator);
    if parent.is_empty() {
        // Parent of a top-level entry is the root itself.
        return Some(PathBuf::from(&trimmed[..=idx]));
    }
    Some(PathBuf::from(parent))
}

/// Join a file name onto a directory using the directory's own separator style.
pub fn join(dir: &Path, name: &str) -> PathBuf {
    let raw = dir.to_string_lossy();
    if raw.contains('\\') && !raw.contains('/') {
        PathBuf::from(format!("{}\\{}", raw.trim_end_matches('\\'), name))
    } else {
        dir.join(name)
    }
}
