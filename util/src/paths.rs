use std::path::{Component, Path, PathBuf};

/// Resolve a possibly relative path against the current directory.
pub fn absolutize(path: &str) -> PathBuf {
    let p = PathBuf::from(path);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Joins an object key onto `root`, refusing keys that could escape it.
///
/// Returns `None` for absolute keys, `..` components, or empty keys.
pub fn object_path(root: &Path, key: &str) -> Option<PathBuf> {
    let rel = Path::new(key);
    if key.is_empty() {
        return None;
    }
    let mut out = root.to_path_buf();
    for comp in rel.components() {
        match comp {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(out)
}

/// Reduce an arbitrary user-provided name to a single safe path segment.
///
/// Keeps ASCII alphanumerics, `.`, `_` and `-`; strips leading/trailing dots so
/// the result can never be `.` or `..`. Falls back to `fallback` when nothing is left.
pub fn sanitize_segment(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_' || *c == '-')
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
