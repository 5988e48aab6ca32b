//! POSIX-style helpers for logical asset paths.
//!
//! Logical paths always use `/`, regardless of host platform. Absolute paths
//! start with `/`; asset keys are absolute paths relative to the project
//! directory.

/// Resolve `.` and `..` segments and collapse repeated separators.
///
/// A trailing slash on the input is preserved, as is a leading one. `..`
/// never climbs above the root of an absolute path.
///
/// ```
/// use edgeshim::assets::path::normalize;
///
/// assert_eq!(normalize("/a/./b/../c"), "/a/c");
/// assert_eq!(normalize("/a//b/"), "/a/b/");
/// assert_eq!(normalize("a/../../b"), "../b");
/// ```
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let mut out = parts.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        return if trailing { "./" } else { "." }.to_string();
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Join segments with `/` and normalize the result.
///
/// Unlike `Path::join`, a later absolute segment does not discard the
/// earlier ones.
pub fn join(base: &str, segment: &str) -> String {
    if base.is_empty() {
        return normalize(segment);
    }
    if segment.is_empty() {
        return normalize(base);
    }
    normalize(&format!("{}/{}", base, segment))
}

/// Relative path from directory `from` to `to`.
///
/// Both are normalized first and trailing slashes ignored. Equal paths give
/// an empty string.
pub fn relative(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_parts: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = Vec::with_capacity(from_parts.len() + to_parts.len());
    out.extend(std::iter::repeat("..").take(from_parts.len() - common));
    out.extend(&to_parts[common..]);
    out.join("/")
}

/// Asset key for an absolute logical `path` under project directory `root`.
///
/// ```
/// use edgeshim::assets::path::asset_key;
///
/// assert_eq!(asset_key("/app", "/app/.next/BUILD_ID"), "/.next/BUILD_ID");
/// ```
pub fn asset_key(root: &str, path: &str) -> String {
    format!("/{}", relative(root, path))
}

/// Strip one trailing slash, keeping `/` intact.
pub fn remove_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Final extension of the last segment, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}
