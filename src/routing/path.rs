//! Path helpers for building patterns out of group prefixes.

/// Join a group base path and a relative pattern.
///
/// The result is rooted and cleaned (`//`, `.` and `..` are resolved), and a
/// trailing `/` on `relative` is preserved.
pub fn join_paths(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        return clean(base);
    }
    let joined = clean(&format!("{base}/{relative}"));
    if relative.ends_with('/') && !joined.ends_with('/') {
        joined + "/"
    } else {
        joined
    }
}

/// Lexically clean a slash-separated path. Always returns a rooted path.
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            p => parts.push(p),
        }
    }
    format!("/{}", parts.join("/"))
}
