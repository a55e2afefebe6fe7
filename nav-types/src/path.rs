//! Path string helpers.
//!
//! Paths handled here are application paths (the part of the address after
//! `#` in hash routing), e.g. `/users/42?tab=posts#bio`.

/// Parsed components of a path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParts {
    /// Path portion, e.g. `/users/42`.
    pub pathname: String,
    /// Query portion including the leading `?`, or empty.
    pub search: String,
    /// Fragment portion including the leading `#`, or empty.
    pub hash: String,
}

/// Prefix `path` with `/` unless it already starts with one.
pub fn add_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Split a path into pathname, search and hash.
///
/// A bare `?` or `#` is dropped. An empty path parses as `/`.
pub fn parse_path(path: &str) -> PathParts {
    let mut pathname = if path.is_empty() { "/" } else { path };
    let mut search = "";
    let mut hash = "";

    if let Some(index) = pathname.find('#') {
        hash = &pathname[index..];
        pathname = &pathname[..index];
    }
    if let Some(index) = pathname.find('?') {
        search = &pathname[index..];
        pathname = &pathname[..index];
    }

    PathParts {
        pathname: pathname.to_string(),
        search: if search == "?" { String::new() } else { search.to_string() },
        hash: if hash == "#" { String::new() } else { hash.to_string() },
    }
}

/// Join path parts back into a single path string.
pub fn create_path(parts: &PathParts) -> String {
    let mut path = parts.pathname.clone();
    if !parts.search.is_empty() && parts.search != "?" {
        if !parts.search.starts_with('?') {
            path.push('?');
        }
        path.push_str(&parts.search);
    }
    if !parts.hash.is_empty() && parts.hash != "#" {
        if !parts.hash.starts_with('#') {
            path.push('#');
        }
        path.push_str(&parts.hash);
    }
    path
}
