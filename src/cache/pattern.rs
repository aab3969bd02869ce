//! Glob-style key matching for pattern invalidation.

/// Match a cache key against a pattern where `*` matches any run of
/// characters (including none). A pattern without `*` must match exactly.
#[must_use]
pub fn key_matches(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];

    if !key.starts_with(first) {
        return false;
    }
    let mut rest = &key[first.len()..];

    if rest.len() < last.len() || !rest.ends_with(last) {
        return false;
    }
    rest = &rest[..rest.len() - last.len()];

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match rest.find(part) {
            Some(idx) => rest = &rest[idx + part.len()..],
            None => return false,
        }
    }

    true
}
