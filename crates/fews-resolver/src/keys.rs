//! Cache key composition.
//!
//! Keys are `namespace::part::part...` with `%` and `:` escaped inside
//! each part, so user-controlled ids can never collide across different
//! logical keys.

/// Compose a cache key from a namespace and lookup parts.
pub fn cache_key(namespace: &str, parts: &[&str]) -> String {
    let mut key = String::from(namespace);
    for part in parts {
        key.push_str("::");
        key.push_str(&escape(part));
    }
    key
}

fn escape(part: &str) -> String {
    part.replace('%', "%25").replace(':', "%3A")
}
