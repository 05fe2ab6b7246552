//! Lookup keys for thoughts and contexts.
//!
//! Both keys are computed over normalized text: surrounding whitespace is
//! trimmed, internal whitespace runs collapse to a single space, and case is
//! folded. Visually equal text therefore always maps to the same thought.

use crate::types::ROOT_TOKEN;

/// Number of digest bytes kept in a key (hex-encoded to twice as many chars).
const KEY_BYTES: usize = 16;

/// Canonical form of a thought value.
pub fn normalize_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key of a thought in the thought index.
pub fn hash_thought(value: &str) -> String {
    let digest = blake3::hash(normalize_value(value).as_bytes());
    hex::encode(&digest.as_bytes()[..KEY_BYTES])
}

/// Key of a context in the context index.
///
/// Order-sensitive. Each segment is length-prefixed so that segment
/// boundaries take part in the digest. An empty context is the root context.
pub fn hash_context<S: AsRef<str>>(context: &[S]) -> String {
    let mut hasher = blake3::Hasher::new();
    if context.is_empty() {
        feed_segment(&mut hasher, ROOT_TOKEN);
    }
    for segment in context {
        feed_segment(&mut hasher, segment.as_ref());
    }
    hex::encode(&hasher.finalize().as_bytes()[..KEY_BYTES])
}

fn feed_segment(hasher: &mut blake3::Hasher, segment: &str) {
    let normalized = normalize_value(segment);
    hasher.update(&(normalized.len() as u64).to_le_bytes());
    hasher.update(normalized.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_folds_case_and_whitespace() {
        assert_eq!(normalize_value("  Hello \t  World "), "hello world");
        assert_eq!(hash_thought("Hello World"), hash_thought(" hello   world"));
        assert_ne!(hash_thought("hello world"), hash_thought("helloworld"));
    }

    #[test]
    fn context_hash_respects_segment_boundaries() {
        assert_ne!(hash_context(&["ab", "c"]), hash_context(&["a", "bc"]));
        assert_ne!(hash_context(&["a", "b"]), hash_context(&["b", "a"]));
    }

    #[test]
    fn empty_context_is_root() {
        let empty: [&str; 0] = [];
        assert_eq!(hash_context(&empty), hash_context(&[ROOT_TOKEN]));
    }
}
