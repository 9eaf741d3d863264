use regex::Regex;

use crate::common::Key;

/// Turns raw tokens into canonical keys: case-folded, stripped down to ASCII
/// alphanumerics plus `-` and `_`. Tokens with nothing left are discarded.
pub struct Normalizer {
    strip: Regex,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            strip: Regex::new(r"[^a-z0-9_-]").expect("invalid regex"),
        }
    }

    /// Idempotent: normalizing an already-canonical key returns it unchanged.
    pub fn normalize(&self, token: &str) -> Option<Key> {
        let folded = token.to_lowercase();
        let kept = self.strip.replace_all(&folded, "");
        if kept.is_empty() {
            None
        } else {
            Some(kept.into_owned())
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
