use hashbrown::HashMap;

use super::components::AccessTag;

/// Accessibility tags for specific node pairs.
///
/// Keys are unordered: tagging `(a, b)` also tags `(b, a)`. Pairs without an
/// entry are [`AccessTag::All`].
#[derive(Debug, Clone, Default)]
pub struct AccessibilityRegistry {
    tags: HashMap<(String, String), AccessTag>,
}

impl AccessibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tag(&mut self, a: &str, b: &str, tag: AccessTag) {
        self.tags.insert(pair_key(a, b), tag);
    }

    pub fn get_tag(&self, a: &str, b: &str) -> AccessTag {
        self.tags
            .get(&pair_key(a, b))
            .copied()
            .unwrap_or_default()
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.tags.contains_key(&pair_key(a, b))
    }

    /// Whether an edge with this tag is usable in wheelchair mode
    pub fn allowed(tag: AccessTag) -> bool {
        tag != AccessTag::Stairs
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}
