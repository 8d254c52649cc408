//! Destination name lookup

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::warn;

/// Words that carry no meaning when matching department names
const FILLER_WORDS: &[&str] = &[
    "τμημα",
    "κλινικη",
    "εργαστηριο",
    "μοναδα",
    "πανεπιστημιακη",
    "department",
    "dept",
    "clinic",
    "unit",
    "the",
    "of",
];

/// Normalized destination name -> point-of-interest node id
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    lookup: HashMap<String, String>,
    names: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new<I, K, V>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (name, node_id) in aliases {
            table.insert(name.into(), node_id.into());
        }
        table
    }

    pub fn insert(&mut self, name: String, node_id: String) {
        let key = normalize_name(&name);
        if key.is_empty() {
            warn!("Alias '{name}' is empty after normalization - ignoring");
            return;
        }
        if let Some(previous) = self.lookup.insert(key, node_id.clone())
            && previous != node_id
        {
            warn!("Alias '{name}' remapped from '{previous}' to '{node_id}'");
        }
        self.names.insert(name, node_id);
    }

    /// Exact match after normalization
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.lookup.get(&normalize_name(name)).map(String::as_str)
    }

    /// Original alias names with their node ids, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// Fold case, strip diacritics and filler words, collapse whitespace
pub fn normalize_name(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(fold_char).collect();
    folded
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_char(c: char) -> char {
    match c {
        'ά' => 'α',
        'έ' => 'ε',
        'ή' => 'η',
        'ί' | 'ϊ' | 'ΐ' => 'ι',
        'ό' => 'ο',
        'ύ' | 'ϋ' | 'ΰ' => 'υ',
        'ώ' => 'ω',
        'ς' => 'σ',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}
