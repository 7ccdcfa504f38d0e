//! Load cases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Nature of the loads grouped in a load case
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    #[default]
    Default,
    Dead,
    Live,
    Snow,
    Wind,
    Quake,
    Crane,
    Other,
}

/// A load case groups related loads under a common name and type
///
/// Two cases are equal when their types match and their names match after
/// removing whitespace and ignoring letter case, so `"Dead Load"` and
/// `"deadload"` name the same case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadCase {
    /// Name of the load case
    pub name: String,
    /// Nature of the load case
    pub load_type: LoadType,
}

impl LoadCase {
    pub fn new(name: &str, load_type: LoadType) -> Self {
        Self {
            name: name.to_string(),
            load_type,
        }
    }

    /// The unnamed case of type [`LoadType::Default`]
    pub fn default_case() -> Self {
        Self::default()
    }

    pub fn dead(name: &str) -> Self {
        Self::new(name, LoadType::Dead)
    }

    pub fn live(name: &str) -> Self {
        Self::new(name, LoadType::Live)
    }

    fn normalized_name(&self) -> String {
        self.name
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}

impl PartialEq for LoadCase {
    fn eq(&self, other: &Self) -> bool {
        self.load_type == other.load_type && self.normalized_name() == other.normalized_name()
    }
}

impl Eq for LoadCase {}

impl Hash for LoadCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized_name().hash(state);
        self.load_type.hash(state);
    }
}

impl fmt::Display for LoadCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' ({:?})", self.name, self.load_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equality_ignores_whitespace_and_case() {
        assert_eq!(LoadCase::dead("Dead Load"), LoadCase::dead("deadload"));
        assert_eq!(LoadCase::dead(" D "), LoadCase::dead("d"));
        assert_ne!(LoadCase::dead("D"), LoadCase::live("D"));
        assert_ne!(LoadCase::dead("D1"), LoadCase::dead("D2"));
    }

    #[test]
    fn test_hash_matches_equality() {
        let mut map = HashMap::new();
        map.insert(LoadCase::new("Wind X", LoadType::Wind), 1);
        assert_eq!(map.get(&LoadCase::new("WINDX", LoadType::Wind)), Some(&1));
    }

    #[test]
    fn test_default_case() {
        let case = LoadCase::default_case();
        assert_eq!(case.load_type, LoadType::Default);
        assert_eq!(case, LoadCase::new("  ", LoadType::Default));
    }
}
