//! Load combinations

use serde::{Deserialize, Serialize};

use super::{LoadCase, LoadType};

/// A load combination defines how load cases are superposed in results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Name of the load combination
    pub name: String,
    /// Factor of each load case, at most one entry per case
    pub factors: Vec<(LoadCase, f64)>,
    /// Optional tags for filtering
    pub tags: Vec<String>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Create a load combination with a single load case at factor 1.0
    pub fn single(name: &str, case: LoadCase) -> Self {
        Self::new(name).with_case(case, 1.0)
    }

    /// Add a load case with a factor, replacing an earlier factor for the same case
    pub fn with_case(mut self, case: LoadCase, factor: f64) -> Self {
        match self.factors.iter_mut().find(|(c, _)| *c == case) {
            Some(entry) => entry.1 = factor,
            None => self.factors.push((case, factor)),
        }
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Factor of `case`, zero when the case is not part of the combination
    pub fn factor(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .find(|(c, _)| c == case)
            .map_or(0.0, |&(_, factor)| factor)
    }

    pub fn includes(&self, case: &LoadCase) -> bool {
        self.factor(case).abs() > 1e-10
    }

    /// Cases with their factors, in insertion order
    pub fn cases(&self) -> impl Iterator<Item = (&LoadCase, f64)> {
        self.factors.iter().map(|(case, factor)| (case, *factor))
    }

    /// 1.4D
    pub fn lrfd_dead_only() -> Self {
        Self::new("1.4D").with_case(LoadCase::dead("Dead"), 1.4)
    }

    /// 1.2D + 1.6L
    pub fn lrfd_dead_live() -> Self {
        Self::new("1.2D + 1.6L")
            .with_case(LoadCase::dead("Dead"), 1.2)
            .with_case(LoadCase::live("Live"), 1.6)
    }

    /// 1.2D + L + W
    pub fn lrfd_dead_live_wind() -> Self {
        Self::new("1.2D + L + W")
            .with_case(LoadCase::dead("Dead"), 1.2)
            .with_case(LoadCase::live("Live"), 1.0)
            .with_case(LoadCase::new("Wind", LoadType::Wind), 1.0)
    }

    /// D + L
    pub fn asd_dead_live() -> Self {
        Self::new("D + L")
            .with_case(LoadCase::dead("Dead"), 1.0)
            .with_case(LoadCase::live("Live"), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors_are_keyed_by_case() {
        let combo = LoadCombination::new("C")
            .with_case(LoadCase::dead("Dead Load"), 1.2)
            .with_case(LoadCase::dead("deadload"), 1.35)
            .with_tag("uls");

        assert_eq!(combo.factors.len(), 1);
        assert_eq!(combo.factor(&LoadCase::dead("DEAD LOAD")), 1.35);
        assert_eq!(combo.factor(&LoadCase::live("Dead Load")), 0.0);
        assert!(!combo.includes(&LoadCase::live("L")));
    }

    #[test]
    fn test_presets() {
        let combo = LoadCombination::lrfd_dead_live();
        let cases: Vec<_> = combo.cases().collect();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0], (&LoadCase::dead("Dead"), 1.2));
        assert_eq!(combo.factor(&LoadCase::live("Live")), 1.6);
        assert!(LoadCombination::single("S", LoadCase::default()).includes(&LoadCase::default()));
    }
}
