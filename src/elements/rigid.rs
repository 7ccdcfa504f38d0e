//! Rigid links that tie groups of nodes into one rigid body

use serde::{Deserialize, Serialize};

use crate::loads::{LoadCase, LoadType};

/// Nodes that move together as a rigid body
///
/// Consecutive nodes in [`RigidElement::nodes`] are linked, so the whole
/// list ends up in one group. A rigid element takes part in the analysis of
/// a load case when [`RigidElement::is_applicable`] says so.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigidElement {
    /// Linked node indices
    pub nodes: Vec<usize>,
    /// Preferred master node of the group
    pub central_node: Option<usize>,
    /// Take part in every load case
    pub use_for_all_loads: bool,
    pub applied_load_cases: Vec<LoadCase>,
    pub applied_load_types: Vec<LoadType>,
    pub label: Option<String>,
}

impl RigidElement {
    pub fn new(nodes: Vec<usize>) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn with_central_node(mut self, node: usize) -> Self {
        self.central_node = Some(node);
        self
    }

    pub fn for_all_loads(mut self) -> Self {
        self.use_for_all_loads = true;
        self
    }

    pub fn for_load_case(mut self, case: LoadCase) -> Self {
        self.applied_load_cases.push(case);
        self
    }

    pub fn for_load_type(mut self, load_type: LoadType) -> Self {
        self.applied_load_types.push(load_type);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Whether the element links its nodes under `case`
    ///
    /// `None` means every rigid element applies.
    pub fn is_applicable(&self, case: Option<&LoadCase>) -> bool {
        let Some(case) = case else {
            return true;
        };
        self.use_for_all_loads
            || self.applied_load_types.contains(&case.load_type)
            || self.applied_load_cases.contains(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicability() {
        let quake = LoadCase::new("EQ-X", LoadType::Quake);
        let dead = LoadCase::dead("D");

        let diaphragm = RigidElement::new(vec![0, 1, 2]).for_load_type(LoadType::Quake);
        assert!(diaphragm.is_applicable(Some(&quake)));
        assert!(!diaphragm.is_applicable(Some(&dead)));
        assert!(diaphragm.is_applicable(None));

        let by_case = RigidElement::new(vec![0, 1]).for_load_case(LoadCase::dead("d"));
        assert!(by_case.is_applicable(Some(&dead)));
        assert!(!by_case.is_applicable(Some(&quake)));

        let always = RigidElement::new(vec![0, 1]).for_all_loads();
        assert!(always.is_applicable(Some(&dead)));
    }
}
