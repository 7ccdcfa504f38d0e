//! FE Model - Main structural model container

use log::info;

use crate::analysis::{AnalysisOptions, StaticLinearAnalysisResult};
use crate::elements::{Constraint, Element, Node, RigidElement};
use crate::error::{FEAError, FEAResult};
use crate::loads::{ElementLoad, LoadCase, LoadCombination, NodalLoad};
use crate::math::{BuiltInSolverFactory, SolverFactory};
use crate::results::{AnalysisSummary, Displacement, Force};

/// The main 3D finite element model
///
/// Nodes, elements and rigid elements are addressed by their insertion
/// index. Every mutation bumps either the topology version (anything that
/// changes the stiffness or the DOF partition) or the load version, which is
/// how cached analysis data is invalidated.
#[derive(Default)]
pub struct Model {
    nodes: Vec<Node>,
    elements: Vec<Box<dyn Element>>,
    rigid_elements: Vec<RigidElement>,
    /// Load case under which node settlements are applied
    settlement_load_case: Option<LoadCase>,

    topology_version: u64,
    load_version: u64,

    last_result: StaticLinearAnalysisResult,
    active_solver: Option<BuiltInSolverFactory>,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a node and return its index
    pub fn add_node(&mut self, node: Node) -> FEAResult<usize> {
        if let Some(label) = &node.label {
            if self.nodes.iter().any(|n| n.label.as_ref() == Some(label)) {
                return Err(FEAError::DuplicateName(label.clone()));
            }
        }
        self.nodes.push(node);
        self.topology_changed();
        Ok(self.nodes.len() - 1)
    }

    /// Add a finite element and return its index
    pub fn add_element<E: Element + 'static>(&mut self, element: E) -> FEAResult<usize> {
        self.check_nodes(element.nodes())?;
        self.elements.push(Box::new(element));
        self.topology_changed();
        Ok(self.elements.len() - 1)
    }

    pub fn add_rigid_element(&mut self, rigid: RigidElement) -> FEAResult<usize> {
        if rigid.nodes.len() < 2 {
            return Err(FEAError::InvalidInput(
                "a rigid element links at least two nodes".to_string(),
            ));
        }
        self.check_nodes(&rigid.nodes)?;
        if let Some(central) = rigid.central_node {
            self.check_nodes(&[central])?;
        }
        self.rigid_elements.push(rigid);
        self.topology_changed();
        Ok(self.rigid_elements.len() - 1)
    }

    pub fn set_constraint(&mut self, node: usize, constraint: Constraint) -> FEAResult<()> {
        self.node_mut(node)?.constraints = constraint;
        self.topology_changed();
        Ok(())
    }

    pub fn add_nodal_load(&mut self, node: usize, load: NodalLoad) -> FEAResult<()> {
        self.node_mut(node)?.loads.push(load);
        self.loads_changed();
        Ok(())
    }

    pub fn add_element_load(&mut self, element: usize, load: ElementLoad) -> FEAResult<()> {
        self.elements
            .get_mut(element)
            .ok_or_else(|| FEAError::InvalidInput(format!("element #{element} does not exist")))?
            .add_load(load);
        self.loads_changed();
        Ok(())
    }

    /// Prescribe the displacement of a node's fixed DOFs under the settlement case
    pub fn set_settlement(&mut self, node: usize, settlement: Displacement) -> FEAResult<()> {
        self.node_mut(node)?.settlements = settlement;
        self.loads_changed();
        Ok(())
    }

    pub fn set_settlement_load_case(&mut self, case: Option<LoadCase>) {
        self.settlement_load_case = case;
        self.loads_changed();
    }

    fn check_nodes(&self, nodes: &[usize]) -> FEAResult<()> {
        match nodes.iter().find(|&&n| n >= self.nodes.len()) {
            Some(n) => Err(FEAError::NodeNotFound(format!("#{n}"))),
            None => Ok(()),
        }
    }

    fn node_mut(&mut self, index: usize) -> FEAResult<&mut Node> {
        self.nodes
            .get_mut(index)
            .ok_or_else(|| FEAError::NodeNotFound(format!("#{index}")))
    }

    fn topology_changed(&mut self) {
        self.topology_version += 1;
    }

    fn loads_changed(&mut self) {
        self.load_version += 1;
    }

    // ========================
    // Accessors
    // ========================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> FEAResult<&Node> {
        self.nodes
            .get(index)
            .ok_or_else(|| FEAError::NodeNotFound(format!("#{index}")))
    }

    /// Index of the node with the given label
    pub fn node_index(&self, label: &str) -> FEAResult<usize> {
        self.nodes
            .iter()
            .position(|n| n.label.as_deref() == Some(label))
            .ok_or_else(|| FEAError::NodeNotFound(label.to_string()))
    }

    pub fn elements(&self) -> &[Box<dyn Element>] {
        &self.elements
    }

    pub fn rigid_elements(&self) -> &[RigidElement] {
        &self.rigid_elements
    }

    pub fn settlement_load_case(&self) -> Option<&LoadCase> {
        self.settlement_load_case.as_ref()
    }

    pub fn topology_version(&self) -> u64 {
        self.topology_version
    }

    pub fn load_version(&self) -> u64 {
        self.load_version
    }

    /// Every load case that carries a load or the settlements, in first-seen order
    pub fn load_cases(&self) -> Vec<LoadCase> {
        let mut cases: Vec<LoadCase> = Vec::new();
        let mut push = |case: &LoadCase| {
            if !cases.contains(case) {
                cases.push(case.clone());
            }
        };

        for node in &self.nodes {
            node.loads.iter().for_each(|load| push(&load.case));
        }
        for element in &self.elements {
            element.loads().iter().for_each(|load| push(load.case()));
        }
        if let Some(case) = &self.settlement_load_case {
            push(case);
        }
        cases
    }

    // ========================
    // Analysis
    // ========================

    /// Run linear static analysis for the cases in `options`
    ///
    /// With no cases configured every loaded case is solved, or the default
    /// case for an unloaded model. Cases already solved for the current
    /// model state are kept.
    pub fn solve(&mut self, options: &AnalysisOptions) -> FEAResult<()> {
        let factory = options.solver_factory();
        if self.active_solver != Some(factory) {
            self.last_result.set_solver_factory(Box::new(factory));
            self.active_solver = Some(factory);
        }
        self.run(options)
    }

    /// Like [`Model::solve`] with a custom solver
    pub fn solve_with_factory(
        &mut self,
        options: &AnalysisOptions,
        factory: Box<dyn SolverFactory>,
    ) -> FEAResult<()> {
        self.last_result.set_solver_factory(factory);
        self.active_solver = None;
        self.run(options)
    }

    fn run(&mut self, options: &AnalysisOptions) -> FEAResult<()> {
        let mut cases = options.load_cases.clone();
        if cases.is_empty() {
            cases = self.load_cases();
        }
        if cases.is_empty() {
            cases.push(LoadCase::default());
        }

        let mut result = std::mem::take(&mut self.last_result);
        let outcome = cases.iter().try_for_each(|case| {
            result.add_analysis_result_if_not_exists(self, case)?;
            if options.check_statics {
                result.check_statics(self, case, options.statics_tolerance)?;
            }
            Ok(())
        });
        self.last_result = result;

        if outcome.is_ok() {
            info!("linear static analysis finished for {} load case(s)", cases.len());
        }
        outcome
    }

    /// Results of the last analysis
    pub fn results(&self) -> &StaticLinearAnalysisResult {
        &self.last_result
    }

    pub fn is_analyzed(&self, case: &LoadCase) -> bool {
        self.last_result_is_current() && self.last_result.has_result(case)
    }

    fn last_result_is_current(&self) -> bool {
        self.last_result.versions() == (Some(self.topology_version), Some(self.load_version))
    }

    fn current_results(&self) -> FEAResult<&StaticLinearAnalysisResult> {
        if self.last_result_is_current() {
            Ok(&self.last_result)
        } else {
            Err(FEAError::NotAnalyzed)
        }
    }

    pub fn node_displacement(&self, node: usize, case: &LoadCase) -> FEAResult<Displacement> {
        self.current_results()?.node_displacement(case, node)
    }

    pub fn node_force(&self, node: usize, case: &LoadCase) -> FEAResult<Force> {
        self.current_results()?.node_force(case, node)
    }

    pub fn support_reaction(&self, node: usize, case: &LoadCase) -> FEAResult<Force> {
        self.current_results()?.support_reaction(case, node)
    }

    pub fn equilibrium_residual(&self, case: &LoadCase) -> FEAResult<Force> {
        self.current_results()?.equilibrium_residual(self, case)
    }

    /// Combined displacement of a node, solving missing cases as needed
    pub fn node_displacement_combination(
        &mut self,
        node: usize,
        combination: &LoadCombination,
    ) -> FEAResult<Displacement> {
        let mut result = std::mem::take(&mut self.last_result);
        let outcome = result.node_displacement_combination(self, combination, node);
        self.last_result = result;
        outcome
    }

    /// Combined support reaction of a node, solving missing cases as needed
    pub fn support_reaction_combination(
        &mut self,
        node: usize,
        combination: &LoadCombination,
    ) -> FEAResult<Force> {
        let mut result = std::mem::take(&mut self.last_result);
        let outcome = result.support_reaction_combination(self, combination, node);
        self.last_result = result;
        outcome
    }

    /// Get analysis summary
    pub fn summary(&self, case: &LoadCase) -> FEAResult<AnalysisSummary> {
        self.current_results()?.summary(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{FrameElement, Material, Section};
    use approx::assert_relative_eq;

    fn cantilever() -> Model {
        let mut model = Model::new();
        let n1 = model
            .add_node(Node::new(0.0, 0.0, 0.0).with_label("N1"))
            .unwrap();
        let n2 = model
            .add_node(Node::new(10.0, 0.0, 0.0).with_label("N2"))
            .unwrap();
        model
            .add_element(FrameElement::new(
                n1,
                n2,
                Material::steel(),
                Section::rectangular(0.3, 0.5),
            ))
            .unwrap();
        model.set_constraint(n1, Constraint::fixed()).unwrap();
        model
    }

    #[test]
    fn test_simple_cantilever() {
        let mut model = cantilever();
        let case = LoadCase::dead("D");
        model
            .add_nodal_load(1, NodalLoad::force(0.0, -10_000.0, 0.0, case.clone()))
            .unwrap();

        model.solve(&AnalysisOptions::linear()).unwrap();

        let disp = model.node_displacement(1, &case).unwrap();
        assert!(disp.dy < 0.0, "Expected negative Y displacement");

        let rxn = model.support_reaction(0, &case).unwrap();
        assert_relative_eq!(rxn.fy, 10_000.0, max_relative = 1e-8);
        assert_relative_eq!(rxn.mz, 100_000.0, max_relative = 1e-8);
    }

    #[test]
    fn test_duplicate_label() {
        let mut model = cantilever();
        assert!(matches!(
            model.add_node(Node::new(1.0, 1.0, 1.0).with_label("N2")),
            Err(FEAError::DuplicateName(_))
        ));
        assert_eq!(model.node_index("N2").unwrap(), 1);
        assert!(model.node_index("N3").is_err());
    }

    #[test]
    fn test_references_are_checked() {
        let mut model = cantilever();
        assert!(model.set_constraint(5, Constraint::fixed()).is_err());
        assert!(model
            .add_element(FrameElement::new(0, 5, Material::steel(), Section::default()))
            .is_err());
        assert!(model.add_rigid_element(RigidElement::new(vec![0])).is_err());
        assert!(model
            .add_nodal_load(9, NodalLoad::force(1.0, 0.0, 0.0, LoadCase::default()))
            .is_err());
    }

    #[test]
    fn test_versions() {
        let mut model = cantilever();
        let (topology, loads) = (model.topology_version(), model.load_version());
        model
            .add_nodal_load(1, NodalLoad::force(1.0, 0.0, 0.0, LoadCase::default()))
            .unwrap();
        assert_eq!(model.topology_version(), topology);
        assert_eq!(model.load_version(), loads + 1);
        model.set_constraint(1, Constraint::fixed_dx()).unwrap();
        assert_eq!(model.topology_version(), topology + 1);
    }

    #[test]
    fn test_results_go_stale_after_mutation() {
        let mut model = cantilever();
        let case = LoadCase::default();
        model
            .add_nodal_load(1, NodalLoad::force(0.0, 0.0, 5.0, case.clone()))
            .unwrap();
        model.solve(&AnalysisOptions::linear()).unwrap();
        assert!(model.is_analyzed(&case));

        model
            .add_nodal_load(1, NodalLoad::force(0.0, 0.0, 5.0, case.clone()))
            .unwrap();
        assert!(!model.is_analyzed(&case));
        assert!(matches!(
            model.node_displacement(1, &case),
            Err(FEAError::NotAnalyzed)
        ));
    }

    #[test]
    fn test_load_cases_are_collected() {
        let mut model = cantilever();
        model
            .add_nodal_load(1, NodalLoad::force(1.0, 0.0, 0.0, LoadCase::dead("D")))
            .unwrap();
        model
            .add_nodal_load(1, NodalLoad::force(0.0, 1.0, 0.0, LoadCase::dead(" d ")))
            .unwrap();
        model.set_settlement_load_case(Some(LoadCase::live("S")));
        assert_eq!(
            model.load_cases(),
            vec![LoadCase::dead("D"), LoadCase::live("S")]
        );
    }
}
