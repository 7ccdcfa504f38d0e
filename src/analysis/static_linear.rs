//! Linear static analysis: per load case, reduce, partition, solve and recover
//!
//! For a load case the reduced system is
//!
//! ```text
//! | Kff Kfs | | uf |   | ff      |
//! | Ksf Kss | | us | = | fs + rs |
//! ```
//!
//! with `us` the prescribed settlements. `uf` comes from
//! `Kff * uf = ff - Kfs * us`; the fixed-side forces are `Ksf * uf + Kss * us`.

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, info, warn};
use nalgebra::DVector;
use serde::Serialize;

use crate::elements::{MatrixKind, Node};
use crate::error::{FEAError, FEAResult};
use crate::loads::{LoadCase, LoadCombination};
use crate::math::{
    csc_diagonal, csc_matvec, BuiltInSolverFactory, BuiltInSolverType, LinearSolver,
    SolverFactory,
};
use crate::model::Model;
use crate::reduction::{
    assemble_global_matrix, DofMappingManager, RigidPermutation, ZoneDividedMatrix,
};
use crate::results::{AnalysisSummary, Displacement, Force};

const DOF_NAMES: [&str; 6] = ["DX", "DY", "DZ", "RX", "RY", "RZ"];

/// Node-space vectors (`6n` long) produced for one load case
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    /// Displacements of every node
    pub displacements: DVector<f64>,
    /// External loads on free DOFs, total support forces on fixed DOFs
    pub forces: DVector<f64>,
    /// Equivalent nodal loads of element loads
    pub element_forces: DVector<f64>,
    /// Loads applied directly to nodes
    pub concentrated_forces: DVector<f64>,
    /// Support reactions, zero on released DOFs
    pub support_reactions: DVector<f64>,
    pub num_masters: usize,
    pub free_dofs: usize,
    pub fixed_dofs: usize,
}

/// Reduced system of one master mapping, shared by every load case that
/// produces the same mapping
struct ReducedSystem {
    map: DofMappingManager,
    permutation: RigidPermutation,
    zones: ZoneDividedMatrix,
    /// `None` when there are no free DOFs
    solver: Option<Box<dyn LinearSolver>>,
}

/// Linear static results of a model, per load case
///
/// Results are tied to the model state they were computed from: a change of
/// topology drops results and cached systems, a change of loads drops
/// results only.
pub struct StaticLinearAnalysisResult {
    results: HashMap<LoadCase, CaseResult>,
    systems: HashMap<Vec<usize>, ReducedSystem>,
    solver_factory: Box<dyn SolverFactory>,
    topology_version: Option<u64>,
    load_version: Option<u64>,
}

impl Default for StaticLinearAnalysisResult {
    fn default() -> Self {
        Self::new(Box::new(BuiltInSolverFactory::new(
            BuiltInSolverType::CholeskyDecomposition,
        )))
    }
}

impl StaticLinearAnalysisResult {
    pub fn new(solver_factory: Box<dyn SolverFactory>) -> Self {
        Self {
            results: HashMap::new(),
            systems: HashMap::new(),
            solver_factory,
            topology_version: None,
            load_version: None,
        }
    }

    /// Replace the solver factory; cached systems are rebuilt on next use
    pub fn set_solver_factory(&mut self, solver_factory: Box<dyn SolverFactory>) {
        self.solver_factory = solver_factory;
        self.systems.clear();
    }

    /// Solve `case` unless a result for it is already present
    pub fn add_analysis_result_if_not_exists(
        &mut self,
        model: &Model,
        case: &LoadCase,
    ) -> FEAResult<()> {
        self.sync_with(model);
        if self.results.contains_key(case) {
            debug!("load case {} already solved", case);
            return Ok(());
        }
        self.solve_case(model, case)
    }

    /// Solve `case`, replacing any previous result for it
    pub fn add_analysis_result(&mut self, model: &Model, case: &LoadCase) -> FEAResult<()> {
        self.sync_with(model);
        self.results.remove(case);
        self.solve_case(model, case)
    }

    fn sync_with(&mut self, model: &Model) {
        let topology = Some(model.topology_version());
        let loads = Some(model.load_version());

        if self.topology_version != topology {
            if !self.systems.is_empty() || !self.results.is_empty() {
                info!("model topology changed, dropping cached systems and results");
            }
            self.systems.clear();
            self.results.clear();
        } else if self.load_version != loads {
            if !self.results.is_empty() {
                info!("model loads changed, dropping results");
            }
            self.results.clear();
        }

        self.topology_version = topology;
        self.load_version = loads;
    }

    fn solve_case(&mut self, model: &Model, case: &LoadCase) -> FEAResult<()> {
        let start = Instant::now();
        let map = DofMappingManager::create(model, Some(case))?;
        info!(
            "load case {}: {} nodes, {} masters, {} free / {} fixed DOFs",
            case,
            map.n,
            map.m,
            map.free_count(),
            map.fixed_count()
        );

        let key = map.master_map.clone();
        if !self.systems.contains_key(&key) {
            let system = ReducedSystem::build(model, map, case, self.solver_factory.as_ref())?;
            self.systems.insert(key.clone(), system);
        }
        let system = self
            .systems
            .get(&key)
            .ok_or_else(|| FEAError::InvalidInput("reduced system cache miss".to_string()))?;

        let result = system.solve(model, case)?;
        info!("load case {} solved in {:.2?}", case, start.elapsed());
        self.results.insert(case.clone(), result);
        Ok(())
    }

    /// Topology and load versions of the model state the results belong to
    pub fn versions(&self) -> (Option<u64>, Option<u64>) {
        (self.topology_version, self.load_version)
    }

    pub fn has_result(&self, case: &LoadCase) -> bool {
        self.results.contains_key(case)
    }

    /// Solved load cases, in no particular order
    pub fn load_cases(&self) -> impl Iterator<Item = &LoadCase> {
        self.results.keys()
    }

    /// Number of reduced systems currently cached
    pub fn cached_systems(&self) -> usize {
        self.systems.len()
    }

    pub fn case_result(&self, case: &LoadCase) -> FEAResult<&CaseResult> {
        self.results
            .get(case)
            .ok_or_else(|| FEAError::LoadCaseNotFound(case.name.clone()))
    }

    pub fn displacements(&self, case: &LoadCase) -> Option<&DVector<f64>> {
        self.results.get(case).map(|r| &r.displacements)
    }

    pub fn forces(&self, case: &LoadCase) -> Option<&DVector<f64>> {
        self.results.get(case).map(|r| &r.forces)
    }

    pub fn element_forces(&self, case: &LoadCase) -> Option<&DVector<f64>> {
        self.results.get(case).map(|r| &r.element_forces)
    }

    pub fn concentrated_forces(&self, case: &LoadCase) -> Option<&DVector<f64>> {
        self.results.get(case).map(|r| &r.concentrated_forces)
    }

    pub fn support_reactions(&self, case: &LoadCase) -> Option<&DVector<f64>> {
        self.results.get(case).map(|r| &r.support_reactions)
    }

    pub fn node_displacement(&self, case: &LoadCase, node: usize) -> FEAResult<Displacement> {
        let values = &self.case_result(case)?.displacements;
        check_node(values, node)?;
        Ok(Displacement::from_slice(values.as_slice(), 6 * node))
    }

    pub fn node_force(&self, case: &LoadCase, node: usize) -> FEAResult<Force> {
        let values = &self.case_result(case)?.forces;
        check_node(values, node)?;
        Ok(Force::from_slice(values.as_slice(), 6 * node))
    }

    pub fn support_reaction(&self, case: &LoadCase, node: usize) -> FEAResult<Force> {
        let values = &self.case_result(case)?.support_reactions;
        check_node(values, node)?;
        Ok(Force::from_slice(values.as_slice(), 6 * node))
    }

    /// Resultant about the origin of applied loads plus support reactions
    ///
    /// Zero for a structure in equilibrium.
    pub fn equilibrium_residual(&self, model: &Model, case: &LoadCase) -> FEAResult<Force> {
        let result = self.case_result(case)?;
        let applied = &result.element_forces + &result.concentrated_forces;
        let total = &applied + &result.support_reactions;

        let mut residual = Force::default();
        for (i, node) in model.nodes().iter().enumerate() {
            let force = Force::from_slice(total.as_slice(), 6 * i);
            residual += force.move_to(node.coords(), [0.0; 3]);
        }
        Ok(residual)
    }

    /// Log whether `case` satisfies global equilibrium; returns the verdict
    ///
    /// `tolerance` is relative to the largest applied force or moment.
    pub fn check_statics(&self, model: &Model, case: &LoadCase, tolerance: f64) -> FEAResult<bool> {
        let residual = self.equilibrium_residual(model, case)?;
        let result = self.case_result(case)?;
        let applied = &result.element_forces + &result.concentrated_forces;
        let scale = applied.amax().max(1.0);

        let ok = residual.force_magnitude() <= tolerance * scale
            && residual.moment_magnitude() <= tolerance * scale;
        if ok {
            info!("load case {}: statics check passed", case);
        } else {
            warn!(
                "load case {}: equilibrium residual force {:e}, moment {:e}",
                case,
                residual.force_magnitude(),
                residual.moment_magnitude()
            );
        }
        Ok(ok)
    }

    /// Factored sum of a node's displacements over the cases of `combination`
    ///
    /// Cases without a result are solved first.
    pub fn node_displacement_combination(
        &mut self,
        model: &Model,
        combination: &LoadCombination,
        node: usize,
    ) -> FEAResult<Displacement> {
        let values = self.combine(model, combination, node, |r| &r.displacements)?;
        Ok(Displacement::from_array(values))
    }

    /// Factored sum of a node's support reactions over the cases of `combination`
    pub fn support_reaction_combination(
        &mut self,
        model: &Model,
        combination: &LoadCombination,
        node: usize,
    ) -> FEAResult<Force> {
        let values = self.combine(model, combination, node, |r| &r.support_reactions)?;
        Ok(Force::from_array(values))
    }

    fn combine<F>(
        &mut self,
        model: &Model,
        combination: &LoadCombination,
        node: usize,
        field: F,
    ) -> FEAResult<[f64; 6]>
    where
        F: Fn(&CaseResult) -> &DVector<f64>,
    {
        let mut total = [0.0; 6];
        for (case, factor) in combination.cases() {
            self.add_analysis_result_if_not_exists(model, case)?;
            let values = field(self.case_result(case)?);
            check_node(values, node)?;
            for (k, sum) in total.iter_mut().enumerate() {
                *sum += factor * values[6 * node + k];
            }
        }
        Ok(total)
    }

    pub fn summary(&self, case: &LoadCase) -> FEAResult<AnalysisSummary> {
        let result = self.case_result(case)?;
        let num_nodes = result.displacements.len() / 6;
        let mut summary = AnalysisSummary {
            num_nodes,
            num_masters: result.num_masters,
            total_dofs: result.displacements.len(),
            free_dofs: result.free_dofs,
            fixed_dofs: result.fixed_dofs,
            ..Default::default()
        };

        for node in 0..num_nodes {
            let disp = Displacement::from_slice(result.displacements.as_slice(), 6 * node);
            if disp.translation_magnitude() > summary.max_displacement {
                summary.max_displacement = disp.translation_magnitude();
                summary.max_disp_node = node;
            }
            let rxn = Force::from_slice(result.support_reactions.as_slice(), 6 * node);
            if rxn.force_magnitude() > summary.max_reaction {
                summary.max_reaction = rxn.force_magnitude();
                summary.max_reaction_node = node;
            }
        }

        Ok(summary)
    }
}

impl ReducedSystem {
    fn build(
        model: &Model,
        map: DofMappingManager,
        case: &LoadCase,
        factory: &dyn SolverFactory,
    ) -> FEAResult<Self> {
        let start = Instant::now();
        let kt = assemble_global_matrix(model, MatrixKind::Stiffness)?;
        let permutation = RigidPermutation::build(model.nodes(), &map)?;
        let reduced = permutation.reduce_matrix(&kt)?;
        let zones = ZoneDividedMatrix::divide(&reduced, &map)?;
        warn_zero_diagonal(&zones, &map, model.nodes(), case);

        let solver = if map.free_count() > 0 {
            let mut solver = factory.create_solver(zones.kff.clone())?;
            if solver.needs_initialization() && !solver.is_initialized() {
                solver.initialize()?;
            }
            Some(solver)
        } else {
            None
        };
        debug!(
            "reduced system for load case {} built in {:.2?}",
            case,
            start.elapsed()
        );

        Ok(Self {
            map,
            permutation,
            zones,
            solver,
        })
    }

    fn solve(&self, model: &Model, case: &LoadCase) -> FEAResult<CaseResult> {
        let map = &self.map;
        let zones = &self.zones;
        let nodes = model.nodes();
        let (nf, ns) = (map.free_count(), map.fixed_count());

        let element_forces = element_load_vector(model, case)?;
        let concentrated_forces = nodal_load_vector(nodes, case);
        let ft = &element_forces + &concentrated_forces;

        let fr = self.permutation.reduce_vector(&ft)?;
        let ffr = DVector::from_iterator(nf, map.rmap2.iter().map(|&r| fr[r]));
        let fsr = DVector::from_iterator(ns, map.rmap3.iter().map(|&r| fr[r]));

        let settling = model.settlement_load_case() == Some(case);
        let usr = DVector::from_iterator(
            ns,
            (0..ns).map(|i| {
                let dof = map.fixed_to_node_dof(i);
                if settling {
                    nodes[dof / 6].settlements().as_array()[dof % 6]
                } else {
                    0.0
                }
            }),
        );
        let has_settlement = usr.iter().any(|&u| u != 0.0);

        let ufr = match &self.solver {
            Some(solver) => {
                let b = if has_settlement {
                    &ffr - csc_matvec(&zones.kfs, &usr)?
                } else {
                    ffr.clone()
                };
                let start = Instant::now();
                let x = solver.solve(&b)?;
                let residual = (csc_matvec(solver.matrix(), &x)? - &b).norm();
                debug!(
                    "{} solve of {} equations: residual {:e} in {:.2?}",
                    solver.name(),
                    nf,
                    residual,
                    start.elapsed()
                );
                x
            }
            None => DVector::zeros(0),
        };

        let mut fpsr = csc_matvec(&zones.ksf, &ufr)?;
        if has_settlement {
            fpsr += csc_matvec(&zones.kss, &usr)?;
        }

        let mut ur = DVector::zeros(6 * map.m);
        for (i, &r) in map.rmap2.iter().enumerate() {
            ur[r] = ufr[i];
        }
        for (i, &r) in map.rmap3.iter().enumerate() {
            ur[r] = usr[i];
        }
        let displacements = self.permutation.expand_vector(&ur)?;

        let mut forces = ft;
        for (dof, fixity) in map.fixity.iter().enumerate() {
            if fixity.is_fixed() {
                forces[dof] = 0.0;
            }
        }
        let mut support_reactions = DVector::zeros(6 * map.n);
        for i in 0..ns {
            let dof = map.fixed_to_node_dof(i);
            forces[dof] = fpsr[i];
            support_reactions[dof] = fpsr[i] - fsr[i];
        }

        Ok(CaseResult {
            displacements,
            forces,
            element_forces,
            concentrated_forces,
            support_reactions,
            num_masters: map.m,
            free_dofs: nf,
            fixed_dofs: ns,
        })
    }
}

/// Equivalent nodal loads of every element load in `case`
fn element_load_vector(model: &Model, case: &LoadCase) -> FEAResult<DVector<f64>> {
    let nodes = model.nodes();
    let mut fe = DVector::zeros(6 * nodes.len());

    for element in model.elements() {
        for load in element.loads().iter().filter(|load| load.case() == case) {
            let forces = element.global_equivalent_nodal_loads(load, nodes)?;
            if forces.len() != element.nodes().len() {
                return Err(FEAError::dimension(
                    "equivalent nodal loads",
                    element.nodes().len(),
                    forces.len(),
                ));
            }
            for (&node, force) in element.nodes().iter().zip(&forces) {
                add_at(&mut fe, node, force);
            }
        }
    }

    Ok(fe)
}

/// Loads applied directly to nodes in `case`
fn nodal_load_vector(nodes: &[Node], case: &LoadCase) -> DVector<f64> {
    let mut fc = DVector::zeros(6 * nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        for load in node.loads().iter().filter(|load| &load.case == case) {
            add_at(&mut fc, i, &load.force);
        }
    }
    fc
}

fn add_at(vector: &mut DVector<f64>, node: usize, force: &Force) {
    for (k, value) in force.as_array().iter().enumerate() {
        vector[6 * node + k] += value;
    }
}

fn warn_zero_diagonal(
    zones: &ZoneDividedMatrix,
    map: &DofMappingManager,
    nodes: &[Node],
    case: &LoadCase,
) {
    for (i, &d) in csc_diagonal(&zones.kff).iter().enumerate() {
        if d == 0.0 {
            let dof = map.free_to_node_dof(i);
            let node = dof / 6;
            warn!(
                "zero stiffness on free DOF {} of node {} in load case {}",
                DOF_NAMES[dof % 6],
                nodes[node].display_name(node),
                case
            );
        }
    }
}

fn check_node(values: &DVector<f64>, node: usize) -> FEAResult<()> {
    if 6 * node + 6 > values.len() {
        return Err(FEAError::NodeNotFound(format!("#{node}")));
    }
    Ok(())
}
