//! Index maps between node space, master space and the free/fixed partitions
//!
//! Four spaces are involved:
//! - node space: `6n` DOFs, DOF `k` of node `i` at `6i + k`
//! - master (reduced) space: `6m` DOFs of the `m` master nodes in ascending
//!   node order
//! - free space: released DOFs of the masters
//! - fixed space: constrained DOFs of the masters

use serde::Serialize;

use super::graph::master_mapping;
use crate::elements::{DofConstraint, Node, RigidElement};
use crate::error::FEAResult;
use crate::loads::LoadCase;
use crate::model::Model;

/// All index translations for one master mapping
///
/// Forward maps hold `None` where the source index has no image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DofMappingManager {
    /// Number of nodes
    pub n: usize,
    /// Number of master nodes
    pub m: usize,
    /// `masters[i]`: node that node `i` defers to
    pub master_map: Vec<usize>,
    /// Node index to compact master index
    pub r_master_map: Vec<Option<usize>>,
    /// Node-space DOF (`6n`) to master-space DOF (`6m`)
    pub map1: Vec<Option<usize>>,
    /// Master-space DOF to node-space DOF
    pub rmap1: Vec<usize>,
    /// Master-space DOF to free index
    pub map2: Vec<Option<usize>>,
    /// Free index to master-space DOF
    pub rmap2: Vec<usize>,
    /// Master-space DOF to fixed index
    pub map3: Vec<Option<usize>>,
    /// Fixed index to master-space DOF
    pub rmap3: Vec<usize>,
    /// Node index to compact master index
    pub map4: Vec<Option<usize>>,
    /// Compact master index to node index
    pub rmap4: Vec<usize>,
    /// Support state of every node-space DOF
    pub fixity: Vec<DofConstraint>,
}

impl DofMappingManager {
    /// Build the maps for `model` under `case` (`None` applies every rigid element)
    pub fn create(model: &Model, case: Option<&LoadCase>) -> FEAResult<Self> {
        Self::from_parts(model.nodes(), model.rigid_elements(), case)
    }

    pub fn from_parts(
        nodes: &[Node],
        rigid_elements: &[RigidElement],
        case: Option<&LoadCase>,
    ) -> FEAResult<Self> {
        let masters = master_mapping(nodes, rigid_elements, case)?;
        Ok(Self::from_masters(nodes, masters))
    }

    /// Build the maps from a precomputed master mapping
    pub fn from_masters(nodes: &[Node], masters: Vec<usize>) -> Self {
        let n = nodes.len();

        let mut map4 = vec![None; n];
        let mut rmap4 = Vec::new();
        for (i, &master) in masters.iter().enumerate() {
            if master == i {
                map4[i] = Some(rmap4.len());
                rmap4.push(i);
            }
        }
        let m = rmap4.len();

        let mut map1 = vec![None; 6 * n];
        let mut rmap1 = vec![0; 6 * m];
        for (compact, &node) in rmap4.iter().enumerate() {
            for k in 0..6 {
                map1[6 * node + k] = Some(6 * compact + k);
                rmap1[6 * compact + k] = 6 * node + k;
            }
        }

        let mut map2 = vec![None; 6 * m];
        let mut map3 = vec![None; 6 * m];
        let mut rmap2 = Vec::new();
        let mut rmap3 = Vec::new();
        for (compact, &node) in rmap4.iter().enumerate() {
            for (k, dof) in nodes[node].constraints().to_array().iter().enumerate() {
                let reduced = 6 * compact + k;
                if dof.is_fixed() {
                    map3[reduced] = Some(rmap3.len());
                    rmap3.push(reduced);
                } else {
                    map2[reduced] = Some(rmap2.len());
                    rmap2.push(reduced);
                }
            }
        }

        let fixity = nodes
            .iter()
            .flat_map(|node| node.constraints().to_array())
            .collect();

        Self {
            n,
            m,
            r_master_map: map4.clone(),
            master_map: masters,
            map1,
            rmap1,
            map2,
            rmap2,
            map3,
            rmap3,
            map4,
            rmap4,
            fixity,
        }
    }

    pub fn free_count(&self) -> usize {
        self.rmap2.len()
    }

    pub fn fixed_count(&self) -> usize {
        self.rmap3.len()
    }

    /// Node-space DOF of free index `i`
    pub fn free_to_node_dof(&self, i: usize) -> usize {
        self.rmap1[self.rmap2[i]]
    }

    /// Node-space DOF of fixed index `i`
    pub fn fixed_to_node_dof(&self, i: usize) -> usize {
        self.rmap1[self.rmap3[i]]
    }

    /// Fixity of a master-space DOF, read from its master node
    pub fn reduced_fixity(&self, reduced: usize) -> DofConstraint {
        self.fixity[self.rmap1[reduced]]
    }

    pub fn is_slave(&self, node: usize) -> bool {
        self.master_map[node] != node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Constraint;

    fn line(count: usize) -> Vec<Node> {
        (0..count).map(|i| Node::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_identity_when_no_rigid_links() {
        let mut nodes = line(2);
        nodes[0] = nodes[0].clone().with_constraint(Constraint::fixed());
        let map = DofMappingManager::from_parts(&nodes, &[], None).unwrap();

        assert_eq!((map.n, map.m), (2, 2));
        assert_eq!(map.fixed_count(), 6);
        assert_eq!(map.free_count(), 6);
        assert_eq!(map.rmap3, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(map.rmap2, vec![6, 7, 8, 9, 10, 11]);
        assert_eq!(map.map2[6], Some(0));
        assert_eq!(map.map3[6], None);
        assert_eq!(map.free_to_node_dof(0), 6);
    }

    #[test]
    fn test_slave_is_dropped_from_master_space() {
        let mut nodes = line(3);
        nodes[1] = nodes[1].clone().with_constraint(Constraint::movement_fixed());
        let rigid = [RigidElement::new(vec![0, 1])];
        let map = DofMappingManager::from_parts(&nodes, &rigid, None).unwrap();

        assert_eq!(map.master_map, vec![1, 1, 2]);
        assert_eq!(map.m, 2);
        assert_eq!(map.rmap4, vec![1, 2]);
        assert_eq!(map.map4, vec![None, Some(0), Some(1)]);
        assert_eq!(map.r_master_map, map.map4);
        assert!(map.map1[..6].iter().all(Option::is_none));
        assert_eq!(map.map1[6], Some(0));
        assert_eq!(map.rmap1[6], 12);
        assert_eq!(map.fixed_count(), 3);
        assert_eq!(map.free_count() + map.fixed_count(), 6 * map.m);
        assert_eq!(map.fixed_to_node_dof(2), 8);
        assert!(map.is_slave(0));
        assert_eq!(map.fixity.len(), 18);
        assert_eq!(map.reduced_fixity(0), DofConstraint::Fixed);
        assert_eq!(map.reduced_fixity(3), DofConstraint::Released);
    }

    #[test]
    fn test_forward_and_reverse_maps_agree() {
        let mut nodes = line(5);
        nodes[4] = nodes[4].clone().with_constraint(Constraint::with_restraints(
            true, false, true, false, true, false,
        ));
        let rigid = [RigidElement::new(vec![2, 3, 4])];
        let map = DofMappingManager::from_parts(&nodes, &rigid, None).unwrap();

        for (reduced, &dof) in map.rmap1.iter().enumerate() {
            assert_eq!(map.map1[dof], Some(reduced));
        }
        for (free, &reduced) in map.rmap2.iter().enumerate() {
            assert_eq!(map.map2[reduced], Some(free));
        }
        for (fixed, &reduced) in map.rmap3.iter().enumerate() {
            assert_eq!(map.map3[reduced], Some(fixed));
        }
        for (compact, &node) in map.rmap4.iter().enumerate() {
            assert_eq!(map.map4[node], Some(compact));
        }
    }
}
