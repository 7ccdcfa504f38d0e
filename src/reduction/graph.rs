//! Consolidation of rigidly linked nodes into master/slave groups

use std::collections::{BTreeSet, VecDeque};

use log::debug;

use crate::elements::{Node, RigidElement};
use crate::error::{FEAError, FEAResult};
use crate::loads::LoadCase;

/// Find the master of every node
///
/// Nodes linked by rigid elements applicable to `case` form groups; each
/// group defers to one master. `masters[i] == i` for masters and for nodes
/// outside every applicable rigid element. `case == None` applies every
/// rigid element.
///
/// The master of a group is, in order of preference: a central node of any
/// rigid element, the first constrained node, the first node reached. A
/// constrained node that is not the master fails with `MA20000`.
pub fn master_mapping(
    nodes: &[Node],
    rigid_elements: &[RigidElement],
    case: Option<&LoadCase>,
) -> FEAResult<Vec<usize>> {
    let n = nodes.len();
    let mut masters: Vec<usize> = (0..n).collect();

    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    let mut in_graph = vec![false; n];
    let mut central = vec![false; n];

    for element in rigid_elements {
        for &node in element.nodes.iter().chain(element.central_node.iter()) {
            if node >= n {
                return Err(FEAError::NodeNotFound(format!("#{node}")));
            }
        }
        if let Some(c) = element.central_node {
            central[c] = true;
        }
        if !element.is_applicable(case) {
            continue;
        }
        for &node in &element.nodes {
            in_graph[node] = true;
            adjacency[node].insert(node);
        }
        for pair in element.nodes.windows(2) {
            adjacency[pair[0]].insert(pair[1]);
            adjacency[pair[1]].insert(pair[0]);
        }
    }

    let mut visited: Vec<bool> = in_graph.iter().map(|&g| !g).collect();
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if visited[seed] {
            continue;
        }

        let mut component = Vec::new();
        visited[seed] = true;
        queue.push_back(seed);
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for &next in &adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }

        let is_constrained = |i: usize| !nodes[i].constraints().is_released();
        let master = component
            .iter()
            .copied()
            .find(|&i| central[i])
            .or_else(|| component.iter().copied().find(|&i| is_constrained(i)))
            .unwrap_or(seed);

        if let Some(&other) = component
            .iter()
            .find(|&&i| i != master && is_constrained(i))
        {
            return Err(FEAError::conflicting_constraints(master, other));
        }

        for &node in &component {
            masters[node] = master;
        }
        if component.len() > 1 {
            debug!("rigid group {:?} defers to node {}", component, master);
        }
    }

    Ok(masters)
}
