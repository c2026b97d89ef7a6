// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution order resolution.
//!
//! Kahn's algorithm grouped into levels: level 0 holds every node without
//! producers, level N the nodes whose producers all sit in levels 0..N-1.
//! Nodes inside a level are independent of each other and sorted by id, so
//! the flattened order is deterministic for a given graph.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::errors::BuildError;
use crate::graph::{Edge, Node, NodeId};
use crate::observability::messages::{graph::CyclicDependencyDetected, StructuredLog};

pub fn compute_topological_levels(
    nodes: &[Node],
    edges: &[Edge],
) -> Result<Vec<Vec<NodeId>>, BuildError> {
    let dependents = dependents_of(nodes.len(), edges);

    let mut in_degree = vec![0usize; nodes.len()];
    for targets in &dependents {
        for &target in targets {
            in_degree[target] += 1;
        }
    }

    let mut levels = Vec::new();
    let mut queue: VecDeque<NodeId> = (0..nodes.len()).filter(|&id| in_degree[id] == 0).collect();
    let mut processed = queue.len();

    while !queue.is_empty() {
        let current_level: Vec<NodeId> = queue.drain(..).collect();
        let mut next_level = BTreeSet::new();

        for &current in &current_level {
            for &dependent in &dependents[current] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    next_level.insert(dependent);
                }
            }
        }

        processed += next_level.len();
        queue.extend(next_level);
        levels.push(current_level);
    }

    if processed != nodes.len() {
        let remaining: Vec<NodeId> = (0..nodes.len()).filter(|&id| in_degree[id] > 0).collect();
        let cycle: Vec<String> = find_cycle(&remaining, &dependents)
            .into_iter()
            .map(|id| nodes[id].name().to_string())
            .collect();

        CyclicDependencyDetected { cycle: &cycle }.log();
        return Err(BuildError::CyclicDependency { cycle });
    }

    Ok(levels)
}

/// Forward adjacency: producer -> distinct consumers.
fn dependents_of(node_count: usize, edges: &[Edge]) -> Vec<BTreeSet<NodeId>> {
    let mut dependents = vec![BTreeSet::new(); node_count];
    for edge in edges {
        dependents[edge.producer].insert(edge.consumer);
    }
    dependents
}

/// A closed cycle path (first node repeated at the end) among `candidates`.
fn find_cycle(candidates: &[NodeId], dependents: &[BTreeSet<NodeId>]) -> Vec<NodeId> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for &start in candidates {
        if visited.contains(&start) {
            continue;
        }
        if let Some(cycle) = dfs_cycle_detection(start, dependents, &mut visited, &mut rec_stack, &mut path) {
            return cycle;
        }
    }

    candidates.to_vec()
}

fn dfs_cycle_detection(
    node: NodeId,
    dependents: &[BTreeSet<NodeId>],
    visited: &mut HashSet<NodeId>,
    rec_stack: &mut HashSet<NodeId>,
    path: &mut Vec<NodeId>,
) -> Option<Vec<NodeId>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    for &neighbor in &dependents[node] {
        if !visited.contains(&neighbor) {
            if let Some(cycle) = dfs_cycle_detection(neighbor, dependents, visited, rec_stack, path) {
                return Some(cycle);
            }
        } else if rec_stack.contains(&neighbor) {
            let cycle_start = path.iter().position(|&x| x == neighbor).unwrap_or(0);
            let mut cycle = path[cycle_start..].to_vec();
            cycle.push(neighbor);
            return Some(cycle);
        }
    }

    rec_stack.remove(&node);
    path.pop();
    None
}
