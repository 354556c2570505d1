//! Upper bounds on graph edit distance from node assignments.
//!
//! Any bijection between the nodes of two graphs (padded with dummy nodes so
//! both sides have the same size) induces an edit path: nodes mapped to a
//! dummy are deleted or inserted, and every edge not preserved by the
//! mapping is deleted or inserted. With unit costs and no labels the cost of
//! that path is
//!
//! ```text
//! |n1 - n2| + |E1| + |E2| - 2 * matched
//! ```
//!
//! where `matched` counts edges (with multiplicity) that the mapping carries
//! onto an edge of the other graph. Since the cost only depends on
//! `matched`, improving the bound means finding assignments that preserve
//! more edges.
//!
//! The search starts from an assignment that pairs nodes of similar degree,
//! then repeatedly applies the first pairwise swap that preserves more
//! edges. Every assignment it reports is a real edit path, so every
//! estimate is a valid upper bound.

use std::cmp::Reverse;
use std::collections::HashMap;

use malgraph_graph::EdgeGraph;
use tracing::debug;

use crate::EditDistanceGenerator;

/// Swap candidates examined per estimate before the search gives up.
pub const DEFAULT_SWAP_BUDGET: u64 = 4_000_000;

/// Edit distance generator based on swap local search over node
/// assignments.
#[derive(Debug, Clone, Copy)]
pub struct LocalSearchGed {
    swap_budget: u64,
}

impl Default for LocalSearchGed {
    fn default() -> Self {
        Self {
            swap_budget: DEFAULT_SWAP_BUDGET,
        }
    }
}

impl LocalSearchGed {
    /// Sets how many swap candidates may be examined while looking for each
    /// improvement. When the budget runs out the sequence of estimates ends.
    #[must_use]
    pub fn with_swap_budget(mut self, swap_budget: u64) -> Self {
        self.swap_budget = swap_budget;
        self
    }
}

impl EditDistanceGenerator for LocalSearchGed {
    fn estimates<'a>(
        &'a self,
        g1: &'a EdgeGraph,
        g2: &'a EdgeGraph,
    ) -> impl Iterator<Item = u64> + 'a {
        LocalSearch::new(g1, g2, self.swap_budget)
    }
}

/// Iterator over strictly decreasing edit distance upper bounds.
#[derive(Debug)]
pub struct LocalSearch {
    /// Distinct edges of the first graph with their multiplicity.
    edges_1: Vec<(u32, u32, u32)>,
    /// Indices into `edges_1` touching each (padded) node of the first graph.
    incident_1: Vec<Vec<usize>>,
    /// Multiplicity of each edge of the second graph.
    edges_2: HashMap<(u32, u32), u32>,
    /// Padded first-graph node -> padded second-graph node.
    assignment: Vec<u32>,
    /// First-graph nodes with at least one edge; only these can gain.
    active: Vec<u32>,
    /// Position in `active` where the next scan starts.
    cursor: usize,
    /// Node count of both graphs after padding.
    size: u32,
    node_cost: u64,
    edge_total: u64,
    matched: u64,
    swap_budget: u64,
    started: bool,
    finished: bool,
}

fn signed(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn edge_counts(graph: &EdgeGraph) -> HashMap<(u32, u32), u32> {
    let mut counts = HashMap::new();
    for edge in graph.edges() {
        *counts.entry(edge).or_insert(0) += 1;
    }
    counts
}

/// Orders nodes by descending total degree, then descending out-degree,
/// padded with dummy nodes up to `size`.
fn degree_order(graph: &EdgeGraph, size: u32) -> Vec<u32> {
    let labels = graph.in_out_labels();
    let mut order: Vec<u32> = (0..graph.node_count()).collect();
    order.sort_by_key(|&n| {
        let [incoming, outgoing] = labels[n as usize];
        (Reverse(incoming + outgoing), Reverse(outgoing), n)
    });
    order.extend(graph.node_count()..size);
    order
}

impl LocalSearch {
    pub fn new(g1: &EdgeGraph, g2: &EdgeGraph, swap_budget: u64) -> Self {
        let (n1, n2) = (g1.node_count(), g2.node_count());
        let size = n1.max(n2);

        let mut incident_1 = vec![Vec::new(); size as usize];
        let mut counts_1: Vec<_> = edge_counts(g1).into_iter().collect();
        counts_1.sort_unstable();
        let edges_1: Vec<(u32, u32, u32)> = counts_1
            .into_iter()
            .map(|((from, to), count)| (from, to, count))
            .collect();
        for (e, &(from, to, _)) in edges_1.iter().enumerate() {
            incident_1[from as usize].push(e);
            if to != from {
                incident_1[to as usize].push(e);
            }
        }
        let active = (0..n1)
            .filter(|&n| !incident_1[n as usize].is_empty())
            .collect();

        let mut assignment = vec![0; size as usize];
        for (from, to) in degree_order(g1, size)
            .into_iter()
            .zip(degree_order(g2, size))
        {
            assignment[from as usize] = to;
        }

        let mut search = Self {
            edges_1,
            incident_1,
            edges_2: edge_counts(g2),
            assignment,
            active,
            cursor: 0,
            size,
            node_cost: u64::from(n1.abs_diff(n2)),
            edge_total: (g1.edge_count() + g2.edge_count()) as u64,
            matched: 0,
            swap_budget,
            started: false,
            finished: false,
        };
        search.matched = (0..search.edges_1.len())
            .map(|e| search.preserved(e, |n| search.assignment[n as usize]))
            .sum();
        search
    }

    /// Cost of the edit path induced by the current assignment.
    pub fn cost(&self) -> u64 {
        self.node_cost + self.edge_total - 2 * self.matched
    }

    /// Copies of edge `e` preserved when nodes are mapped through `map`.
    fn preserved(&self, e: usize, map: impl Fn(u32) -> u32) -> u64 {
        let (from, to, count) = self.edges_1[e];
        let image = self
            .edges_2
            .get(&(map(from), map(to)))
            .copied()
            .unwrap_or(0);
        u64::from(count.min(image))
    }

    /// Change in `matched` if the images of `a` and `b` were exchanged.
    fn swap_gain(&self, a: u32, b: u32) -> i64 {
        let touched = self.incident_1[a as usize].iter().copied().chain(
            self.incident_1[b as usize].iter().copied().filter(|&e| {
                let (from, to, _) = self.edges_1[e];
                from != a && to != a
            }),
        );

        let current = |n: u32| self.assignment[n as usize];
        let swapped = |n: u32| {
            if n == a {
                self.assignment[b as usize]
            } else if n == b {
                self.assignment[a as usize]
            } else {
                self.assignment[n as usize]
            }
        };

        touched
            .map(|e| {
                signed(self.preserved(e, swapped))
                    - signed(self.preserved(e, current))
            })
            .sum()
    }

    /// Applies the first improving swap found, scanning from the cursor.
    /// Returns false at a local optimum or when the budget runs out.
    fn improve(&mut self) -> bool {
        let mut examined = 0u64;

        for step in 0..self.active.len() {
            let slot = (self.cursor + step) % self.active.len();
            let a = self.active[slot];
            for b in 0..self.size {
                // Pairs of two active nodes are tried once, from the lower one.
                if b == a
                    || (b < a && !self.incident_1[b as usize].is_empty())
                {
                    continue;
                }
                examined += 1;
                if examined > self.swap_budget {
                    debug!(examined, "swap budget exhausted");
                    return false;
                }

                let gain = self.swap_gain(a, b);
                if gain > 0 {
                    self.assignment.swap(a as usize, b as usize);
                    self.matched += gain.unsigned_abs();
                    self.cursor = slot;
                    return true;
                }
            }
        }
        false
    }
}

impl Iterator for LocalSearch {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.finished {
            return None;
        }
        if self.started {
            if !self.improve() {
                self.finished = true;
                return None;
            }
        } else {
            self.started = true;
        }

        let cost = self.cost();
        if cost == 0 {
            self.finished = true;
        }
        Some(cost)
    }
}
