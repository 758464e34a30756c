//! # Clustering Policies
//!
//! A policy pairs an adjacency rule with a component post-processing step. Two are provided:
//!
//! ### Directional
//!
//! `a -> b` iff the barcodes are exactly `threshold` edits apart and
//! `count(a) >= 2 * count(b) - 1`. The rule is asymmetric: a rare barcode one edit from an
//! abundant one is taken to be its error derivative, never the reverse. Because edges are
//! directed, breadth-first traversals from different seeds can reach the same barcode; the
//! post-processing step hands every such barcode to the claiming component whose
//! representative is most abundant and removes it from the others.
//!
//! ### Count-agnostic (`kmeans`)
//!
//! `a -- b` iff the barcodes are exactly `threshold` edits apart, regardless of counts. The
//! resulting components are coarse, so each multi-member component goes through a bounded
//! secondary refinement:
//!
//! 1. Walk the members in abundance order and promote a member to a centre when no existing
//!    centre could have produced it under the directional count rule, stopping at
//!    `max_subclusters` centres.
//! 2. With a single centre the component is returned unchanged.
//! 3. Otherwise distribute members with a multi-source breadth-first walk over the
//!    component's own edges, seeded from the centres in order. Members the walk cannot reach
//!    go to the nearest centre by hamming distance.
//!
//! With the default bound of one centre the refinement never splits anything.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use ahash::{AHashMap, AHashSet};

use crate::error::{ClusterError, Result};
use crate::graph::{
    AdjacencyGraph, NodeIndex, UmiTable, directional_admits, select_representative,
};

/// Default bound on the number of sub-clusters the count-agnostic refinement may produce.
pub const DEFAULT_MAX_SUBCLUSTERS: usize = 1;

/// The clustering method, chosen once when an engine is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ClusterMethod {
    /// Count-gradient adjacency with multi-claim reconciliation
    #[default]
    Directional,

    /// Count-agnostic adjacency followed by bounded secondary refinement
    Kmeans,
}

impl ClusterMethod {
    /// The method's name as used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterMethod::Directional => "directional",
            ClusterMethod::Kmeans => "kmeans",
        }
    }

    /// Creates the policy for this method.
    ///
    /// `max_subclusters` only affects [`ClusterMethod::Kmeans`].
    #[must_use]
    pub fn new_policy(&self, max_subclusters: usize) -> Box<dyn ClusterPolicy> {
        match self {
            ClusterMethod::Directional => Box::new(DirectionalPolicy),
            ClusterMethod::Kmeans => Box::new(CountAgnosticPolicy::new(max_subclusters)),
        }
    }
}

impl fmt::Display for ClusterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterMethod {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "directional" => Ok(ClusterMethod::Directional),
            "kmeans" => Ok(ClusterMethod::Kmeans),
            _ => Err(ClusterError::UnknownMethod { name: s.to_string() }),
        }
    }
}

/// An adjacency rule paired with a component post-processing step.
///
/// Implementations hold no per-bundle state, so one policy can serve many bundles
/// concurrently.
pub trait ClusterPolicy: Send + Sync {
    /// The method this policy implements.
    fn method(&self) -> ClusterMethod;

    /// Builds the adjacency graph for the barcodes in `table`.
    fn build_adjacency(&self, table: &UmiTable<'_>, threshold: u32) -> AdjacencyGraph;

    /// Turns raw breadth-first components into final clusters.
    ///
    /// # Errors
    ///
    /// Returns an internal invariant error if reconciliation leaves the partition broken.
    fn post_process(
        &self,
        table: &UmiTable<'_>,
        graph: &AdjacencyGraph,
        components: Vec<Vec<NodeIndex>>,
    ) -> Result<Vec<Vec<NodeIndex>>>;
}

/// Directional adjacency with multi-claim reconciliation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalPolicy;

impl ClusterPolicy for DirectionalPolicy {
    fn method(&self) -> ClusterMethod {
        ClusterMethod::Directional
    }

    fn build_adjacency(&self, table: &UmiTable<'_>, threshold: u32) -> AdjacencyGraph {
        AdjacencyGraph::build(table, threshold, |a, b| {
            directional_admits(table.count(a), table.count(b))
        })
    }

    fn post_process(
        &self,
        table: &UmiTable<'_>,
        _graph: &AdjacencyGraph,
        mut components: Vec<Vec<NodeIndex>>,
    ) -> Result<Vec<Vec<NodeIndex>>> {
        let mut claims: Vec<Vec<usize>> = vec![Vec::new(); table.len()];
        for (component_idx, component) in components.iter().enumerate() {
            for &node in component {
                claims[node].push(component_idx);
            }
        }

        // Each barcode is settled once, in abundance order; later removals never revisit it.
        for (node, claimants) in claims.iter().enumerate() {
            match claimants.len() {
                0 => return Err(ClusterError::Unassigned { umi: table.umi(node).to_string() }),
                1 => continue,
                _ => {}
            }

            let (winner, winner_rep) = claimants
                .iter()
                .copied()
                .filter_map(|c| select_representative(table, &components[c]).map(|rep| (c, rep)))
                .min_by(|(_, a), (_, b)| table.abundance_cmp(*a, *b))
                .ok_or_else(|| ClusterError::Unassigned { umi: table.umi(node).to_string() })?;

            log::trace!(
                "UMI {} claimed by {} components; kept with representative {}",
                table.umi(node),
                claimants.len(),
                table.umi(winner_rep),
            );

            for &loser in claimants.iter().filter(|&&c| c != winner) {
                components[loser].retain(|&member| member != node);
            }
        }

        components.retain(|component| !component.is_empty());
        Ok(components)
    }
}

/// Count-agnostic adjacency with bounded secondary refinement.
#[derive(Debug, Clone, Copy)]
pub struct CountAgnosticPolicy {
    max_subclusters: usize,
}

impl CountAgnosticPolicy {
    /// Creates the policy. A bound of zero is treated as one.
    #[must_use]
    pub fn new(max_subclusters: usize) -> Self {
        Self { max_subclusters: max_subclusters.max(1) }
    }

    /// The bound on sub-clusters per component.
    #[must_use]
    pub fn max_subclusters(&self) -> usize {
        self.max_subclusters
    }

    /// Picks refinement centres from `component` (which is in abundance order).
    fn centres(&self, table: &UmiTable<'_>, component: &[NodeIndex]) -> Vec<NodeIndex> {
        let mut centres: Vec<NodeIndex> = Vec::with_capacity(self.max_subclusters);
        for &member in component {
            if centres.len() == self.max_subclusters {
                break;
            }
            let explained = centres
                .iter()
                .any(|&centre| directional_admits(table.count(centre), table.count(member)));
            if !explained {
                centres.push(member);
            }
        }
        centres
    }

    /// Splits one component into abundance-consistent sub-groups, or returns it unchanged.
    fn refine(
        &self,
        table: &UmiTable<'_>,
        graph: &AdjacencyGraph,
        component: Vec<NodeIndex>,
    ) -> Vec<Vec<NodeIndex>> {
        let centres = self.centres(table, &component);
        if centres.len() <= 1 {
            return vec![component];
        }

        let members: AHashSet<NodeIndex> = component.iter().copied().collect();
        let mut label: AHashMap<NodeIndex, usize> = AHashMap::with_capacity(component.len());
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        for (group, &centre) in centres.iter().enumerate() {
            label.insert(centre, group);
            queue.push_back(centre);
        }

        while let Some(node) = queue.pop_front() {
            let group = label[&node];
            for &next in graph.neighbors(node) {
                if members.contains(&next) && !label.contains_key(&next) {
                    label.insert(next, group);
                    queue.push_back(next);
                }
            }
        }

        let mut groups: Vec<Vec<NodeIndex>> = vec![Vec::new(); centres.len()];
        for &member in &component {
            let group = label.get(&member).copied().unwrap_or_else(|| {
                (0..centres.len())
                    .min_by_key(|&g| table.distance(member, centres[g]))
                    .unwrap_or_default()
            });
            groups[group].push(member);
        }

        log::trace!(
            "split component of {} UMIs seeded at {} into {} sub-clusters",
            component.len(),
            table.umi(centres[0]),
            groups.len()
        );
        groups
    }
}

impl Default for CountAgnosticPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBCLUSTERS)
    }
}

impl ClusterPolicy for CountAgnosticPolicy {
    fn method(&self) -> ClusterMethod {
        ClusterMethod::Kmeans
    }

    fn build_adjacency(&self, table: &UmiTable<'_>, threshold: u32) -> AdjacencyGraph {
        AdjacencyGraph::build(table, threshold, |_, _| true)
    }

    fn post_process(
        &self,
        table: &UmiTable<'_>,
        graph: &AdjacencyGraph,
        components: Vec<Vec<NodeIndex>>,
    ) -> Result<Vec<Vec<NodeIndex>>> {
        let mut clusters = Vec::with_capacity(components.len());
        for component in components {
            if component.len() == 1 {
                clusters.push(component);
            } else {
                clusters.extend(self.refine(table, graph, component));
            }
        }
        Ok(clusters)
    }
}
