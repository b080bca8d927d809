//! Weighted route graph over villages and relief centers.
//!
//! Nodes are identified by name. Edges connect every village to every relief
//! center (complete bipartite); there are no village-village or center-center
//! edges yet, but search is a general Dijkstra so denser topologies work.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::Serialize;

use crate::distance::round2;
use crate::error::{GraphError, PlanError};
use crate::records::{ReliefCenter, Village};
use crate::traits::{DistanceMetric, Site};

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Village,
    Center,
}

impl NodeKind {
    fn label(self) -> &'static str {
        match self {
            NodeKind::Village => "village",
            NodeKind::Center => "relief center",
        }
    }
}

/// Full record attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Village(Village),
    Center(ReliefCenter),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub data: NodeData,
}

impl Node {
    pub fn name(&self) -> &str {
        match &self.data {
            NodeData::Village(village) => village.name(),
            NodeData::Center(center) => center.name(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Village(_) => NodeKind::Village,
            NodeData::Center(_) => NodeKind::Center,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    weight: f64,
}

/// A path found by [`RouteGraph::shortest_path`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// Node names from source to target, inclusive.
    pub nodes: Vec<String>,
    /// Sum of edge weights along the path.
    pub weight: f64,
}

/// Closest target found by [`RouteGraph::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position in the `targets` slice passed to `nearest`.
    pub index: usize,
    /// Total path weight from the source.
    pub weight: f64,
}

/// Undirected weighted graph with adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<Edge>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the village/center graph.
    ///
    /// Fails with `InvalidInput` on a malformed record, a duplicate name, or a
    /// village and relief center sharing a name.
    pub fn build<M: DistanceMetric>(
        villages: &[Village],
        centers: &[ReliefCenter],
        metric: &M,
    ) -> Result<Self, PlanError> {
        let mut graph = Self::new();

        for village in villages {
            validate_site(NodeKind::Village, village)?;
            graph.add_node(NodeData::Village(village.clone()))?;
        }
        for center in centers {
            validate_site(NodeKind::Center, center)?;
            graph.add_node(NodeData::Center(center.clone()))?;
        }

        for village in villages {
            for center in centers {
                let weight = round2(metric.distance_km(village.location(), center.location()));
                let a = graph.node_id(village.name())?;
                let b = graph.node_id(center.name())?;
                // Names are unique, so every pair is new here.
                graph.adjacency[a].push(Edge { to: b, weight });
                graph.adjacency[b].push(Edge { to: a, weight });
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built route graph"
        );

        Ok(graph)
    }

    /// Add a node. Names must be unique across all node kinds.
    pub fn add_node(&mut self, data: NodeData) -> Result<usize, PlanError> {
        let node = Node { data };
        if let Some(&existing) = self.index.get(node.name()) {
            let existing_kind = self.nodes[existing].kind();
            let message = if existing_kind == node.kind() {
                format!("duplicate {} name `{}`", node.kind().label(), node.name())
            } else {
                format!(
                    "name `{}` is used by both a village and a relief center",
                    node.name()
                )
            };
            return Err(PlanError::InvalidInput(message));
        }

        let id = self.nodes.len();
        self.index.insert(node.name().to_string(), id);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Add an undirected edge, replacing any existing edge between the pair.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<(), GraphError> {
        let a = self.node_id(a)?;
        let b = self.node_id(b)?;

        self.adjacency[a].retain(|edge| edge.to != b);
        self.adjacency[b].retain(|edge| edge.to != a);
        self.adjacency[a].push(Edge { to: b, weight });
        if a != b {
            self.adjacency[b].push(Edge { to: a, weight });
        }
        Ok(())
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&id| &self.nodes[id])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        let loops = self
            .adjacency
            .iter()
            .enumerate()
            .filter(|(id, edges)| edges.iter().any(|edge| edge.to == *id))
            .count();
        (self.adjacency.iter().map(Vec::len).sum::<usize>() - loops) / 2 + loops
    }

    /// Weight of the direct edge between two nodes, if any.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let a = *self.index.get(a)?;
        let b = *self.index.get(b)?;
        self.adjacency[a]
            .iter()
            .find(|edge| edge.to == b)
            .map(|edge| edge.weight)
    }

    /// Minimum-weight path between two nodes.
    ///
    /// Returns `Ok(None)` when the target is unreachable and
    /// `Err(UnknownNode)` when either endpoint is not in the graph.
    pub fn shortest_path(&self, from: &str, to: &str) -> Result<Option<GraphPath>, GraphError> {
        let source = self.node_id(from)?;
        let target = self.node_id(to)?;

        let mut dist = vec![f64::INFINITY; self.nodes.len()];
        let mut prev: Vec<Option<usize>> = vec![None; self.nodes.len()];
        let mut heap = BinaryHeap::new();

        dist[source] = 0.0;
        heap.push(Candidate { cost: 0.0, node: source });

        while let Some(Candidate { cost, node }) = heap.pop() {
            if node == target {
                break;
            }
            if cost > dist[node] {
                continue;
            }
            for edge in &self.adjacency[node] {
                let next = cost + edge.weight;
                if next < dist[edge.to] {
                    dist[edge.to] = next;
                    prev[edge.to] = Some(node);
                    heap.push(Candidate { cost: next, node: edge.to });
                }
            }
        }

        if dist[target].is_infinite() {
            return Ok(None);
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = prev[current] {
            path.push(previous);
            current = previous;
        }
        path.reverse();

        Ok(Some(GraphPath {
            nodes: path
                .into_iter()
                .map(|id| self.nodes[id].name().to_string())
                .collect(),
            weight: dist[target],
        }))
    }

    /// Closest of `targets` from `from`, by total path weight.
    ///
    /// One Dijkstra run that stops as soon as the cheapest target is settled.
    /// Among targets at the same weight the earliest in `targets` wins.
    /// Returns `Ok(None)` when no target is reachable.
    pub fn nearest(&self, from: &str, targets: &[&str]) -> Result<Option<Nearest>, GraphError> {
        let source = self.node_id(from)?;

        let mut target_index: HashMap<usize, usize> = HashMap::with_capacity(targets.len());
        for (position, name) in targets.iter().enumerate() {
            target_index.entry(self.node_id(name)?).or_insert(position);
        }
        if target_index.is_empty() {
            return Ok(None);
        }

        let mut dist = vec![f64::INFINITY; self.nodes.len()];
        let mut heap = BinaryHeap::new();
        let mut best: Option<Nearest> = None;

        dist[source] = 0.0;
        heap.push(Candidate { cost: 0.0, node: source });

        while let Some(Candidate { cost, node }) = heap.pop() {
            if cost > dist[node] {
                continue;
            }
            if let Some(found) = best {
                // Everything left is farther; only exact ties may still matter.
                if cost > found.weight {
                    break;
                }
            }
            if let Some(&index) = target_index.get(&node) {
                if best.is_none_or(|found| index < found.index) {
                    best = Some(Nearest { index, weight: cost });
                }
            }
            for edge in &self.adjacency[node] {
                let next = cost + edge.weight;
                if next < dist[edge.to] {
                    dist[edge.to] = next;
                    heap.push(Candidate { cost: next, node: edge.to });
                }
            }
        }

        Ok(best)
    }

    fn node_id(&self, name: &str) -> Result<usize, GraphError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(name.to_string()))
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the lowest cost first.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: f64,
    node: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

fn validate_site<S: Site>(kind: NodeKind, site: &S) -> Result<(), PlanError> {
    let (lat, lon) = site.location();
    let label = kind.label();

    if site.name().trim().is_empty() {
        return Err(PlanError::InvalidInput(format!("{} with empty name", label)));
    }
    if !lat.is_finite() || !lon.is_finite() {
        return Err(PlanError::InvalidInput(format!(
            "{} `{}` has non-finite coordinates",
            label,
            site.name()
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(PlanError::InvalidInput(format!(
            "{} `{}`: latitude {} outside [-90, 90]",
            label,
            site.name(),
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(PlanError::InvalidInput(format!(
            "{} `{}`: longitude {} outside [-180, 180]",
            label,
            site.name(),
            lon
        )));
    }
    Ok(())
}
