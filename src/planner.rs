//! Route planner: binds each village to its nearest reachable relief center.

use rayon::prelude::*;
use serde_json::Value;

use crate::distance::{PlanarMetric, round2};
use crate::error::{PlanError, RouteError};
use crate::graph::RouteGraph;
use crate::records::{Assignment, ReliefCenter, Village, centers_from_records, villages_from_records};
use crate::traits::DistanceMetric;

/// Plan with the default planar metric.
///
/// Output order follows `villages`. Villages with no reachable center are
/// left out.
pub fn plan(villages: &[Village], centers: &[ReliefCenter]) -> Result<Vec<Assignment>, PlanError> {
    plan_with_metric(villages, centers, &PlanarMetric)
}

pub fn plan_with_metric<M: DistanceMetric>(
    villages: &[Village],
    centers: &[ReliefCenter],
    metric: &M,
) -> Result<Vec<Assignment>, PlanError> {
    let graph = RouteGraph::build(villages, centers, metric)?;
    plan_on_graph(&graph, villages, centers)
}

/// Parse raw registry records, then plan.
pub fn plan_records(villages: &[Value], centers: &[Value]) -> Result<Vec<Assignment>, PlanError> {
    let villages = villages_from_records(villages)?;
    let centers = centers_from_records(centers)?;
    plan(&villages, &centers)
}

/// Plan against a prebuilt graph.
///
/// Every village and center must be a node of `graph`; a missing one is a
/// structural error and aborts the whole run.
pub fn plan_on_graph(
    graph: &RouteGraph,
    villages: &[Village],
    centers: &[ReliefCenter],
) -> Result<Vec<Assignment>, PlanError> {
    let targets: Vec<&str> = centers.iter().map(|center| center.name.as_str()).collect();

    let outcomes = villages
        .par_iter()
        .map(|village| match assign_village(graph, village, centers, &targets) {
            Ok(assignment) => Ok(Some(assignment)),
            Err(RouteError::NoRoute(name)) => {
                tracing::debug!(village = %name, "no relief center reachable, skipping");
                Ok(None)
            }
            Err(RouteError::Graph(err)) => Err(err),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let assignments: Vec<Assignment> = outcomes.into_iter().flatten().collect();

    tracing::info!(
        villages = villages.len(),
        centers = centers.len(),
        assigned = assignments.len(),
        "generated relief plan"
    );

    Ok(assignments)
}

/// Find the nearest center for one village.
///
/// `targets` holds the center names in `centers` order; ties go to the first.
fn assign_village(
    graph: &RouteGraph,
    village: &Village,
    centers: &[ReliefCenter],
    targets: &[&str],
) -> Result<Assignment, RouteError> {
    let nearest = graph
        .nearest(&village.name, targets)?
        .ok_or_else(|| RouteError::NoRoute(village.name.clone()))?;
    let center = &centers[nearest.index];

    Ok(Assignment {
        village: village.clone(),
        relief_center: center.clone(),
        distance: round2(nearest.weight),
        deliveries: village.needs.clone(),
    })
}
