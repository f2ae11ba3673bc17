use std::collections::HashSet;
use std::time::Instant;

use log::{info, warn};
use rayon::prelude::*;

use routechoice_core::choice::{compute_choice_result, ChoiceResult, SelectLinkSet};
use routechoice_core::demand::FinalizedDemand;
use routechoice_core::graph::{CompactGraph, GraphError, NodeId};
use routechoice_core::path_finder::{PathFinderStrategy, SearchScratch};
use routechoice_core::route_enumerator::{
    enumerate_bfs_le, enumerate_link_penalisation, BfsLeParams, EnumeratorError, Lcg, LpParams,
    Route,
};

use crate::checkpoint::CheckpointWriter;
use crate::loading::{reduce as reduce_loads, LinkLoadAccumulator, LinkLoadResult};

use super::batch_config::BatchConfig;
use super::orchestrator_error::RouteChoiceError;

/// the per-OD outcome of a batch, kept only when `store_results` is set.
#[derive(Debug, Clone)]
pub struct OdResult {
    pub origin_id: i64,
    pub destination_id: i64,
    /// each route, expanded to original network link ids in path order.
    pub route_set: Vec<Vec<u32>>,
    pub choice: Option<ChoiceResult>,
}

/// the full output of one `batched` call. `results` is `None` when
/// `store_results` was off or `checkpoint_root` diverted the route-set table
/// to disk instead of materializing it.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub results: Option<Vec<OdResult>>,
    pub link_loads: LinkLoadResult,
}

impl BatchOutput {
    /// the in-memory result table, or `ResultsNotComputed` if it was never
    /// materialized (checkpointed to disk, or `store_results` was off).
    pub fn results(&self) -> Result<&[OdResult], RouteChoiceError> {
        self.results.as_deref().ok_or(RouteChoiceError::ResultsNotComputed)
    }
}

/// resolves `(origin_id, destination_id)` against the graph, enumerates and
/// scores its route set, and wraps it as a one-row `batched` call.
pub fn run(
    graph: &CompactGraph,
    origin_id: i64,
    destination_id: i64,
    demand: f64,
    select_links: &SelectLinkSet,
    config: &BatchConfig,
) -> Result<BatchOutput, RouteChoiceError> {
    let mut table = routechoice_core::demand::DemandTable::new();
    table.add_frame(vec![(
        (origin_id, destination_id),
        vec![("demand".to_string(), routechoice_core::demand::DemandValue::F64(demand))],
    )])?;
    let finalized = table.finalize();
    batched(graph, &finalized, select_links, config)
}

/// runs the full batch: pre-flight validation, per-OD parallel enumeration
/// and scoring, and link-load reduction.
pub fn batched(
    graph: &CompactGraph,
    demand: &FinalizedDemand,
    select_links: &SelectLinkSet,
    config: &BatchConfig,
) -> Result<BatchOutput, RouteChoiceError> {
    let start = Instant::now();
    config.validate()?;

    let mut seen = HashSet::new();
    let mut ods: Vec<(usize, i64, i64, NodeId, NodeId)> = Vec::new();
    for (row, &(origin_id, destination_id)) in demand.od_pairs.iter().enumerate() {
        if !seen.insert((origin_id, destination_id)) {
            warn!("duplicate OD pair ({origin_id}, {destination_id}) dropped");
            continue;
        }
        let origin_index = graph
            .external_to_index(origin_id)
            .ok_or(GraphError::UnknownExternalNode(origin_id))?;
        let dest_index = graph
            .external_to_index(destination_id)
            .ok_or(GraphError::UnknownExternalNode(destination_id))?;
        ods.push((row, origin_id, destination_id, origin_index, dest_index));
    }

    let column_names: Vec<String> = demand.columns.keys().cloned().collect();
    let query_names: Vec<String> = select_links.iter().map(|(name, _)| name.clone()).collect();
    let worker_count = config.worker_count().max(1);
    let chunk_size = ods.len().div_ceil(worker_count).max(1);

    info!(
        "batched: {} unique OD pairs, {} workers, enumerator={}",
        ods.len(),
        worker_count,
        if config.bfsle { "bfs-le" } else { "link-penalisation" }
    );

    let outcomes: Vec<(Vec<OdResult>, LinkLoadAccumulator)> = ods
        .par_chunks(chunk_size)
        .map(|chunk| {
            let finder = if config.a_star {
                PathFinderStrategy::a_star(config.min_cost_per_meter)
            } else {
                PathFinderStrategy::dijkstra()
            };
            let mut scratch = SearchScratch::new(graph);
            let mut rng = Lcg::new(config.seed);
            let mut accumulator =
                LinkLoadAccumulator::new(graph.total_network_links(), &column_names, &query_names);
            let mut results = Vec::new();

            for &(row, origin_id, destination_id, origin_index, dest_index) in chunk {
                if origin_index == dest_index {
                    continue;
                }
                graph.block_centroid_flows(&mut scratch.blocked, origin_index, dest_index);
                let route_set = enumerate(graph, &finder, &mut scratch, origin_index, dest_index, config, &mut rng);
                graph.unblock_centroid_flows(&mut scratch.blocked);
                let route_set = match route_set {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("OD ({origin_id}, {destination_id}) search failed, skipping: {e}");
                        continue;
                    }
                };

                let choice = if config.path_size_logit {
                    Some(compute_choice_result(graph, &route_set, config.beta, config.cutoff_prob))
                } else {
                    None
                };

                if config.eager_link_loading {
                    if let Some(choice) = &choice {
                        for (j, route) in route_set.iter().enumerate() {
                            let probability = choice.probability[j];
                            if probability == 0.0 {
                                continue;
                            }
                            let matching = LinkLoadAccumulator::matching(select_links, route);
                            for column in &column_names {
                                let demand_value = demand.value(column, row).unwrap_or(0.0);
                                accumulator.record(
                                    graph,
                                    route,
                                    origin_id as u32,
                                    destination_id as u32,
                                    column,
                                    probability * demand_value,
                                    &matching,
                                );
                            }
                        }
                    }
                }

                if config.store_results {
                    let expanded = route_set
                        .iter()
                        .map(|route| route.iter().flat_map(|&link| graph.expand(link).to_vec()).collect())
                        .collect();
                    results.push(OdResult {
                        origin_id,
                        destination_id,
                        route_set: expanded,
                        choice,
                    });
                }
            }

            (results, accumulator)
        })
        .collect();

    let mut all_results = Vec::new();
    let mut accumulators = Vec::new();
    for (results, accumulator) in outcomes {
        all_results.extend(results);
        accumulators.push(accumulator);
    }

    let link_loads = reduce_loads(accumulators);

    let results = match &config.checkpoint_root {
        Some(root) => {
            write_checkpoint(root, config.checkpoint_buffer_limit, &all_results)?;
            None
        }
        None => Some(all_results),
    };

    info!("batched: completed in {:?}", start.elapsed());

    Ok(BatchOutput { results, link_loads })
}

/// flushes a batch's route-set rows to a `CheckpointWriter` rooted at
/// `root`, sorted by origin so partitions are written in a stable order.
fn write_checkpoint(
    root: &std::path::Path,
    buffer_limit: usize,
    results: &[OdResult],
) -> Result<(), RouteChoiceError> {
    let mut ordered: Vec<&OdResult> = results.iter().collect();
    ordered.sort_by_key(|r| (r.origin_id, r.destination_id));

    let mut writer = CheckpointWriter::new(root, buffer_limit);
    for result in ordered {
        let mut row = serde_json::json!({
            "origin_id": result.origin_id,
            "destination_id": result.destination_id,
            "route_set": result.route_set,
        });
        if let Some(choice) = &result.choice {
            let object = row.as_object_mut().expect("row built as an object above");
            object.insert("cost".to_string(), serde_json::json!(choice.cost));
            object.insert("mask".to_string(), serde_json::json!(choice.mask));
            object.insert("path_overlap".to_string(), serde_json::json!(choice.path_overlap));
            object.insert("probability".to_string(), serde_json::json!(choice.probability));
        }
        writer
            .write_row(result.origin_id as u32, row)
            .map_err(|e| RouteChoiceError::Checkpoint(e.to_string()))?;
    }
    writer.close().map_err(|e| RouteChoiceError::Checkpoint(e.to_string()))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn enumerate(
    graph: &CompactGraph,
    finder: &PathFinderStrategy,
    scratch: &mut SearchScratch,
    origin: NodeId,
    destination: NodeId,
    config: &BatchConfig,
    rng: &mut Lcg,
) -> Result<Vec<Route>, EnumeratorError> {
    if config.bfsle {
        let params = BfsLeParams {
            max_routes: config.max_routes,
            max_depth: config.max_depth,
            max_misses: config.max_misses,
            penalty: None,
        };
        enumerate_bfs_le(graph, finder, scratch, origin, destination, &params, rng)
    } else {
        let params = LpParams {
            penalty: config.penalty,
            max_routes: config.max_routes,
            max_depth: config.max_depth,
            max_misses: config.max_misses,
        };
        enumerate_link_penalisation(graph, finder, scratch, origin, destination, &params)
    }
}
