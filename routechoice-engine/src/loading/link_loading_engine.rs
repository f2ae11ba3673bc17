use std::collections::HashMap;

use routechoice_core::choice::SelectLinkSet;
use routechoice_core::graph::CompactGraph;
use routechoice_core::route_enumerator::Route;

use super::select_link_od_matrix::SparseCoo;

/// per-thread accumulator for total and select-link loads, created once at
/// batch start and reduced into a single [`LinkLoadResult`] at batch end.
/// Dense vectors are sized to `n_network_links` so a compact link's load is
/// written once per expanded network link.
pub struct LinkLoadAccumulator {
    n_network_links: usize,
    total: HashMap<String, Vec<f64>>,
    select_link: HashMap<(String, String), Vec<f64>>,
    select_link_od: HashMap<(String, String), SparseCoo>,
}

impl LinkLoadAccumulator {
    pub fn new(n_network_links: usize, column_names: &[String], query_names: &[String]) -> Self {
        let total = column_names
            .iter()
            .map(|c| (c.clone(), vec![0.0; n_network_links]))
            .collect();
        let mut select_link = HashMap::new();
        let mut select_link_od = HashMap::new();
        for query in query_names {
            for column in column_names {
                select_link.insert((query.clone(), column.clone()), vec![0.0; n_network_links]);
                select_link_od.insert((query.clone(), column.clone()), SparseCoo::default());
            }
        }
        Self {
            n_network_links,
            total,
            select_link,
            select_link_od,
        }
    }

    /// folds one route's contribution to one demand column into this
    /// accumulator. `matching_queries` is the set of select-link query
    /// names `route` satisfies.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &mut self,
        graph: &CompactGraph,
        route: &Route,
        origin_id: u32,
        destination_id: u32,
        column: &str,
        load: f64,
        matching_queries: &[&str],
    ) {
        if load == 0.0 {
            return;
        }
        if let Some(dense) = self.total.get_mut(column) {
            for &link in route {
                for network_link in graph.expand(link) {
                    dense[*network_link as usize] += load;
                }
            }
        }
        for query in matching_queries {
            let key = (query.to_string(), column.to_string());
            if let Some(dense) = self.select_link.get_mut(&key) {
                for &link in route {
                    for network_link in graph.expand(link) {
                        dense[*network_link as usize] += load;
                    }
                }
            }
            if let Some(coo) = self.select_link_od.get_mut(&key) {
                coo.push(origin_id, destination_id, load);
            }
        }
    }

    pub fn matching<'a>(select_links: &'a SelectLinkSet, route: &Route) -> Vec<&'a str> {
        select_links.matching(route)
    }

    fn reduce(accumulators: Vec<Self>) -> LinkLoadResult {
        let mut iter = accumulators.into_iter();
        let Some(first) = iter.next() else {
            return LinkLoadResult::default();
        };
        let n_network_links = first.n_network_links;
        let mut total = first.total;
        let mut select_link = first.select_link;
        let mut select_link_od = first.select_link_od;

        for acc in iter {
            for (column, values) in acc.total {
                let entry = total.entry(column).or_insert_with(|| vec![0.0; n_network_links]);
                for (a, b) in entry.iter_mut().zip(values) {
                    *a += b;
                }
            }
            for (key, values) in acc.select_link {
                let entry = select_link
                    .entry(key)
                    .or_insert_with(|| vec![0.0; n_network_links]);
                for (a, b) in entry.iter_mut().zip(values) {
                    *a += b;
                }
            }
            for (key, coo) in acc.select_link_od {
                select_link_od.entry(key).or_default().extend(coo);
            }
        }

        LinkLoadResult {
            total,
            select_link,
            select_link_od,
        }
    }
}

/// the final, reduced link-loading output for a batch.
#[derive(Debug, Clone, Default)]
pub struct LinkLoadResult {
    pub total: HashMap<String, Vec<f64>>,
    pub select_link: HashMap<(String, String), Vec<f64>>,
    pub select_link_od: HashMap<(String, String), SparseCoo>,
}

/// sums a batch's per-thread accumulators into one final result, discarding
/// the per-thread buffers.
pub fn reduce(accumulators: Vec<LinkLoadAccumulator>) -> LinkLoadResult {
    LinkLoadAccumulator::reduce(accumulators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routechoice_core::graph::LinkId;
    use routechoice_core::testing::triangle_graph;

    #[test]
    fn total_load_accumulates_per_expanded_network_link() {
        let g = triangle_graph();
        let columns = vec!["volume".to_string()];
        let queries: Vec<String> = vec![];
        let mut acc = LinkLoadAccumulator::new(g.total_network_links(), &columns, &queries);
        let route: Route = vec![LinkId(0), LinkId(1)];
        acc.record(&g, &route, 0, 2, "volume", 10.0, &[]);
        let result = reduce(vec![acc]);
        assert_eq!(result.total["volume"][100], 10.0);
        assert_eq!(result.total["volume"][101], 10.0);
        assert_eq!(result.total["volume"][102], 0.0);
    }

    #[test]
    fn select_link_only_loads_matching_routes() {
        let g = triangle_graph();
        let columns = vec!["volume".to_string()];
        let queries = vec!["q1".to_string()];
        let mut acc = LinkLoadAccumulator::new(g.total_network_links(), &columns, &queries);
        let via_01: Route = vec![LinkId(0), LinkId(1)];
        let direct: Route = vec![LinkId(2)];
        acc.record(&g, &via_01, 0, 2, "volume", 10.0, &["q1"]);
        acc.record(&g, &direct, 0, 2, "volume", 10.0, &[]);
        let result = reduce(vec![acc]);
        assert_eq!(result.select_link[&("q1".to_string(), "volume".to_string())][100], 10.0);
        assert_eq!(result.select_link[&("q1".to_string(), "volume".to_string())][102], 0.0);
    }

    #[test]
    fn reduction_sums_across_threads() {
        let g = triangle_graph();
        let columns = vec!["volume".to_string()];
        let queries: Vec<String> = vec![];
        let mut a = LinkLoadAccumulator::new(g.total_network_links(), &columns, &queries);
        let mut b = LinkLoadAccumulator::new(g.total_network_links(), &columns, &queries);
        let route: Route = vec![LinkId(0)];
        a.record(&g, &route, 0, 1, "volume", 3.0, &[]);
        b.record(&g, &route, 0, 1, "volume", 4.0, &[]);
        let result = reduce(vec![a, b]);
        assert_eq!(result.total["volume"][100], 7.0);
    }
}
