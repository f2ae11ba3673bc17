use std::collections::HashMap;

use routechoice_core::choice::{SelectLinkQuery, SelectLinkSet};
use routechoice_core::graph::LinkId;
use serde::{Deserialize, Serialize};

/// JSON-deserializable representation of a named select-link query set:
/// `{"q1": [[1, 2], [7]]}` is `q1 = AND(1, 2) OR AND(7)`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SelectLinkConfig(HashMap<String, Vec<Vec<u64>>>);

impl SelectLinkConfig {
    pub fn into_select_link_set(self) -> SelectLinkSet {
        let queries = self
            .0
            .into_iter()
            .map(|(name, and_sets)| {
                let and_sets = and_sets
                    .into_iter()
                    .map(|set| set.into_iter().map(|id| LinkId(id as usize)).collect())
                    .collect();
                (name, SelectLinkQuery::new(and_sets))
            })
            .collect();
        SelectLinkSet::new(queries)
    }
}
