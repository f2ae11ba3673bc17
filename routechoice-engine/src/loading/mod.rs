mod link_loading_engine;
mod select_link_od_matrix;

pub use link_loading_engine::{reduce, LinkLoadAccumulator, LinkLoadResult};
pub use select_link_od_matrix::SparseCoo;
