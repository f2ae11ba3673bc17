mod demand_column;
mod demand_error;
mod demand_table;

pub use demand_column::{DemandColumn, DemandValue};
pub use demand_error::DemandError;
pub use demand_table::{DemandTable, FinalizedDemand, OdPair};
