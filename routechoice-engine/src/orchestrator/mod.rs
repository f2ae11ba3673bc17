mod batch_config;
mod orchestrator;
mod orchestrator_error;

pub use batch_config::BatchConfig;
pub use orchestrator::{batched, run, BatchOutput, OdResult};
pub use orchestrator_error::RouteChoiceError;
