use routechoice_core::demand::DemandError;
use routechoice_core::graph::GraphError;
use routechoice_core::path_finder::PathFinderError;
use routechoice_core::route_enumerator::EnumeratorError;

/// top-level error for the orchestrator, aggregating every component error
/// the way the host library's application-level error aggregates its
/// component errors.
#[derive(thiserror::Error, Debug)]
pub enum RouteChoiceError {
    #[error("invalid batch parameters: {0}")]
    InvalidParameters(String),
    #[error("results have not been computed; call `batched` first")]
    ResultsNotComputed,
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    PathFinder(#[from] PathFinderError),
    #[error(transparent)]
    Enumerator(#[from] EnumeratorError),
    #[error(transparent)]
    Demand(#[from] DemandError),
    #[error("checkpoint write failed: {0}")]
    Checkpoint(String),
}
