use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing input; the operation was never attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Input was well-formed but the operation is not allowed in the current state.
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Forbidden")]
    Forbidden,
    /// A persistence or notification call failed.
    #[error("Remote operation failed: {0}")]
    Remote(String),
    /// The merged order was written but its sources could not be retired.
    #[error("Merge incomplete: order {merged_id} created, sources {source_ids:?} still live")]
    MergeIncomplete {
        merged_id: Uuid,
        source_ids: Vec<Uuid>,
    },
}
