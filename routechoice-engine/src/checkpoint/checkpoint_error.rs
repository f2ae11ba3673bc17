#[derive(thiserror::Error, Debug)]
pub enum CheckpointError {
    #[error("failed to infer arrow schema from buffered rows: {0}")]
    SchemaInference(String),
    #[error("failed to build record batch: {0}")]
    RecordBatch(String),
    #[error("failed to write parquet partition {0:?}: {1}")]
    Write(String, String),
    #[error("failed to serialize row to json: {0}")]
    Serialize(String),
}
