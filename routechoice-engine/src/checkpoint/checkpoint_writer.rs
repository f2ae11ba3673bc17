use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::io::{Cursor, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::json::reader::infer_json_schema;
use arrow::json::ReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use super::checkpoint_error::CheckpointError;

/// Hive-style, origin-partitioned Parquet writer for the route-set table.
/// Rows are buffered as JSON per partition; the partition's Arrow schema is
/// inferred on first flush and its `ArrowWriter` is opened once (truncating
/// any file left by a prior run, so re-running a batch from scratch is
/// idempotent) and kept open across every subsequent flush, so a partition
/// flushed more than once within a batch appends `RecordBatch`es to the same
/// `origin_id=<id>/part-0.parquet` rather than overwriting it.
pub struct CheckpointWriter {
    root: PathBuf,
    buffer_limit: usize,
    buffers: HashMap<u32, Vec<serde_json::Value>>,
    schemas: HashMap<u32, arrow::datatypes::SchemaRef>,
    writers: HashMap<u32, ArrowWriter<File>>,
    paths: HashMap<u32, PathBuf>,
}

impl CheckpointWriter {
    pub fn new(root: impl Into<PathBuf>, buffer_limit: usize) -> Self {
        Self {
            root: root.into(),
            buffer_limit,
            buffers: HashMap::new(),
            schemas: HashMap::new(),
            writers: HashMap::new(),
            paths: HashMap::new(),
        }
    }

    /// appends a row to its `origin_id` partition's buffer, flushing that
    /// partition if it has reached `buffer_limit`.
    pub fn write_row(&mut self, origin_id: u32, row: serde_json::Value) -> Result<(), CheckpointError> {
        let buffer = self.buffers.entry(origin_id).or_default();
        buffer.push(row);
        if buffer.len() >= self.buffer_limit {
            self.flush_partition(origin_id)?;
        }
        Ok(())
    }

    /// flushes every buffered partition and closes every open writer. Call
    /// once per batch, after the orchestrator finishes processing every OD.
    pub fn close(mut self) -> Result<Vec<PathBuf>, CheckpointError> {
        let origins: Vec<u32> = self.buffers.keys().copied().collect();
        for origin_id in origins {
            self.flush_partition(origin_id)?;
        }
        let paths = self.paths;
        for (origin_id, writer) in self.writers {
            let path = paths.get(&origin_id).cloned().unwrap_or_default();
            writer
                .close()
                .map_err(|e| CheckpointError::Write(path.display().to_string(), e.to_string()))?;
        }
        let mut result: Vec<PathBuf> = paths.into_values().collect();
        result.sort();
        Ok(result)
    }

    fn partition_path(&self, origin_id: u32) -> PathBuf {
        self.root
            .join(format!("origin_id={origin_id}"))
            .join("part-0.parquet")
    }

    fn flush_partition(&mut self, origin_id: u32) -> Result<(), CheckpointError> {
        let Some(buffer) = self.buffers.get(&origin_id) else {
            return Ok(());
        };
        if buffer.is_empty() {
            return Ok(());
        }

        let mut json_bytes = Vec::new();
        for value in buffer {
            serde_json::to_writer(&mut json_bytes, value)
                .map_err(|e| CheckpointError::Serialize(e.to_string()))?;
            json_bytes.push(b'\n');
        }

        let mut cursor = Cursor::new(json_bytes);
        let schema = if let Some(schema) = self.schemas.get(&origin_id) {
            schema.clone()
        } else {
            let (inferred, _) = infer_json_schema(&mut cursor, Some(buffer.len()))
                .map_err(|e| CheckpointError::SchemaInference(e.to_string()))?;
            cursor
                .seek(SeekFrom::Start(0))
                .map_err(|e| CheckpointError::SchemaInference(e.to_string()))?;
            let schema = Arc::new(inferred);
            self.schemas.insert(origin_id, schema.clone());
            schema
        };

        let mut reader = ReaderBuilder::new(schema.clone())
            .build(cursor)
            .map_err(|e| CheckpointError::RecordBatch(e.to_string()))?;
        let batch = reader
            .next()
            .transpose()
            .map_err(|e| CheckpointError::RecordBatch(e.to_string()))?
            .ok_or_else(|| CheckpointError::RecordBatch("no batch produced from buffer".to_string()))?;

        let path = self.partition_path(origin_id);
        if !self.writers.contains_key(&origin_id) {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| CheckpointError::Write(path.display().to_string(), e.to_string()))?;
            }
            // overwrite_or_ignore: truncate on first open, so re-running a
            // batch from a fresh `CheckpointWriter` is idempotent; every
            // subsequent flush within this writer's lifetime reuses the same
            // open `ArrowWriter` and appends instead.
            let file = File::create(&path)
                .map_err(|e| CheckpointError::Write(path.display().to_string(), e.to_string()))?;
            let props = WriterProperties::builder().build();
            let writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
                .map_err(|e| CheckpointError::Write(path.display().to_string(), e.to_string()))?;
            self.writers.insert(origin_id, writer);
            self.paths.insert(origin_id, path.clone());
        }

        let writer = self.writers.get_mut(&origin_id).expect("writer just inserted");
        writer
            .write(&batch)
            .map_err(|e| CheckpointError::Write(path.display().to_string(), e.to_string()))?;

        self.buffers.get_mut(&origin_id).unwrap().clear();
        Ok(())
    }

    pub fn partition_dir(root: &Path, origin_id: u32) -> PathBuf {
        root.join(format!("origin_id={origin_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn writes_one_partition_per_origin() {
        let dir = tempdir().unwrap();
        let mut writer = CheckpointWriter::new(dir.path(), 10);
        writer
            .write_row(1, json!({"origin_id": 1, "destination_id": 2, "cost": 5.0}))
            .unwrap();
        writer
            .write_row(3, json!({"origin_id": 3, "destination_id": 4, "cost": 1.0}))
            .unwrap();
        let paths = writer.close().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(CheckpointWriter::partition_dir(dir.path(), 1).join("part-0.parquet").exists());
        assert!(CheckpointWriter::partition_dir(dir.path(), 3).join("part-0.parquet").exists());
    }

    #[test]
    fn a_partition_flushed_twice_in_one_batch_appends_not_overwrites() {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let dir = tempdir().unwrap();
        // buffer_limit of 1 forces a flush on every write_row, so the same
        // origin_id's partition is flushed three times before `close`.
        let mut writer = CheckpointWriter::new(dir.path(), 1);
        writer
            .write_row(1, json!({"origin_id": 1, "destination_id": 2, "cost": 5.0}))
            .unwrap();
        writer
            .write_row(1, json!({"origin_id": 1, "destination_id": 3, "cost": 6.0}))
            .unwrap();
        writer
            .write_row(1, json!({"origin_id": 1, "destination_id": 4, "cost": 7.0}))
            .unwrap();
        let paths = writer.close().unwrap();
        assert_eq!(paths.len(), 1);

        let file = File::open(&paths[0]).unwrap();
        let reader = SerializedFileReader::new(file).unwrap();
        let num_rows = reader.metadata().file_metadata().num_rows();
        assert_eq!(num_rows, 3);
    }

    #[test]
    fn rewriting_a_partition_overwrites_rather_than_appends() {
        let dir = tempdir().unwrap();
        let mut writer = CheckpointWriter::new(dir.path(), 10);
        writer
            .write_row(1, json!({"origin_id": 1, "destination_id": 2, "cost": 5.0}))
            .unwrap();
        writer.close().unwrap();

        let mut writer2 = CheckpointWriter::new(dir.path(), 10);
        writer2
            .write_row(1, json!({"origin_id": 1, "destination_id": 9, "cost": 1.0}))
            .unwrap();
        let paths = writer2.close().unwrap();
        let metadata = fs::metadata(&paths[0]).unwrap();
        assert!(metadata.len() > 0);
    }
}
