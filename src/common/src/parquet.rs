use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::Result;
use crate::types::table_file;

/// Parquet writer for a single table.
///
/// Rows go to `<name>.parquet.tmp` and the file is renamed to `<name>.parquet` only
/// after the footer was written, so an interrupted run never leaves a table that
/// looks complete.
pub struct TableWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    writer: ArrowWriter<File>,
    rows: usize,
}

impl TableWriter {
    pub fn try_new<P: AsRef<Path>>(
        dir: P,
        name: &str,
        schema: SchemaRef,
        props: WriterProperties,
    ) -> Result<Self> {
        let path = dir.as_ref().join(table_file(name));
        let tmp_path = dir.as_ref().join(format!("{}.tmp", table_file(name)));
        debug!("writing {name} to {:?}", tmp_path);

        let file = File::create(&tmp_path)?;
        let writer = ArrowWriter::try_new(file, schema, Some(props))?;

        Ok(Self {
            path,
            tmp_path,
            writer,
            rows: 0,
        })
    }

    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch)?;
        self.rows += batch.num_rows();

        Ok(())
    }

    /// Flushes the footer and publishes the table. Returns the number of rows written.
    pub fn close(self) -> Result<usize> {
        self.writer.close()?;
        fs::rename(&self.tmp_path, &self.path)?;
        debug!("published {:?} ({} rows)", self.path, self.rows);

        Ok(self.rows)
    }
}
