use std::path::Path;

use arrow::record_batch::RecordBatch;
use common::parquet::TableWriter;
use common::types::table_file;
use datafusion::prelude::ParquetReadOptions;
use datafusion::prelude::SessionContext;
use futures::StreamExt;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::error::PipelineError;
use crate::error::Result;

/// Registers `<dir>/<name>.parquet` as table `name`, replacing any earlier registration.
pub async fn register_table(ctx: &SessionContext, dir: &Path, name: &str) -> Result<()> {
    let path = dir.join(table_file(name));
    if !path.exists() {
        return Err(PipelineError::MissingInput(path));
    }

    let location = path
        .to_str()
        .ok_or_else(|| PipelineError::Internal(format!("non utf-8 path {path:?}")))?;
    ctx.deregister_table(name)?;
    ctx.register_parquet(name, location, ParquetReadOptions::default())
        .await?;
    debug!("registered {name} from {location}");

    Ok(())
}

/// Streams the result of `sql` into `<dir>/<name>.parquet`. Returns the number of rows.
pub async fn write_query(
    ctx: &SessionContext,
    sql: &str,
    dir: &Path,
    name: &str,
    props: WriterProperties,
) -> Result<usize> {
    let mut stream = ctx.sql(sql).await?.execute_stream().await?;
    let mut w = TableWriter::try_new(dir, name, stream.schema(), props)?;
    while let Some(batch) = stream.next().await {
        w.write(&batch?)?;
    }

    Ok(w.close()?)
}

pub async fn query(ctx: &SessionContext, sql: &str) -> Result<Vec<RecordBatch>> {
    Ok(ctx.sql(sql).await?.collect().await?)
}
