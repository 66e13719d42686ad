//! Raw ingestion: landing tables are copied into `raw/` re-encoded with zstd.

use std::fs;

use common::config::Config;
use common::types::TABLE_PRODUCTS;
use common::types::TABLE_STORES;
use common::types::TABLE_TRANSACTIONS;
use datafusion::prelude::SessionContext;
use tracing::info;

use crate::error::Result;
use crate::exec::register_table;
use crate::exec::write_query;
use crate::TableSummary;

pub const TABLES: [&str; 3] = [TABLE_STORES, TABLE_PRODUCTS, TABLE_TRANSACTIONS];

pub async fn ingest(ctx: &SessionContext, cfg: &Config) -> Result<Vec<TableSummary>> {
    let landing = cfg.data.landing();
    let raw = cfg.data.raw();
    fs::create_dir_all(&raw)?;

    let mut out = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        info!("bronze: ingesting {table}");
        register_table(ctx, &landing, table).await?;
        let rows = write_query(
            ctx,
            &format!("SELECT * FROM {table}"),
            &raw,
            table,
            cfg.output.intermediate_writer_properties(),
        )
        .await?;
        info!("bronze: ingested {rows} {table} to {:?}", raw);

        out.push(TableSummary::new(table, rows));
    }

    Ok(out)
}
