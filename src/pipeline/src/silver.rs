//! Cleaning and enrichment. Reads `raw/`, writes `cleaned/`.

use std::fs;

use common::config::Config;
use common::types::TABLE_PRODUCTS;
use common::types::TABLE_PRODUCTS_CLEANED;
use common::types::TABLE_STORES;
use common::types::TABLE_STORES_CLEANED;
use common::types::TABLE_TRANSACTIONS;
use common::types::TABLE_TRANSACTIONS_ENRICHED;
use datafusion::prelude::SessionContext;
use tracing::info;

use crate::error::Result;
use crate::exec::register_table;
use crate::exec::write_query;
use crate::TableSummary;

// German bounding box, slightly relaxed
pub const LATITUDE_RANGE: (f64, f64) = (47., 55.);
pub const LONGITUDE_RANGE: (f64, f64) = (5., 15.);
pub const EAN_LENGTH: usize = 13;

fn stores_sql() -> String {
    format!(
        r#"SELECT DISTINCT ON (store_id)
    store_id, store_name, street, city, postal_code, region, latitude, longitude,
    store_size_sqm, opening_date,
    (latitude BETWEEN {lat_lo} AND {lat_hi} AND longitude BETWEEN {lon_lo} AND {lon_hi}) AS valid_coordinates,
    CASE WHEN latitude BETWEEN {lat_lo} AND {lat_hi} AND longitude BETWEEN {lon_lo} AND {lon_hi}
        THEN 1.0 ELSE 0.5 END AS data_quality_score
FROM {TABLE_STORES}
ORDER BY store_id"#,
        lat_lo = LATITUDE_RANGE.0,
        lat_hi = LATITUDE_RANGE.1,
        lon_lo = LONGITUDE_RANGE.0,
        lon_hi = LONGITUDE_RANGE.1,
    )
}

fn products_sql() -> String {
    format!(
        r#"SELECT DISTINCT ON (product_id)
    product_id, ean, product_name, category, subcategory, brand, unit_price, unit_size,
    vat_rate, is_active,
    character_length(ean) = {EAN_LENGTH} AS valid_ean,
    round(CAST(unit_price AS DOUBLE) * (1 + vat_rate), 2) AS price_incl_vat
FROM {TABLE_PRODUCTS}
WHERE is_active AND unit_price > 0
ORDER BY product_id"#
    )
}

// weekday is 1 (Monday) to 7 (Sunday)
fn transactions_sql() -> String {
    format!(
        r#"SELECT d.*,
    round(d.subtotal - d.discount_amount, 2) AS total_amount,
    CAST(date_part('year', d.transaction_datetime) AS INT) AS "year",
    CAST(date_part('month', d.transaction_datetime) AS INT) AS "month",
    (CAST(date_part('dow', d.transaction_datetime) AS INT) + 6) % 7 + 1 AS "weekday",
    CAST(date_part('hour', d.transaction_datetime) AS INT) AS "hour"
FROM (
    SELECT j.*, j.subtotal * j.discount_percent AS discount_amount
    FROM (
        SELECT t.transaction_id, t.store_id, t.product_id, t.transaction_datetime,
            t.quantity, t.discount_percent, t.payment_method,
            s.region, s.city, p.category, p.unit_price, p.price_incl_vat,
            CAST(t.quantity AS DOUBLE) * p.price_incl_vat AS subtotal
        FROM {TABLE_TRANSACTIONS} t
        JOIN {TABLE_STORES_CLEANED} s ON t.store_id = s.store_id
        JOIN {TABLE_PRODUCTS_CLEANED} p ON t.product_id = p.product_id
    ) AS j
) AS d
ORDER BY d.transaction_id"#
    )
}

pub async fn clean_stores(ctx: &SessionContext, cfg: &Config) -> Result<TableSummary> {
    info!("silver: cleaning stores");
    register_table(ctx, &cfg.data.raw(), TABLE_STORES).await?;
    let rows = write_cleaned(ctx, cfg, &stores_sql(), TABLE_STORES_CLEANED).await?;
    info!("silver: cleaned {rows} stores");

    Ok(TableSummary::new(TABLE_STORES_CLEANED, rows))
}

pub async fn clean_products(ctx: &SessionContext, cfg: &Config) -> Result<TableSummary> {
    info!("silver: cleaning products");
    register_table(ctx, &cfg.data.raw(), TABLE_PRODUCTS).await?;
    let rows = write_cleaned(ctx, cfg, &products_sql(), TABLE_PRODUCTS_CLEANED).await?;
    info!("silver: cleaned {rows} products");

    Ok(TableSummary::new(TABLE_PRODUCTS_CLEANED, rows))
}

/// Joins raw transactions with the cleaned dimensions. Transactions pointing at a
/// dropped (inactive) product are dropped too.
pub async fn enrich_transactions(ctx: &SessionContext, cfg: &Config) -> Result<TableSummary> {
    info!("silver: enriching transactions");
    register_table(ctx, &cfg.data.raw(), TABLE_TRANSACTIONS).await?;
    register_table(ctx, &cfg.data.cleaned(), TABLE_STORES_CLEANED).await?;
    register_table(ctx, &cfg.data.cleaned(), TABLE_PRODUCTS_CLEANED).await?;
    let rows = write_cleaned(ctx, cfg, &transactions_sql(), TABLE_TRANSACTIONS_ENRICHED).await?;
    info!("silver: enriched {rows} transactions");

    Ok(TableSummary::new(TABLE_TRANSACTIONS_ENRICHED, rows))
}

pub async fn run(ctx: &SessionContext, cfg: &Config) -> Result<Vec<TableSummary>> {
    Ok(vec![
        clean_stores(ctx, cfg).await?,
        clean_products(ctx, cfg).await?,
        enrich_transactions(ctx, cfg).await?,
    ])
}

async fn write_cleaned(
    ctx: &SessionContext,
    cfg: &Config,
    sql: &str,
    name: &str,
) -> Result<usize> {
    let dir = cfg.data.cleaned();
    fs::create_dir_all(&dir)?;

    write_query(ctx, sql, &dir, name, cfg.output.intermediate_writer_properties()).await
}
