use std::fmt::Write;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use common::config::Output;
use common::parquet::TableWriter;
use common::types::TABLE_PRODUCTS;
use common::types::TABLE_STORES;
use common::types::TABLE_TRANSACTIONS;
use indicatif::ProgressBar;
use indicatif::ProgressState;
use indicatif::ProgressStyle;
use parquet::file::properties::WriterProperties;
use tracing::debug;
use tracing::info;

use crate::batch_builder::ProductBatchBuilder;
use crate::batch_builder::StoreBatchBuilder;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::error::RetailGenError;
use crate::locale::Locale;
use crate::products::ProductGenerator;
use crate::schema::products_schema;
use crate::schema::stores_schema;
use crate::schema::transactions_schema;
use crate::stores::StoreGenerator;
use crate::transactions::TransactionGenerator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub out_dir: PathBuf,
    pub stores: usize,
    pub products: usize,
    pub transactions: usize,
}

/// Generates stores, products and transactions into `out_dir`.
///
/// The config is validated and the locale backend and store generator resolved
/// before anything touches the filesystem, so a bad config never leaves a partial directory behind.
pub fn generate<P: AsRef<Path>>(
    cfg: &GenerationConfig,
    output: &Output,
    out_dir: P,
) -> Result<Summary> {
    cfg.validate()?;
    let locale = Locale::try_from_tag(&cfg.locale)?;
    let mut store_gen = StoreGenerator::try_new(cfg, &locale)?;
    let props = output
        .writer_properties()
        .map_err(|err| RetailGenError::Config(err.to_string()))?;

    let out_dir = out_dir.as_ref().to_path_buf();
    fs::create_dir_all(&out_dir).map_err(|err| {
        RetailGenError::Resource(format!("can't create output directory {out_dir:?}: {err}"))
    })?;

    info!(
        "generating data from {} to {} with seed {}",
        cfg.start_date, cfg.end_date, cfg.seed
    );
    let start = Instant::now();

    let stores = store_gen.generate(cfg.num_stores);
    let mut builder = StoreBatchBuilder::new(stores.len(), stores_schema());
    for store in &stores {
        builder.write_store(store);
    }
    let n_stores = write_table(
        &out_dir,
        TABLE_STORES,
        builder.build_record_batch()?,
        props.clone(),
    )?;
    info!("stores: {n_stores}");

    let products = ProductGenerator::new(cfg).generate(cfg.num_products);
    let mut builder = ProductBatchBuilder::new(products.len(), products_schema());
    for product in &products {
        builder.write_product(product);
    }
    let n_products = write_table(
        &out_dir,
        TABLE_PRODUCTS,
        builder.build_record_batch()?,
        props.clone(),
    )?;
    info!("products: {n_products}");

    let store_ids: Vec<i64> = stores.iter().map(|s| s.store_id).collect();
    let product_ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
    drop(stores);
    drop(products);

    info!("generating {} transactions...", cfg.num_transactions);
    let pb = progress_bar(cfg.num_transactions as u64)?;
    let mut w = TableWriter::try_new(&out_dir, TABLE_TRANSACTIONS, transactions_schema(), props)
        .map_err(resource_err)?;
    let mut gen = TransactionGenerator::try_new(cfg, &store_ids, &product_ids)?;
    gen.run(|batch| {
        w.write(&batch).map_err(resource_err)?;
        pb.inc(batch.num_rows() as u64);
        Ok(())
    })?;
    let n_transactions = w.close().map_err(resource_err)?;
    pb.finish_and_clear();
    info!("transactions: {n_transactions}");

    let duration = start.elapsed();
    info!("generation took {:?}", duration);

    Ok(Summary {
        out_dir,
        stores: n_stores,
        products: n_products,
        transactions: n_transactions,
    })
}

fn write_table(
    dir: &Path,
    name: &str,
    batch: arrow::record_batch::RecordBatch,
    props: WriterProperties,
) -> Result<usize> {
    let mut w = TableWriter::try_new(dir, name, batch.schema(), props).map_err(resource_err)?;
    w.write(&batch).map_err(resource_err)?;
    let rows = w.close().map_err(resource_err)?;
    debug!("{name}: {rows} rows written to {:?}", dir);

    Ok(rows)
}

fn resource_err(err: common::error::CommonError) -> RetailGenError {
    RetailGenError::Resource(err.to_string())
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} transactions ({eta})",
    )
    .map_err(|err| RetailGenError::Internal(err.to_string()))?
    .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
        let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
    })
    .progress_chars("#>-");
    pb.set_style(style);

    Ok(pb)
}
