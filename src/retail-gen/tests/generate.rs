use std::collections::HashSet;
use std::env::temp_dir;
use std::fs;
use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::array::Int32Array;
use arrow::array::Int64Array;
use arrow::array::StringArray;
use arrow::array::TimestampMicrosecondArray;
use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use chrono::NaiveDate;
use common::config::Config;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use retail_gen::error::RetailGenError;
use retail_gen::generate;
use retail_gen::products::is_valid_ean13;
use retail_gen::GenerationConfig;
use uuid::Uuid;

fn read_table(path: &Path) -> RecordBatch {
    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap()).unwrap();
    let schema = builder.schema().clone();
    let batches: Vec<RecordBatch> = builder.build().unwrap().map(|b| b.unwrap()).collect();
    concat_batches(&schema, &batches).unwrap()
}

fn col<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> &'a T {
    batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<T>()
        .unwrap()
}

fn scenario_cfg() -> GenerationConfig {
    let mut cfg = GenerationConfig::new(42, 10, 100, 1000);
    cfg.start_date = GenerationConfig::parse_date("2023-01-01").unwrap();
    cfg.end_date = GenerationConfig::parse_date("2023-12-31").unwrap();
    cfg.yoy_growth = 0.;
    cfg.batch_size = 300;
    cfg
}

#[test]
fn test_scenario() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let cfg = scenario_cfg();

    let summary = generate(&cfg, &Config::default().output, &dir).unwrap();
    assert_eq!(summary.stores, 10);
    assert_eq!(summary.products, 100);
    assert_eq!(summary.transactions, 1000);

    let stores = read_table(&dir.join("stores.parquet"));
    let products = read_table(&dir.join("products.parquet"));
    let txs = read_table(&dir.join("transactions.parquet"));
    assert_eq!(stores.num_rows(), 10);
    assert_eq!(products.num_rows(), 100);
    assert_eq!(txs.num_rows(), 1000);

    let store_ids: HashSet<i64> = col::<Int64Array>(&stores, "store_id")
        .values()
        .iter()
        .copied()
        .collect();
    let product_ids: HashSet<i64> = col::<Int64Array>(&products, "product_id")
        .values()
        .iter()
        .copied()
        .collect();
    assert_eq!(store_ids, (1..=10).collect());
    assert_eq!(product_ids, (1..=100).collect());

    let eans = col::<StringArray>(&products, "ean");
    for idx in 0..eans.len() {
        assert!(is_valid_ean13(eans.value(idx)), "{}", eans.value(idx));
    }

    let ids = col::<Int64Array>(&txs, "transaction_id");
    let tx_stores = col::<Int64Array>(&txs, "store_id");
    let tx_products = col::<Int64Array>(&txs, "product_id");
    let ts = col::<TimestampMicrosecondArray>(&txs, "transaction_datetime");
    let qty = col::<Int32Array>(&txs, "quantity");
    let first = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let last = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    for idx in 0..txs.num_rows() {
        assert_eq!(ids.value(idx), idx as i64 + 1);
        assert!(store_ids.contains(&tx_stores.value(idx)));
        assert!(product_ids.contains(&tx_products.value(idx)));
        assert!((1..=10).contains(&qty.value(idx)));

        let dt = ts.value_as_datetime(idx).unwrap();
        assert_eq!(dt.year(), 2023);
        assert!(dt.date() >= first && dt.date() <= last);
    }

    // nothing left behind by the atomic writes
    assert!(!dir.join("transactions.parquet.tmp").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_deterministic_output() {
    let a = temp_dir().join(format!("{}", Uuid::new_v4()));
    let b = temp_dir().join(format!("{}", Uuid::new_v4()));
    let cfg = scenario_cfg();
    let output = Config::default().output;

    generate(&cfg, &output, &a).unwrap();
    generate(&cfg, &output, &b).unwrap();

    for table in ["stores.parquet", "products.parquet", "transactions.parquet"] {
        assert_eq!(
            fs::read(a.join(table)).unwrap(),
            fs::read(b.join(table)).unwrap(),
            "{table}"
        );
    }

    let mut other = cfg.clone();
    other.seed = 43;
    let c = temp_dir().join(format!("{}", Uuid::new_v4()));
    generate(&other, &output, &c).unwrap();
    assert_ne!(
        fs::read(a.join("transactions.parquet")).unwrap(),
        fs::read(c.join("transactions.parquet")).unwrap()
    );

    for dir in [a, b, c] {
        fs::remove_dir_all(dir).unwrap();
    }
}

#[test]
fn test_growth_split_across_years() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let mut cfg = scenario_cfg();
    cfg.start_date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    cfg.yoy_growth = 0.5;

    generate(&cfg, &Config::default().output, &dir).unwrap();
    let txs = read_table(&dir.join("transactions.parquet"));
    let ts = col::<TimestampMicrosecondArray>(&txs, "transaction_datetime");
    let y2022 = (0..ts.len())
        .filter(|idx| ts.value_as_datetime(*idx).unwrap().year() == 2022)
        .count();
    assert_eq!(y2022, 400);
    assert_eq!(txs.num_rows() - y2022, 600);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_bad_range_writes_nothing() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let mut cfg = scenario_cfg();
    cfg.end_date = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();

    let err = generate(&cfg, &Config::default().output, &dir).unwrap_err();
    assert!(matches!(err, RetailGenError::Config(_)), "{err:?}");
    assert!(!dir.exists());
}

#[test]
fn test_unrepresentable_opening_window_writes_nothing() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let mut cfg = scenario_cfg();
    cfg.start_date = NaiveDate::MIN;
    cfg.end_date = NaiveDate::MIN;

    let err = generate(&cfg, &Config::default().output, &dir).unwrap_err();
    assert!(matches!(err, RetailGenError::Config(_)), "{err:?}");
    assert!(!dir.exists());
}

#[test]
fn test_zero_counts_rejected() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let mut cfg = scenario_cfg();
    cfg.num_transactions = 0;

    let err = generate(&cfg, &Config::default().output, &dir).unwrap_err();
    assert!(matches!(err, RetailGenError::Config(_)), "{err:?}");
    assert!(!dir.exists());
}

#[test]
fn test_unknown_locale() {
    let dir = temp_dir().join(format!("{}", Uuid::new_v4()));
    let mut cfg = scenario_cfg();
    cfg.locale = "xx_XX".to_string();

    let err = generate(&cfg, &Config::default().output, &dir).unwrap_err();
    assert!(matches!(err, RetailGenError::Dependency(_)), "{err:?}");
    assert!(!dir.exists());
}

#[test]
fn test_unwritable_output() {
    let file = temp_dir().join(format!("{}", Uuid::new_v4()));
    fs::write(&file, b"not a directory").unwrap();

    let err = generate(&scenario_cfg(), &Config::default().output, file.join("out")).unwrap_err();
    assert!(matches!(err, RetailGenError::Resource(_)), "{err:?}");

    fs::remove_file(&file).unwrap();
}
