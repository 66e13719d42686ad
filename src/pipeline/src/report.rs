//! Console business report over the gold tables plus CSV export.

use std::fmt;
use std::fs;
use std::fs::File;
use std::path::PathBuf;

use arrow::array::Array;
use arrow::array::AsArray;
use arrow::compute::concat_batches;
use arrow::csv::Writer;
use arrow::datatypes::Date32Type;
use arrow::datatypes::Float64Type;
use arrow::datatypes::Int64Type;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use common::config::Config;
use common::types::TABLE_TRANSACTIONS_ENRICHED;
use datafusion::prelude::SessionContext;
use tracing::info;

use crate::error::PipelineError;
use crate::error::Result;
use crate::exec::register_table;
use crate::gold::SALES_BY_REGION;
use crate::gold::SALES_DAILY;
use crate::gold::TOP_CATEGORIES;

pub const TOP_N: usize = 5;
/// Gold tables exported to `reports/`.
pub const CSV_EXPORTS: [&str; 3] = [SALES_BY_REGION, TOP_CATEGORIES, SALES_DAILY];

#[derive(Debug, Clone, PartialEq)]
pub struct RegionShare {
    pub region: String,
    pub total_sales: f64,
    /// Percent of overall sales.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySales {
    pub category: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySales {
    pub date: NaiveDate,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourSales {
    pub hour: i64,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub total_sales: f64,
    pub total_transactions: i64,
    pub avg_transaction: f64,
    pub num_regions: usize,
    pub num_stores: i64,
    pub top_regions: Vec<RegionShare>,
    pub top_categories: Vec<CategorySales>,
    pub best_day: Option<DaySales>,
    pub worst_day: Option<DaySales>,
    pub avg_daily: f64,
    pub peak_hours: Vec<HourSales>,
    pub avg_discount: f64,
    pub total_discount: f64,
    pub pct_with_discount: f64,
}

async fn register_inputs(ctx: &SessionContext, cfg: &Config) -> Result<()> {
    for table in CSV_EXPORTS {
        register_table(ctx, &cfg.data.aggregated(), table).await?;
    }
    register_table(ctx, &cfg.data.cleaned(), TABLE_TRANSACTIONS_ENRICHED).await?;

    Ok(())
}

/// Runs `sql` and returns the result as a single batch.
async fn query_batch(ctx: &SessionContext, sql: &str) -> Result<RecordBatch> {
    let df = ctx.sql(sql).await?;
    let schema = df.schema().inner().clone();
    let batches = df.collect().await?;

    Ok(concat_batches(&schema, &batches)?)
}

fn f64_at(batch: &RecordBatch, col: usize, row: usize) -> Result<f64> {
    let arr = batch
        .column(col)
        .as_primitive_opt::<Float64Type>()
        .ok_or_else(|| PipelineError::Internal(format!("column {col} is not f64")))?;

    Ok(if arr.is_valid(row) { arr.value(row) } else { 0. })
}

fn i64_at(batch: &RecordBatch, col: usize, row: usize) -> Result<i64> {
    let arr = batch
        .column(col)
        .as_primitive_opt::<Int64Type>()
        .ok_or_else(|| PipelineError::Internal(format!("column {col} is not i64")))?;

    Ok(if arr.is_valid(row) { arr.value(row) } else { 0 })
}

fn str_at(batch: &RecordBatch, col: usize, row: usize) -> Result<String> {
    let arr = batch
        .column(col)
        .as_string_opt::<i32>()
        .ok_or_else(|| PipelineError::Internal(format!("column {col} is not utf8")))?;

    Ok(arr.value(row).to_string())
}

fn date_at(batch: &RecordBatch, col: usize, row: usize) -> Result<NaiveDate> {
    let arr = batch
        .column(col)
        .as_primitive_opt::<Date32Type>()
        .ok_or_else(|| PipelineError::Internal(format!("column {col} is not date32")))?;

    Ok(Date32Type::to_naive_date(arr.value(row)))
}

async fn day(ctx: &SessionContext, order: &str) -> Result<Option<DaySales>> {
    let batch = query_batch(
        ctx,
        &format!(
            r#"SELECT "date", CAST(total_sales AS DOUBLE) FROM {SALES_DAILY} ORDER BY total_sales {order}, "date" LIMIT 1"#
        ),
    )
    .await?;
    if batch.num_rows() == 0 {
        return Ok(None);
    }

    Ok(Some(DaySales {
        date: date_at(&batch, 0, 0)?,
        total_sales: f64_at(&batch, 1, 0)?,
    }))
}

impl Report {
    pub async fn build(ctx: &SessionContext, cfg: &Config) -> Result<Self> {
        register_inputs(ctx, cfg).await?;

        let overall = query_batch(
            ctx,
            &format!(
                "SELECT CAST(sum(total_sales) AS DOUBLE), CAST(sum(num_transactions) AS BIGINT), \
                 CAST(count(*) AS BIGINT), CAST(sum(num_stores) AS BIGINT) FROM {SALES_BY_REGION}"
            ),
        )
        .await?;
        let total_sales = f64_at(&overall, 0, 0)?;
        let total_transactions = i64_at(&overall, 1, 0)?;
        let num_regions = i64_at(&overall, 2, 0)? as usize;
        let num_stores = i64_at(&overall, 3, 0)?;
        let avg_transaction = if total_transactions > 0 {
            total_sales / total_transactions as f64
        } else {
            0.
        };

        let batch = query_batch(
            ctx,
            &format!(
                "SELECT region, CAST(total_sales AS DOUBLE) FROM {SALES_BY_REGION} \
                 ORDER BY total_sales DESC, region LIMIT {TOP_N}"
            ),
        )
        .await?;
        let mut top_regions = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let sales = f64_at(&batch, 1, row)?;
            top_regions.push(RegionShare {
                region: str_at(&batch, 0, row)?,
                total_sales: sales,
                share: if total_sales > 0. {
                    sales / total_sales * 100.
                } else {
                    0.
                },
            });
        }

        let batch = query_batch(
            ctx,
            &format!(
                "SELECT category, CAST(total_sales AS DOUBLE) FROM {TOP_CATEGORIES} \
                 ORDER BY total_sales DESC, category LIMIT {TOP_N}"
            ),
        )
        .await?;
        let mut top_categories = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            top_categories.push(CategorySales {
                category: str_at(&batch, 0, row)?,
                total_sales: f64_at(&batch, 1, row)?,
            });
        }

        let best_day = day(ctx, "DESC").await?;
        let worst_day = day(ctx, "ASC").await?;
        let avg = query_batch(
            ctx,
            &format!("SELECT CAST(avg(total_sales) AS DOUBLE) FROM {SALES_DAILY}"),
        )
        .await?;
        let avg_daily = f64_at(&avg, 0, 0)?;

        let batch = query_batch(
            ctx,
            &format!(
                r#"SELECT CAST("hour" AS BIGINT) AS h, CAST(sum(total_amount) AS DOUBLE) AS sales
                FROM {TABLE_TRANSACTIONS_ENRICHED} GROUP BY 1 ORDER BY 2 DESC, 1 LIMIT {TOP_N}"#
            ),
        )
        .await?;
        let mut peak_hours = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            peak_hours.push(HourSales {
                hour: i64_at(&batch, 0, row)?,
                sales: f64_at(&batch, 1, row)?,
            });
        }

        let discounts = query_batch(
            ctx,
            &format!(
                "SELECT CAST(avg(discount_percent) AS DOUBLE), CAST(sum(discount_amount) AS DOUBLE), \
                 CAST(sum(CASE WHEN discount_percent > 0 THEN 1 ELSE 0 END) AS DOUBLE) * 100 \
                 / CAST(count(*) AS DOUBLE) \
                 FROM {TABLE_TRANSACTIONS_ENRICHED}"
            ),
        )
        .await?;

        Ok(Report {
            total_sales,
            total_transactions,
            avg_transaction,
            num_regions,
            num_stores,
            top_regions,
            top_categories,
            best_day,
            worst_day,
            avg_daily,
            peak_hours,
            avg_discount: f64_at(&discounts, 0, 0)?,
            total_discount: f64_at(&discounts, 1, 0)?,
            pct_with_discount: f64_at(&discounts, 2, 0)?,
        })
    }
}

/// Formats with thousands separators and two decimals, e.g. `1,234,567.89`.
pub fn thousands(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (idx, c) in int.chars().enumerate() {
        if idx > 0 && (int.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if v < 0. && s.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };

    format!("{sign}{grouped}.{frac}")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        writeln!(f, "{rule}")?;
        writeln!(f, "RETAIL BUSINESS INTELLIGENCE REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f)?;

        writeln!(f, "OVERALL METRICS")?;
        writeln!(f, "Total Sales:         €{}", thousands(self.total_sales))?;
        writeln!(f, "Total Transactions:  {}", self.total_transactions)?;
        writeln!(f, "Avg Transaction:     €{:.2}", self.avg_transaction)?;
        writeln!(f, "Regions:             {}", self.num_regions)?;
        writeln!(f, "Stores:              {}", self.num_stores)?;
        writeln!(f)?;

        writeln!(f, "TOP {TOP_N} REGIONS")?;
        for r in &self.top_regions {
            writeln!(
                f,
                "{:20} €{:>12} ({:>5.1}%)",
                r.region,
                thousands(r.total_sales),
                r.share
            )?;
        }
        writeln!(f)?;

        writeln!(f, "TOP {TOP_N} CATEGORIES")?;
        for c in &self.top_categories {
            writeln!(f, "{:25} €{:>12}", c.category, thousands(c.total_sales))?;
        }
        writeln!(f)?;

        writeln!(f, "SALES TRENDS")?;
        if let Some(d) = &self.best_day {
            writeln!(f, "Best Day:   {}  €{}", d.date, thousands(d.total_sales))?;
        }
        if let Some(d) = &self.worst_day {
            writeln!(f, "Worst Day:  {}  €{}", d.date, thousands(d.total_sales))?;
        }
        writeln!(f, "Avg Daily:               €{}", thousands(self.avg_daily))?;
        writeln!(f)?;

        writeln!(f, "PEAK HOURS")?;
        for h in &self.peak_hours {
            writeln!(
                f,
                "{:02}:00-{:02}:00  €{}",
                h.hour,
                h.hour + 1,
                thousands(h.sales)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "DISCOUNTS")?;
        writeln!(f, "Avg Discount:      {:.1}%", self.avg_discount * 100.)?;
        writeln!(f, "Total Discounted:  €{}", thousands(self.total_discount))?;
        writeln!(f, "% with Discount:   {:.1}%", self.pct_with_discount)?;
        writeln!(f)?;
        write!(f, "{rule}")
    }
}

/// Writes [CSV_EXPORTS] as `reports/<name>.csv`. Returns the written paths.
pub async fn export_csv(ctx: &SessionContext, cfg: &Config) -> Result<Vec<PathBuf>> {
    let dir = cfg.data.reports();
    fs::create_dir_all(&dir)?;

    let mut out = Vec::with_capacity(CSV_EXPORTS.len());
    for table in CSV_EXPORTS {
        register_table(ctx, &cfg.data.aggregated(), table).await?;
        let batches = ctx
            .sql(&format!("SELECT * FROM {table}"))
            .await?
            .collect()
            .await?;

        let path = dir.join(format!("{table}.csv"));
        let mut w = Writer::new(File::create(&path)?);
        for batch in &batches {
            w.write(batch)?;
        }
        info!("exported {table} to {:?}", path);
        out.push(path);
    }

    Ok(out)
}
