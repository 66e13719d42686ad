//! Business aggregates over the enriched transactions. Reads `cleaned/`, writes
//! `aggregated/` with the configured codec.

use std::fs;

use arrow::array::Array;
use arrow::array::AsArray;
use arrow::datatypes::Float64Type;
use common::config::Config;
use common::types::TABLE_TRANSACTIONS_ENRICHED;
use datafusion::prelude::SessionContext;
use tracing::debug;
use tracing::info;

use crate::error::Result;
use crate::exec::query;
use crate::exec::register_table;
use crate::exec::write_query;
use crate::TableSummary;

pub const SALES_YEARLY: &str = "sales_yearly";
pub const SALES_MONTHLY: &str = "sales_monthly";
pub const SALES_WEEKLY: &str = "sales_weekly";
pub const SALES_DAILY: &str = "sales_daily";
pub const SALES_BY_REGION: &str = "sales_by_region";
pub const TOP_CATEGORIES: &str = "top_categories";
pub const HOURLY_SALES: &str = "hourly_sales";
pub const DISCOUNT_ANALYSIS: &str = "discount_analysis";

pub const TOP_CATEGORIES_LIMIT: usize = 10;

const T: &str = TABLE_TRANSACTIONS_ENRICHED;

/// Time grain of the period rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Yearly,
    Monthly,
    Weekly,
    Daily,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Yearly,
        Period::Monthly,
        Period::Weekly,
        Period::Daily,
    ];

    fn prefix(&self) -> &'static str {
        match self {
            Period::Yearly => "sales_yearly",
            Period::Monthly => "sales_monthly",
            Period::Weekly => "sales_weekly",
            Period::Daily => "sales_daily",
        }
    }

    /// Key columns projected in front of every aggregate of this grain.
    fn keys(&self) -> &'static str {
        match self {
            Period::Yearly => r#""year""#,
            Period::Monthly => {
                r#""year", "month", to_char(transaction_datetime, '%Y-%m') AS year_month"#
            }
            // iso_week is paired with the calendar year
            Period::Weekly => {
                r#""year" AS iso_year, CAST(date_part('week', transaction_datetime) AS INT) AS iso_week"#
            }
            Period::Daily => r#""year", "month", CAST(transaction_datetime AS DATE) AS "date""#,
        }
    }

    fn group_by(&self) -> &'static str {
        match self {
            Period::Yearly => "1",
            Period::Monthly => "1, 2, 3",
            Period::Weekly => "1, 2",
            Period::Daily => "1, 2, 3",
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Period::Yearly => r#""year""#,
            Period::Monthly => r#""year", "month""#,
            Period::Weekly => "iso_year, iso_week",
            Period::Daily => r#""date""#,
        }
    }

    fn next_column(&self) -> usize {
        match self {
            Period::Yearly => 2,
            Period::Monthly => 4,
            Period::Weekly => 3,
            Period::Daily => 4,
        }
    }
}

/// One gold table and the query producing it.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub name: String,
    pub sql: String,
    /// Column summed into the stage summary.
    pub measure: &'static str,
}

impl Aggregate {
    fn new(name: impl Into<String>, sql: String, measure: &'static str) -> Self {
        Self {
            name: name.into(),
            sql,
            measure,
        }
    }
}

fn period_totals(period: Period) -> Aggregate {
    let extra = match period {
        Period::Yearly => {
            ", count(DISTINCT store_id) AS num_stores, count(DISTINCT category) AS num_categories"
        }
        Period::Daily => ", count(DISTINCT category) AS num_categories",
        _ => "",
    };

    Aggregate::new(
        period.prefix(),
        format!(
            "SELECT {keys}, sum(total_amount) AS total_sales, count(transaction_id) AS num_transactions, \
             avg(total_amount) AS avg_transaction_value{extra} \
             FROM {T} GROUP BY {group} ORDER BY {order}",
            keys = period.keys(),
            group = period.group_by(),
            order = period.order_by(),
        ),
        "total_sales",
    )
}

fn period_by_region(period: Period) -> Aggregate {
    let col = period.next_column();
    let avg = match period {
        Period::Yearly => ", avg(total_amount) AS avg_transaction_value",
        _ => "",
    };

    Aggregate::new(
        format!("{}_by_region", period.prefix()),
        format!(
            "SELECT {keys}, region, sum(total_amount) AS total_sales, \
             count(transaction_id) AS num_transactions{avg} \
             FROM {T} GROUP BY {group}, {col} ORDER BY {order}, region",
            keys = period.keys(),
            group = period.group_by(),
            order = period.order_by(),
        ),
        "total_sales",
    )
}

fn period_by_category(period: Period) -> Aggregate {
    let col = period.next_column();
    let count = match period {
        Period::Yearly => ", count(transaction_id) AS num_transactions",
        _ => "",
    };

    Aggregate::new(
        format!("{}_by_category", period.prefix()),
        format!(
            "SELECT {keys}, category, sum(total_amount) AS total_sales{count}, \
             sum(quantity) AS total_units_sold \
             FROM {T} GROUP BY {group}, {col} ORDER BY {order}, total_sales DESC",
            keys = period.keys(),
            group = period.group_by(),
            order = period.order_by(),
        ),
        "total_sales",
    )
}

fn period_top_products(period: Period) -> Aggregate {
    let col = period.next_column();
    let count = match period {
        Period::Yearly => ", count(transaction_id) AS num_transactions",
        _ => "",
    };

    Aggregate::new(
        format!("{}_top_products", period.prefix()),
        format!(
            "SELECT {keys}, product_id, sum(total_amount) AS total_sales, \
             sum(quantity) AS total_units_sold{count} \
             FROM {T} GROUP BY {group}, {col} ORDER BY {order}, total_sales DESC, product_id",
            keys = period.keys(),
            group = period.group_by(),
            order = period.order_by(),
        ),
        "total_sales",
    )
}

/// Every gold table in the order they are built.
pub fn aggregates() -> Vec<Aggregate> {
    let mut out: Vec<Aggregate> = Period::ALL.iter().map(|p| period_totals(*p)).collect();

    out.push(Aggregate::new(
        SALES_BY_REGION,
        format!(
            "SELECT region, sum(total_amount) AS total_sales, count(transaction_id) AS num_transactions, \
             avg(total_amount) AS avg_transaction_value, count(DISTINCT store_id) AS num_stores \
             FROM {T} GROUP BY region ORDER BY total_sales DESC, region"
        ),
        "total_sales",
    ));
    out.push(Aggregate::new(
        TOP_CATEGORIES,
        format!(
            "SELECT category, sum(total_amount) AS total_sales, count(transaction_id) AS num_transactions, \
             sum(quantity) AS total_units_sold, avg(total_amount) AS avg_transaction_value \
             FROM {T} GROUP BY category ORDER BY total_sales DESC, category LIMIT {TOP_CATEGORIES_LIMIT}"
        ),
        "total_sales",
    ));
    out.push(Aggregate::new(
        HOURLY_SALES,
        format!(
            r#"SELECT "weekday", "hour", sum(total_amount) AS sales FROM {T} GROUP BY 1, 2 ORDER BY 1, 2"#
        ),
        "sales",
    ));
    out.push(Aggregate::new(
        DISCOUNT_ANALYSIS,
        format!(
            "SELECT CASE \
                 WHEN discount_percent = 0 THEN 'No Discount' \
                 WHEN discount_percent <= 0.10 THEN '1-10%' \
                 WHEN discount_percent <= 0.20 THEN '11-20%' \
                 WHEN discount_percent <= 0.30 THEN '21-30%' \
                 ELSE '30%+' END AS discount_bucket, \
             count(transaction_id) AS num_transactions, sum(total_amount) AS total_sales, \
             avg(total_amount) AS avg_transaction_value \
             FROM {T} GROUP BY 1 ORDER BY 1"
        ),
        "total_sales",
    ));

    for period in Period::ALL {
        out.push(period_by_region(period));
    }
    for period in Period::ALL {
        out.push(period_by_category(period));
    }
    for period in Period::ALL {
        out.push(period_top_products(period));
    }

    out
}

pub async fn run(ctx: &SessionContext, cfg: &Config) -> Result<Vec<TableSummary>> {
    register_table(ctx, &cfg.data.cleaned(), TABLE_TRANSACTIONS_ENRICHED).await?;
    let dir = cfg.data.aggregated();
    fs::create_dir_all(&dir)?;
    let props = cfg.output.writer_properties()?;

    let aggregates = aggregates();
    let mut out = Vec::with_capacity(aggregates.len());
    for agg in aggregates {
        info!("gold: calculating {}", agg.name);
        debug!("{}", agg.sql);
        let rows = write_query(ctx, &agg.sql, &dir, &agg.name, props.clone()).await?;

        register_table(ctx, &dir, &agg.name).await?;
        let total = measure_sum(ctx, &agg.name, agg.measure).await?;
        info!("gold: {} saved, {rows} rows, total {total:.2}", agg.name);

        out.push(TableSummary::new(&agg.name, rows).with_total_sales(total));
    }

    Ok(out)
}

async fn measure_sum(ctx: &SessionContext, table: &str, column: &str) -> Result<f64> {
    let batches = query(
        ctx,
        &format!("SELECT CAST(sum({column}) AS DOUBLE) AS v FROM {table}"),
    )
    .await?;

    Ok(batches
        .iter()
        .filter(|b| b.num_rows() > 0)
        .map(|b| b.column(0).as_primitive::<Float64Type>())
        .filter(|arr| arr.is_valid(0))
        .map(|arr| arr.value(0))
        .sum())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_aggregate_names() {
        let names: Vec<String> = aggregates().into_iter().map(|a| a.name).collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(names.len(), 20);
        assert_eq!(unique.len(), names.len());

        for expected in [
            SALES_YEARLY,
            SALES_MONTHLY,
            SALES_WEEKLY,
            SALES_DAILY,
            SALES_BY_REGION,
            TOP_CATEGORIES,
            HOURLY_SALES,
            DISCOUNT_ANALYSIS,
            "sales_weekly_by_region",
            "sales_daily_by_category",
            "sales_monthly_top_products",
        ] {
            assert!(names.iter().any(|n| n == expected), "{expected}");
        }
    }

    #[test]
    fn test_group_by_matches_keys() {
        for period in Period::ALL {
            let projected = period_totals(period)
                .sql
                .split(" FROM ")
                .next()
                .unwrap()
                .to_string();
            assert!(projected.contains("total_sales"));
            // the column after the keys is what the breakdowns group by
            let keys = period.group_by().split(", ").count();
            assert_eq!(period.next_column(), keys + 1);
        }
    }
}
