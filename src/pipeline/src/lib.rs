//! Bronze/Silver/Gold batch transformation over the generated tables.

pub mod bronze;
pub mod error;
pub mod exec;
pub mod gold;
pub mod report;
pub mod silver;

use std::fmt;

use common::config::Config;
use datafusion::prelude::SessionContext;
use strum_macros::Display;
use strum_macros::EnumString;
use tracing::info;

use crate::error::Result;
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Bronze,
    Silver,
    Gold,
    All,
}

impl Stage {
    fn includes(&self, other: Stage) -> bool {
        *self == Stage::All || *self == other
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub table: String,
    pub rows: usize,
    pub total_sales: Option<f64>,
}

impl TableSummary {
    pub fn new(table: &str, rows: usize) -> Self {
        Self {
            table: table.to_string(),
            rows,
            total_sales: None,
        }
    }

    pub fn with_total_sales(mut self, total: f64) -> Self {
        self.total_sales = Some(total);
        self
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} rows", self.table, self.rows)?;
        if let Some(total) = self.total_sales {
            write!(f, ", total sales {total:.2}")?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub bronze: Vec<TableSummary>,
    pub silver: Vec<TableSummary>,
    pub gold: Vec<TableSummary>,
}

/// Runs the medallion stages against one data directory.
pub struct Pipeline {
    cfg: Config,
    ctx: SessionContext,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ctx: SessionContext::new(),
        }
    }

    pub async fn bronze(&self) -> Result<Vec<TableSummary>> {
        info!("bronze: raw data ingestion");
        bronze::ingest(&self.ctx, &self.cfg).await
    }

    pub async fn silver(&self) -> Result<Vec<TableSummary>> {
        info!("silver: cleaning and enrichment");
        silver::run(&self.ctx, &self.cfg).await
    }

    pub async fn gold(&self) -> Result<Vec<TableSummary>> {
        info!("gold: business aggregations");
        gold::run(&self.ctx, &self.cfg).await
    }

    /// Runs `stage`, or all stages in order for [Stage::All].
    pub async fn run(&self, stage: Stage) -> Result<Summary> {
        let mut summary = Summary::default();
        if stage.includes(Stage::Bronze) {
            summary.bronze = self.bronze().await?;
        }
        if stage.includes(Stage::Silver) {
            summary.silver = self.silver().await?;
        }
        if stage.includes(Stage::Gold) {
            summary.gold = self.gold().await?;
        }
        info!("pipeline complete");

        Ok(summary)
    }

    pub async fn report(&self) -> Result<Report> {
        Report::build(&self.ctx, &self.cfg).await
    }

    pub async fn export_csv(&self) -> Result<Vec<std::path::PathBuf>> {
        report::export_csv(&self.ctx, &self.cfg).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Stage;

    #[test]
    fn test_stage() {
        assert_eq!(Stage::from_str("silver").unwrap(), Stage::Silver);
        assert_eq!(Stage::All.to_string(), "all");
        assert!(Stage::All.includes(Stage::Gold));
        assert!(!Stage::Bronze.includes(Stage::Silver));
    }
}
