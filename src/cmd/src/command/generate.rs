use std::path::PathBuf;

use clap::Parser;
use retail_gen::GenerationConfig;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

#[derive(Parser, Clone, Debug)]
pub struct Generate {
    /// TOML config file, flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub stores: usize,
    #[arg(long)]
    pub products: usize,
    #[arg(long)]
    pub transactions: usize,
    #[arg(long)]
    pub seed: u64,
    #[arg(long)]
    pub output_dir: PathBuf,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    /// YYYY-MM-DD, inclusive
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub yoy_growth: Option<f64>,
    #[arg(long)]
    pub no_seasonality: bool,
    #[arg(long)]
    pub no_holidays: bool,
    #[arg(long)]
    pub avg_items: Option<f64>,
    #[arg(long)]
    pub peak_multiplier: Option<f64>,
}

impl Generate {
    /// Applies the command line on top of the file config.
    pub fn generation_config(&self, cfg: &Config) -> Result<GenerationConfig> {
        let mut gen = cfg.generation.to_generation_config(
            self.seed,
            self.stores,
            self.products,
            self.transactions,
        )?;

        if let Some(v) = &self.start_date {
            gen.start_date = GenerationConfig::parse_date(v)?;
        }
        if let Some(v) = &self.end_date {
            gen.end_date = GenerationConfig::parse_date(v)?;
        }
        if let Some(v) = self.yoy_growth {
            gen.yoy_growth = v;
        }
        if self.no_seasonality {
            gen.enable_seasonality = false;
        }
        if self.no_holidays {
            gen.enable_holidays = false;
        }
        if let Some(v) = self.avg_items {
            gen.avg_items_per_transaction = v;
        }
        if let Some(v) = self.peak_multiplier {
            gen.peak_hour_multiplier = v;
        }

        Ok(gen)
    }
}

pub fn start(args: &Generate, cfg: Config) -> Result<()> {
    let gen = args.generation_config(&cfg)?;
    let runtime: common::config::Config = cfg.try_into()?;

    let summary = retail_gen::generate(&gen, &runtime.output, &args.output_dir)?;
    info!(
        "generated {} stores, {} products, {} transactions into {:?}",
        summary.stores, summary.products, summary.transactions, summary.out_dir
    );

    Ok(())
}
