use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use pipeline::Pipeline;
use pipeline::Stage;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    Bronze,
    Silver,
    Gold,
    All,
}

impl From<StageArg> for Stage {
    fn from(s: StageArg) -> Self {
        match s {
            StageArg::Bronze => Stage::Bronze,
            StageArg::Silver => Stage::Silver,
            StageArg::Gold => Stage::Gold,
            StageArg::All => Stage::All,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct RunPipeline {
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Overrides `[data] path`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "all")]
    pub stage: StageArg,
}

pub async fn start(args: &RunPipeline, mut cfg: Config) -> Result<()> {
    if let Some(dir) = &args.data_dir {
        cfg.data.path.clone_from(dir);
    }
    let cfg: common::config::Config = cfg.try_into()?;
    info!("data dir: {:?}", cfg.data.path);

    let summary = Pipeline::new(cfg).run(args.stage.into()).await?;
    for (stage, tables) in [
        ("bronze", &summary.bronze),
        ("silver", &summary.silver),
        ("gold", &summary.gold),
    ] {
        for t in tables {
            info!("{stage}: {t}");
        }
    }

    Ok(())
}
