use std::path::PathBuf;

use clap::Parser;
use pipeline::Pipeline;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

#[derive(Parser, Clone, Debug)]
pub struct Report {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

pub async fn start(args: &Report, mut cfg: Config) -> Result<()> {
    if let Some(dir) = &args.data_dir {
        cfg.data.path.clone_from(dir);
    }
    let cfg: common::config::Config = cfg.try_into()?;

    let pipeline = Pipeline::new(cfg);
    let report = pipeline.report().await?;
    println!("{report}");

    for path in pipeline.export_csv().await? {
        info!("exported {:?}", path);
    }

    Ok(())
}
