use std::result;

use common::error::CommonError;
use pipeline::error::PipelineError;
use retail_gen::error::RetailGenError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("Generate: {0}")]
    RetailGen(#[from] RetailGenError),
    #[error("Pipeline: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Common: {0}")]
    Common(#[from] CommonError),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
}
