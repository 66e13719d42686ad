use std::path::PathBuf;
use std::result;

use arrow::error::ArrowError;
use common::error::CommonError;
use datafusion::error::DataFusionError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("internal {0:?}")]
    Internal(String),
    /// An upstream table doesn't exist yet, the previous stage has not run.
    #[error("missing input {0:?}, run the previous stage first")]
    MissingInput(PathBuf),
    #[error("datafusion {0:?}")]
    DataFusion(#[from] DataFusionError),
    #[error("arrow {0:?}")]
    Arrow(#[from] ArrowError),
    #[error("parquet {0:?}")]
    Parquet(#[from] ParquetError),
    #[error("common {0:?}")]
    Common(#[from] CommonError),
    #[error("io {0:?}")]
    StdIO(#[from] std::io::Error),
}
