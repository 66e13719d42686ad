use std::result;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("BadConfig: {0}")]
    BadConfig(String),
    #[error("ArrowError: {0:?}")]
    ArrowError(#[from] ArrowError),
    #[error("ParquetError: {0:?}")]
    ParquetError(#[from] ParquetError),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
}
