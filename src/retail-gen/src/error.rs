use std::result;

use arrow::error::ArrowError;
use common::error::CommonError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub type Result<T> = result::Result<T, RetailGenError>;

#[derive(Error, Debug)]
pub enum RetailGenError {
    /// Invalid or missing configuration. Reported before any generation work starts.
    #[error("Config: {0}")]
    Config(String),
    /// Output location can't be created or written.
    #[error("Resource: {0}")]
    Resource(String),
    /// Faking/locale backend is unavailable.
    #[error("Dependency: {0}")]
    Dependency(String),
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("ArrowError: {0:?}")]
    ArrowError(#[from] ArrowError),
    #[error("ParquetError: {0:?}")]
    ParquetError(#[from] ParquetError),
    #[error("CommonError: {0:?}")]
    CommonError(#[from] CommonError),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
}
