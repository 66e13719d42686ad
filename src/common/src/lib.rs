pub mod config;
pub mod error;
pub mod parquet;
pub mod types;

pub use types::DECIMAL_PRECISION;
pub use types::DECIMAL_SCALE;

pub const DATA_PATH_LANDING: &str = "landing";
pub const DATA_PATH_RAW: &str = "raw";
pub const DATA_PATH_CLEANED: &str = "cleaned";
pub const DATA_PATH_AGGREGATED: &str = "aggregated";
pub const DATA_PATH_REPORTS: &str = "reports";
