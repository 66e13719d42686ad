pub mod batch_builder;
pub mod calendar;
pub mod config;
pub mod demand;
pub mod error;
pub mod generator;
pub mod locale;
pub mod products;
pub mod sampler;
pub mod schema;
pub mod stores;
pub mod transactions;

pub use config::GenerationConfig;
pub use generator::generate;
pub use generator::Summary;
