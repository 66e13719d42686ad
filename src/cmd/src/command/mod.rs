pub mod generate;
pub mod pipeline;
pub mod report;
