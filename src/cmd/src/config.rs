use std::path::Path;
use std::path::PathBuf;

use clap::ValueEnum;
use common::config::Codec;
use retail_gen::calendar::EasterRule;
use retail_gen::config::DEFAULT_AVG_ITEMS_PER_TRANSACTION;
use retail_gen::config::DEFAULT_BATCH_SIZE;
use retail_gen::config::DEFAULT_CATEGORIES;
use retail_gen::config::DEFAULT_LOCALE;
use retail_gen::config::DEFAULT_PEAK_HOUR_MULTIPLIER;
use retail_gen::config::DEFAULT_REGIONS;
use retail_gen::config::DEFAULT_START_DATE;
use retail_gen::config::DEFAULT_YOY_GROWTH;
use retail_gen::GenerationConfig;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Result;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Data {
    pub path: PathBuf,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Output {
    pub compression: Codec,
    pub compression_level: Option<i32>,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            compression: Codec::Zstd,
            compression_level: Some(3),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Generation {
    pub locale: String,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub start_date: String,
    /// Today when unset.
    pub end_date: Option<String>,
    pub yoy_growth: f64,
    pub enable_seasonality: bool,
    pub enable_holidays: bool,
    pub avg_items_per_transaction: f64,
    pub peak_hour_multiplier: f64,
    pub easter: EasterRule,
    pub batch_size: usize,
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|v| v.to_string()).collect(),
            regions: DEFAULT_REGIONS.iter().map(|v| v.to_string()).collect(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: None,
            yoy_growth: DEFAULT_YOY_GROWTH,
            enable_seasonality: true,
            enable_holidays: true,
            avg_items_per_transaction: DEFAULT_AVG_ITEMS_PER_TRANSACTION,
            peak_hour_multiplier: DEFAULT_PEAK_HOUR_MULTIPLIER,
            easter: EasterRule::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Generation {
    /// Builds the runtime generation config. Entity counts and the seed always come
    /// from the command line.
    pub fn to_generation_config(
        &self,
        seed: u64,
        num_stores: usize,
        num_products: usize,
        num_transactions: usize,
    ) -> Result<GenerationConfig> {
        let mut cfg = GenerationConfig::new(seed, num_stores, num_products, num_transactions);
        cfg.locale.clone_from(&self.locale);
        cfg.categories.clone_from(&self.categories);
        cfg.regions.clone_from(&self.regions);
        cfg.start_date = GenerationConfig::parse_date(&self.start_date)?;
        if let Some(end) = &self.end_date {
            cfg.end_date = GenerationConfig::parse_date(end)?;
        }
        cfg.yoy_growth = self.yoy_growth;
        cfg.enable_seasonality = self.enable_seasonality;
        cfg.enable_holidays = self.enable_holidays;
        cfg.avg_items_per_transaction = self.avg_items_per_transaction;
        cfg.peak_hour_multiplier = self.peak_hour_multiplier;
        cfg.easter = self.easter;
        cfg.batch_size = self.batch_size;

        Ok(cfg)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data: Data,
    pub output: Output,
    pub generation: Generation,
    pub log: Log,
}

impl Config {
    /// Reads a TOML config file. Without a file every section takes its defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Config::default()),
            Some(path) => {
                let config = config::Config::builder()
                    .add_source(config::File::from(path))
                    .build()?;

                Ok(config.try_deserialize()?)
            }
        }
    }
}

impl TryInto<common::config::Config> for Config {
    type Error = crate::error::Error;

    fn try_into(self) -> Result<common::config::Config> {
        let output = common::config::Output {
            compression: self.output.compression,
            compression_level: self.output.compression_level,
        };
        // reject bad codec levels before any work starts
        output.compression()?;

        Ok(common::config::Config {
            data: common::config::Data {
                path: self.data.path,
            },
            output,
            log: common::config::Log {
                level: self.log.level.into(),
            },
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[default]
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use std::env::temp_dir;
    use std::fs;

    use chrono::NaiveDate;
    use common::config::Codec;
    use retail_gen::calendar::EasterRule;
    use tracing::level_filters::LevelFilter;
    use uuid::Uuid;

    use super::Config;
    use crate::error::Error;

    fn write(content: &str) -> std::path::PathBuf {
        let path = temp_dir().join(format!("{}.toml", Uuid::new_v4()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg, Config::default());

        let rt: common::config::Config = cfg.clone().try_into().unwrap();
        assert_eq!(rt.output.compression, Codec::Zstd);
        assert_eq!(rt.output.compression_level, Some(3));
        assert_eq!(rt.log.level, LevelFilter::INFO);

        let gen = cfg.generation.to_generation_config(1, 2, 3, 4).unwrap();
        assert_eq!(gen.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(gen.categories.len(), 11);
        assert_eq!(gen.regions.len(), 16);
        assert_eq!(gen.batch_size, 100_000);
    }

    #[test]
    fn test_partial_file() {
        let path = write(
            r#"
[data]
path = "/tmp/lake"

[output]
compression = "gzip"
compression_level = 6

[generation]
start_date = "2023-01-01"
end_date = "2023-12-31"
easter = "computus"
regions = ["Bayern", "Berlin"]

[log]
level = "debug"
"#,
        );

        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.generation.regions, vec!["Bayern", "Berlin"]);
        assert_eq!(cfg.generation.locale, "de_DE");
        assert_eq!(cfg.generation.easter, EasterRule::Computus);

        let gen = cfg.generation.to_generation_config(42, 1, 1, 1).unwrap();
        assert_eq!(gen.end_date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        let rt: common::config::Config = cfg.try_into().unwrap();
        assert_eq!(rt.data.path, std::path::PathBuf::from("/tmp/lake"));
        assert_eq!(rt.output.compression, Codec::Gzip);
        assert_eq!(rt.log.level, LevelFilter::DEBUG);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bad_values() {
        let path = write("[output]\ncompression = \"zip\"\n");
        assert!(matches!(Config::load(Some(&path)), Err(Error::Config(_))));
        fs::remove_file(&path).unwrap();

        let path = write("[output]\ncompression = \"zstd\"\ncompression_level = 99\n");
        let cfg = Config::load(Some(&path)).unwrap();
        let res: Result<common::config::Config, Error> = cfg.try_into();
        assert!(matches!(res, Err(Error::Common(_))));
        fs::remove_file(&path).unwrap();

        let path = write("[generation]\nstart_date = \"01.01.2023\"\n");
        let cfg = Config::load(Some(&path)).unwrap();
        assert!(cfg.generation.to_generation_config(1, 1, 1, 1).is_err());
        fs::remove_file(&path).unwrap();

        assert!(Config::load(Some(&temp_dir().join("missing-lakehouse.toml"))).is_err());
    }
}
