use std::path::PathBuf;

use parquet::basic::BrotliLevel;
use parquet::basic::Compression;
use parquet::basic::GzipLevel;
use parquet::basic::ZstdLevel;
use parquet::file::properties::WriterProperties;
use serde::Deserialize;
use strum_macros::Display;
use strum_macros::EnumString;
use tracing::level_filters::LevelFilter;
use tracing::warn;

use crate::error::CommonError;
use crate::error::Result;
use crate::DATA_PATH_AGGREGATED;
use crate::DATA_PATH_CLEANED;
use crate::DATA_PATH_LANDING;
use crate::DATA_PATH_RAW;
use crate::DATA_PATH_REPORTS;

#[derive(Debug, Clone)]
pub struct Data {
    pub path: PathBuf,
}

impl Data {
    /// Generator output, read by Bronze.
    pub fn landing(&self) -> PathBuf {
        self.path.join(DATA_PATH_LANDING)
    }

    pub fn raw(&self) -> PathBuf {
        self.path.join(DATA_PATH_RAW)
    }

    pub fn cleaned(&self) -> PathBuf {
        self.path.join(DATA_PATH_CLEANED)
    }

    pub fn aggregated(&self) -> PathBuf {
        self.path.join(DATA_PATH_AGGREGATED)
    }

    pub fn reports(&self) -> PathBuf {
        self.path.join(DATA_PATH_REPORTS)
    }
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Codec {
    Uncompressed,
    Snappy,
    Gzip,
    Lz4,
    Zstd,
    Brotli,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub compression: Codec,
    pub compression_level: Option<i32>,
}

impl Output {
    pub fn compression(&self) -> Result<Compression> {
        let level = self.compression_level;
        let unsigned = |lvl: i32| -> Result<u32> {
            u32::try_from(lvl).map_err(|_| {
                CommonError::BadConfig(format!(
                    "compression level {lvl} is invalid for {}",
                    self.compression
                ))
            })
        };

        let compression = match self.compression {
            Codec::Zstd => match level {
                None => Compression::ZSTD(ZstdLevel::default()),
                Some(lvl) => Compression::ZSTD(ZstdLevel::try_new(lvl).map_err(|err| {
                    CommonError::BadConfig(format!("zstd level {lvl}: {err}"))
                })?),
            },
            Codec::Gzip => match level {
                None => Compression::GZIP(GzipLevel::default()),
                Some(lvl) => {
                    Compression::GZIP(GzipLevel::try_new(unsigned(lvl)?).map_err(|err| {
                        CommonError::BadConfig(format!("gzip level {lvl}: {err}"))
                    })?)
                }
            },
            Codec::Brotli => match level {
                None => Compression::BROTLI(BrotliLevel::default()),
                Some(lvl) => {
                    Compression::BROTLI(BrotliLevel::try_new(unsigned(lvl)?).map_err(|err| {
                        CommonError::BadConfig(format!("brotli level {lvl}: {err}"))
                    })?)
                }
            },
            other => {
                if let Some(lvl) = level {
                    warn!("compression level {lvl} is ignored for {other}");
                }
                match other {
                    Codec::Snappy => Compression::SNAPPY,
                    Codec::Lz4 => Compression::LZ4_RAW,
                    _ => Compression::UNCOMPRESSED,
                }
            }
        };

        Ok(compression)
    }

    pub fn writer_properties(&self) -> Result<WriterProperties> {
        Ok(WriterProperties::builder()
            .set_compression(self.compression()?)
            .build())
    }

    /// Bronze and Silver tables are always zstd encoded regardless of the configured codec.
    pub fn intermediate_writer_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(Compression::ZSTD(ZstdLevel::default()))
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data: Data,
    pub output: Output,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: Data {
                path: PathBuf::from("data"),
            },
            output: Output {
                compression: Codec::Zstd,
                compression_level: Some(3),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use parquet::basic::Compression;

    use super::Codec;
    use super::Output;

    #[test]
    fn test_codec_from_str() {
        assert_eq!(Codec::from_str("zstd").unwrap(), Codec::Zstd);
        assert_eq!(Codec::from_str("lz4").unwrap(), Codec::Lz4);
        assert!(Codec::from_str("lzma").is_err());
    }

    #[test]
    fn test_compression_levels() {
        let out = Output {
            compression: Codec::Zstd,
            compression_level: Some(3),
        };
        assert!(matches!(out.compression().unwrap(), Compression::ZSTD(_)));

        let out = Output {
            compression: Codec::Zstd,
            compression_level: Some(100),
        };
        assert!(out.compression().is_err());

        let out = Output {
            compression: Codec::Gzip,
            compression_level: Some(-1),
        };
        assert!(out.compression().is_err());

        let out = Output {
            compression: Codec::Snappy,
            compression_level: Some(5),
        };
        assert_eq!(out.compression().unwrap(), Compression::SNAPPY);
    }
}
