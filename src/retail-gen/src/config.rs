use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Utc;

use crate::calendar::EasterRule;
use crate::error::Result;
use crate::error::RetailGenError;

pub const DEFAULT_LOCALE: &str = "de_DE";
pub const DEFAULT_START_DATE: &str = "2020-01-01";
pub const DEFAULT_YOY_GROWTH: f64 = 0.15;
pub const DEFAULT_AVG_ITEMS_PER_TRANSACTION: f64 = 3.;
pub const DEFAULT_PEAK_HOUR_MULTIPLIER: f64 = 1.;
pub const DEFAULT_BATCH_SIZE: usize = 100_000;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Obst & Gemüse",
    "Brot & Backwaren",
    "Molkereiprodukte",
    "Fleisch & Wurst",
    "Tiefkühlkost",
    "Getränke",
    "Süßwaren & Snacks",
    "Konserven & Fertiggerichte",
    "Haushaltswaren",
    "Drogerie & Kosmetik",
    "Aktionswaren",
];

pub const DEFAULT_REGIONS: [&str; 16] = [
    "Baden-Württemberg",
    "Bayern",
    "Berlin",
    "Brandenburg",
    "Bremen",
    "Hamburg",
    "Hessen",
    "Mecklenburg-Vorpommern",
    "Niedersachsen",
    "Nordrhein-Westfalen",
    "Rheinland-Pfalz",
    "Saarland",
    "Sachsen",
    "Sachsen-Anhalt",
    "Schleswig-Holstein",
    "Thüringen",
];

/// Everything a generation run depends on. Built once and passed by reference into
/// each generator; identical config (including `seed`) reproduces identical output.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub seed: u64,
    pub num_stores: usize,
    pub num_products: usize,
    pub num_transactions: usize,
    /// First day with transactions.
    pub start_date: NaiveDate,
    /// Last day with transactions, inclusive.
    pub end_date: NaiveDate,
    /// Linear year-over-year growth of transaction volume.
    pub yoy_growth: f64,
    pub enable_seasonality: bool,
    pub enable_holidays: bool,
    /// Poisson mean of the quantity column.
    pub avg_items_per_transaction: f64,
    pub peak_hour_multiplier: f64,
    pub easter: EasterRule,
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub locale: String,
    /// Transactions assembled per record batch.
    pub batch_size: usize,
}

impl GenerationConfig {
    pub fn new(
        seed: u64,
        num_stores: usize,
        num_products: usize,
        num_transactions: usize,
    ) -> Self {
        Self {
            seed,
            num_stores,
            num_products,
            num_transactions,
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: Utc::now().date_naive(),
            yoy_growth: DEFAULT_YOY_GROWTH,
            enable_seasonality: true,
            enable_holidays: true,
            avg_items_per_transaction: DEFAULT_AVG_ITEMS_PER_TRANSACTION,
            peak_hour_multiplier: DEFAULT_PEAK_HOUR_MULTIPLIER,
            easter: EasterRule::default(),
            categories: DEFAULT_CATEGORIES.iter().map(|v| v.to_string()).collect(),
            regions: DEFAULT_REGIONS.iter().map(|v| v.to_string()).collect(),
            locale: DEFAULT_LOCALE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn parse_date(value: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| {
            RetailGenError::Config(format!("invalid date {value:?}, expected YYYY-MM-DD: {err}"))
        })
    }

    /// Number of calendar years touched by the date range.
    pub fn num_years(&self) -> usize {
        (self.end_date.year() - self.start_date.year() + 1).max(0) as usize
    }

    pub fn validate(&self) -> Result<()> {
        let bad = |msg: String| Err(RetailGenError::Config(msg));

        if self.start_date > self.end_date {
            return bad(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            ));
        }
        if self.num_stores == 0 {
            return bad("number of stores must be positive".to_string());
        }
        if self.num_products == 0 {
            return bad("number of products must be positive".to_string());
        }
        if self.num_transactions == 0 {
            return bad("number of transactions must be positive".to_string());
        }
        if !self.avg_items_per_transaction.is_finite() || self.avg_items_per_transaction <= 0. {
            return bad(format!(
                "average items per transaction must be positive, got {}",
                self.avg_items_per_transaction
            ));
        }
        if !self.peak_hour_multiplier.is_finite() || self.peak_hour_multiplier < 0. {
            return bad(format!(
                "peak hour multiplier must be non-negative, got {}",
                self.peak_hour_multiplier
            ));
        }
        if !self.yoy_growth.is_finite() {
            return bad(format!("yoy growth must be finite, got {}", self.yoy_growth));
        }
        // the smallest multiplier is either the first or the last one
        let last = 1. + (self.num_years() as f64 - 1.) * self.yoy_growth;
        if last <= 0. {
            return bad(format!(
                "yoy growth {} drives the volume of year {} to zero",
                self.yoy_growth,
                self.end_date.year()
            ));
        }
        if self.categories.is_empty() {
            return bad("categories must not be empty".to_string());
        }
        if self.regions.is_empty() {
            return bad("regions must not be empty".to_string());
        }
        if self.batch_size == 0 {
            return bad("batch size must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::GenerationConfig;
    use crate::error::RetailGenError;

    fn cfg() -> GenerationConfig {
        let mut cfg = GenerationConfig::new(42, 10, 100, 1000);
        cfg.start_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        cfg.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        cfg
    }

    #[test]
    fn test_valid() {
        cfg().validate().unwrap();
    }

    #[test]
    fn test_reversed_range() {
        let mut c = cfg();
        c.start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(c.validate(), Err(RetailGenError::Config(_))));
    }

    #[test]
    fn test_zero_counts() {
        let cases: [fn(&mut GenerationConfig); 4] = [
            |c| c.num_stores = 0,
            |c| c.num_products = 0,
            |c| c.num_transactions = 0,
            |c| c.batch_size = 0,
        ];
        for f in cases {
            let mut c = cfg();
            f(&mut c);
            assert!(matches!(c.validate(), Err(RetailGenError::Config(_))));
        }
    }

    #[test]
    fn test_negative_growth() {
        let mut c = cfg();
        c.start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        c.yoy_growth = -0.2;
        c.validate().unwrap();

        c.yoy_growth = -0.4;
        assert!(matches!(c.validate(), Err(RetailGenError::Config(_))));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            GenerationConfig::parse_date("2023-04-09").unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 9).unwrap()
        );
        assert!(GenerationConfig::parse_date("09.04.2023").is_err());
    }

    #[test]
    fn test_num_years() {
        let mut c = cfg();
        assert_eq!(c.num_years(), 1);
        c.end_date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(c.num_years(), 3);
    }
}
