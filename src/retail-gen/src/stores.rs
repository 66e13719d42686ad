use chrono::Duration;
use chrono::Months;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use tracing::info;

use crate::config::GenerationConfig;
use crate::error::Result;
use crate::error::RetailGenError;
use crate::locale::Locale;

pub const STORE_NAME_PREFIX: &str = "Markt";
pub const MIN_STORE_SIZE_SQM: i32 = 800;
pub const MAX_STORE_SIZE_SQM: i32 = 1500;
// stream offset of the store generator's rng
const RNG_STREAM: u64 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub store_id: i64,
    pub store_name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub store_size_sqm: i32,
    pub opening_date: NaiveDate,
}

pub struct StoreGenerator<'a> {
    rng: StdRng,
    locale: &'a Locale,
    regions: &'a [String],
    opened_from: NaiveDate,
    opened_to: NaiveDate,
}

impl<'a> StoreGenerator<'a> {
    /// Stores open between ten years and one year before the last day of the range.
    pub fn try_new(cfg: &'a GenerationConfig, locale: &'a Locale) -> Result<Self> {
        let opened_from = cfg
            .end_date
            .checked_sub_months(Months::new(120))
            .ok_or_else(|| RetailGenError::Config("end date out of range".to_string()))?;
        let opened_to = cfg
            .end_date
            .checked_sub_months(Months::new(12))
            .ok_or_else(|| RetailGenError::Config("end date out of range".to_string()))?;

        Ok(Self {
            rng: StdRng::seed_from_u64(cfg.seed.wrapping_add(RNG_STREAM)),
            locale,
            regions: &cfg.regions,
            opened_from,
            opened_to,
        })
    }

    pub fn generate(&mut self, num_stores: usize) -> Vec<Store> {
        info!("generating {num_stores} stores...");
        (1..=num_stores as i64).map(|id| self.store(id)).collect()
    }

    fn store(&mut self, store_id: i64) -> Store {
        let rng = &mut self.rng;
        let region = self.regions.choose(rng).cloned().unwrap_or_default();
        let city = self.locale.city(rng);
        let opening_days = (self.opened_to - self.opened_from).num_days();

        Store {
            store_id,
            store_name: format!("{STORE_NAME_PREFIX} {city}"),
            street: self.locale.street_address(rng),
            postal_code: self.locale.postcode(rng),
            region,
            latitude: self.locale.latitude(rng),
            longitude: self.locale.longitude(rng),
            store_size_sqm: rng.gen_range(MIN_STORE_SIZE_SQM..=MAX_STORE_SIZE_SQM),
            opening_date: self.opened_from + Duration::days(rng.gen_range(0..=opening_days)),
            city,
        }
    }
}
