use arrow::record_batch::RecordBatch;
use enum_iterator::all;
use enum_iterator::Sequence;
use rand::distributions::Distribution;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::Poisson;
use strum_macros::Display;
use strum_macros::EnumString;
use tracing::debug;

use crate::batch_builder::TransactionBatchBuilder;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::error::RetailGenError;
use crate::sampler::sample_timestamps;
use crate::schema::transactions_schema;

pub const MIN_QUANTITY: i32 = 1;
pub const MAX_QUANTITY: i32 = 10;
pub const DISCOUNTS: [f64; 5] = [0., 0.10, 0.15, 0.20, 0.25];
// no discount is three times as likely as any single discount level
pub const DISCOUNT_WEIGHTS: [u32; 5] = [3, 1, 1, 1, 1];
const RNG_STREAM: u64 = 2;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, Display, EnumString, Sequence)]
pub enum PaymentMethod {
    #[strum(serialize = "EC-Karte")]
    Card,
    #[strum(serialize = "Bargeld")]
    Cash,
    #[strum(serialize = "Kreditkarte")]
    Credit,
}

impl PaymentMethod {
    pub fn weight(&self) -> f64 {
        match self {
            PaymentMethod::Card => 0.6,
            PaymentMethod::Cash => 0.3,
            PaymentMethod::Credit => 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: i64,
    pub store_id: i64,
    pub product_id: i64,
    /// Microseconds since the unix epoch.
    pub transaction_datetime: i64,
    pub quantity: i32,
    pub discount_percent: f64,
    pub payment_method: PaymentMethod,
}

/// Assembles transaction rows around sampled timestamps.
pub struct TransactionGenerator<'a> {
    cfg: &'a GenerationConfig,
    rng: StdRng,
    store_ids: &'a [i64],
    product_ids: &'a [i64],
    quantity: Poisson<f64>,
    discount_idx: WeightedIndex<u32>,
    payment_methods: Vec<PaymentMethod>,
    payment_idx: WeightedIndex<f64>,
}

impl<'a> TransactionGenerator<'a> {
    pub fn try_new(
        cfg: &'a GenerationConfig,
        store_ids: &'a [i64],
        product_ids: &'a [i64],
    ) -> Result<Self> {
        if store_ids.is_empty() || product_ids.is_empty() {
            return Err(RetailGenError::Internal(
                "transactions need at least one store and one product".to_string(),
            ));
        }

        let quantity = Poisson::new(cfg.avg_items_per_transaction)
            .map_err(|err| RetailGenError::Config(format!("average items: {err}")))?;
        let discount_idx = WeightedIndex::new(DISCOUNT_WEIGHTS)
            .map_err(|err| RetailGenError::Internal(err.to_string()))?;
        let payment_methods: Vec<PaymentMethod> = all::<PaymentMethod>().collect();
        let payment_idx = WeightedIndex::new(payment_methods.iter().map(|m| m.weight()))
            .map_err(|err| RetailGenError::Internal(err.to_string()))?;

        Ok(Self {
            cfg,
            rng: StdRng::seed_from_u64(cfg.seed.wrapping_add(RNG_STREAM)),
            store_ids,
            product_ids,
            quantity,
            discount_idx,
            payment_methods,
            payment_idx,
        })
    }

    fn transaction(&mut self, transaction_id: i64, ts: i64) -> Transaction {
        let rng = &mut self.rng;
        let store_id = self.store_ids[rng.gen_range(0..self.store_ids.len())];
        let product_id = self.product_ids[rng.gen_range(0..self.product_ids.len())];
        let quantity = (self.quantity.sample(rng) as i32).clamp(MIN_QUANTITY, MAX_QUANTITY);

        Transaction {
            transaction_id,
            store_id,
            product_id,
            transaction_datetime: ts,
            quantity,
            discount_percent: DISCOUNTS[self.discount_idx.sample(rng)],
            payment_method: self.payment_methods[self.payment_idx.sample(rng)],
        }
    }

    /// Samples all timestamps, then emits record batches of at most `batch_size` rows
    /// in transaction_id order. Each batch is handed to `on_batch` and dropped.
    pub fn run<F>(&mut self, mut on_batch: F) -> Result<usize>
    where F: FnMut(RecordBatch) -> Result<()> {
        let timestamps = sample_timestamps(self.cfg, &mut self.rng)?;
        let batch_size = self.cfg.batch_size.max(1);
        let mut builder =
            TransactionBatchBuilder::new(batch_size.min(timestamps.len()), transactions_schema());

        let mut written = 0;
        for (idx, ts) in timestamps.into_iter().enumerate() {
            let tx = self.transaction(idx as i64 + 1, ts);
            builder.write_transaction(&tx);

            if builder.len() >= batch_size {
                let batch = builder.build_record_batch()?;
                written += batch.num_rows();
                debug!("transactions batch: {} rows, {written} total", batch.num_rows());
                on_batch(batch)?;
            }
        }

        if !builder.is_empty() {
            let batch = builder.build_record_batch()?;
            written += batch.num_rows();
            on_batch(batch)?;
        }

        Ok(written)
    }
}
