//! Draws transaction timestamps from the per-year hourly distributions.

use chrono::Duration;
use rand::distributions::Distribution;
use rand::distributions::WeightedIndex;
use rand::Rng;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::demand::year_spans;
use crate::demand::HourlyDistribution;
use crate::error::Result;
use crate::error::RetailGenError;

/// Relative volume of each year: `1 + i * yoy_growth`. Linear, not compounding.
pub fn year_multipliers(num_years: usize, yoy_growth: f64) -> Vec<f64> {
    (0..num_years).map(|i| 1. + i as f64 * yoy_growth).collect()
}

/// Splits `total` transactions across `num_years` proportionally to the growth curve.
/// Counts are rounded down and the remainder goes to the final year, so the result
/// always sums to `total`.
pub fn apportion(total: usize, num_years: usize, yoy_growth: f64) -> Vec<usize> {
    if num_years == 0 {
        return vec![];
    }

    let multipliers = year_multipliers(num_years, yoy_growth);
    let sum: f64 = multipliers.iter().sum();
    let mut counts: Vec<usize> = multipliers
        .iter()
        .map(|m| (total as f64 * m / sum).floor().max(0.) as usize)
        .collect();

    let assigned: usize = counts.iter().sum();
    if let Some(last) = counts.last_mut() {
        // float error can overshoot by one in pathological cases
        if assigned > total {
            *last -= (assigned - total).min(*last);
        } else {
            *last += total - assigned;
        }
    }

    counts
}

/// Samples `cfg.num_transactions` timestamps (microseconds since the unix epoch,
/// naive local time). Years are emitted in order; within a year draws are in
/// sampling order.
pub fn sample_timestamps<R: Rng>(cfg: &GenerationConfig, rng: &mut R) -> Result<Vec<i64>> {
    let spans = year_spans(cfg.start_date, cfg.end_date)?;
    let counts = apportion(cfg.num_transactions, spans.len(), cfg.yoy_growth);

    let mut out = Vec::with_capacity(cfg.num_transactions);
    for (span, count) in spans.into_iter().zip(counts) {
        debug!("year {}: {} transactions", span.year, count);
        if count == 0 {
            continue;
        }

        let dist = HourlyDistribution::build(span, cfg);
        let idx = WeightedIndex::new(dist.probabilities())
            .map_err(|err| RetailGenError::Internal(err.to_string()))?;

        for _ in 0..count {
            let slot = dist.slot(idx.sample(rng));
            let minute: i64 = rng.gen_range(0..60);
            let second: i64 = rng.gen_range(0..60);
            let ts = slot + Duration::minutes(minute) + Duration::seconds(second);
            out.push(ts.and_utc().timestamp_micros());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Datelike;
    use chrono::NaiveDate;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn cfg(from: NaiveDate, to: NaiveDate, n: usize) -> GenerationConfig {
        let mut cfg = GenerationConfig::new(42, 10, 100, n);
        cfg.start_date = from;
        cfg.end_date = to;
        cfg
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_apportion_conserves_total() {
        for (total, years, growth) in [
            (1000, 1, 0.),
            (1000, 3, 0.15),
            (7, 4, 0.15),
            (10_000_001, 6, 0.15),
            (999, 5, -0.1),
            (1, 3, 2.),
        ] {
            let counts = apportion(total, years, growth);
            assert_eq!(counts.len(), years);
            assert_eq!(counts.iter().sum::<usize>(), total);
        }
    }

    #[test]
    fn test_apportion_growth_ratio() {
        let counts = apportion(1000, 2, 0.5);
        assert_eq!(counts, vec![400, 600]);

        let counts = apportion(1_000_001, 2, 0.5);
        let ratio = counts[1] as f64 / counts[0] as f64;
        assert!((ratio - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_apportion_remainder_to_last_year() {
        // 10 / 3 = 3.33 each
        assert_eq!(apportion(10, 3, 0.), vec![3, 3, 4]);
    }

    #[test]
    fn test_timestamps_within_range() {
        let c = cfg(d(2022, 11, 15), d(2023, 2, 10), 5000);
        let mut rng = StdRng::seed_from_u64(c.seed);
        let ts = sample_timestamps(&c, &mut rng).unwrap();
        assert_eq!(ts.len(), 5000);

        let lo = d(2022, 11, 15).and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_micros();
        let hi = d(2023, 2, 10).and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp_micros();
        assert!(ts.iter().all(|v| *v >= lo && *v <= hi));

        // years are concatenated in order
        let years: Vec<i32> = ts
            .iter()
            .map(|v| DateTime::from_timestamp_micros(*v).unwrap().year())
            .collect();
        let first_2023 = years.iter().position(|y| *y == 2023).unwrap();
        assert!(years[..first_2023].iter().all(|y| *y == 2022));
        assert!(years[first_2023..].iter().all(|y| *y == 2023));
    }

    #[test]
    fn test_deterministic() {
        let c = cfg(d(2023, 1, 1), d(2023, 12, 31), 2000);
        let a = sample_timestamps(&c, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = sample_timestamps(&c, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        let other = sample_timestamps(&c, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_traffic_shape() {
        let mut c = cfg(d(2023, 1, 1), d(2023, 12, 31), 200_000);
        c.enable_seasonality = false;
        c.enable_holidays = false;
        let ts = sample_timestamps(&c, &mut StdRng::seed_from_u64(1)).unwrap();

        let mut july = [0f64; 24];
        let mut december = [0f64; 24];
        for v in ts.iter() {
            let dt = DateTime::from_timestamp_micros(*v).unwrap();
            match dt.month() {
                7 => july[dt.hour() as usize] += 1.,
                12 => december[dt.hour() as usize] += 1.,
                _ => {}
            }
        }
        let jt: f64 = july.iter().sum();
        let dt: f64 = december.iter().sum();
        for hour in 0..24 {
            assert!((july[hour] / jt - december[hour] / dt).abs() < 0.02, "hour {hour}");
        }

        // no seasonality: both months carry about the same volume
        assert!((jt - dt).abs() / jt < 0.05);
    }
}
