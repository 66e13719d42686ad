//! Per-year hourly sampling distribution.
//!
//! Only one year's grid is materialized at a time, so peak memory is bounded by
//! `days_in_year * 24` weights regardless of how long the configured range is.

use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::Timelike;

use crate::calendar;
use crate::config::GenerationConfig;
use crate::error::Result;
use crate::error::RetailGenError;

/// Weight of every hour on a public holiday when holidays are enabled.
pub const HOLIDAY_WEIGHT: f64 = 0.1;
/// Lower bound of a single hour's weight, keeps the distribution valid when the
/// peak multiplier is zero.
pub const WEIGHT_FLOOR: f64 = 1e-9;

/// The part of one calendar year that lies inside the configured date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    pub year: i32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl YearSpan {
    /// Number of hour slots, 24 per day.
    pub fn hours(&self) -> usize {
        ((self.last_day - self.first_day).num_days() as usize + 1) * 24
    }

    pub fn start(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::MIN)
    }
}

/// Splits `[start, end]` into per-year spans, clipped to the range, in year order.
pub fn year_spans(start: NaiveDate, end: NaiveDate) -> Result<Vec<YearSpan>> {
    let mut spans = Vec::with_capacity((end.year() - start.year() + 1).max(0) as usize);
    for year in start.year()..=end.year() {
        let first_day = if year == start.year() {
            start
        } else {
            NaiveDate::from_ymd_opt(year, 1, 1)
                .ok_or_else(|| RetailGenError::Internal(format!("bad year {year}")))?
        };
        let last_day = if year == end.year() {
            end
        } else {
            NaiveDate::from_ymd_opt(year, 12, 31)
                .ok_or_else(|| RetailGenError::Internal(format!("bad year {year}")))?
        };

        spans.push(YearSpan {
            year,
            first_day,
            last_day,
        });
    }

    Ok(spans)
}

/// Unnormalized weight of the hour slot starting at `slot`.
pub fn hour_weight(slot: NaiveDateTime, cfg: &GenerationConfig) -> f64 {
    let date = slot.date();
    let weight = if cfg.enable_holidays && calendar::is_holiday(date, cfg.easter) {
        HOLIDAY_WEIGHT
    } else {
        let traffic = calendar::hourly_traffic(slot.hour(), calendar::is_weekend(date))
            * cfg.peak_hour_multiplier;
        let season = if cfg.enable_seasonality {
            calendar::seasonal_multiplier(date.month())
        } else {
            1.
        };
        traffic * season
    };

    weight.max(WEIGHT_FLOOR)
}

/// Probability mass over the hour slots of one [`YearSpan`].
#[derive(Debug, Clone)]
pub struct HourlyDistribution {
    pub span: YearSpan,
    probabilities: Vec<f64>,
}

impl HourlyDistribution {
    pub fn build(span: YearSpan, cfg: &GenerationConfig) -> Self {
        let start = span.start();
        let mut weights: Vec<f64> = (0..span.hours())
            .map(|idx| hour_weight(start + Duration::hours(idx as i64), cfg))
            .collect();

        let total: f64 = weights.iter().sum();
        for w in weights.iter_mut() {
            *w /= total;
        }

        Self {
            span,
            probabilities: weights,
        }
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Start of the hour slot at `idx`.
    pub fn slot(&self, idx: usize) -> NaiveDateTime {
        self.span.start() + Duration::hours(idx as i64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::NaiveDate;
    use chrono::Timelike;

    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cfg(from: NaiveDate, to: NaiveDate) -> GenerationConfig {
        let mut cfg = GenerationConfig::new(42, 10, 100, 1000);
        cfg.start_date = from;
        cfg.end_date = to;
        cfg
    }

    #[test]
    fn test_year_spans() {
        let spans = year_spans(d(2021, 6, 15), d(2023, 2, 1)).unwrap();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].first_day, d(2021, 6, 15));
        assert_eq!(spans[0].last_day, d(2021, 12, 31));
        assert_eq!(spans[1].first_day, d(2022, 1, 1));
        assert_eq!(spans[1].hours(), 365 * 24);
        assert_eq!(spans[2].last_day, d(2023, 2, 1));

        let spans = year_spans(d(2024, 1, 1), d(2024, 12, 31)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].hours(), 366 * 24);

        let spans = year_spans(d(2024, 5, 5), d(2024, 5, 5)).unwrap();
        assert_eq!(spans[0].hours(), 24);
    }

    #[test]
    fn test_normalized() {
        let c = cfg(d(2020, 3, 10), d(2022, 12, 31));
        for span in year_spans(c.start_date, c.end_date).unwrap() {
            let dist = HourlyDistribution::build(span, &c);
            assert_eq!(dist.len(), span.hours());
            let sum: f64 = dist.probabilities().iter().sum();
            assert!((sum - 1.).abs() < 1e-9, "{sum}");
            assert!(dist.probabilities().iter().all(|p| *p > 0.));
        }
    }

    #[test]
    fn test_zero_peak_multiplier() {
        let mut c = cfg(d(2023, 1, 1), d(2023, 1, 31));
        c.enable_holidays = false;
        c.peak_hour_multiplier = 0.;
        let span = year_spans(c.start_date, c.end_date).unwrap()[0];
        let dist = HourlyDistribution::build(span, &c);
        let sum: f64 = dist.probabilities().iter().sum();
        assert!((sum - 1.).abs() < 1e-9);
        let p = 1. / dist.len() as f64;
        assert!(dist.probabilities().iter().all(|v| (v - p).abs() < 1e-12));
    }

    #[test]
    fn test_holiday_weight() {
        let c = cfg(d(2023, 1, 1), d(2023, 12, 31));
        let christmas = d(2023, 12, 25).and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(hour_weight(christmas, &c), HOLIDAY_WEIGHT);

        let mut no_holidays = c.clone();
        no_holidays.enable_holidays = false;
        // Monday evening in December
        assert!((hour_weight(christmas, &no_holidays) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_peak_multiplier_scales() {
        let mut c = cfg(d(2023, 1, 1), d(2023, 12, 31));
        let slot = d(2023, 7, 12).and_hms_opt(9, 0, 0).unwrap();
        let base = hour_weight(slot, &c);
        c.peak_hour_multiplier = 2.;
        assert!((hour_weight(slot, &c) - 2. * base).abs() < 1e-12);
    }

    fn hour_profile(dist: &HourlyDistribution, month: u32) -> Vec<f64> {
        let mut profile = vec![0.; 24];
        for (idx, p) in dist.probabilities().iter().enumerate() {
            let slot = dist.slot(idx);
            if slot.month() == month {
                profile[slot.hour() as usize] += p;
            }
        }
        let total: f64 = profile.iter().sum();
        profile.iter().map(|v| v / total).collect()
    }

    #[test]
    fn test_flat_calendar_is_pure_traffic_curve() {
        let mut c = cfg(d(2023, 1, 1), d(2023, 12, 31));
        c.enable_seasonality = false;
        c.enable_holidays = false;
        let span = year_spans(c.start_date, c.end_date).unwrap()[0];
        let dist = HourlyDistribution::build(span, &c);

        // July and December 2023 both have 21 weekdays and 10 weekend days
        let july = hour_profile(&dist, 7);
        let december = hour_profile(&dist, 12);
        for hour in 0..24 {
            assert!((july[hour] - december[hour]).abs() < 1e-12, "hour {hour}");
        }

        // same weekday in different months weighs the same
        let p_july = dist.probabilities()[(d(2023, 7, 12).ordinal0() * 24 + 18) as usize];
        let p_dec = dist.probabilities()[(d(2023, 12, 13).ordinal0() * 24 + 18) as usize];
        assert!((p_july - p_dec).abs() < 1e-15);
    }

    #[test]
    fn test_seasonality_shifts_mass() {
        let c = cfg(d(2023, 1, 1), d(2023, 12, 31));
        let span = year_spans(c.start_date, c.end_date).unwrap()[0];
        let dist = HourlyDistribution::build(span, &c);
        let p_july = dist.probabilities()[(d(2023, 7, 12).ordinal0() * 24 + 18) as usize];
        let p_dec = dist.probabilities()[(d(2023, 12, 13).ordinal0() * 24 + 18) as usize];
        assert!(p_dec > p_july);
    }
}
