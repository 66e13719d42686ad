//! German retail calendar: public holidays, daily traffic curves and monthly seasonality.

use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::Weekday;
use serde::Deserialize;

/// How Easter-related holidays are detected.
#[derive(Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EasterRule {
    /// Only the dates listed in [`EASTER_TABLE`] are holidays.
    #[default]
    Table,
    /// Good Friday, Easter Sunday and Easter Monday derived for any year.
    Computus,
}

// (month, day)
const FIXED_HOLIDAYS: [(u32, u32); 5] = [
    (1, 1),   // New Year
    (5, 1),   // Labor Day
    (10, 3),  // German Unity Day
    (12, 25), // Christmas Day
    (12, 26), // Boxing Day
];

/// Good Friday, Easter Sunday and Easter Monday for the years the table rule knows about.
pub const EASTER_TABLE: [(i32, u32, u32); 18] = [
    (2020, 4, 10),
    (2020, 4, 12),
    (2020, 4, 13),
    (2021, 4, 2),
    (2021, 4, 4),
    (2021, 4, 5),
    (2022, 4, 15),
    (2022, 4, 17),
    (2022, 4, 18),
    (2023, 4, 7),
    (2023, 4, 9),
    (2023, 4, 10),
    (2024, 3, 29),
    (2024, 3, 31),
    (2024, 4, 1),
    (2025, 4, 18),
    (2025, 4, 20),
    (2025, 4, 21),
];

/// Easter Sunday of the Gregorian calendar (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

fn is_easter_holiday(date: NaiveDate, rule: EasterRule) -> bool {
    match rule {
        EasterRule::Table => EASTER_TABLE
            .iter()
            .any(|&(y, m, d)| date.year() == y && date.month() == m && date.day() == d),
        EasterRule::Computus => match easter_sunday(date.year()) {
            None => false,
            Some(sunday) => {
                let offset = (date - sunday).num_days();
                offset == -2 || offset == 0 || offset == 1
            }
        },
    }
}

pub fn is_holiday(date: NaiveDate, rule: EasterRule) -> bool {
    FIXED_HOLIDAYS
        .iter()
        .any(|&(m, d)| date.month() == m && date.day() == d)
        || is_easter_holiday(date, rule)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Relative store traffic for an hour of the day, in (0, 1].
///
/// Weekdays peak after work (17:00-19:00), weekends around midday (12:00-16:00).
pub fn hourly_traffic(hour: u32, is_weekend: bool) -> f64 {
    if is_weekend {
        match hour {
            0..=7 => 0.05,
            8..=9 => 0.3,
            10..=11 => 0.7,
            12..=15 => 1.,
            16..=17 => 0.8,
            18..=19 => 0.5,
            _ => 0.1,
        }
    } else {
        match hour {
            0..=6 => 0.05,
            7..=8 => 0.5,
            9..=10 => 0.6,
            11..=13 => 0.8,
            14..=16 => 0.9,
            17..=18 => 1.,
            19..=20 => 0.6,
            _ => 0.1,
        }
    }
}

/// Monthly volume multiplier: January trough, December peak.
pub fn seasonal_multiplier(month: u32) -> f64 {
    match month {
        1 => 0.85,
        2 => 0.90,
        3 => 0.95,
        4 => 1.00,
        5 => 1.05,
        6 => 1.10,
        7 => 1.15,
        8 => 1.10,
        9 => 1.05,
        10 => 1.10,
        11 => 1.20,
        12 => 1.40,
        _ => 1.,
    }
}

/// Every day of `[from, to]`, both inclusive.
pub fn days(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let n = (to - from).num_days().max(-1) + 1;
    (0..n).map(move |i| from + Duration::days(i))
}
