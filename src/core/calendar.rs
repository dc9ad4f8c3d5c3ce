//! Polish public holidays, on which no rate tables are published

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Easter Sunday for `year` (Gregorian computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
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

/// Every statutory holiday in `year`, sorted.
pub fn public_holidays(year: i32) -> Vec<NaiveDate> {
    let mut fixed = vec![(1, 1), (5, 1), (5, 3), (8, 15), (11, 1), (11, 11), (12, 25), (12, 26)];
    if year >= 2011 {
        fixed.push((1, 6));
    }
    if year >= 2025 {
        fixed.push((12, 24));
    }

    let mut holidays: Vec<NaiveDate> = fixed
        .into_iter()
        .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .collect();

    if let Some(easter) = easter_sunday(year) {
        // Easter Monday, Pentecost, Corpus Christi
        holidays.push(easter);
        holidays.extend(
            [1, 49, 60]
                .into_iter()
                .filter_map(|offset| easter.checked_add_days(Days::new(offset))),
        );
    }

    holidays.sort();
    holidays.dedup();
    holidays
}

pub fn is_public_holiday(date: NaiveDate) -> bool {
    public_holidays(date.year()).contains(&date)
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
