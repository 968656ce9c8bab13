//! Forecast windowing and labels relative to "now".
//!
//! Records carry UTC epochs; everything here localizes them through the time
//! zone of the `now` argument, so callers pass `Local::now()` in production
//! and a fixed offset in tests.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};

use crate::model::{Day, Hour, Timeline};

pub const HOUR_WINDOW_LEN: usize = 16;

pub const NOW_LABEL: &str = "現在";
pub const TODAY_LABEL: &str = "今天";
pub const TOMORROW_LABEL: &str = "明天";

const WEEKDAY_PREFIX: &str = "週 ";

/// Indexed by ISO weekday number minus one, Monday first.
const WEEKDAY_NAMES: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

/// One labelled entry of the home screen hour strip.
#[derive(Debug, Clone, PartialEq)]
pub struct HourSlot<'a> {
    pub label: String,
    pub is_now: bool,
    pub hour: &'a Hour,
}

/// Truncate to the top of the local hour.
pub fn start_of_hour<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let into_hour = TimeDelta::seconds(i64::from(t.minute()) * 60 + i64::from(t.second()))
        + TimeDelta::nanoseconds(i64::from(t.nanosecond()));
    t.clone() - into_hour
}

/// An epoch as a local instant in `tz`.
pub fn localize<Tz: TimeZone>(epoch: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::<Utc>::from_timestamp(epoch, 0).map(|utc| utc.with_timezone(tz))
}

/// `epoch` falls in `[start_of_hour(now), start_of_hour(now) + 1h)`.
pub fn is_current_hour<Tz: TimeZone>(epoch: i64, now: &DateTime<Tz>) -> bool {
    let start = start_of_hour(now).timestamp();
    epoch >= start && epoch < start + 3600
}

/// `epoch` falls on the same local calendar day as `now`.
pub fn is_today<Tz: TimeZone>(epoch: i64, now: &DateTime<Tz>) -> bool {
    localize(epoch, &now.timezone())
        .map(|t| t.date_naive() == now.date_naive())
        .unwrap_or(false)
}

/// Localized hour string for a non-current slot, e.g. `下午3時`.
pub fn hour_label<Tz: TimeZone>(epoch: i64, tz: &Tz) -> String {
    localize(epoch, tz)
        .map(|t| {
            let (pm, hour) = t.hour12();
            format!("{}{hour}時", if pm { "下午" } else { "上午" })
        })
        .unwrap_or_default()
}

/// Current hour through the next hours, borrowing from tomorrow near midnight.
///
/// Empty when today's date is not among `timeline.days`.
pub fn hour_window<'a, Tz: TimeZone>(timeline: &'a Timeline, now: &DateTime<Tz>) -> Vec<HourSlot<'a>> {
    let today = now.date_naive().format("%Y-%m-%d").to_string();
    let Some(idx) = timeline.days.iter().position(|d| d.datetime == today) else {
        tracing::debug!(%today, "today not present in timeline");
        return Vec::new();
    };

    let current = start_of_hour(now);
    let threshold = current.timestamp();

    let mut hours: Vec<&Hour> = sorted_hours(&timeline.days[idx])
        .into_iter()
        .filter(|h| h.datetime_epoch >= threshold)
        .take(HOUR_WINDOW_LEN)
        .collect();

    if hours.len() < HOUR_WINDOW_LEN {
        if let Some(next) = timeline.days.get(idx + 1) {
            let missing = HOUR_WINDOW_LEN - hours.len();
            hours.extend(sorted_hours(next).into_iter().take(missing));
        }
    }

    let tz = now.timezone();
    hours
        .into_iter()
        .map(|hour| {
            let is_now = localize(hour.datetime_epoch, &tz)
                .map(|t| start_of_hour(&t) == current)
                .unwrap_or(false);
            let label = if is_now {
                NOW_LABEL.to_string()
            } else {
                hour_label(hour.datetime_epoch, &tz)
            };
            HourSlot { label, is_now, hour }
        })
        .collect()
}

fn sorted_hours(day: &Day) -> Vec<&Hour> {
    let mut hours: Vec<&Hour> = day.hours.iter().collect();
    hours.sort_by_key(|h| h.datetime_epoch);
    hours
}

/// Local calendar date of a day record.
pub fn day_date<Tz: TimeZone>(day: &Day, tz: &Tz) -> Option<NaiveDate> {
    localize(day.datetime_epoch, tz)
        .map(|t| t.date_naive())
        .or_else(|| NaiveDate::parse_from_str(&day.datetime, "%Y-%m-%d").ok())
}

/// `今天`, `明天`, or the weekday name such as `週 一`.
pub fn day_label<Tz: TimeZone>(day: &Day, now: &DateTime<Tz>) -> String {
    let today = now.date_naive();
    let Some(date) = day_date(day, &now.timezone()) else {
        return day.datetime.clone();
    };

    if date == today {
        TODAY_LABEL.to_string()
    } else if Some(date) == today.succ_opt() {
        TOMORROW_LABEL.to_string()
    } else {
        weekday_name(date)
    }
}

pub fn weekday_name(date: NaiveDate) -> String {
    let idx = date.weekday().number_from_monday() - 1;
    format!("{WEEKDAY_PREFIX}{}", WEEKDAY_NAMES[idx as usize])
}

/// Secondary line under the day label, zero-padded, e.g. `11/02`.
pub fn month_day<Tz: TimeZone>(day: &Day, now: &DateTime<Tz>) -> String {
    day_date(day, &now.timezone())
        .map(|d| d.format("%m/%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn taipei() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        taipei().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> Day {
        let midnight = at(y, m, d, 0, 0);
        Day {
            datetime: midnight.format("%Y-%m-%d").to_string(),
            datetime_epoch: midnight.timestamp(),
            hours: (0..24)
                .map(|h| Hour {
                    datetime: format!("{h:02}:00"),
                    datetime_epoch: midnight.timestamp() + i64::from(h) * 3600,
                    temp: 20 + h,
                    ..Hour::default()
                })
                .collect(),
            ..Day::default()
        }
    }

    fn timeline(days: Vec<Day>) -> Timeline {
        Timeline { days, ..Timeline::default() }
    }

    #[test]
    fn morning_window_stays_within_today() {
        let tl = timeline(vec![day(2026, 10, 17), day(2026, 10, 18)]);
        let now = at(2026, 10, 17, 2, 10);

        let window = hour_window(&tl, &now);

        assert_eq!(window.len(), HOUR_WINDOW_LEN);
        assert_eq!(window[0].label, NOW_LABEL);
        assert!(window[0].is_now);
        assert_eq!(window[0].hour.datetime, "02:00");
        assert_eq!(window[15].hour.datetime, "17:00");
        assert!(window.iter().skip(1).all(|s| !s.is_now));
    }

    #[test]
    fn evening_window_borrows_from_tomorrow() {
        let tl = timeline(vec![day(2026, 10, 17), day(2026, 10, 18)]);
        let now = at(2026, 10, 17, 10, 25);

        let window = hour_window(&tl, &now);

        assert_eq!(window.len(), HOUR_WINDOW_LEN);
        assert_eq!(window[0].label, NOW_LABEL);
        assert_eq!(window[1].label, "上午11時");
        assert_eq!(window[2].label, "下午12時");
        assert_eq!(window[5].label, "下午3時");
        assert_eq!(window[13].label, "下午11時");
        assert_eq!(window[14].label, "上午12時");
        assert_eq!(window[14].hour.datetime_epoch, at(2026, 10, 18, 0, 0).timestamp());
        assert_eq!(window[15].hour.datetime_epoch, at(2026, 10, 18, 1, 0).timestamp());
    }

    #[test]
    fn just_before_midnight_takes_fifteen_hours_from_tomorrow() {
        let tl = timeline(vec![day(2026, 10, 17), day(2026, 10, 18)]);
        let now = at(2026, 10, 17, 23, 30);

        let window = hour_window(&tl, &now);

        assert_eq!(window.len(), HOUR_WINDOW_LEN);
        assert_eq!(window[0].label, NOW_LABEL);
        assert!(window[1..].iter().all(|s| !is_today(s.hour.datetime_epoch, &now)));
    }

    #[test]
    fn window_is_short_when_tomorrow_is_missing() {
        let tl = timeline(vec![day(2026, 10, 17)]);
        let now = at(2026, 10, 17, 20, 0);

        let window = hour_window(&tl, &now);

        assert_eq!(window.len(), 4);
    }

    #[test]
    fn window_is_empty_when_today_is_absent() {
        let tl = timeline(vec![day(2026, 10, 18), day(2026, 10, 19)]);
        let now = at(2026, 10, 17, 12, 0);

        assert!(hour_window(&tl, &now).is_empty());
    }

    #[test]
    fn window_is_non_decreasing_and_bounded_for_every_hour_of_the_day() {
        let tl = timeline(vec![day(2026, 10, 17), day(2026, 10, 18)]);

        for h in 0..24 {
            for min in [0, 59] {
                let now = at(2026, 10, 17, h, min);
                let window = hour_window(&tl, &now);

                assert!(window.len() <= HOUR_WINDOW_LEN);
                assert!(window
                    .windows(2)
                    .all(|pair| pair[0].hour.datetime_epoch <= pair[1].hour.datetime_epoch));
                assert_eq!(window.iter().filter(|s| s.is_now).count(), 1);
            }
        }
    }

    #[test]
    fn unordered_hours_are_sorted_before_windowing() {
        let mut today = day(2026, 10, 17);
        today.hours.reverse();
        let tl = timeline(vec![today, day(2026, 10, 18)]);

        let window = hour_window(&tl, &at(2026, 10, 17, 12, 0));

        assert_eq!(window[0].hour.datetime, "12:00");
        assert_eq!(window[1].hour.datetime, "13:00");
    }

    #[test]
    fn current_hour_is_half_open() {
        let now = at(2026, 10, 17, 14, 42);
        let start = at(2026, 10, 17, 14, 0).timestamp();

        assert!(is_current_hour(start, &now));
        assert!(is_current_hour(start + 3599, &now));
        assert!(!is_current_hour(start + 3600, &now));
        assert!(!is_current_hour(start - 1, &now));
    }

    #[test]
    fn today_compares_local_dates() {
        let now = at(2026, 10, 17, 9, 0);
        let midnight = at(2026, 10, 17, 0, 0).timestamp();

        assert!(is_today(midnight, &now));
        assert!(!is_today(midnight - 86_400, &now));
        assert!(!is_today(midnight + 86_400, &now));
        assert!(!is_today(midnight - 1, &now));
    }

    #[test]
    fn start_of_hour_drops_minutes_seconds_and_nanos() {
        let now = at(2026, 10, 17, 9, 59) + TimeDelta::seconds(30) + TimeDelta::milliseconds(250);
        assert_eq!(start_of_hour(&now), at(2026, 10, 17, 9, 0));
    }

    #[test]
    fn day_labels() {
        let now = at(2026, 10, 17, 8, 0);

        assert_eq!(day_label(&day(2026, 10, 17), &now), TODAY_LABEL);
        assert_eq!(day_label(&day(2026, 10, 18), &now), TOMORROW_LABEL);
        assert_eq!(day_label(&day(2026, 10, 19), &now), "週 一");
        assert_eq!(day_label(&day(2026, 10, 24), &now), "週 六");
        assert_eq!(day_label(&day(2026, 10, 25), &now), "週 日");
    }

    #[test]
    fn month_day_is_zero_padded() {
        let now = at(2026, 10, 17, 8, 0);
        assert_eq!(month_day(&day(2026, 10, 17), &now), "10/17");
        assert_eq!(month_day(&day(2026, 11, 2), &now), "11/02");
    }
}
