//! Screen models built from a [`Timeline`] and "now".

use chrono::{DateTime, Days, TimeZone};

use crate::{
    error::ApiResult,
    model::{County, Day, Hour, Timeline, UnitGroup},
    window::{self, day_date, day_label, hour_label, hour_window, is_current_hour, month_day},
};

/// State held by a single screen for the duration of one load.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> From<ApiResult<T>> for UiState<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => UiState::Success(value),
            Err(err) => {
                tracing::warn!(error = %err, detail = err.detail(), "screen load failed");
                UiState::Error(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    pub label: String,
    pub is_now: bool,
    pub hour: Hour,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub label: String,
    pub month_day: String,
    pub day: Day,
}

impl DayRow {
    fn build<Tz: TimeZone>(day: &Day, now: &DateTime<Tz>) -> Self {
        Self {
            label: day_label(day, now),
            month_day: month_day(day, now),
            day: Day { hours: Vec::new(), ..day.clone() },
        }
    }
}

/// One tile of the "other info" block under the current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoItem {
    pub title: &'static str,
    pub value: String,
    pub note: String,
}

impl InfoItem {
    fn new(title: &'static str, value: String, note: impl Into<String>) -> Self {
        Self { title, value, note: note.into() }
    }
}

const COMPASS: [&str; 8] = ["北", "東北", "東", "東南", "南", "西南", "西", "西北"];

fn compass(degrees: i32) -> &'static str {
    let idx = ((f64::from(degrees.rem_euclid(360)) + 22.5) / 45.0) as usize % 8;
    COMPASS[idx]
}

fn uv_level(index: i32) -> &'static str {
    match index {
        ..=2 => "低",
        3..=5 => "中",
        6..=7 => "高",
        8..=10 => "過量",
        _ => "危險",
    }
}

/// Sunrise/sunset, UV, humidity with dew point, visibility, wind and pressure.
pub fn other_info(current: &Hour, units: UnitGroup) -> Vec<InfoItem> {
    let deg = units.temperature_suffix();

    vec![
        InfoItem::new("日出日落", format!("{} / {}", current.sunrise, current.sunset), ""),
        InfoItem::new("紫外線", current.uv_index.to_string(), uv_level(current.uv_index)),
        InfoItem::new(
            "濕度",
            format!("{}%", current.humidity),
            format!("露點 {}{deg}", current.dew),
        ),
        InfoItem::new(
            "能見度",
            format!("{:.1} {}", current.visibility, units.distance_suffix()),
            "",
        ),
        InfoItem::new(
            "風",
            format!("{:.1} {}", current.wind_speed, units.speed_suffix()),
            format!("{}風 {}°", compass(current.wind_dir), current.wind_dir),
        ),
        InfoItem::new("氣壓", format!("{:.1} hPa", current.pressure), ""),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub county: County,
    pub address: String,
    pub current: Hour,
    pub info: Vec<InfoItem>,
    pub hours: Vec<HourRow>,
    pub days: Vec<DayRow>,
}

impl HomeView {
    pub fn build<Tz: TimeZone>(
        county: County,
        timeline: &Timeline,
        now: &DateTime<Tz>,
        units: UnitGroup,
    ) -> Self {
        let hours = hour_window(timeline, now)
            .into_iter()
            .map(|slot| HourRow { label: slot.label, is_now: slot.is_now, hour: slot.hour.clone() })
            .collect();

        Self {
            county,
            address: timeline.resolved_address.clone(),
            current: timeline.current.clone(),
            info: other_info(&timeline.current, units),
            hours,
            days: timeline.days.iter().map(|d| DayRow::build(d, now)).collect(),
        }
    }
}

/// Every hour of one day, `day_offset` days after today.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyView {
    pub county: County,
    pub label: String,
    pub month_day: String,
    pub rows: Vec<HourRow>,
}

impl HourlyView {
    pub fn build<Tz: TimeZone>(
        county: County,
        timeline: &Timeline,
        now: &DateTime<Tz>,
        day_offset: u64,
    ) -> Option<Self> {
        let tz = now.timezone();
        let target = now.date_naive().checked_add_days(Days::new(day_offset))?;
        let day = timeline
            .days
            .iter()
            .find(|d| day_date(d, &tz) == Some(target))?;

        let rows = day
            .hours
            .iter()
            .map(|hour| {
                let is_now = is_current_hour(hour.datetime_epoch, now);
                let label = if is_now {
                    window::NOW_LABEL.to_string()
                } else {
                    hour_label(hour.datetime_epoch, &tz)
                };
                HourRow { label, is_now, hour: hour.clone() }
            })
            .collect();

        Some(Self { county, label: day_label(day, now), month_day: month_day(day, now), rows })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyView {
    pub county: County,
    pub rows: Vec<DayRow>,
}

impl WeeklyView {
    pub fn build<Tz: TimeZone>(county: County, timeline: &Timeline, now: &DateTime<Tz>) -> Self {
        Self { county, rows: timeline.days.iter().map(|d| DayRow::build(d, now)).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::FixedOffset;

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, d, h, 0, 0)
            .unwrap()
    }

    fn timeline() -> Timeline {
        let days = (17..=23)
            .map(|d| {
                let midnight = at(d, 0);
                Day {
                    datetime: midnight.format("%Y-%m-%d").to_string(),
                    datetime_epoch: midnight.timestamp(),
                    temp_max: 30,
                    temp_min: 22,
                    hours: (0..24)
                        .map(|h| Hour {
                            datetime_epoch: midnight.timestamp() + h * 3600,
                            ..Hour::default()
                        })
                        .collect(),
                    ..Day::default()
                }
            })
            .collect();

        Timeline {
            resolved_address: "臺北市, 台灣".into(),
            days,
            current: Hour { temp: 27, ..Hour::default() },
            ..Timeline::default()
        }
    }

    #[test]
    fn home_view_combines_window_and_day_rows() {
        let view = HomeView::build(County::default(), &timeline(), &at(17, 21), UnitGroup::Metric);

        assert_eq!(view.current.temp, 27);
        assert_eq!(view.hours.len(), 16);
        assert_eq!(view.hours[0].label, "現在");
        assert_eq!(view.days.len(), 7);
        assert_eq!(view.days[0].label, "今天");
        assert_eq!(view.days[1].label, "明天");
        assert_eq!(view.days[2].month_day, "10/19");
        assert!(view.days.iter().all(|d| d.day.hours.is_empty()));
        assert_eq!(view.info.len(), 6);
    }

    #[test]
    fn other_info_reads_current_conditions() {
        let current = Hour {
            sunrise: "05:52".into(),
            sunset: "17:24".into(),
            uv_index: 7,
            humidity: 78,
            dew: 21,
            visibility: 10.0,
            wind_speed: 12.3,
            wind_dir: 45,
            pressure: 1012.1,
            ..Hour::default()
        };

        let info = other_info(&current, UnitGroup::Metric);
        let find = |title: &str| info.iter().find(|i| i.title == title).unwrap();

        assert_eq!(find("日出日落").value, "05:52 / 17:24");
        assert_eq!(find("紫外線").value, "7");
        assert_eq!(find("紫外線").note, "高");
        assert_eq!(find("濕度").value, "78%");
        assert_eq!(find("濕度").note, "露點 21°C");
        assert_eq!(find("能見度").value, "10.0 km");
        assert_eq!(find("風").value, "12.3 km/h");
        assert_eq!(find("風").note, "東北風 45°");
        assert_eq!(find("氣壓").value, "1012.1 hPa");

        let us = other_info(&current, UnitGroup::Us);
        assert_eq!(us[2].note, "露點 21°F");
        assert_eq!(us[4].value, "12.3 mph");
    }

    #[test]
    fn compass_wraps_around_north() {
        assert_eq!(compass(0), "北");
        assert_eq!(compass(350), "北");
        assert_eq!(compass(-90), "西");
        assert_eq!(compass(180), "南");
    }

    #[test]
    fn hourly_view_marks_current_hour_only_today() {
        let tl = timeline();
        let now = at(17, 9);

        let today = HourlyView::build(County::default(), &tl, &now, 0).unwrap();
        assert_eq!(today.rows.len(), 24);
        assert_eq!(today.rows.iter().filter(|r| r.is_now).count(), 1);
        assert_eq!(today.rows[9].label, "現在");
        assert_eq!(today.rows[10].label, "上午10時");

        let tomorrow = HourlyView::build(County::default(), &tl, &now, 1).unwrap();
        assert_eq!(tomorrow.label, "明天");
        assert!(tomorrow.rows.iter().all(|r| !r.is_now));

        assert!(HourlyView::build(County::default(), &tl, &now, 30).is_none());
    }

    #[test]
    fn weekly_view_lists_every_day() {
        let view = WeeklyView::build(County::default(), &timeline(), &at(17, 9));
        assert_eq!(view.rows.len(), 7);
        assert_eq!(view.rows[6].label, "週 五");
    }

    #[test]
    fn api_errors_become_error_state_with_message() {
        let state: UiState<()> = Err(ApiError::Unauthorized).into();
        assert_eq!(state, UiState::Error(ApiError::Unauthorized.to_string()));

        let state: UiState<u8> = Ok(1).into();
        assert_eq!(state, UiState::Success(1));
    }
}
