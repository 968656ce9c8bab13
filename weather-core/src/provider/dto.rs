//! Wire representation of the timeline response and its mapping to the domain.
//!
//! Every numeric field may be absent or `null` on the wire; the mapper
//! rounds what is present and zeroes what is not.

use serde::Deserialize;

use crate::model::{Day, Hour, Timeline, WeatherIcon};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TimelineDto {
    pub query_cost: Option<i64>,
    pub address: Option<String>,
    pub resolved_address: Option<String>,
    pub timezone: Option<String>,
    pub days: Option<Vec<DayDto>>,
    pub current_conditions: Option<HourDto>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct HourDto {
    pub datetime: Option<String>,
    #[serde(rename = "datetimeEpoch")]
    pub datetime_epoch: Option<i64>,
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub dew: Option<f64>,
    pub precipprob: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddir: Option<f64>,
    pub pressure: Option<f64>,
    pub cloudcover: Option<f64>,
    pub visibility: Option<f64>,
    pub uvindex: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub conditions: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(crate) struct DayDto {
    pub datetime: Option<String>,
    #[serde(rename = "datetimeEpoch")]
    pub datetime_epoch: Option<i64>,
    pub tempmax: Option<f64>,
    pub tempmin: Option<f64>,
    pub temp: Option<f64>,
    pub feelslike: Option<f64>,
    pub humidity: Option<f64>,
    pub dew: Option<f64>,
    pub precipprob: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddir: Option<f64>,
    pub pressure: Option<f64>,
    pub cloudcover: Option<f64>,
    pub visibility: Option<f64>,
    pub uvindex: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub conditions: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub hours: Option<Vec<HourDto>>,
}

fn whole(value: Option<f64>) -> i32 {
    value.map(|v| v.round() as i32).unwrap_or_default()
}

fn one_decimal(value: Option<f64>) -> f64 {
    value.map(|v| (v * 10.0).round() / 10.0).unwrap_or_default()
}

/// `HH:MM:SS` → `HH:MM`; anything else passes through.
fn remove_seconds(value: Option<String>) -> String {
    let value = value.unwrap_or_default();
    match value.rsplit_once(':') {
        Some((hours_minutes, seconds))
            if hours_minutes.contains(':') && seconds.len() == 2 =>
        {
            hours_minutes.to_string()
        }
        _ => value,
    }
}

impl From<HourDto> for Hour {
    fn from(dto: HourDto) -> Self {
        Hour {
            datetime: remove_seconds(dto.datetime),
            datetime_epoch: dto.datetime_epoch.unwrap_or_default(),
            temp: whole(dto.temp),
            feels_like: whole(dto.feelslike),
            humidity: whole(dto.humidity),
            dew: whole(dto.dew),
            precip_prob: whole(dto.precipprob),
            wind_speed: one_decimal(dto.windspeed),
            wind_dir: whole(dto.winddir),
            pressure: one_decimal(dto.pressure),
            cloud_cover: whole(dto.cloudcover),
            visibility: one_decimal(dto.visibility),
            uv_index: whole(dto.uvindex),
            sunrise: remove_seconds(dto.sunrise),
            sunset: remove_seconds(dto.sunset),
            conditions: dto.conditions.unwrap_or_default(),
            icon: dto.icon.as_deref().map(WeatherIcon::from_code).unwrap_or_default(),
        }
    }
}

impl From<DayDto> for Day {
    fn from(dto: DayDto) -> Self {
        Day {
            datetime: dto.datetime.unwrap_or_default(),
            datetime_epoch: dto.datetime_epoch.unwrap_or_default(),
            temp_max: whole(dto.tempmax),
            temp_min: whole(dto.tempmin),
            temp: whole(dto.temp),
            feels_like: whole(dto.feelslike),
            humidity: whole(dto.humidity),
            dew: whole(dto.dew),
            precip_prob: whole(dto.precipprob),
            wind_speed: one_decimal(dto.windspeed),
            wind_dir: whole(dto.winddir),
            pressure: one_decimal(dto.pressure),
            cloud_cover: whole(dto.cloudcover),
            visibility: one_decimal(dto.visibility),
            uv_index: whole(dto.uvindex),
            sunrise: remove_seconds(dto.sunrise),
            sunset: remove_seconds(dto.sunset),
            conditions: dto.conditions.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            icon: dto.icon.as_deref().map(WeatherIcon::from_code).unwrap_or_default(),
            hours: dto
                .hours
                .unwrap_or_default()
                .into_iter()
                .map(Hour::from)
                .collect(),
        }
    }
}

impl From<TimelineDto> for Timeline {
    fn from(dto: TimelineDto) -> Self {
        Timeline {
            query_cost: dto.query_cost.unwrap_or_default(),
            address: dto.address.unwrap_or_default(),
            resolved_address: dto.resolved_address.unwrap_or_default(),
            timezone: dto.timezone.unwrap_or_default(),
            days: dto
                .days
                .unwrap_or_default()
                .into_iter()
                .map(Day::from)
                .collect(),
            current: dto.current_conditions.map(Hour::from).unwrap_or_default(),
        }
    }
}
