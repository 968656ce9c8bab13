use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A selectable location: localized display name plus the key sent to the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct County {
    #[serde(alias = "zh")]
    pub name: String,
    #[serde(alias = "en")]
    pub key: String,
}

impl County {
    pub const COUNTRY: &'static str = "TW";

    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self { name: name.into(), key: key.into() }
    }

    /// Location parameter qualified with the country, e.g. `Kinmen County,TW`.
    pub fn location(&self) -> String {
        format!("{},{}", self.key, Self::COUNTRY)
    }
}

impl Default for County {
    fn default() -> Self {
        Self::new("臺北市", "Taipei City")
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitGroup {
    #[default]
    Metric,
    Us,
    Uk,
    Base,
}

impl UnitGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitGroup::Metric => "metric",
            UnitGroup::Us => "us",
            UnitGroup::Uk => "uk",
            UnitGroup::Base => "base",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitGroup::Us => "°F",
            UnitGroup::Base => "K",
            UnitGroup::Metric | UnitGroup::Uk => "°C",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            UnitGroup::Metric => "km/h",
            UnitGroup::Us | UnitGroup::Uk => "mph",
            UnitGroup::Base => "m/s",
        }
    }

    pub fn distance_suffix(&self) -> &'static str {
        match self {
            UnitGroup::Metric | UnitGroup::Base => "km",
            UnitGroup::Us | UnitGroup::Uk => "mi",
        }
    }
}

impl TryFrom<&str> for UnitGroup {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitGroup::Metric),
            "us" => Ok(UnitGroup::Us),
            "uk" => Ok(UnitGroup::Uk),
            "base" => Ok(UnitGroup::Base),
            _ => Err(anyhow::anyhow!(
                "Unknown unit group '{value}'. Supported: metric, us, uk, base."
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimelineRequest {
    pub location: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub unit_group: UnitGroup,
    pub include: String,
    pub lang: String,
}

impl TimelineRequest {
    pub const DEFAULT_INCLUDE: &'static str = "days,hours,current";
    pub const DEFAULT_LANG: &'static str = "zh-tw";
    /// Last requested day, counted from today.
    pub const END_OFFSET_DAYS: u64 = 7;

    /// `today ..= today + 7`.
    pub fn week(location: impl Into<String>, today: NaiveDate) -> Self {
        let end = today
            .checked_add_days(Days::new(Self::END_OFFSET_DAYS))
            .unwrap_or(today);

        Self {
            location: location.into(),
            start: today,
            end,
            unit_group: UnitGroup::default(),
            include: Self::DEFAULT_INCLUDE.to_string(),
            lang: Self::DEFAULT_LANG.to_string(),
        }
    }

    pub fn for_county(county: &County, today: NaiveDate) -> Self {
        Self::week(county.location(), today)
    }

    pub fn with_unit_group(mut self, unit_group: UnitGroup) -> Self {
        self.unit_group = unit_group;
        self
    }
}

/// Icon identifiers as coded by the timeline API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Fog,
    Wind,
    Rain,
    ShowersDay,
    ShowersNight,
    ThunderRain,
    ThunderShowersDay,
    ThunderShowersNight,
    Thunder,
    Snow,
    SnowShowersDay,
    SnowShowersNight,
    RainSnow,
    RainSnowShowersDay,
    RainSnowShowersNight,
    Sleet,
    Hail,
    #[default]
    Unknown,
}

impl WeatherIcon {
    pub fn from_code(code: &str) -> Self {
        match code {
            "clear-day" => Self::ClearDay,
            "clear-night" => Self::ClearNight,
            "partly-cloudy-day" => Self::PartlyCloudyDay,
            "partly-cloudy-night" => Self::PartlyCloudyNight,
            "cloudy" => Self::Cloudy,
            "fog" => Self::Fog,
            "wind" => Self::Wind,
            "rain" => Self::Rain,
            "showers-day" => Self::ShowersDay,
            "showers-night" => Self::ShowersNight,
            "thunder-rain" => Self::ThunderRain,
            "thunder-showers-day" => Self::ThunderShowersDay,
            "thunder-showers-night" => Self::ThunderShowersNight,
            "snow" => Self::Snow,
            "snow-showers-day" => Self::SnowShowersDay,
            "snow-showers-night" => Self::SnowShowersNight,
            "thunder" => Self::Thunder,
            "rain-snow" => Self::RainSnow,
            "rain-snow-showers-day" => Self::RainSnowShowersDay,
            "rain-snow-showers-night" => Self::RainSnowShowersNight,
            "sleet" => Self::Sleet,
            "hail" => Self::Hail,
            _ => Self::Unknown,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::ClearNight => "☾",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "⛅",
            Self::Cloudy => "☁",
            Self::Fog => "≋",
            Self::Wind => "≈",
            Self::Rain | Self::ShowersDay | Self::ShowersNight => "☂",
            Self::Thunder
            | Self::ThunderRain
            | Self::ThunderShowersDay
            | Self::ThunderShowersNight => "⚡",
            Self::Snow | Self::SnowShowersDay | Self::SnowShowersNight => "❄",
            Self::RainSnow | Self::RainSnowShowersDay | Self::RainSnowShowersNight | Self::Sleet => "☃",
            Self::Hail => "⁂",
            Self::Unknown => "?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ClearDay | Self::ClearNight => "晴",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "多雲",
            Self::Cloudy => "陰",
            Self::Fog => "霧",
            Self::Wind => "強風",
            Self::Rain => "雨",
            Self::ShowersDay | Self::ShowersNight => "陣雨",
            Self::Thunder => "雷",
            Self::ThunderRain | Self::ThunderShowersDay | Self::ThunderShowersNight => "雷雨",
            Self::Snow | Self::SnowShowersDay | Self::SnowShowersNight => "雪",
            Self::RainSnow | Self::RainSnowShowersDay | Self::RainSnowShowersNight => "雨夾雪",
            Self::Sleet => "冰霰",
            Self::Hail => "冰雹",
            Self::Unknown => "未知",
        }
    }
}

/// One forecast hour, or the current conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hour {
    /// Local display time, `HH:MM`.
    pub datetime: String,
    /// UTC epoch seconds.
    pub datetime_epoch: i64,
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: i32,
    pub dew: i32,
    pub precip_prob: i32,
    pub wind_speed: f64,
    pub wind_dir: i32,
    pub pressure: f64,
    pub cloud_cover: i32,
    pub visibility: f64,
    pub uv_index: i32,
    pub sunrise: String,
    pub sunset: String,
    pub conditions: String,
    pub icon: WeatherIcon,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Day {
    /// Local date, `YYYY-MM-DD`.
    pub datetime: String,
    pub datetime_epoch: i64,
    pub temp_max: i32,
    pub temp_min: i32,
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: i32,
    pub dew: i32,
    pub precip_prob: i32,
    pub wind_speed: f64,
    pub wind_dir: i32,
    pub pressure: f64,
    pub cloud_cover: i32,
    pub visibility: f64,
    pub uv_index: i32,
    pub sunrise: String,
    pub sunset: String,
    pub conditions: String,
    pub description: String,
    pub icon: WeatherIcon,
    pub hours: Vec<Hour>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub query_cost: i64,
    pub address: String,
    pub resolved_address: String,
    pub timezone: String,
    pub days: Vec<Day>,
    pub current: Hour,
}
