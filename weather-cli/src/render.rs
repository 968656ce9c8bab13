//! Plain-text rendering of the screen models.

use weather_core::{County, Day, HomeView, Hour, HourlyView, UiState, UnitGroup, WeeklyView};

pub fn status<T>(county: &County, state: &UiState<T>) {
    match state {
        UiState::Loading => eprintln!("{} 載入中…", county.name),
        UiState::Error(message) => eprintln!("{} 載入失敗：{message}", county.name),
        UiState::Success(_) => {}
    }
}

pub fn counties(counties: &[County], selected: &County) {
    for county in counties {
        let marker = if county == selected { "*" } else { " " };
        println!("{marker} {:<6} {}", county.name, county.key);
    }
}

pub fn home(view: &HomeView, units: UnitGroup) {
    let deg = units.temperature_suffix();
    let now = &view.current;

    println!("{}  {}", view.county.name, view.address);
    println!(
        "{} {}{deg}  {}  體感 {}{deg}  濕度 {}%",
        now.icon.glyph(),
        now.temp,
        condition(now),
        now.feels_like,
        now.humidity,
    );
    println!();

    for item in &view.info {
        if item.note.is_empty() {
            println!("  {}  {}", item.title, item.value);
        } else {
            println!("  {}  {}  ({})", item.title, item.value, item.note);
        }
    }
    println!();

    for row in &view.hours {
        let marker = if row.is_now { ">" } else { " " };
        println!(
            "{marker} {:<5} {} {:>3}{deg}  降雨 {:>3}%",
            row.label,
            row.hour.icon.glyph(),
            row.hour.temp,
            row.hour.precip_prob,
        );
    }
    println!();

    for row in &view.days {
        println!(
            "{:<4} {:>5}  {} {:>3}{deg} / {:>3}{deg}  降雨 {:>3}%",
            row.label,
            row.month_day,
            row.day.icon.glyph(),
            row.day.temp_min,
            row.day.temp_max,
            row.day.precip_prob,
        );
    }
}

pub fn hourly(view: &HourlyView, units: UnitGroup) {
    let deg = units.temperature_suffix();

    println!("{}  {} {}", view.county.name, view.label, view.month_day);
    for row in &view.rows {
        let marker = if row.is_now { ">" } else { " " };
        let h = &row.hour;
        println!(
            "{marker} {:<5} {} {:>3}{deg} 體感 {:>3}{deg}  濕度 {:>3}%  露點 {:>3}{deg}  降雨 {:>3}%  風 {:>5.1} ({:>3}°)  氣壓 {:>6.1}  雲量 {:>3}%  能見度 {:>4.1}  UV {:>2}  {}",
            row.label,
            h.icon.glyph(),
            h.temp,
            h.feels_like,
            h.humidity,
            h.dew,
            h.precip_prob,
            h.wind_speed,
            h.wind_dir,
            h.pressure,
            h.cloud_cover,
            h.visibility,
            h.uv_index,
            condition(h),
        );
    }
}

pub fn weekly(view: &WeeklyView, units: UnitGroup) {
    let deg = units.temperature_suffix();

    println!("{}", view.county.name);
    for row in &view.rows {
        let d: &Day = &row.day;
        println!();
        println!("{} {}  {} {}", row.label, row.month_day, d.icon.glyph(), d.icon.description());
        println!("  溫度 {}{deg} ~ {}{deg}  體感 {}{deg}", d.temp_min, d.temp_max, d.feels_like);
        println!("  濕度 {}%  露點 {}{deg}  降雨機率 {}%", d.humidity, d.dew, d.precip_prob);
        println!("  風速 {:.1} ({}°)  氣壓 {:.1}  雲量 {}%", d.wind_speed, d.wind_dir, d.pressure, d.cloud_cover);
        println!("  能見度 {:.1}  紫外線 {}  日出 {}  日落 {}", d.visibility, d.uv_index, d.sunrise, d.sunset);
        if !d.description.is_empty() {
            println!("  {}", d.description);
        }
    }
}

/// API text when present, otherwise the icon's own description.
fn condition(hour: &Hour) -> &str {
    if hour.conditions.is_empty() {
        hour.icon.description()
    } else {
        &hour.conditions
    }
}
