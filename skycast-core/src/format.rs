//! Display formatting for the fields of a [`WeatherRecord`](crate::model::WeatherRecord).
//!
//! All functions are pure string builders; the view layer decides where they
//! end up.

use chrono::{DateTime, Utc};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Wind speed plus an 8-point compass direction, e.g. `"3.5 m/s NE"`.
pub fn format_wind(speed_mps: f64, direction_deg: u16) -> String {
    let idx = ((f64::from(direction_deg) / 45.0).round() as usize) % COMPASS.len();
    format!("{speed_mps:.1} m/s {}", COMPASS[idx])
}

pub fn format_humidity(humidity_pct: u8) -> String {
    format!("{humidity_pct}%")
}

pub fn format_pressure(pressure_hpa: u32) -> String {
    format!("{pressure_hpa} hPa")
}

/// Kilometers with one decimal from 1 km up, plain meters below that.
pub fn format_visibility(visibility_meters: u32) -> String {
    if visibility_meters >= 1000 {
        format!("{:.1} km", f64::from(visibility_meters) / 1000.0)
    } else {
        format!("{visibility_meters} m")
    }
}

/// Rounded Celsius, e.g. `"21°C"`.
pub fn format_temperature(temperature_c: f64) -> String {
    format!("{}°C", temperature_c.round() as i64)
}

/// Uppercase the first letter of each space-separated word, lowercase the rest.
pub fn capitalize_words(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Weekday name of an observation time, e.g. `"Monday"`.
pub fn day_name(at: DateTime<Utc>) -> String {
    at.format("%A").to_string()
}

/// 24-hour clock time of an observation, e.g. `"14:05"`.
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}
