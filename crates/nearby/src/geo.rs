use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;
pub const MILES_TO_METERS: f64 = 1609.34;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates, in miles.
pub fn haversine_miles(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_MILES * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Round half-up to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * MILES_TO_METERS
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Picks the entry of a weekly schedule that starts with the English name of `day`.
///
/// Schedules described in another language never match and yield `None`.
pub fn today_hours(descriptions: &[String], day: Weekday) -> Option<&str> {
    let name = weekday_name(day);
    descriptions
        .iter()
        .find(|d| d.starts_with(name))
        .map(String::as_str)
}
