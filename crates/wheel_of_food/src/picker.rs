//! Decides what goes on the wheel and how results are presented.

use crate::prefs::UserPreferences;
use nearby::{Cuisine, PlaceId, Restaurant};
use std::fmt;

pub const MAX_WHEEL_SLICES: usize = 20;

/// Restaurants eligible for the wheel, in fetch order: not excluded, cuisine enabled, not
/// known to be closed, capped at [`MAX_WHEEL_SLICES`].
///
/// Distance is not re-checked; the search radius already bounds the results.
pub fn wheel_restaurants(restaurants: &[Restaurant], prefs: &UserPreferences) -> Vec<Restaurant> {
    restaurants
        .iter()
        .filter(|r| !prefs.is_excluded(&r.id))
        .filter(|r| prefs.cuisine_enabled(r.cuisine))
        .filter(|r| r.open_now != Some(false))
        .take(MAX_WHEEL_SLICES)
        .cloned()
        .collect()
}

/// Distinct cuisines among `restaurants`, sorted by name.
pub fn available_cuisines(restaurants: &[Restaurant]) -> Vec<Cuisine> {
    let mut cuisines: Vec<Cuisine> = Vec::new();
    for r in restaurants {
        if !cuisines.contains(&r.cuisine) {
            cuisines.push(r.cuisine);
        }
    }
    cuisines.sort_by_key(|c| c.to_string());
    cuisines
}

pub fn excluded_names(restaurants: &[Restaurant], prefs: &UserPreferences) -> Vec<(PlaceId, String)> {
    restaurants
        .iter()
        .filter(|r| prefs.is_excluded(&r.id))
        .map(|r| (r.id.clone(), r.name.clone()))
        .collect()
}

pub fn open_status(open_now: Option<bool>) -> Option<&'static str> {
    open_now.map(|open| if open { "Open Now" } else { "Closed" })
}

pub fn stars(rating: f64) -> String {
    "★".repeat(rating.round().clamp(0.0, 5.0) as usize)
}

/// The winning restaurant as shown to the user.
pub struct ResultCard<'a> {
    restaurant: &'a Restaurant,
}

impl<'a> ResultCard<'a> {
    pub fn new(restaurant: &'a Restaurant) -> Self {
        Self { restaurant }
    }
}

impl fmt::Display for ResultCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.restaurant;
        writeln!(f, "{}", r.name)?;
        writeln!(f, "{}", r.cuisine.label())?;

        let mut details = Vec::new();
        if let Some(rating) = r.rating {
            details.push(format!("{} {}", stars(rating), rating));
        }
        if let Some(price) = r.price_level {
            details.push(price.symbol().to_string());
        }
        details.push(format!("{} mi", r.distance_miles));
        writeln!(f, "{}", details.join("  "))?;

        let status: Vec<&str> = open_status(r.open_now)
            .into_iter()
            .chain(r.today_hours.as_deref())
            .collect();
        if !status.is_empty() {
            writeln!(f, "{}", status.join("  "))?;
        }

        write!(f, "Directions: {}", r.directions_url())
    }
}
