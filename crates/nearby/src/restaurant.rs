use crate::cuisine::{self, Cuisine};
use crate::geo::{self, Coordinate};
use crate::place::{PlaceId, PlaceRecord};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use strum::EnumString;

pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString,
)]
pub enum PriceLevel {
    #[serde(rename = "PRICE_LEVEL_INEXPENSIVE")]
    #[strum(serialize = "PRICE_LEVEL_INEXPENSIVE")]
    Inexpensive,
    #[serde(rename = "PRICE_LEVEL_MODERATE")]
    #[strum(serialize = "PRICE_LEVEL_MODERATE")]
    Moderate,
    #[serde(rename = "PRICE_LEVEL_EXPENSIVE")]
    #[strum(serialize = "PRICE_LEVEL_EXPENSIVE")]
    Expensive,
    #[serde(rename = "PRICE_LEVEL_VERY_EXPENSIVE")]
    #[strum(serialize = "PRICE_LEVEL_VERY_EXPENSIVE")]
    VeryExpensive,
}

impl PriceLevel {
    /// `PRICE_LEVEL_FREE`, `PRICE_LEVEL_UNSPECIFIED` and anything unknown map to `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inexpensive => "$",
            Self::Moderate => "$$",
            Self::Expensive => "$$$",
            Self::VeryExpensive => "$$$$",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: PlaceId,
    pub name: String,
    pub cuisine: Cuisine,
    pub types: Vec<String>,
    pub location: Coordinate,
    pub rating: Option<f64>,
    pub price_level: Option<PriceLevel>,
    pub open_now: Option<bool>,
    pub today_hours: Option<String>,
    pub distance_miles: f64,
}

impl Restaurant {
    pub fn from_place(place: PlaceRecord, origin: Coordinate, today: Weekday) -> Self {
        let (open_now, today_hours) = place
            .current_opening_hours
            .map(|hours| {
                let today_hours =
                    geo::today_hours(&hours.weekday_descriptions, today).map(str::to_string);
                (hours.open_now, today_hours)
            })
            .unwrap_or_default();

        Self {
            cuisine: cuisine::classify_cuisine(&place.types),
            distance_miles: geo::round_to_tenth(geo::haversine_miles(origin, place.location)),
            price_level: place.price_level.as_deref().and_then(PriceLevel::from_wire),
            id: place.id,
            name: place.display_name.text,
            types: place.types,
            location: place.location,
            rating: place.rating,
            open_now,
            today_hours,
        }
    }

    pub fn directions_url(&self) -> String {
        format!(
            "{}&query={},{}&query_place_id={}",
            MAPS_SEARCH_URL, self.location.latitude, self.location.longitude, self.id
        )
    }
}

/// Turns raw place records into restaurants, keeping API order and dropping places that
/// closed permanently. Distance is not re-checked against the search radius.
pub fn normalize(places: Vec<PlaceRecord>, origin: Coordinate, today: Weekday) -> Vec<Restaurant> {
    places
        .into_iter()
        .filter(|p| !p.is_permanently_closed())
        .map(|p| Restaurant::from_place(p, origin, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::SearchNearbyResponse;
    use serde_json::json;

    const ORIGIN: Coordinate = Coordinate {
        latitude: 40.7128,
        longitude: -74.0060,
    };

    fn places(value: serde_json::Value) -> Vec<PlaceRecord> {
        serde_json::from_value::<SearchNearbyResponse>(value)
            .unwrap()
            .places
    }

    fn fixture() -> Vec<PlaceRecord> {
        places(json!({
            "places": [
                {
                    "id": "p1",
                    "displayName": { "text": "Slice House" },
                    "types": ["pizza_restaurant", "restaurant"],
                    "location": { "latitude": 40.7128, "longitude": -74.0060 },
                    "rating": 4.5,
                    "priceLevel": "PRICE_LEVEL_MODERATE",
                    "currentOpeningHours": {
                        "openNow": true,
                        "weekdayDescriptions": ["Monday: 10 AM – 10 PM", "Tuesday: Closed"]
                    },
                    "businessStatus": "OPERATIONAL"
                },
                {
                    "id": "p2",
                    "displayName": { "text": "Gone Forever" },
                    "types": ["thai_restaurant"],
                    "location": { "latitude": 40.72, "longitude": -74.0 },
                    "rating": 5.0,
                    "businessStatus": "CLOSED_PERMANENTLY"
                },
                {
                    "id": "p3",
                    "displayName": { "text": "Noodle Bar" },
                    "types": ["restaurant", "thai_restaurant"],
                    "location": { "latitude": 40.7306, "longitude": -73.9352 },
                    "priceLevel": "PRICE_LEVEL_FREE"
                }
            ]
        }))
    }

    #[test]
    fn test_normalize_preserves_order_and_drops_closed() {
        let restaurants = normalize(fixture(), ORIGIN, Weekday::Mon);
        let ids: Vec<&str> = restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_normalize_fields() {
        let restaurants = normalize(fixture(), ORIGIN, Weekday::Tue);

        let first = &restaurants[0];
        assert_eq!(first.name, "Slice House");
        assert_eq!(first.cuisine, Cuisine::Pizza);
        assert_eq!(first.rating, Some(4.5));
        assert_eq!(first.price_level, Some(PriceLevel::Moderate));
        assert_eq!(first.open_now, Some(true));
        assert_eq!(first.today_hours.as_deref(), Some("Tuesday: Closed"));
        assert_eq!(first.distance_miles, 0.0);

        let second = &restaurants[1];
        assert_eq!(second.cuisine, Cuisine::Thai);
        assert_eq!(second.price_level, None);
        assert_eq!(second.open_now, None);
        assert_eq!(second.today_hours, None);
        assert!(second.distance_miles > 3.0 && second.distance_miles < 4.0);
        assert_eq!(second.distance_miles, geo::round_to_tenth(second.distance_miles));
    }

    #[test]
    fn test_closed_permanently_never_survives() {
        let closed = places(json!({
            "places": [{
                "id": "x",
                "displayName": { "text": "Top Rated" },
                "types": ["pizza_restaurant"],
                "location": { "latitude": 40.7128, "longitude": -74.0060 },
                "rating": 5.0,
                "currentOpeningHours": { "openNow": true },
                "businessStatus": "CLOSED_PERMANENTLY"
            }]
        }));
        assert!(normalize(closed, ORIGIN, Weekday::Mon).is_empty());
    }

    #[test]
    fn test_price_level_from_wire() {
        assert_eq!(
            PriceLevel::from_wire("PRICE_LEVEL_VERY_EXPENSIVE"),
            Some(PriceLevel::VeryExpensive)
        );
        assert_eq!(PriceLevel::from_wire("PRICE_LEVEL_UNSPECIFIED"), None);
        assert_eq!(PriceLevel::VeryExpensive.symbol(), "$$$$");
    }

    #[test]
    fn test_directions_url() {
        let restaurant = normalize(fixture(), ORIGIN, Weekday::Mon).remove(0);
        assert_eq!(
            restaurant.directions_url(),
            "https://www.google.com/maps/search/?api=1&query=40.7128,-74.006&query_place_id=p1"
        );
    }
}
