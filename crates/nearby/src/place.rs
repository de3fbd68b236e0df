use crate::geo::{self, Coordinate};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

pub const INCLUDED_TYPE: &str = "restaurant";
pub const MAX_RESULT_COUNT: u32 = 20;

pub const FIELD_MASK: &str = "places.id,places.displayName,places.types,places.location,\
places.rating,places.priceLevel,places.currentOpeningHours,places.businessStatus";

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct PlaceId(String);

crate::impl_string_newtype!(PlaceId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub included_types: Vec<String>,
    pub max_result_count: u32,
    pub location_restriction: LocationRestriction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Coordinate,
    /// Meters.
    pub radius: f64,
}

impl SearchNearbyRequest {
    pub fn restaurants(origin: Coordinate, radius_miles: f64) -> Self {
        Self {
            included_types: vec![INCLUDED_TYPE.to_string()],
            max_result_count: MAX_RESULT_COUNT,
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: origin,
                    radius: geo::miles_to_meters(radius_miles),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub id: PlaceId,
    pub display_name: LocalizedText,
    #[serde(default)]
    pub types: Vec<String>,
    pub location: Coordinate,
    pub rating: Option<f64>,
    pub price_level: Option<String>,
    pub current_opening_hours: Option<OpeningHours>,
    pub business_status: Option<BusinessStatus>,
}

impl PlaceRecord {
    pub fn is_permanently_closed(&self) -> bool {
        self.business_status == Some(BusinessStatus::ClosedPermanently)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedText {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    Operational,
    ClosedTemporarily,
    ClosedPermanently,
    #[serde(other)]
    Unspecified,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = SearchNearbyRequest::restaurants(Coordinate::new(40.0, -74.0), 10.0);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["includedTypes"], json!(["restaurant"]));
        assert_eq!(value["maxResultCount"], json!(20));
        assert_eq!(
            value["locationRestriction"]["circle"]["center"],
            json!({ "latitude": 40.0, "longitude": -74.0 })
        );
        let radius = value["locationRestriction"]["circle"]["radius"]
            .as_f64()
            .unwrap();
        assert!((radius - 16093.4).abs() < 1e-6);
    }

    #[test]
    fn test_response_defaults() {
        let empty: SearchNearbyResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.places.is_empty());

        let sparse: SearchNearbyResponse = serde_json::from_value(json!({
            "places": [{
                "id": "abc",
                "displayName": { "text": "Sparse" },
                "location": { "latitude": 1.0, "longitude": 2.0 },
                "businessStatus": "SOMETHING_NEW"
            }]
        }))
        .unwrap();
        let place = &sparse.places[0];
        assert!(place.types.is_empty());
        assert!(place.rating.is_none());
        assert_eq!(place.business_status, Some(BusinessStatus::Unspecified));
        assert!(!place.is_permanently_closed());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<SearchNearbyResponse, _> = serde_json::from_value(json!({
            "places": [{ "id": "abc", "location": { "latitude": 1.0, "longitude": 2.0 } }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_field_mask() {
        assert_eq!(FIELD_MASK.split(',').count(), 8);
        assert!(FIELD_MASK.split(',').all(|f| f.starts_with("places.")));
    }
}
