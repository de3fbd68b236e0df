use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    #[strum(to_string = "pizza")]
    Pizza,
    #[strum(to_string = "mexican")]
    Mexican,
    #[strum(to_string = "chinese")]
    Chinese,
    #[strum(to_string = "indian")]
    Indian,
    #[strum(to_string = "thai")]
    Thai,
    #[strum(to_string = "japanese")]
    Japanese,
    #[strum(to_string = "american")]
    American,
    #[strum(to_string = "italian")]
    Italian,
    #[strum(to_string = "fast_food", serialize = "Fast Food", serialize = "fastfood")]
    FastFood,
    #[strum(to_string = "seafood")]
    Seafood,
    #[strum(to_string = "mediterranean")]
    Mediterranean,
    #[strum(to_string = "korean")]
    Korean,
    #[strum(to_string = "vietnamese")]
    Vietnamese,
    #[strum(to_string = "other")]
    Other,
}

/// Upstream place type tags that imply a cuisine.
pub const PLACE_TYPE_CUISINES: &[(&str, Cuisine)] = &[
    ("pizza_restaurant", Cuisine::Pizza),
    ("mexican_restaurant", Cuisine::Mexican),
    ("chinese_restaurant", Cuisine::Chinese),
    ("indian_restaurant", Cuisine::Indian),
    ("thai_restaurant", Cuisine::Thai),
    ("japanese_restaurant", Cuisine::Japanese),
    ("american_restaurant", Cuisine::American),
    ("italian_restaurant", Cuisine::Italian),
    ("fast_food_restaurant", Cuisine::FastFood),
    ("seafood_restaurant", Cuisine::Seafood),
    ("mediterranean_restaurant", Cuisine::Mediterranean),
    ("korean_restaurant", Cuisine::Korean),
    ("vietnamese_restaurant", Cuisine::Vietnamese),
    ("hamburger_restaurant", Cuisine::American),
    ("sushi_restaurant", Cuisine::Japanese),
    ("ramen_restaurant", Cuisine::Japanese),
    ("taco_shop", Cuisine::Mexican),
    ("barbecue_restaurant", Cuisine::American),
];

impl Cuisine {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pizza => "Pizza",
            Self::Mexican => "Mexican",
            Self::Chinese => "Chinese",
            Self::Indian => "Indian",
            Self::Thai => "Thai",
            Self::Japanese => "Japanese",
            Self::American => "American",
            Self::Italian => "Italian",
            Self::FastFood => "Fast Food",
            Self::Seafood => "Seafood",
            Self::Mediterranean => "Mediterranean",
            Self::Korean => "Korean",
            Self::Vietnamese => "Vietnamese",
            Self::Other => "Other",
        }
    }

    pub fn from_place_type(tag: &str) -> Option<Self> {
        PLACE_TYPE_CUISINES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, c)| *c)
    }
}

/// The first tag (in the order the API returned them) that maps to a cuisine wins.
pub fn classify_cuisine<S: AsRef<str>>(tags: &[S]) -> Cuisine {
    tags.iter()
        .find_map(|t| Cuisine::from_place_type(t.as_ref()))
        .unwrap_or(Cuisine::Other)
}
