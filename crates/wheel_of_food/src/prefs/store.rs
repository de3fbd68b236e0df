use super::storage::Storage;
use super::{DEFAULT_RADIUS_MILES, MAX_RADIUS_MILES, MIN_RADIUS_MILES, STORAGE_KEY};
use nearby::{Cuisine, PlaceId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{DefaultOnError, VecSkipError, serde_as};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub excluded_place_ids: Vec<PlaceId>,
    pub radius: f64,
    /// Empty means every cuisine is enabled.
    pub enabled_cuisines: Vec<Cuisine>,
    pub sound_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            excluded_place_ids: Vec::new(),
            radius: DEFAULT_RADIUS_MILES,
            enabled_cuisines: Vec::new(),
            sound_enabled: true,
        }
    }
}

impl UserPreferences {
    pub fn cuisine_enabled(&self, cuisine: Cuisine) -> bool {
        self.enabled_cuisines.is_empty() || self.enabled_cuisines.contains(&cuisine)
    }

    pub fn is_excluded(&self, id: &PlaceId) -> bool {
        self.excluded_place_ids.contains(id)
    }

    fn clamped(mut self) -> Self {
        self.radius = clamp_radius(self.radius);
        self
    }
}

pub fn clamp_radius(radius: f64) -> f64 {
    if radius.is_finite() {
        radius.clamp(MIN_RADIUS_MILES, MAX_RADIUS_MILES)
    } else {
        DEFAULT_RADIUS_MILES
    }
}

/// A shallow patch: every `Some` field replaces the stored one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub excluded_place_ids: Option<Vec<PlaceId>>,
    pub radius: Option<f64>,
    pub enabled_cuisines: Option<Vec<Cuisine>>,
    pub sound_enabled: Option<bool>,
}

impl PreferencesUpdate {
    pub fn radius(radius: f64) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    pub fn excluded_place_ids(ids: Vec<PlaceId>) -> Self {
        Self {
            excluded_place_ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn enabled_cuisines(cuisines: Vec<Cuisine>) -> Self {
        Self {
            enabled_cuisines: Some(cuisines),
            ..Self::default()
        }
    }

    pub fn sound_enabled(enabled: bool) -> Self {
        Self {
            sound_enabled: Some(enabled),
            ..Self::default()
        }
    }

    fn apply(self, mut prefs: UserPreferences) -> UserPreferences {
        if let Some(ids) = self.excluded_place_ids {
            prefs.excluded_place_ids = ids;
        }
        if let Some(radius) = self.radius {
            prefs.radius = radius;
        }
        if let Some(cuisines) = self.enabled_cuisines {
            prefs.enabled_cuisines = cuisines;
        }
        if let Some(sound) = self.sound_enabled {
            prefs.sound_enabled = sound;
        }
        prefs.clamped()
    }
}

/// The record as read back from storage. Fields are decoded independently: a value of the
/// wrong type is dropped on its own, as is an unknown entry inside a list.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredPreferences {
    #[serde_as(deserialize_as = "DefaultOnError<Option<VecSkipError<_>>>")]
    excluded_place_ids: Option<Vec<PlaceId>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    radius: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError<Option<VecSkipError<_>>>")]
    enabled_cuisines: Option<Vec<Cuisine>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    sound_enabled: Option<bool>,
}

impl From<StoredPreferences> for PreferencesUpdate {
    fn from(stored: StoredPreferences) -> Self {
        Self {
            excluded_place_ids: stored.excluded_place_ids,
            radius: stored.radius,
            enabled_cuisines: stored.enabled_cuisines,
            sound_enabled: stored.sound_enabled,
        }
    }
}

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to persist preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// User preferences backed by a single key in `S`.
///
/// Reads never fail: anything missing or unreadable falls back to the defaults.
/// Every update rewrites the whole record under [`STORAGE_KEY`].
pub struct PreferenceStore<S: Storage> {
    storage: S,
    current: RwLock<UserPreferences>,
}

impl<S: Storage> PreferenceStore<S> {
    pub fn load(storage: S) -> Self {
        let current = read_stored(&storage);
        Self {
            storage,
            current: RwLock::new(current),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn snapshot(&self) -> UserPreferences {
        self.current.read().clone()
    }

    /// Re-reads the stored record, discarding in-memory state.
    pub fn reload(&self) -> UserPreferences {
        let fresh = read_stored(&self.storage);
        *self.current.write() = fresh.clone();
        fresh
    }

    pub fn update(&self, update: PreferencesUpdate) -> Result<UserPreferences, PreferenceError> {
        let mut current = self.current.write();
        let next = update.apply(current.clone());
        self.storage
            .set(STORAGE_KEY, &serde_json::to_string(&next)?)?;
        *current = next.clone();
        Ok(next)
    }

    pub fn clear(&self) -> Result<(), PreferenceError> {
        let mut current = self.current.write();
        self.storage.remove(STORAGE_KEY)?;
        *current = UserPreferences::default();
        log::info!("Preferences cleared");
        Ok(())
    }

    pub fn set_radius(&self, radius: f64) -> Result<UserPreferences, PreferenceError> {
        self.update(PreferencesUpdate::radius(radius))
    }

    pub fn toggle_sound(&self) -> Result<UserPreferences, PreferenceError> {
        let enabled = self.current.read().sound_enabled;
        self.update(PreferencesUpdate::sound_enabled(!enabled))
    }

    pub fn toggle_cuisine(&self, cuisine: Cuisine) -> Result<UserPreferences, PreferenceError> {
        let mut cuisines = self.current.read().enabled_cuisines.clone();
        match cuisines.iter().position(|c| *c == cuisine) {
            Some(i) => {
                cuisines.remove(i);
            }
            None => cuisines.push(cuisine),
        }
        self.update(PreferencesUpdate::enabled_cuisines(cuisines))
    }

    pub fn toggle_exclusion(&self, id: &PlaceId) -> Result<UserPreferences, PreferenceError> {
        let mut ids = self.current.read().excluded_place_ids.clone();
        match ids.iter().position(|x| x == id) {
            Some(i) => {
                ids.remove(i);
            }
            None => ids.push(id.clone()),
        }
        self.update(PreferencesUpdate::excluded_place_ids(ids))
    }

    /// Appends `id` to the exclusion list unless it is already there.
    pub fn exclude(&self, id: &PlaceId) -> Result<UserPreferences, PreferenceError> {
        if self.current.read().is_excluded(id) {
            return Ok(self.snapshot());
        }
        self.toggle_exclusion(id)
    }
}

fn read_stored<S: Storage>(storage: &S) -> UserPreferences {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return UserPreferences::default(),
        Err(e) => {
            log::warn!("Failed to read stored preferences, using defaults: {}", e);
            return UserPreferences::default();
        }
    };

    let stored = serde_json::from_str::<Map<String, Value>>(&raw)
        .and_then(|map| serde_json::from_value::<StoredPreferences>(Value::Object(map)));
    match stored {
        Ok(stored) => PreferencesUpdate::from(stored).apply(UserPreferences::default()),
        Err(e) => {
            log::warn!("Ignoring malformed stored preferences: {}", e);
            UserPreferences::default()
        }
    }
}
