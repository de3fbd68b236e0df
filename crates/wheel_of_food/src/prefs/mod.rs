pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{PreferenceError, PreferenceStore, PreferencesUpdate, UserPreferences};

pub const STORAGE_KEY: &str = "wheelOfFood";
pub const DEFAULT_RADIUS_MILES: f64 = 5.0;
pub const MIN_RADIUS_MILES: f64 = 1.0;
pub const MAX_RADIUS_MILES: f64 = 10.0;
