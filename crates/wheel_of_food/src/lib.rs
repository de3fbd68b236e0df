pub mod config;
pub mod events;
pub mod fetch;
pub mod picker;
pub mod prefs;
pub mod sys;
pub mod wheel;
