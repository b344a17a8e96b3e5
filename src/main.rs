
pub mod config;
pub mod coplay_core;
pub mod sqlite_pragma;
