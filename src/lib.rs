pub mod anilist;
pub mod app;
pub mod config;
pub mod format;
pub mod pacing;
pub mod render;
pub mod schedule;
