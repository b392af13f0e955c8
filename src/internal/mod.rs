pub mod cache;
pub mod launcher;
pub mod listing;
pub mod locator;
pub mod models;
pub mod preview;
pub mod render;
