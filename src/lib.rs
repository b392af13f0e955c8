pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod internal;
pub mod logging;
pub mod utils;
