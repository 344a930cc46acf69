pub mod api;
pub mod config;
pub mod utils;
pub mod wizard;
