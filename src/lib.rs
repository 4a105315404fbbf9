pub mod api;
pub mod config;
pub mod error;
pub mod inbox;
pub mod logging;
pub mod model;
