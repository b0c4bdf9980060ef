// Thumbgate resizing static-image gateway library

pub mod cache;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod logging;
pub mod params;
pub mod resolve;
pub mod transform;
