pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{Result, StatsError};
pub use models::{OutputRecord, SearchItem, SearchResponse};
