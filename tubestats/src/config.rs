use env_logger::Builder;
use log::{info, LevelFilter};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "https://www.googleapis.com/youtube/v3/";
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
pub const SEARCH_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Upper bound the Data API accepts for both `maxResults` and the `id` list of a batch call.
pub const API_PAGE_LIMIT: u32 = 50;

/// Settings handed to the YouTube client at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_key: String,
    pub max_results: u32,
    pub search_order: String,
    pub relevance_language: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ApiConfig {
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: api_key.into(),
            max_results: API_PAGE_LIMIT,
            search_order: "viewCount".to_string(),
            relevance_language: "en".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Reads overrides from the environment, keeping the defaults for anything unset or unparseable.
    pub fn from_env(api_key: impl Into<String>) -> Self {
        Self::from_lookup(api_key, |name| env::var(name).ok())
    }

    fn from_lookup(api_key: impl Into<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new(api_key);

        let max_results = lookup("YOUTUBE_MAX_RESULTS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_results);
        let timeout = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        ApiConfig {
            api_host: lookup("YOUTUBE_API_HOST").unwrap_or(defaults.api_host),
            search_order: lookup("YOUTUBE_SEARCH_ORDER").unwrap_or(defaults.search_order),
            relevance_language: lookup("YOUTUBE_RELEVANCE_LANGUAGE")
                .unwrap_or(defaults.relevance_language),
            timeout,
            api_key: defaults.api_key,
            max_results: 0,
        }
        .with_max_results(max_results)
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, API_PAGE_LIMIT);
        self
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting tubestats...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}
