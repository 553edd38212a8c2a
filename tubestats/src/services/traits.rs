// Collaborators the record pipeline depends on

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::Result;
use crate::models::SearchResponse;

/// Runs the keyword search that establishes which videos end up in the output.
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, term: &str) -> Result<SearchResponse>;
}

/// Fetches the `videos` resources (statistics and content details) for a set of ids.
///
/// Ids the platform does not know about are simply absent from the returned batch.
#[async_trait]
pub trait VideoStatsFetcher: Send + Sync {
    async fn fetch_video_stats(&self, ids: &[String]) -> Result<Vec<Value>>;
}

/// Fetches the `channels` resources (statistics) for a set of ids.
#[async_trait]
pub trait ChannelStatsFetcher: Send + Sync {
    async fn fetch_channel_stats(&self, ids: &[String]) -> Result<Vec<Value>>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
