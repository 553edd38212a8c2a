use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::HashSet;

use crate::config::SEARCH_DATE_FORMAT;
use crate::error::{Result, StatsError};
use crate::models::{OutputRecord, SearchResponse};
use crate::services::assembler::assemble_record;
use crate::services::result_index::ResultIndex;
use crate::services::traits::{ChannelStatsFetcher, Clock, Searcher, VideoStatsFetcher};

/// Distinct, non-empty ids in first-seen order.
fn distinct_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| !id.is_empty() && seen.insert(*id))
        .map(String::from)
        .collect()
}

pub struct RecordSetBuilder<'a> {
    videos: &'a dyn VideoStatsFetcher,
    channels: &'a dyn ChannelStatsFetcher,
    clock: &'a dyn Clock,
}

impl<'a> RecordSetBuilder<'a> {
    pub fn new(
        videos: &'a dyn VideoStatsFetcher,
        channels: &'a dyn ChannelStatsFetcher,
        clock: &'a dyn Clock,
    ) -> Self {
        RecordSetBuilder {
            videos,
            channels,
            clock,
        }
    }

    /// Runs the search and builds the records for it. Transport and API errors of the
    /// search itself are returned; nothing after it can fail the run.
    pub async fn search_and_build(
        &self,
        searcher: &dyn Searcher,
        search_term: &str,
    ) -> Result<Vec<OutputRecord>> {
        let response = searcher.search(search_term).await.map_err(|e| {
            error!("Search for '{search_term}' failed: {e}");
            e
        })?;
        self.build_records(search_term, &response).await
    }

    /// Produces one record per search item, in search order.
    ///
    /// Each stats batch is fetched once with deduplicated ids. A batch that cannot be
    /// fetched leaves its columns at their defaults for every record.
    pub async fn build_records(
        &self,
        search_term: &str,
        response: &SearchResponse,
    ) -> Result<Vec<OutputRecord>> {
        if let Some(api_error) = &response.error {
            error!(
                "YouTube rejected the search for '{search_term}': {} {}",
                api_error.code, api_error.message
            );
            return Err(StatsError::Api {
                code: api_error.code,
                message: api_error.message.clone(),
            });
        }

        let search_date = self.clock.now().format(SEARCH_DATE_FORMAT).to_string();

        let video_ids = distinct_ids(response.items.iter().map(|item| item.video_id.as_str()));
        let channel_ids =
            distinct_ids(response.items.iter().map(|item| item.channel_id.as_str()));
        info!(
            "Search returned {} items ({} videos, {} channels)",
            response.items.len(),
            video_ids.len(),
            channel_ids.len()
        );

        let (video_batch, channel_batch) = tokio::join!(
            self.fetch_video_batch(&video_ids),
            self.fetch_channel_batch(&channel_ids)
        );

        let videos = ResultIndex::build(video_batch, &["id"]);
        let channels = ResultIndex::build(channel_batch, &["id"]);
        if videos.is_empty() && !video_ids.is_empty() {
            debug!("No video statistics available, every video column will use defaults");
        }
        if channels.is_empty() && !channel_ids.is_empty() {
            debug!("No channel statistics available, every channel column will use defaults");
        }
        info!(
            "Indexed statistics for {} of {} videos and {} of {} channels",
            videos.len(),
            video_ids.len(),
            channels.len(),
            channel_ids.len()
        );

        Ok(response
            .items
            .iter()
            .map(|item| assemble_record(item, &videos, &channels, search_term, &search_date))
            .collect())
    }

    async fn fetch_video_batch(&self, ids: &[String]) -> Vec<Value> {
        if ids.is_empty() {
            return Vec::new();
        }
        match self.videos.fetch_video_stats(ids).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Failed to fetch video statistics, using defaults: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_channel_batch(&self, ids: &[String]) -> Vec<Value> {
        if ids.is_empty() {
            return Vec::new();
        }
        match self.channels.fetch_channel_stats(ids).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Failed to fetch channel statistics, using defaults: {e}");
                Vec::new()
            }
        }
    }
}
