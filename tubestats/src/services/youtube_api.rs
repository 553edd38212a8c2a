use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::{ApiConfig, API_PAGE_LIMIT};
use crate::error::{Result, StatsError};
use crate::models::{ApiErrorPayload, SearchResponse};
use crate::services::traits::{ChannelStatsFetcher, Searcher, VideoStatsFetcher};

/// Thin client over the YouTube Data API v3 `search`, `videos` and `channels` resources.
pub struct YouTubeClient {
    client: Client,
    config: ApiConfig,
}

impl YouTubeClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(YouTubeClient { client, config })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut host = self.config.api_host.clone();
        if !host.ends_with('/') {
            host.push('/');
        }

        let mut url = Url::parse(&host)?.join(resource)?;
        url.query_pairs_mut()
            .append_pair("key", &self.config.api_key)
            .extend_pairs(params);
        Ok(url)
    }

    // Documentation: https://developers.google.com/youtube/v3/docs/search/list
    fn search_url(&self, term: &str) -> Result<Url> {
        let max_results = self.config.max_results.to_string();
        self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("order", self.config.search_order.as_str()),
                ("type", "video"),
                ("relevanceLanguage", self.config.relevance_language.as_str()),
                ("q", term),
            ],
        )
    }

    fn batch_urls(&self, resource: &str, part: &str, ids: &[String]) -> Result<Vec<Url>> {
        ids.chunks(API_PAGE_LIMIT as usize)
            .map(|chunk| {
                let ids = chunk.join(",");
                self.endpoint(resource, &[("part", part), ("id", ids.as_str())])
            })
            .collect()
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let body = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_batch(&self, resource: &str, part: &str, ids: &[String]) -> Result<Vec<Value>> {
        let mut items = Vec::new();

        for url in self.batch_urls(resource, part, ids)? {
            let response = self.get_json(url).await?;
            items.extend(batch_items(&response)?);
        }

        debug!(
            "Fetched {} {} resources for {} ids",
            items.len(),
            resource,
            ids.len()
        );
        Ok(items)
    }
}

/// Resources of one `videos`/`channels` response. An embedded `error` payload fails the whole batch.
fn batch_items(response: &Value) -> Result<Vec<Value>> {
    if let Some(error) = ApiErrorPayload::detect(response) {
        return Err(StatsError::Api {
            code: error.code,
            message: error.message,
        });
    }
    Ok(response["items"].as_array().cloned().unwrap_or_default())
}

#[async_trait]
impl Searcher for YouTubeClient {
    async fn search(&self, term: &str) -> Result<SearchResponse> {
        info!("Searching YouTube for: {term}");
        let response = self.get_json(self.search_url(term)?).await?;
        Ok(SearchResponse::from_json(&response))
    }
}

// Documentation: https://developers.google.com/youtube/v3/docs/videos/list
#[async_trait]
impl VideoStatsFetcher for YouTubeClient {
    async fn fetch_video_stats(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.fetch_batch("videos", "statistics,contentDetails", ids).await
    }
}

// Documentation: https://developers.google.com/youtube/v3/docs/channels/list
#[async_trait]
impl ChannelStatsFetcher for YouTubeClient {
    async fn fetch_channel_stats(&self, ids: &[String]) -> Result<Vec<Value>> {
        self.fetch_batch("channels", "statistics", ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn query_of(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn search_url_carries_all_parameters() {
        let client = YouTubeClient::new(ApiConfig::new("secret")).unwrap();
        let url = client.search_url("funny cats & dogs").unwrap();

        assert_eq!(url.path(), "/youtube/v3/search");
        let query = query_of(&url);
        assert_eq!(query["key"], "secret");
        assert_eq!(query["part"], "snippet");
        assert_eq!(query["maxResults"], "50");
        assert_eq!(query["order"], "viewCount");
        assert_eq!(query["type"], "video");
        assert_eq!(query["relevanceLanguage"], "en");
        assert_eq!(query["q"], "funny cats & dogs");
    }

    #[test]
    fn host_without_trailing_slash_keeps_its_path() {
        let mut config = ApiConfig::new("k");
        config.api_host = "http://localhost:9000/youtube/v3".to_string();
        let client = YouTubeClient::new(config).unwrap();

        let url = client.search_url("x").unwrap();
        assert_eq!(
            url.as_str().split('?').next(),
            Some("http://localhost:9000/youtube/v3/search")
        );
    }

    #[test]
    fn invalid_host_is_reported() {
        let mut config = ApiConfig::new("k");
        config.api_host = "not a url".to_string();
        let client = YouTubeClient::new(config).unwrap();

        assert!(matches!(client.search_url("x"), Err(StatsError::Url(_))));
    }

    #[test]
    fn batch_ids_are_split_at_the_api_limit() {
        let client = YouTubeClient::new(ApiConfig::new("k")).unwrap();
        let ids: Vec<String> = (0..120).map(|i| format!("v{i}")).collect();

        let urls = client
            .batch_urls("videos", "statistics,contentDetails", &ids)
            .unwrap();
        assert_eq!(urls.len(), 3);

        let first = query_of(&urls[0]);
        assert_eq!(first["part"], "statistics,contentDetails");
        assert_eq!(first["id"].split(',').count(), 50);
        assert!(first["id"].starts_with("v0,v1,"));
        assert_eq!(query_of(&urls[2])["id"].split(',').count(), 20);
    }

    #[test]
    fn batch_items_returns_the_items_array() {
        let items = batch_items(&json!({
            "kind": "youtube#videoListResponse",
            "items": [{ "id": "v1" }, { "id": "v2" }]
        }))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["id"], "v2");

        let items = batch_items(&json!({ "error": null, "items": [{ "id": "c1" }] })).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn batch_without_items_is_empty() {
        assert!(batch_items(&json!({ "kind": "youtube#channelListResponse" }))
            .unwrap()
            .is_empty());
        assert!(batch_items(&json!({ "items": "nope" })).unwrap().is_empty());
    }

    #[test]
    fn batch_error_payload_fails_the_batch() {
        let result = batch_items(&json!({
            "error": { "code": 403, "message": "quotaExceeded" },
            "items": [{ "id": "v1" }]
        }));
        match result {
            Err(StatsError::Api { code, message }) => {
                assert_eq!(code, 403);
                assert_eq!(message, "quotaExceeded");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    /// Answers one request per body, in order, then stops accepting.
    async fn serve_bodies(bodies: Vec<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for body in bodies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = vec![0u8; 16 * 1024];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut request[read..]).await.unwrap();
                    read += n;
                    if n == 0 || request[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}/youtube/v3/")
    }

    fn local_client(api_host: String) -> YouTubeClient {
        let mut config = ApiConfig::new("k");
        config.api_host = api_host;
        YouTubeClient {
            client: Client::builder().no_proxy().build().unwrap(),
            config,
        }
    }

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("v{i}")).collect()
    }

    #[tokio::test]
    async fn chunked_batches_are_concatenated() {
        let host = serve_bodies(vec![
            r#"{"items":[{"id":"v0"}]}"#,
            r#"{"items":[{"id":"v50"},{"id":"v51"}]}"#,
        ])
        .await;
        let client = local_client(host);

        let items = client.fetch_video_stats(&ids(60)).await.unwrap();

        let ids: Vec<&str> = items.iter().filter_map(|v| v["id"].as_str()).collect();
        assert_eq!(ids, vec!["v0", "v50", "v51"]);
    }

    #[tokio::test]
    async fn error_body_in_a_later_chunk_fails_the_fetch() {
        let host = serve_bodies(vec![
            r#"{"items":[{"id":"v0"}]}"#,
            r#"{"error":{"code":403,"message":"quotaExceeded"}}"#,
        ])
        .await;
        let client = local_client(host);

        let result = client.fetch_video_stats(&ids(60)).await;

        assert!(matches!(result, Err(StatsError::Api { code: 403, .. })));
    }

    #[tokio::test]
    async fn channel_error_body_is_an_api_error() {
        let host = serve_bodies(vec![r#"{"error":{"code":400,"message":"keyInvalid"}}"#]).await;
        let client = local_client(host);

        let result = client.fetch_channel_stats(&["c1".to_string()]).await;

        assert!(matches!(result, Err(StatsError::Api { code: 400, .. })));
    }
}
