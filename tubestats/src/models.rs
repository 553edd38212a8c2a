use crate::utils::get_or_default;
use serde::Serialize;
use serde_json::Value;

/// One video entry of a search response, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchItem {
    pub video_id: String,
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: String,
}

impl SearchItem {
    pub fn from_json(item: &Value) -> Self {
        SearchItem {
            video_id: get_or_default(item, &["id", "videoId"], ""),
            channel_id: get_or_default(item, &["snippet", "channelId"], ""),
            title: get_or_default(item, &["snippet", "title"], ""),
            description: get_or_default(item, &["snippet", "description"], ""),
            channel_title: get_or_default(item, &["snippet", "channelTitle"], ""),
            published_at: get_or_default(item, &["snippet", "publishedAt"], ""),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorPayload {
    pub code: i64,
    pub message: String,
}

impl ApiErrorPayload {
    /// Returns the embedded `error` object of a response, if any. A missing or null key means success.
    pub fn detect(response: &Value) -> Option<Self> {
        match response.get("error") {
            None | Some(Value::Null) => None,
            Some(error) => Some(ApiErrorPayload {
                code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: match error {
                    Value::String(message) => message.clone(),
                    _ => get_or_default(error, &["message"], "unknown error"),
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    pub error: Option<ApiErrorPayload>,
}

impl SearchResponse {
    pub fn from_json(response: &Value) -> Self {
        let items = response["items"]
            .as_array()
            .map(|items| items.iter().map(SearchItem::from_json).collect())
            .unwrap_or_default();

        SearchResponse {
            items,
            error: ApiErrorPayload::detect(response),
        }
    }
}

/// One flattened output row. Field order here is the column order of the output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub search_term: String,
    pub search_date: String,
    pub video_id: String,
    pub published_at: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub channel_title: String,
    pub channel_id: String,
    pub view_count: String,
    pub like_count: String,
    pub favorite_count: String,
    pub comment_count: String,
    pub duration: String,
    pub duration_time: String,
    pub definition: String,
    pub channel_views: String,
    pub channel_subscribers: String,
    pub channel_videos: String,
}

impl OutputRecord {
    pub const HEADER: [&'static str; 19] = [
        "searchTerm",
        "searchDate",
        "videoId",
        "publishedAt",
        "title",
        "description",
        "videoUrl",
        "channelTitle",
        "channelId",
        "viewCount",
        "likeCount",
        "favoriteCount",
        "commentCount",
        "duration",
        "durationTime",
        "definition",
        "channelViews",
        "channelSubscribers",
        "channelVideos",
    ];

    #[cfg(test)]
    pub fn video_stats(&self) -> [&str; 7] {
        [
            self.view_count.as_str(),
            self.like_count.as_str(),
            self.favorite_count.as_str(),
            self.comment_count.as_str(),
            self.duration.as_str(),
            self.duration_time.as_str(),
            self.definition.as_str(),
        ]
    }

    #[cfg(test)]
    pub fn channel_stats(&self) -> [&str; 3] {
        [
            self.channel_views.as_str(),
            self.channel_subscribers.as_str(),
            self.channel_videos.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_item_is_read_from_snippet() {
        let item = SearchItem::from_json(&json!({
            "id": { "kind": "youtube#video", "videoId": "abc" },
            "snippet": {
                "publishedAt": "2021-03-04T05:06:07Z",
                "channelId": "UC1",
                "title": "Cats",
                "description": "All the cats",
                "channelTitle": "Cat Channel"
            }
        }));
        assert_eq!(item.video_id, "abc");
        assert_eq!(item.channel_id, "UC1");
        assert_eq!(item.title, "Cats");
        assert_eq!(item.description, "All the cats");
        assert_eq!(item.channel_title, "Cat Channel");
        assert_eq!(item.published_at, "2021-03-04T05:06:07Z");
    }

    #[test]
    fn missing_error_key_means_no_error() {
        let response = SearchResponse::from_json(&json!({ "items": [] }));
        assert!(response.error.is_none());
        assert!(response.items.is_empty());

        let response = SearchResponse::from_json(&json!({ "error": null, "items": [] }));
        assert!(response.error.is_none());
    }

    #[test]
    fn embedded_error_payload_is_detected() {
        let response = SearchResponse::from_json(&json!({
            "error": { "code": 403, "message": "quotaExceeded", "errors": [] }
        }));
        assert_eq!(
            response.error,
            Some(ApiErrorPayload {
                code: 403,
                message: "quotaExceeded".to_string()
            })
        );
        assert!(response.items.is_empty());
    }

    #[test]
    fn serialized_field_order_matches_header() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(OutputRecord::default()).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header_line = output.lines().next().unwrap();
        assert_eq!(header_line, OutputRecord::HEADER.join(","));
    }
}
