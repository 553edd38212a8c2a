use serde_json::Value;

use crate::config::WATCH_URL_PREFIX;
use crate::models::{OutputRecord, SearchItem};
use crate::services::result_index::ResultIndex;
use crate::utils::{get_or_default, normalize_duration, normalize_published_at, sanitize_text};

/// Value written for any statistic the platform did not return.
pub const STAT_DEFAULT: &str = "0";

static MISSING: Value = Value::Null;

fn stat(resource: &Value, path: &[&str]) -> String {
    get_or_default(resource, path, STAT_DEFAULT)
}

/// Joins one search item with its video and channel statistics.
///
/// Never fails: an id missing from either index, or a field missing from a resource,
/// leaves the affected columns at [`STAT_DEFAULT`].
pub fn assemble_record(
    item: &SearchItem,
    videos: &ResultIndex,
    channels: &ResultIndex,
    search_term: &str,
    search_date: &str,
) -> OutputRecord {
    let video = videos.lookup(&item.video_id).unwrap_or(&MISSING);
    let channel = channels.lookup(&item.channel_id).unwrap_or(&MISSING);

    let duration = stat(video, &["contentDetails", "duration"]);

    OutputRecord {
        search_term: search_term.to_string(),
        search_date: search_date.to_string(),
        video_id: item.video_id.clone(),
        published_at: normalize_published_at(&item.published_at),
        title: sanitize_text(&item.title),
        description: sanitize_text(&item.description),
        video_url: format!("{WATCH_URL_PREFIX}{}", item.video_id),
        channel_title: sanitize_text(&item.channel_title),
        channel_id: item.channel_id.clone(),
        view_count: stat(video, &["statistics", "viewCount"]),
        like_count: stat(video, &["statistics", "likeCount"]),
        favorite_count: stat(video, &["statistics", "favoriteCount"]),
        comment_count: stat(video, &["statistics", "commentCount"]),
        duration_time: normalize_duration(&duration),
        duration,
        definition: stat(video, &["contentDetails", "definition"]),
        channel_views: stat(channel, &["statistics", "viewCount"]),
        channel_subscribers: stat(channel, &["statistics", "subscriberCount"]),
        channel_videos: stat(channel, &["statistics", "videoCount"]),
    }
}
