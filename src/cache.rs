use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Transcript, VideoRecord};

fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("ytan")
}

fn videos_path(channel_id: &str) -> PathBuf {
    cache_dir().join("channels").join(format!("{channel_id}.json"))
}

fn transcript_path(video_id: &str, lang: &str) -> PathBuf {
    cache_dir().join("transcripts").join(format!("{video_id}-{lang}.json"))
}

/// A channel's video rows with the time they were fetched
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedVideos {
    pub fetched_at: DateTime<Utc>,
    pub videos: Vec<VideoRecord>,
}

fn is_stale_at(fetched_at: DateTime<Utc>, now: DateTime<Utc>, max_age_hours: u64) -> bool {
    now - fetched_at >= Duration::hours(max_age_hours as i64)
}

/// Load cached video rows for a channel, unless older than `max_age_hours`.
pub fn load_videos(channel_id: &str, max_age_hours: u64) -> Option<Vec<VideoRecord>> {
    let path = videos_path(channel_id);
    let data = std::fs::read_to_string(&path).ok()?;
    let cached: CachedVideos = serde_json::from_str(&data).ok()?;
    if is_stale_at(cached.fetched_at, Utc::now(), max_age_hours) {
        debug!("Cache stale: {}", path.display());
        return None;
    }
    debug!("Cache hit: {}", path.display());
    Some(cached.videos)
}

/// Save a channel's video rows, stamped with the current time.
pub fn save_videos(channel_id: &str, videos: &[VideoRecord]) -> Result<()> {
    let path = videos_path(channel_id);
    std::fs::create_dir_all(path.parent().unwrap())?;
    let cached = CachedVideos {
        fetched_at: Utc::now(),
        videos: videos.to_vec(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&cached)?)?;
    debug!("Cached {} videos: {}", videos.len(), path.display());
    Ok(())
}

/// Load a cached transcript, if available.
pub fn load_transcript(video_id: &str, lang: &str) -> Option<Transcript> {
    let path = transcript_path(video_id, lang);
    let data = std::fs::read_to_string(&path).ok()?;
    let transcript: Transcript = serde_json::from_str(&data).ok()?;
    debug!("Cache hit: {}", path.display());
    Some(transcript)
}

/// Save a transcript to the cache.
pub fn save_transcript(transcript: &Transcript) -> Result<()> {
    let path = transcript_path(&transcript.video_id, &transcript.language);
    std::fs::create_dir_all(path.parent().unwrap())?;
    std::fs::write(&path, serde_json::to_string_pretty(transcript)?)?;
    debug!("Cached transcript: {}", path.display());
    Ok(())
}
