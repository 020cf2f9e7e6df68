pub mod analyzer;
pub mod cache;
pub mod config;
pub mod github;
pub mod heuristics;
pub mod llm;
pub mod metrics;
pub mod output;
pub mod youtube;

use serde::{Deserialize, Serialize};

/// A single captioned segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete caption transcript for a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Join all segment text into one blob, single space between fragments
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One video row as returned by the row provider. Numeric fields arrive as
/// strings and are parsed defensively downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub views: String,
    #[serde(default)]
    pub likes: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub duration: Option<String>,
}

/// What a user-supplied URL or ID resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Video(String),
    Channel(String),
}

/// Classify input as a video or channel reference (video formats win)
pub fn resolve_target(input: &str) -> Option<Target> {
    if let Some(id) = extract_video_id(input) {
        return Some(Target::Video(id));
    }
    extract_channel_id(input).map(Target::Channel)
}

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    // Bare 11-character video ID
    if regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap().is_match(input) {
        return Some(input.to_string());
    }

    // youtube.com/watch?v=ID
    if let Some(caps) = regex::Regex::new(r"(?:youtube\.com/watch\?.*v=)([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtu.be/ID
    if let Some(caps) = regex::Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/shorts/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    None
}

/// Extract a channel identifier (ID, handle, or legacy username) from a URL
pub fn extract_channel_id(input: &str) -> Option<String> {
    let input = input.trim();

    // youtube.com/channel/UC...
    if let Some(caps) = regex::Regex::new(r"youtube\.com/channel/([a-zA-Z0-9_-]+)")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/@handle
    if let Some(caps) = regex::Regex::new(r"youtube\.com/@([a-zA-Z0-9._-]+)")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/user/name (legacy)
    if let Some(caps) = regex::Regex::new(r"youtube\.com/user/([a-zA-Z0-9_-]+)")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // Bare channel ID
    if regex::Regex::new(r"^UC[a-zA-Z0-9_-]{22}$").unwrap().is_match(input) {
        return Some(input.to_string());
    }

    // Bare @handle
    if let Some(handle) = input.strip_prefix('@') {
        if !handle.is_empty() {
            return Some(handle.to_string());
        }
    }

    None
}
