use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::VideoRecord;

/// A ranked entry in the top-videos list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideo {
    pub id: String,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
}

/// One point in the daily views series
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub views: u64,
}

/// One point in the daily engagement-rate series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementPoint {
    pub date: String,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBucket {
    Short,
    Medium,
    Long,
}

impl std::fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DurationBucket::Short => write!(f, "short"),
            DurationBucket::Medium => write!(f, "medium"),
            DurationBucket::Long => write!(f, "long"),
        }
    }
}

/// Video counts per duration bucket, with the bucket whose videos drew the
/// most total views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationAnalysis {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
    pub best_performing: DurationBucket,
    pub average_duration: f64,
}

/// Aggregate performance metrics for one channel's videos
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPerformanceMetrics {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_views: u64,
    pub average_likes: u64,
    pub average_comments: u64,
    pub engagement_rate: f64,
    pub views_growth: f64,
    pub top_videos: Vec<TopVideo>,
    pub views_trend: Vec<TrendPoint>,
    pub duration_analysis: DurationAnalysis,
    pub engagement_trend: Vec<EngagementPoint>,
}

impl VideoPerformanceMetrics {
    fn empty() -> Self {
        VideoPerformanceMetrics {
            total_views: 0,
            total_likes: 0,
            total_comments: 0,
            average_views: 0,
            average_likes: 0,
            average_comments: 0,
            engagement_rate: 0.0,
            views_growth: 0.0,
            top_videos: Vec::new(),
            views_trend: Vec::new(),
            duration_analysis: DurationAnalysis {
                short: 0,
                medium: 0,
                long: 0,
                best_performing: DurationBucket::Medium,
                average_duration: 0.0,
            },
            engagement_trend: Vec::new(),
        }
    }
}

struct ParsedVideo {
    id: String,
    title: String,
    views: u64,
    likes: u64,
    comments: u64,
    published_at: Option<DateTime<Utc>>,
    duration: u64,
}

/// Parse a numeric-string field, falling back to 0. Each field is parsed
/// independently so one malformed value cannot invalidate its neighbors.
fn parse_count(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_video(record: &VideoRecord) -> ParsedVideo {
    ParsedVideo {
        id: record.id.clone(),
        title: record.title.clone(),
        views: parse_count(&record.views),
        likes: parse_count(&record.likes),
        comments: parse_count(&record.comments),
        published_at: parse_published(&record.published_at),
        duration: record.duration.as_deref().map(parse_count).unwrap_or(0),
    }
}

fn engagement_rate(likes: u64, comments: u64, views: u64) -> f64 {
    if views > 0 {
        (likes + comments) as f64 / views as f64 * 100.0
    } else {
        0.0
    }
}

/// Math.round-style integer average
fn average(total: u64, count: usize) -> u64 {
    (total as f64 / count as f64).round() as u64
}

/// Compute channel performance metrics over a set of video records.
///
/// The 30-day growth and trend windows are anchored at the moment of the
/// call; empty input yields a zeroed result, never an error.
pub fn compute_metrics(videos: &[VideoRecord]) -> VideoPerformanceMetrics {
    compute_metrics_at(videos, Utc::now())
}

pub fn compute_metrics_at(videos: &[VideoRecord], now: DateTime<Utc>) -> VideoPerformanceMetrics {
    if videos.is_empty() {
        return VideoPerformanceMetrics::empty();
    }

    let parsed: Vec<ParsedVideo> = videos.iter().map(parse_video).collect();

    let total_views: u64 = parsed.iter().map(|v| v.views).sum();
    let total_likes: u64 = parsed.iter().map(|v| v.likes).sum();
    let total_comments: u64 = parsed.iter().map(|v| v.comments).sum();

    // Growth: last 30 days vs the 30 days before that. Half-open windows,
    // records with an unparsable timestamp fall outside both.
    let thirty_days_ago = now - Duration::days(30);
    let sixty_days_ago = now - Duration::days(60);

    let in_window = |v: &ParsedVideo, lo: DateTime<Utc>, hi: DateTime<Utc>| {
        v.published_at.map(|ts| ts >= lo && ts < hi).unwrap_or(false)
    };

    let last_30_views: u64 = parsed
        .iter()
        .filter(|v| in_window(v, thirty_days_ago, now))
        .map(|v| v.views)
        .sum();
    let previous_30_views: u64 = parsed
        .iter()
        .filter(|v| in_window(v, sixty_days_ago, thirty_days_ago))
        .map(|v| v.views)
        .sum();

    let views_growth = if previous_30_views > 0 {
        (last_30_views as f64 - previous_30_views as f64) / previous_30_views as f64 * 100.0
    } else {
        0.0
    };

    // Top 5 by raw view count; stable sort keeps input order on ties
    let mut top_videos: Vec<TopVideo> = parsed
        .iter()
        .map(|v| TopVideo {
            id: v.id.clone(),
            title: v.title.clone(),
            views: v.views,
            likes: v.likes,
            comments: v.comments,
            engagement_rate: engagement_rate(v.likes, v.comments, v.views),
        })
        .collect();
    top_videos.sort_by(|a, b| b.views.cmp(&a.views));
    top_videos.truncate(5);

    // Daily series over the last 30 days, keyed by UTC calendar date.
    // Days with no videos are omitted.
    let mut views_by_date: BTreeMap<String, u64> = BTreeMap::new();
    let mut engagement_by_date: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for v in parsed.iter().filter(|v| in_window(v, thirty_days_ago, now)) {
        let date = v.published_at.unwrap().format("%Y-%m-%d").to_string(); // safe: window filter requires Some
        *views_by_date.entry(date.clone()).or_insert(0) += v.views;
        let entry = engagement_by_date.entry(date).or_insert((0.0, 0));
        entry.0 += engagement_rate(v.likes, v.comments, v.views);
        entry.1 += 1;
    }

    let views_trend = views_by_date
        .into_iter()
        .map(|(date, views)| TrendPoint { date, views })
        .collect();
    let engagement_trend = engagement_by_date
        .into_iter()
        .map(|(date, (total, count))| EngagementPoint {
            date,
            engagement_rate: total / count as f64,
        })
        .collect();

    // Duration buckets: short <5min, medium 5-15min inclusive, long >15min.
    // Best performer is the bucket with the highest summed views, not the
    // bucket with the most videos.
    let mut counts = [0usize; 3];
    let mut views_by_bucket = [0u64; 3];
    for v in &parsed {
        let idx = if v.duration < 300 {
            0
        } else if v.duration <= 900 {
            1
        } else {
            2
        };
        counts[idx] += 1;
        views_by_bucket[idx] += v.views;
    }

    let buckets = [DurationBucket::Short, DurationBucket::Medium, DurationBucket::Long];
    let mut best_performing = buckets[0];
    let mut best_views = views_by_bucket[0];
    for i in 1..3 {
        if views_by_bucket[i] > best_views {
            best_views = views_by_bucket[i];
            best_performing = buckets[i];
        }
    }

    let total_duration: u64 = parsed.iter().map(|v| v.duration).sum();

    VideoPerformanceMetrics {
        total_views,
        total_likes,
        total_comments,
        average_views: average(total_views, videos.len()),
        average_likes: average(total_likes, videos.len()),
        average_comments: average(total_comments, videos.len()),
        engagement_rate: engagement_rate(total_likes, total_comments, total_views),
        views_growth,
        top_videos,
        views_trend,
        duration_analysis: DurationAnalysis {
            short: counts[0],
            medium: counts[1],
            long: counts[2],
            best_performing,
            average_duration: total_duration as f64 / videos.len() as f64,
        },
        engagement_trend,
    }
}
