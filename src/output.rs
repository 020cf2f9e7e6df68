use eyre::Result;

use crate::analyzer::ContentAnalysisReport;
use crate::metrics::VideoPerformanceMetrics;
use crate::youtube::ChannelInfo;

/// Abbreviate large counts: 1.2M, 3.4K, plain below a thousand
pub fn format_count(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Render whole seconds as h:mm:ss, or m:ss under an hour
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Render channel metrics as human-readable text
pub fn render_metrics_text(channel: &ChannelInfo, metrics: &VideoPerformanceMetrics) -> String {
    let mut out = String::new();

    out.push_str(&format!("Channel: {} ({})\n", channel.name, channel.id));
    out.push_str(&format!(
        "Subscribers: {} | Channel views: {} | Uploads: {}\n\n",
        channel.subscribers, channel.views, channel.videos_count
    ));

    out.push_str(&format!(
        "Total views: {} | likes: {} | comments: {}\n",
        format_count(metrics.total_views),
        format_count(metrics.total_likes),
        format_count(metrics.total_comments)
    ));
    out.push_str(&format!(
        "Average views: {} | likes: {} | comments: {}\n",
        format_count(metrics.average_views),
        format_count(metrics.average_likes),
        format_count(metrics.average_comments)
    ));
    out.push_str(&format!("Engagement rate: {:.2}%\n", metrics.engagement_rate));
    out.push_str(&format!("Views growth (30d): {:+.1}%\n", metrics.views_growth));

    if !metrics.top_videos.is_empty() {
        out.push_str("\nTop videos:\n");
        for (i, video) in metrics.top_videos.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} — {} views, {:.2}% engagement\n",
                i + 1,
                video.title,
                format_count(video.views),
                video.engagement_rate
            ));
        }
    }

    if !metrics.views_trend.is_empty() {
        out.push_str("\nViews trend (last 30 days):\n");
        for point in &metrics.views_trend {
            out.push_str(&format!("  {}  {}\n", point.date, format_count(point.views)));
        }
    }

    let d = &metrics.duration_analysis;
    out.push_str(&format!(
        "\nDuration mix: short {} | medium {} | long {} (best performing: {})\n",
        d.short, d.medium, d.long, d.best_performing
    ));
    out.push_str(&format!(
        "Average duration: {}\n",
        format_duration(d.average_duration.round() as u64)
    ));

    out
}

/// Render channel metrics as pretty JSON
pub fn render_metrics_json(channel: &ChannelInfo, metrics: &VideoPerformanceMetrics) -> Result<String> {
    let value = serde_json::json!({
        "channel": channel,
        "metrics": metrics,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Render a content-analysis report as human-readable text
pub fn render_report_text(report: &ContentAnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", report.title));
    out.push_str(&format!(
        "Views: {} | Likes: {} | Comments: {}\n",
        report.view_count, report.like_count, report.comment_count
    ));
    if !report.published_at.is_empty() {
        out.push_str(&format!("Published: {}\n", report.published_at));
    }

    out.push_str(&format!("\n{}\n", report.content_analysis));
    out.push_str(&format!("\nSummary\n{}\n", report.summary));

    if !report.short_notes.is_empty() {
        out.push_str(&format!("\nNotes\n{}\n", report.short_notes.join("\n")));
    }

    if !report.problem_type.is_empty() {
        out.push_str(&format!("\nProblem type: {}\n", report.problem_type));
    }

    if !report.actual_code.is_empty() {
        out.push_str(&format!("\nExtracted code:\n{}\n", report.actual_code));
    }

    if let Some(ref url) = report.github_url {
        match report.github_file_type.as_deref() {
            Some(file_type) => out.push_str(&format!("\nGitHub: {url} ({file_type})\n")),
            None => out.push_str(&format!("\nGitHub: {url}\n")),
        }
    }

    out
}

/// Render a content-analysis report as pretty JSON
pub fn render_report_json(report: &ContentAnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
