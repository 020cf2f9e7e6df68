use eyre::Result;
use log::debug;
use serde::Serialize;

use crate::cache;
use crate::github::{self, GithubCode};
use crate::heuristics;
use crate::youtube::{self, VideoDetails};

const TRANSCRIPT_PLACEHOLDER: &str = "Transcript unavailable for this video.";

/// Everything the analyzer derives for one video. Always well-formed: the
/// failure paths fill the narrative fields with error text instead of
/// propagating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysisReport {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub view_count: String,
    pub like_count: String,
    pub comment_count: String,
    pub transcript: String,
    pub content_analysis: String,
    pub short_notes: Vec<String>,
    pub code_snippets: Vec<String>,
    pub actual_code: String,
    pub problem_type: String,
    pub summary: String,
    pub github_code: Option<String>,
    pub github_url: Option<String>,
    pub github_file_type: Option<String>,
}

/// Analyze a video's caption content. Never fails: any error inside the
/// pipeline is converted into a degraded, still-renderable report.
pub async fn analyze(client: &reqwest::Client, api_key: &str, video_id: &str, lang: &str) -> ContentAnalysisReport {
    match analyze_inner(client, api_key, video_id, lang).await {
        Ok(report) => report,
        Err(e) => {
            debug!("Analysis failed for {video_id}: {e}");
            degraded_report(&e)
        }
    }
}

async fn analyze_inner(
    client: &reqwest::Client,
    api_key: &str,
    video_id: &str,
    lang: &str,
) -> Result<ContentAnalysisReport> {
    let details = youtube::fetch_video_details(client, api_key, video_id).await?;

    // A missing transcript degrades the report; it does not abort it
    let transcript = match cache::load_transcript(video_id, lang) {
        Some(t) => Some(t.full_text()),
        None => match youtube::fetch_captions(client, video_id, lang).await {
            Ok(t) => {
                if let Err(e) = cache::save_transcript(&t) {
                    debug!("Failed to cache transcript for {video_id}: {e}");
                }
                Some(t.full_text())
            }
            Err(e) => {
                debug!("Transcript fetch failed for {video_id}: {e}");
                None
            }
        },
    };

    // Best-effort: a matched link with a failed fetch still reports the URL
    let github_url = heuristics::extract_github_url(&details.description);
    let github_code = match github_url.as_deref() {
        Some(url) => github::fetch_linked_code(client, url).await,
        None => None,
    };

    Ok(build_report(details, transcript, github_url, github_code))
}

/// Assemble the report from already-fetched inputs. Pure with respect to
/// I/O, so both the full and transcript-less shapes are testable offline.
fn build_report(
    details: VideoDetails,
    transcript: Option<String>,
    github_url: Option<String>,
    github_code: Option<GithubCode>,
) -> ContentAnalysisReport {
    let (transcript_text, content_analysis, summary, short_notes, code_snippets, problem_type) = match transcript {
        Some(text) => {
            let keywords = heuristics::extract_keywords(&text, 5);
            let snippets = heuristics::extract_code_snippets(&text);
            let problem_type = heuristics::classify_problem_type(&text).to_string();
            let analysis = heuristics::compose_analysis(
                &details.title,
                &text,
                &keywords,
                &problem_type,
                !snippets.is_empty(),
            );
            let summary = heuristics::generate_summary(&text);
            let notes = heuristics::short_notes(&text);
            (text, analysis, summary, notes, snippets, problem_type)
        }
        None => (
            TRANSCRIPT_PLACEHOLDER.to_string(),
            "Error\nNo transcript could be retrieved for this video, so content analysis is unavailable.".to_string(),
            "No summary available without a transcript.".to_string(),
            Vec::new(),
            Vec::new(),
            String::new(),
        ),
    };

    let actual_code = heuristics::best_code_block(&code_snippets);
    let (github_url, github_code, github_file_type) = match github_code {
        Some(gc) => (Some(gc.url), Some(gc.code), Some(gc.file_type)),
        None => (github_url, None, None),
    };

    ContentAnalysisReport {
        title: details.title,
        description: details.description,
        published_at: details.published_at,
        view_count: details.view_count,
        like_count: details.like_count,
        comment_count: details.comment_count,
        transcript: transcript_text,
        content_analysis,
        short_notes,
        code_snippets,
        actual_code,
        problem_type,
        summary,
        github_code,
        github_url,
        github_file_type,
    }
}

fn degraded_report(err: &eyre::Report) -> ContentAnalysisReport {
    ContentAnalysisReport {
        title: String::new(),
        description: String::new(),
        published_at: String::new(),
        view_count: "0".to_string(),
        like_count: "0".to_string(),
        comment_count: "0".to_string(),
        transcript: TRANSCRIPT_PLACEHOLDER.to_string(),
        content_analysis: format!("Error\nVideo analysis failed: {err}"),
        short_notes: Vec::new(),
        code_snippets: Vec::new(),
        actual_code: String::new(),
        problem_type: String::new(),
        summary: format!("Analysis could not be completed: {err}"),
        github_code: None,
        github_url: None,
        github_file_type: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> VideoDetails {
        VideoDetails {
            title: "Binary Search Tree Insert".to_string(),
            description: "my solution: https://github.com/u/r/blob/main/Sol.java".to_string(),
            published_at: "2025-01-02T03:04:05Z".to_string(),
            tags: vec!["bst".to_string()],
            view_count: "1000".to_string(),
            like_count: "100".to_string(),
            comment_count: "10".to_string(),
        }
    }

    #[test]
    fn test_build_report_with_transcript() {
        let text = "Today we cover the binary search tree insert operation. \
                    We walk the tree nodes from the root. Each insert compares keys. \
                    The function insert returns the new subtree root."
            .to_string();
        let report = build_report(details(), Some(text), None, None);

        assert_eq!(report.problem_type, "tree");
        assert!(report.summary.starts_with("**"));
        assert!(report.short_notes.len() <= 5);
        assert!(!report.short_notes.is_empty());
        assert!(report.content_analysis.contains("Overview\n"));
        assert!(!report.content_analysis.contains("Error"));
        assert_eq!(report.view_count, "1000");
    }

    #[test]
    fn test_build_report_without_transcript_degrades() {
        let report = build_report(details(), None, None, None);
        assert_eq!(report.transcript, TRANSCRIPT_PLACEHOLDER);
        assert!(report.content_analysis.contains("Error"));
        assert!(report.short_notes.is_empty());
        assert!(report.code_snippets.is_empty());
        assert_eq!(report.problem_type, "");
        // metadata still renders
        assert_eq!(report.title, "Binary Search Tree Insert");
    }

    #[test]
    fn test_build_report_keeps_url_when_code_fetch_failed() {
        let url = "https://github.com/u/r/blob/main/Sol.java".to_string();
        let report = build_report(details(), None, Some(url.clone()), None);
        assert_eq!(report.github_url, Some(url));
        assert_eq!(report.github_code, None);
        assert_eq!(report.github_file_type, None);
    }

    #[test]
    fn test_build_report_with_github_code() {
        let gc = GithubCode {
            url: "https://github.com/u/r/blob/main/Sol.java".to_string(),
            code: "class Solution {}".to_string(),
            file_type: "java".to_string(),
        };
        let report = build_report(details(), None, Some(gc.url.clone()), Some(gc));
        assert_eq!(report.github_file_type.as_deref(), Some("java"));
        assert_eq!(report.github_code.as_deref(), Some("class Solution {}"));
    }

    #[test]
    fn test_degraded_report_is_renderable() {
        let err = eyre::eyre!("quota exceeded");
        let report = degraded_report(&err);
        assert!(report.content_analysis.contains("Error"));
        assert!(report.content_analysis.contains("quota exceeded"));
        assert!(report.summary.contains("quota exceeded"));
        assert_eq!(report.view_count, "0");
    }
}
