use std::time::Duration;

use eyre::{Result, bail};
use log::debug;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::analyzer::ContentAnalysisReport;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes YouTube video transcripts. \
Describe what the video covers, the key points, and any code or algorithms it discusses. \
Use short sections with clear headings.";

/// Attempts per request when the completion API answers 429
const MAX_ATTEMPTS: u32 = 3;

/// Fallback delay when a 429 response carries no usable retry-after header
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Request a natural-language analysis of the report's transcript from an
/// LLM completion API. Fails on API errors; callers decide whether to fall
/// back to [`fallback_analysis`].
pub async fn analyze_content(client: &reqwest::Client, report: &ContentAnalysisReport, model: &str) -> Result<String> {
    if is_anthropic_model(model) {
        analyze_anthropic(client, report, model).await
    } else {
        analyze_openai(client, report, model).await
    }
}

/// Deterministic analysis assembled from the heuristic passes alone. Used
/// when the completion API is unavailable or over quota — never routed by
/// wall-clock time.
pub fn fallback_analysis(report: &ContentAnalysisReport) -> String {
    let mut sections = vec![report.content_analysis.clone()];
    if !report.summary.is_empty() {
        sections.push(format!("Summary\n{}", report.summary));
    }
    if !report.short_notes.is_empty() {
        sections.push(format!("Notes\n{}", report.short_notes.join("\n")));
    }
    sections.join("\n\n")
}

fn is_anthropic_model(model: &str) -> bool {
    model.starts_with("claude")
}

fn user_message(report: &ContentAnalysisReport) -> String {
    format!(
        "Analyze this transcript from the video \"{}\":\n\n{}",
        report.title, report.transcript
    )
}

/// Seconds to wait before retrying, from a 429 response's retry-after header
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers.get("retry-after")?.to_str().ok()?.trim().parse().ok()
}

async fn analyze_anthropic(client: &reqwest::Client, report: &ContentAnalysisReport, model: &str) -> Result<String> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        eyre::eyre!("ANTHROPIC_API_KEY environment variable not set (required for Claude analysis)")
    })?;

    debug!("Analyzing via Anthropic API with model {model}");

    let body = serde_json::json!({
        "model": model,
        "max_tokens": 4096,
        "system": DEFAULT_SYSTEM_PROMPT,
        "messages": [
            {
                "role": "user",
                "content": user_message(report)
            }
        ]
    });

    for attempt in 0..MAX_ATTEMPTS {
        let resp = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS && attempt + 1 < MAX_ATTEMPTS {
            let delay = retry_after_secs(resp.headers())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_DELAY);
            debug!("Anthropic API returned 429, retrying in {delay:?}");
            tokio::time::sleep(delay).await;
            continue;
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Anthropic API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        return extract_anthropic_text(&json);
    }
    bail!("Anthropic API rate limit persisted after {MAX_ATTEMPTS} attempts");
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str().map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Anthropic API response format");
}

async fn analyze_openai(client: &reqwest::Client, report: &ContentAnalysisReport, model: &str) -> Result<String> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| eyre::eyre!("OPENAI_API_KEY environment variable not set (required for OpenAI analysis)"))?;

    debug!("Analyzing via OpenAI API with model {model}");

    let body = serde_json::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": DEFAULT_SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": user_message(report)
            }
        ]
    });

    for attempt in 0..MAX_ATTEMPTS {
        let resp = client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS && attempt + 1 < MAX_ATTEMPTS {
            let delay = retry_after_secs(resp.headers())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_DELAY);
            debug!("OpenAI API returned 429, retrying in {delay:?}");
            tokio::time::sleep(delay).await;
            continue;
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("OpenAI API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        return extract_openai_text(&json);
    }
    bail!("OpenAI API rate limit persisted after {MAX_ATTEMPTS} attempts");
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}
