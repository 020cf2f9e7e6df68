use log::debug;
use regex::Regex;
use serde::Deserialize;

/// File extensions that count as source code when picking a file out of a
/// repository listing
const SOURCE_EXTENSIONS: &[&str] = &[
    "java", "py", "cpp", "cc", "c", "js", "ts", "rs", "go", "rb", "kt", "swift", "cs",
];

/// Code pulled from a GitHub link found in a video description
#[derive(Debug, Clone)]
pub struct GithubCode {
    pub url: String,
    pub code: String,
    pub file_type: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

/// Fetch the code a description-linked GitHub URL points at.
///
/// `/blob/` URLs are fetched directly through the raw host; repository-root
/// URLs trigger a contents-API listing and a filename-heuristic pick. Every
/// failure degrades to `None` — this step never fails the analysis pipeline.
pub async fn fetch_linked_code(client: &reqwest::Client, url: &str) -> Option<GithubCode> {
    if url.contains("/blob/") {
        let raw_url = to_raw_url(url)?;
        let code = fetch_raw(client, &raw_url).await?;
        return Some(GithubCode {
            url: url.to_string(),
            code,
            file_type: file_extension(url),
        });
    }
    lookup_repo_solution(client, url).await
}

/// Rewrite a github.com/.../blob/... URL to its raw.githubusercontent.com form
fn to_raw_url(url: &str) -> Option<String> {
    let re = Regex::new(r"github\.com/([^/]+)/([^/]+)/blob/(.+)").unwrap();
    let caps = re.captures(url)?;
    Some(format!(
        "https://raw.githubusercontent.com/{}/{}/{}",
        &caps[1], &caps[2], &caps[3]
    ))
}

/// List a repository root and fetch the file that looks like the solution
async fn lookup_repo_solution(client: &reqwest::Client, url: &str) -> Option<GithubCode> {
    let re = Regex::new(r"github\.com/([^/\s?#]+)/([^/\s?#]+)").unwrap();
    let caps = re.captures(url)?;
    let (owner, repo) = (&caps[1], caps[2].trim_end_matches(".git"));

    let listing_url = format!("https://api.github.com/repos/{owner}/{repo}/contents");
    debug!("Listing repository contents: {listing_url}");

    let entries: Vec<ContentEntry> = client
        .get(&listing_url)
        .header("User-Agent", "ytan")
        .header("Accept", "application/vnd.github+json")
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json()
        .await
        .ok()?;

    let entry = pick_solution_entry(&entries)?;
    let download_url = entry.download_url.as_deref()?;
    let code = fetch_raw(client, download_url).await?;

    Some(GithubCode {
        url: url.to_string(),
        code,
        file_type: file_extension(&entry.name),
    })
}

/// Prefer files named like a solution, then any recognized source file
fn pick_solution_entry(entries: &[ContentEntry]) -> Option<&ContentEntry> {
    let files = entries.iter().filter(|e| e.kind == "file");
    if let Some(named) = files.clone().find(|e| {
        let name = e.name.to_lowercase();
        name.contains("solution") || name.contains("solve")
    }) {
        return Some(named);
    }
    files
        .clone()
        .find(|e| SOURCE_EXTENSIONS.contains(&file_extension(&e.name).as_str()))
}

async fn fetch_raw(client: &reqwest::Client, url: &str) -> Option<String> {
    debug!("Fetching raw file: {url}");
    let resp = client
        .get(url)
        .header("User-Agent", "ytan")
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?;
    resp.text().await.ok()
}

fn file_extension(path: &str) -> String {
    path.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_raw_url() {
        assert_eq!(
            to_raw_url("https://github.com/u/r/blob/main/src/Sol.java").as_deref(),
            Some("https://raw.githubusercontent.com/u/r/main/src/Sol.java")
        );
        assert_eq!(to_raw_url("https://github.com/u/r"), None);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Sol.java"), "java");
        assert_eq!(file_extension("path/to/main.RS"), "rs");
        assert_eq!(file_extension("Makefile"), "");
    }

    fn entry(name: &str, kind: &str) -> ContentEntry {
        ContentEntry {
            name: name.to_string(),
            kind: kind.to_string(),
            download_url: Some(format!("https://raw.example/{name}")),
        }
    }

    #[test]
    fn test_pick_prefers_solution_name() {
        let entries = vec![entry("main.py", "file"), entry("Solution.java", "file")];
        assert_eq!(pick_solution_entry(&entries).unwrap().name, "Solution.java");
    }

    #[test]
    fn test_pick_falls_back_to_source_extension() {
        let entries = vec![entry("README.md", "file"), entry("main.cpp", "file")];
        assert_eq!(pick_solution_entry(&entries).unwrap().name, "main.cpp");
    }

    #[test]
    fn test_pick_ignores_directories() {
        let entries = vec![entry("solutions", "dir"), entry("notes.txt", "file")];
        assert!(pick_solution_entry(&entries).is_none());
    }
}
