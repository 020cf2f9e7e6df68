use std::collections::HashMap;

use regex::Regex;

/// Words ignored by keyword extraction. Short words are already dropped by
/// the length filter; this set catches the longer filler vocabulary common
/// in spoken transcripts.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "his", "has", "have", "this", "that", "with", "they", "them", "their", "then",
    "than", "there", "these", "those", "what", "when", "where", "which", "will", "would", "could",
    "should", "from", "into", "over", "about", "after", "before", "because", "being", "going",
    "really", "actually", "basically", "just", "like", "also", "some", "such", "very", "here",
    "your", "more", "most", "only", "other", "same", "so", "too", "how", "who", "why", "now",
    "were", "been", "does", "doing", "gonna", "want", "okay", "yeah", "right", "thing", "things",
    "dont", "thats", "youre", "theyre", "weve", "cant", "didnt", "doesnt", "isnt", "youll",
];

/// Topic label, or empty when no pattern family matches. The pairs are
/// evaluated strictly in order; a text matching several families is labeled
/// by the first. Keep this a slice, not a map: iteration order is load-bearing.
const PROBLEM_PATTERNS: &[(&str, &[&str])] = &[
    ("array", &[r"\barrays?\b", r"\bsubarrays?\b", r"two pointers?", r"sliding window"]),
    ("linkedList", &[r"linked ?lists?", r"\bsingly\b", r"\bdoubly\b"]),
    ("tree", &[r"\btrees?\b", r"binary search tree", r"\bbst\b", r"\btreenode\b"]),
    ("graph", &[r"\bgraphs?\b", r"\bbfs\b", r"\bdfs\b", r"\badjacency\b", r"\bvertex\b", r"\bvertices\b"]),
    ("sorting", &[r"\bsort(?:ing|ed)?\b", r"\bquick ?sort\b", r"\bmerge ?sort\b", r"\bbubble sort\b"]),
    ("searching", &[r"\bsearch(?:ing)?\b", r"\bbinary search\b", r"\blinear search\b"]),
];

/// GitHub link patterns against a video description, most specific first.
/// The solution-anchored pattern outranks the generic URL match.
const GITHUB_PATTERNS: &[&str] = &[
    r"(?i)solution:?\s*(https?://github\.com/[^\s)\]]+)",
    r"(?i)code:?\s*(https?://github\.com/[^\s)\]]+)",
    r"(https?://github\.com/[^\s)\]]+)",
];

/// Top keywords by frequency: lowercased, punctuation stripped, stopwords
/// removed, words longer than 3 characters only. Ties keep first-seen order.
pub fn extract_keywords(text: &str, k: usize) -> Vec<String> {
    // Apostrophes vanish (contractions collapse), other punctuation splits
    let mut cleaned = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c.is_whitespace() {
            cleaned.push(c);
        } else if c != '\'' {
            cleaned.push(' ');
        }
    }

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in cleaned.split_whitespace() {
        if word.len() <= 3 || STOPWORDS.contains(&word) {
            continue;
        }
        if !counts.contains_key(word) {
            order.push(word.to_string());
        }
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a])); // stable: ties keep first-seen order
    order.truncate(k);
    order
}

/// Reading-time estimate at 150 words per minute, rounded up
pub fn estimate_duration_minutes(text: &str) -> u64 {
    let words = text.split_whitespace().count() as u64;
    words.div_ceil(150)
}

/// Extract code fragments from text. Pattern families are tried in order
/// (tagged fences, plain fences, inline backticks, keyword sentences) and
/// the first family with any match wins; families are never merged.
pub fn extract_code_snippets(text: &str) -> Vec<String> {
    // ```lang ... ```
    let tagged = Regex::new(r"(?s)```[a-zA-Z0-9+#]+\n(.*?)```").unwrap();
    let snippets: Vec<String> = tagged
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !snippets.is_empty() {
        return snippets;
    }

    // ``` ... ```
    let fenced = Regex::new(r"(?s)```(.*?)```").unwrap();
    let snippets: Vec<String> = fenced
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !snippets.is_empty() {
        return snippets;
    }

    // `inline`
    let inline = Regex::new(r"`([^`\n]+)`").unwrap();
    let snippets: Vec<String> = inline
        .captures_iter(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !snippets.is_empty() {
        return snippets;
    }

    // Bare language keywords: keep whole sentences that look like code talk
    let keywords =
        Regex::new(r"\b(function|class|public|private|static|void|def|const|let|var|return|import)\b").unwrap();
    split_sentences(text)
        .into_iter()
        .filter(|s| keywords.is_match(s))
        .map(|s| s.to_string())
        .collect()
}

/// Best-guess single code block: the longest extracted snippet
pub fn best_code_block(snippets: &[String]) -> String {
    snippets
        .iter()
        .max_by_key(|s| s.len())
        .cloned()
        .unwrap_or_default()
}

/// Classify which data-structure/algorithm topic the text covers.
/// Returns an empty string when nothing matches.
pub fn classify_problem_type(text: &str) -> &'static str {
    for (label, patterns) in PROBLEM_PATTERNS {
        for pattern in *patterns {
            let re = Regex::new(&format!("(?i){pattern}")).unwrap();
            if re.is_match(text) {
                return label;
            }
        }
    }
    ""
}

/// First GitHub URL in a description, most specific pattern first
pub fn extract_github_url(description: &str) -> Option<String> {
    for pattern in GITHUB_PATTERNS {
        let re = Regex::new(pattern).unwrap();
        if let Some(caps) = re.captures(description) {
            return Some(caps[1].trim_end_matches(['.', ',']).to_string());
        }
    }
    None
}

/// Split text into trimmed non-empty sentences on `.`, `!`, `?`
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Synthesize a paragraph summary from raw transcript text.
///
/// Sentences are grouped greedily into paragraphs of up to 4; a paragraph is
/// cut early when the leading-3-word topic shifts after at least 3 grouped
/// sentences. A lone resulting paragraph is bisected at its sentence
/// midpoint. The joined paragraphs are wrapped in a single bold marker.
pub fn generate_summary(text: &str) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let topic_of = |s: &str| {
        s.split_whitespace()
            .take(3)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    };

    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut prev_topic = String::new();
    for sentence in &sentences {
        let topic = topic_of(sentence);
        if current.len() >= 4 || (current.len() >= 3 && topic != prev_topic) {
            paragraphs.push(std::mem::take(&mut current));
        }
        current.push(sentence);
        prev_topic = topic;
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    if paragraphs.len() == 1 && paragraphs[0].len() >= 2 {
        let only = paragraphs.pop().unwrap();
        let mid = only.len().div_ceil(2);
        let (head, tail) = only.split_at(mid);
        paragraphs.push(head.to_vec());
        paragraphs.push(tail.to_vec());
    }

    let rendered: Vec<String> = paragraphs
        .iter()
        .map(|p| format!("{}.", p.join(". ")))
        .collect();

    format!("**{}**", rendered.join("\n\n"))
}

/// First 5 non-empty sentences as bullet notes
pub fn short_notes(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .take(5)
        .map(|s| format!("• {s}"))
        .collect()
}

/// Assemble the narrative content-analysis sections. Each section is a title
/// line followed by body text; sections are separated by blank lines.
pub fn compose_analysis(
    title: &str,
    transcript_text: &str,
    keywords: &[String],
    problem_type: &str,
    has_code: bool,
) -> String {
    let words = transcript_text.split_whitespace().count();
    let minutes = estimate_duration_minutes(transcript_text);

    let mut sections = Vec::new();

    sections.push(format!(
        "Overview\n\"{title}\" has a transcript of roughly {words} words, about a {minutes} minute read."
    ));

    if !keywords.is_empty() {
        sections.push(format!("Key Topics\n{}", keywords.join(", ")));
    }

    let mut detected = Vec::new();
    if has_code {
        detected.push("code snippets".to_string());
    }
    if !problem_type.is_empty() {
        detected.push(format!("{problem_type} problem walkthrough"));
    }
    if !detected.is_empty() {
        sections.push(format!("Detected Content\nThis video contains {}.", detected.join(" and a ")));
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_ranked_by_frequency() {
        let text = "the quick brown fox jumps over the lazy dog quick brown";
        let keywords = extract_keywords(text, 5);
        // "quick" and "brown" appear twice and outrank the singletons;
        // stopwords and short words are gone entirely
        assert_eq!(keywords[0], "quick");
        assert_eq!(keywords[1], "brown");
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"fox".to_string()));
        assert!(!keywords.contains(&"dog".to_string()));
    }

    #[test]
    fn test_keywords_strips_punctuation_and_case() {
        let keywords = extract_keywords("Graphs! GRAPHS, graphs? recursion", 5);
        assert_eq!(keywords[0], "graphs");
        assert!(keywords.contains(&"recursion".to_string()));
    }

    #[test]
    fn test_keywords_top_k() {
        let text = "alpha beta gamma delta epsilon zeta alpha";
        assert_eq!(extract_keywords(text, 2).len(), 2);
    }

    #[test]
    fn test_keywords_empty_text() {
        assert!(extract_keywords("", 5).is_empty());
    }

    #[test]
    fn test_estimate_duration_rounds_up() {
        let text = vec!["word"; 151].join(" ");
        assert_eq!(estimate_duration_minutes(&text), 2);
        assert_eq!(estimate_duration_minutes("word"), 1);
        assert_eq!(estimate_duration_minutes(""), 0);
    }

    #[test]
    fn test_code_extraction_tagged_fence() {
        let text = "intro ```java\nint x = 1;\n``` outro";
        let snippets = extract_code_snippets(text);
        assert_eq!(snippets, vec!["int x = 1;".to_string()]);
    }

    #[test]
    fn test_code_extraction_untagged_fence() {
        let text = "intro ```\nlet y = 2;\n``` outro";
        let snippets = extract_code_snippets(text);
        assert_eq!(snippets, vec!["let y = 2;".to_string()]);
    }

    #[test]
    fn test_code_extraction_first_family_wins() {
        // a tagged fence and an inline span: only the fence family is used
        let text = "```py\nprint(1)\n``` and `inline_code` too";
        let snippets = extract_code_snippets(text);
        assert_eq!(snippets, vec!["print(1)".to_string()]);
    }

    #[test]
    fn test_code_extraction_inline() {
        let snippets = extract_code_snippets("call `foo(bar)` here");
        assert_eq!(snippets, vec!["foo(bar)".to_string()]);
    }

    #[test]
    fn test_code_extraction_keyword_sentences() {
        let text = "Welcome back. So we define a function solve that returns the answer. Thanks for watching.";
        let snippets = extract_code_snippets(text);
        assert_eq!(snippets.len(), 1);
        assert!(snippets[0].contains("function solve"));
    }

    #[test]
    fn test_code_extraction_no_match() {
        assert!(extract_code_snippets("nothing technical here at all").is_empty());
    }

    #[test]
    fn test_best_code_block_picks_longest() {
        let snippets = vec!["x = 1".to_string(), "for i in range(10): print(i)".to_string()];
        assert_eq!(best_code_block(&snippets), "for i in range(10): print(i)");
        assert_eq!(best_code_block(&[]), "");
    }

    #[test]
    fn test_problem_type_tree_before_searching() {
        // "search" wording also loosely matches, but tree is checked first
        assert_eq!(classify_problem_type("binary search tree insert node"), "tree");
    }

    #[test]
    fn test_problem_type_array() {
        assert_eq!(classify_problem_type("today we solve a subarray sum problem"), "array");
    }

    #[test]
    fn test_problem_type_linked_list() {
        assert_eq!(classify_problem_type("reverse a linked list in place"), "linkedList");
    }

    #[test]
    fn test_problem_type_graph() {
        assert_eq!(classify_problem_type("run BFS over the adjacency matrix"), "graph");
    }

    #[test]
    fn test_problem_type_sorting_vs_searching_order() {
        assert_eq!(classify_problem_type("we compare sorting with searching"), "sorting");
        assert_eq!(classify_problem_type("plain linear search walkthrough"), "searching");
    }

    #[test]
    fn test_problem_type_no_match_is_empty() {
        assert_eq!(classify_problem_type("cooking pasta for beginners"), "");
    }

    #[test]
    fn test_github_solution_anchor_wins() {
        let desc = "links: https://example.com my solution: https://github.com/u/r/blob/main/Sol.java and more https://github.com/other/repo";
        assert_eq!(
            extract_github_url(desc),
            Some("https://github.com/u/r/blob/main/Sol.java".to_string())
        );
    }

    #[test]
    fn test_github_generic_fallback() {
        let desc = "repo at https://github.com/user/project thanks";
        assert_eq!(extract_github_url(desc), Some("https://github.com/user/project".to_string()));
    }

    #[test]
    fn test_github_none() {
        assert_eq!(extract_github_url("no links here"), None);
    }

    #[test]
    fn test_github_trailing_punctuation_trimmed() {
        let desc = "solution: https://github.com/u/r/blob/main/a.py.";
        assert_eq!(
            extract_github_url(desc),
            Some("https://github.com/u/r/blob/main/a.py".to_string())
        );
    }

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("One. Two! Three? ");
        assert_eq!(s, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_summary_wrapped_in_bold() {
        let summary = generate_summary("First point. Second point. Third point. Fourth point.");
        assert!(summary.starts_with("**"));
        assert!(summary.ends_with("**"));
    }

    #[test]
    fn test_summary_single_paragraph_bisected() {
        let summary = generate_summary("Alpha one. Beta two.");
        // 2 sentences form one paragraph which is then split in half
        assert!(summary.contains("\n\n"));
        assert!(summary.contains("Alpha one."));
        assert!(summary.contains("Beta two."));
    }

    #[test]
    fn test_summary_at_least_one_paragraph() {
        let summary = generate_summary("Only one sentence here");
        assert_eq!(summary, "**Only one sentence here.**");
    }

    #[test]
    fn test_summary_empty_text() {
        assert_eq!(generate_summary("   "), "");
    }

    #[test]
    fn test_short_notes_capped_at_five() {
        let text = "A. B. C. D. E. F. G.";
        let notes = short_notes(text);
        assert_eq!(notes.len(), 5);
        assert_eq!(notes[0], "• A");
        assert_eq!(notes[4], "• E");
    }

    #[test]
    fn test_compose_analysis_sections() {
        let out = compose_analysis(
            "Two Sum",
            "we solve two sum with a hash map today",
            &["array".to_string(), "hashmap".to_string()],
            "array",
            true,
        );
        let sections: Vec<&str> = out.split("\n\n").collect();
        assert!(sections[0].starts_with("Overview\n"));
        assert!(out.contains("Key Topics\narray, hashmap"));
        assert!(out.contains("Detected Content\n"));
    }
}
