use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytan",
    about = "YouTube channel analytics and content analysis",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Channel or video URL/ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Request an LLM analysis of the video content
    #[arg(short = 'a', long)]
    pub llm: bool,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Preferred caption language
    #[arg(short, long, default_value = "en")]
    pub lang: String,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YouTube Data API key (overrides config and YOUTUBE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Ignore cached channel data and refetch
    #[arg(long)]
    pub refresh: bool,

    /// Fail instead of using the built-in analysis when the LLM API errors
    #[arg(long)]
    pub no_fallback: bool,

    /// LLM model for content analysis
    #[arg(long, default_value = "claude-sonnet-4-6")]
    pub model: String,

    /// Show resolution and fetch details
    #[arg(short, long)]
    pub verbose: bool,
}
