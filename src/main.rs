use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};
use ytan::Target;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytan.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytan")
        .join("logs")
}

/// Retry an async operation with exponential backoff
async fn retry<F, Fut, T>(max_attempts: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..max_attempts {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if attempt + 1 < max_attempts {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    debug!("Attempt {} failed: {e}, retrying in {delay:?}", attempt + 1);
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap())
}

fn resolve_api_key(cli: &Cli, config: &ytan::config::Config) -> Result<String> {
    if let Some(ref key) = cli.api_key {
        return Ok(key.clone());
    }
    if let Some(ref key) = config.api_key {
        return Ok(key.clone());
    }
    std::env::var("YOUTUBE_API_KEY").map_err(|_| {
        eyre::eyre!(
            "no YouTube Data API key configured\n\nProvide one via --api-key, \
             the api_key config field, or the YOUTUBE_API_KEY environment variable"
        )
    })
}

async fn run_video(client: &reqwest::Client, cli: &Cli, api_key: &str, video_id: &str) -> Result<String> {
    let report = ytan::analyzer::analyze(client, api_key, video_id, &cli.lang).await;

    let mut rendered = match cli.format {
        OutputFormat::Text => ytan::output::render_report_text(&report),
        OutputFormat::Json => ytan::output::render_report_json(&report)?,
    };

    if cli.llm {
        let analysis = match ytan::llm::analyze_content(client, &report, &cli.model).await {
            Ok(text) => text,
            Err(e) => {
                if cli.no_fallback {
                    return Err(e.wrap_err("LLM analysis failed and --no-fallback set"));
                }
                if cli.verbose {
                    eprintln!("LLM analysis failed: {e}");
                    eprintln!("Using built-in analysis instead...");
                }
                ytan::llm::fallback_analysis(&report)
            }
        };
        rendered.push_str(&format!("\n--- Analysis ---\n{analysis}\n"));
    }

    Ok(rendered)
}

async fn run_channel(client: &reqwest::Client, cli: &Cli, api_key: &str, raw_id: &str, max_age_hours: u64) -> Result<String> {
    let channel_id = retry(3, || async move {
        ytan::youtube::resolve_channel_id(client, api_key, raw_id).await
    })
    .await?;
    debug!("Resolved channel {raw_id} -> {channel_id}");

    let channel = retry(3, || {
        let channel_id = &channel_id;
        async move { ytan::youtube::fetch_channel(client, api_key, channel_id).await }
    })
    .await?;

    let cached = if cli.refresh {
        None
    } else {
        ytan::cache::load_videos(&channel_id, max_age_hours)
    };

    let videos = match cached {
        Some(videos) => {
            if cli.verbose {
                eprintln!("Using {} cached videos for {}", videos.len(), channel.name);
            }
            videos
        }
        None => {
            let videos = retry(3, || {
                let channel_id = &channel_id;
                async move { ytan::youtube::fetch_channel_videos(client, api_key, channel_id).await }
            })
            .await?;
            if let Err(e) = ytan::cache::save_videos(&channel_id, &videos) {
                debug!("Failed to cache videos for {channel_id}: {e}");
            }
            videos
        }
    };

    if cli.verbose {
        eprintln!("Channel: {} ({channel_id})\nVideos: {}", channel.name, videos.len());
    }

    let metrics = ytan::metrics::compute_metrics(&videos);

    match cli.format {
        OutputFormat::Text => Ok(ytan::output::render_metrics_text(&channel, &metrics)),
        OutputFormat::Json => ytan::output::render_metrics_json(&channel, &metrics),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = <Cli as clap::Parser>::parse();

    // Load config file (non-fatal if missing/invalid)
    let config = ytan::config::Config::load().unwrap_or_default();

    if cli.verbose {
        let config_path = ytan::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        if let Some(ref default_lang) = config.default_lang {
            debug!("Config default_lang: {default_lang}");
        }
        if let Some(ref default_model) = config.default_model {
            debug!("Config default_model: {default_model}");
        }
    }

    let api_key = resolve_api_key(&cli, &config)?;
    let max_age_hours = config.cache_max_age_hours.unwrap_or(24);

    let client = reqwest::Client::new();

    // Collect inputs: from arg or stdin
    let inputs = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if inputs.is_empty() {
        bail!("no URL or ID provided\n\nUsage: ytan <URL>\n       echo <URL> | ytan");
    }

    for input in &inputs {
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let target = ytan::resolve_target(input).ok_or_else(|| {
            eyre::eyre!(
                "could not interpret input: {input}\n\nSupported formats:\n  \
                 https://www.youtube.com/watch?v=ID\n  \
                 https://youtu.be/ID\n  \
                 https://www.youtube.com/@handle\n  \
                 https://www.youtube.com/channel/UC...\n  \
                 <11-character video ID> or <UC... channel ID>"
            )
        })?;

        let rendered = match &target {
            Target::Video(video_id) => run_video(&client, &cli, &api_key, video_id).await?,
            Target::Channel(raw_id) => run_channel(&client, &cli, &api_key, raw_id, max_age_hours).await?,
        };

        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }
    }

    Ok(())
}
