//! # YouTube Provider
//!
//! Search and stream-URL resolution backed by yt-dlp.
//!
//! Search runs a `ytsearch1:` query with `--dump-json` and parses the
//! single JSON document; acquisition resolves a bestaudio direct URL with
//! `-g` at play time, so a queued track never holds a stale URL.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use tokio::process::Command;

use super::provider::MediaProvider;
use super::track::{AudioStream, StreamSource, Track};

/// Provider backed by the yt-dlp CLI.
#[derive(Default)]
pub struct YouTubeProvider;

impl YouTubeProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaProvider for YouTubeProvider {
    async fn search(&self, query: &str) -> Result<Option<Track>> {
        debug!("Searching YouTube for: {query}");

        let output = Command::new("yt-dlp")
            .arg("--dump-json")
            .arg("--no-warnings")
            .arg("--quiet")
            .arg("--no-playlist")
            .arg(format!("ytsearch1:{query}"))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("yt-dlp search failed: {stderr}"));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(line) = stdout.lines().find(|l| !l.trim().is_empty()) else {
            return Ok(None);
        };

        let json: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| anyhow!("failed to parse yt-dlp JSON output: {e}"))?;

        Ok(Some(track_from_json(&json)?))
    }
}

fn track_from_json(json: &serde_json::Value) -> Result<Track> {
    let id = json
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("missing video id in yt-dlp output"))?
        .to_string();

    let title = json
        .get("title")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Title")
        .to_string();

    let description = json
        .get("description")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let channel = json
        .get("channel")
        .or_else(|| json.get("uploader"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown Channel")
        .to_string();

    let thumbnail = json
        .get("thumbnail")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let published_at = json
        .get("upload_date")
        .and_then(|v| v.as_str())
        .and_then(parse_upload_date);

    let duration_secs = json
        .get("duration")
        .and_then(|v| v.as_f64())
        .map(|d| d as u64)
        .unwrap_or(0);

    let watch_url = json
        .get("webpage_url")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={id}"));

    Ok(Track {
        id,
        title,
        description,
        channel,
        thumbnail,
        published_at,
        duration_secs,
        source: Arc::new(YtDlpSource { watch_url }),
    })
}

/// yt-dlp upload dates are bare YYYYMMDD strings.
fn parse_upload_date(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y%m%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

/// Resolves a bestaudio direct URL for one watch page.
struct YtDlpSource {
    watch_url: String,
}

#[async_trait]
impl StreamSource for YtDlpSource {
    async fn acquire(&self) -> Result<AudioStream> {
        let output = Command::new("yt-dlp")
            .arg("-f")
            .arg("bestaudio")
            .arg("-g")
            .arg("--no-warnings")
            .arg("--quiet")
            .arg(&self.watch_url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("yt-dlp failed to resolve stream URL: {stderr}"));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.lines().find(|l| !l.trim().is_empty()) {
            Some(url) => Ok(AudioStream {
                url: url.trim().to_string(),
            }),
            None => {
                warn!("yt-dlp returned no stream URL for {}", self.watch_url);
                Err(anyhow!("no stream URL returned for {}", self.watch_url))
            }
        }
    }
}
