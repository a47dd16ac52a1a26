use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::progress;
use crate::models::media::FormatInfo;

/// Selector used when no format id was chosen interactively.
pub const DEFAULT_FORMAT: &str = "bestvideo+bestaudio/best";

pub async fn find_ytdlp() -> Option<PathBuf> {
    let bin_name = if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    };

    if let Ok(status) = tokio::process::Command::new(bin_name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        if status.success() {
            return Some(PathBuf::from(bin_name));
        }
    }

    let managed = managed_ytdlp_path()?;
    if managed.exists() {
        return Some(managed);
    }

    None
}

pub fn managed_ytdlp_path() -> Option<PathBuf> {
    let data = dirs::data_dir()?;
    let bin_name = if cfg!(target_os = "windows") {
        "yt-dlp.exe"
    } else {
        "yt-dlp"
    };
    Some(data.join("driveget").join("bin").join(bin_name))
}

/// Locate yt-dlp on PATH or at the managed location, downloading the
/// official release binary when neither exists.
pub async fn ensure_ytdlp() -> anyhow::Result<PathBuf> {
    if let Some(path) = find_ytdlp().await {
        return Ok(path);
    }

    download_ytdlp_binary().await
}

async fn download_ytdlp_binary() -> anyhow::Result<PathBuf> {
    let target =
        managed_ytdlp_path().ok_or_else(|| anyhow!("could not determine data directory"))?;

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let download_url = if cfg!(target_os = "windows") {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp.exe"
    } else if cfg!(target_os = "macos") {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp_macos"
    } else {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp"
    };

    tracing::info!("yt-dlp not found, fetching release binary");

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()?;

    let response = client.get(download_url).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("failed to fetch yt-dlp: HTTP {}", response.status()));
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(&target, &bytes).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        tokio::fs::set_permissions(&target, perms).await?;
    }

    Ok(target)
}

/// Metadata-only extraction of a single video.
pub async fn video_info(ytdlp: &Path, url: &str) -> anyhow::Result<serde_json::Value> {
    let output = tokio::process::Command::new(ytdlp)
        .args(["--dump-json", "--no-warnings", "--no-playlist", url])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| anyhow!("failed to run yt-dlp: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("yt-dlp failed: {}", stderr.trim()));
    }

    serde_json::from_slice(&output.stdout).map_err(|e| anyhow!("yt-dlp returned invalid JSON: {}", e))
}

pub struct PlaylistEntry {
    pub title: String,
    pub url: String,
}

/// Flat enumeration of playlist entries. Lines that fail to decode or
/// lack an id are dropped, so a broken entry never aborts the batch.
pub async fn playlist_entries(ytdlp: &Path, url: &str) -> anyhow::Result<Vec<PlaylistEntry>> {
    let output = tokio::process::Command::new(ytdlp)
        .args(["--flat-playlist", "--dump-json", "--no-warnings", url])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| anyhow!("failed to run yt-dlp: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("yt-dlp playlist probe failed: {}", stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut entries = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let json: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let id = json.get("id").and_then(|v| v.as_str()).unwrap_or("");
        if id.is_empty() {
            continue;
        }

        let title = json
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        let entry_url = json
            .get("url")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", id));

        entries.push(PlaylistEntry { title, url: entry_url });
    }

    Ok(entries)
}

/// Video-capable rows of the format table from a `video_info` probe.
pub fn parse_formats(json: &serde_json::Value) -> Vec<FormatInfo> {
    let formats = match json.get("formats").and_then(|v| v.as_array()) {
        Some(f) => f,
        None => return Vec::new(),
    };

    let mut result = Vec::new();
    for f in formats {
        let format_id = match f.get("format_id").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => continue,
        };

        let vcodec = f.get("vcodec").and_then(|v| v.as_str()).unwrap_or("none");
        if vcodec == "none" {
            continue;
        }

        let ext = f
            .get("ext")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let format_note = f
            .get("format_note")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let filesize = f
            .get("filesize")
            .or_else(|| f.get("filesize_approx"))
            .and_then(|v| v.as_u64());

        result.push(FormatInfo {
            format_id,
            ext,
            format_note,
            filesize,
        });
    }

    result
}

/// Download one entry with a fixed output stem; the engine picks the
/// container extension via `%(ext)s`.
pub async fn download_entry(
    ytdlp: &Path,
    url: &str,
    format: &str,
    output_template: &Path,
    label: &str,
) -> anyhow::Result<()> {
    let template = output_template.to_string_lossy().to_string();

    let mut child = tokio::process::Command::new(ytdlp)
        .args([
            "-f",
            format,
            "--no-playlist",
            "--no-warnings",
            "--newline",
            "--progress-template",
            "download:%(progress._percent_str)s",
            "-o",
            &template,
            url,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow!("failed to start yt-dlp: {}", e))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("yt-dlp stdout unavailable"))?;
    let mut lines = BufReader::new(stdout).lines();

    let bar = progress::percent_bar(label);
    let line_reader = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                if let Some(pct) = parse_progress_line(&line) {
                    bar.set_position(pct.clamp(0.0, 100.0) as u64);
                }
            }
        })
    };

    let status = child
        .wait()
        .await
        .map_err(|e| anyhow!("yt-dlp process failed: {}", e))?;

    let _ = line_reader.await;

    if !status.success() {
        bar.abandon();
        return Err(anyhow!("yt-dlp exited with {}", status));
    }

    bar.finish();
    Ok(())
}

fn parse_progress_line(line: &str) -> Option<f64> {
    let line = line.trim();
    let pct_str = if let Some(rest) = line.strip_prefix("download:") {
        rest.trim().trim_end_matches('%')
    } else if line.ends_with('%') {
        line.trim_end_matches('%').split_whitespace().last()?
    } else {
        return None;
    };

    pct_str.trim().parse::<f64>().ok()
}
