use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Containers yt-dlp is expected to produce. The engine picks the real
/// extension, so final-path recovery and stem collision checks probe
/// exactly this set.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv"];

/// Clean a remote title into a usable path component: NFC-normalize,
/// collapse whitespace, strip filesystem-hostile characters.
pub fn sanitize_component(name: &str) -> String {
    let name: String = name.nfc().collect();
    let name = name.trim().replace(['\t', '\n'], "");
    let name = WS_RE.replace_all(&name, " ");
    let name = name.trim_end_matches([' ', '-', '.', ';']);
    let name = sanitize_filename::sanitize(name);
    name.trim().to_string()
}

/// Append an extension guessed from the content type when the name has
/// none. A name that already carries an extension is left alone, and an
/// unmapped content type leaves the name unchanged.
pub fn ensure_extension(name: &str, content_type: &str) -> String {
    if Path::new(name).extension().is_some() {
        return name.to_string();
    }
    match extension_for(content_type) {
        Some(ext) => format!("{}.{}", name, ext),
        None => name.to_string(),
    }
}

/// Map a content-type essence (anything after `;` ignored) to a file
/// extension. Deliberately finite; unknown types get no extension.
fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();

    let ext = match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/x-matroska" => "mkv",
        "video/quicktime" => "mov",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/mp4" => "m4a",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        "application/gzip" => "gz",
        "application/json" => "json",
        "text/plain" => "txt",
        "text/html" => "html",
        "text/csv" => "csv",
        _ => return None,
    };
    Some(ext)
}

/// Counter-suffix a filename until it no longer collides with an entry
/// in `dir`: `a.txt` -> `a(1).txt` -> `a(2).txt` …  Pure over the
/// directory listing at call time; the pipeline is single-threaded so
/// no writer can race the check.
pub fn unique_in_dir(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }

    let (base, ext) = split_extension(filename);
    let mut counter = 1;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{}({}).{}", base, counter, ext),
            None => format!("{}({})", base, counter),
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Collision avoidance for a stem whose final extension is not known in
/// advance: the stem is free only when none of the candidate
/// extensions exists for it in `dir`.
pub fn unique_stem(dir: &Path, stem: &str, exts: &[&str]) -> String {
    let taken = |s: &str| exts.iter().any(|ext| dir.join(format!("{}.{}", s, ext)).exists());

    if !taken(stem) {
        return stem.to_string();
    }

    let mut counter = 1;
    loop {
        let candidate = format!("{}({})", stem, counter);
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn split_extension(filename: &str) -> (&str, Option<&str>) {
    match filename.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (filename, None),
    }
}
