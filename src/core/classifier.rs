use crate::models::link::LinkKind;

/// Decide how a URL is fetched. Expects a scheme-normalized URL;
/// anything that does not parse or is not a YouTube host is handled by
/// the generic downloader, which surfaces the real error.
pub fn classify(url_str: &str) -> LinkKind {
    let parsed = match url::Url::parse(url_str) {
        Ok(u) => u,
        Err(_) => return LinkKind::Generic,
    };

    if !is_youtube_host(&parsed) {
        return LinkKind::Generic;
    }

    if is_playlist(&parsed) {
        LinkKind::YouTubePlaylist
    } else {
        LinkKind::YouTubeSingle
    }
}

fn is_youtube_host(parsed: &url::Url) -> bool {
    match parsed.host_str() {
        Some(host) => {
            let host = host.to_lowercase();
            host == "youtube.com"
                || host.ends_with(".youtube.com")
                || host == "youtu.be"
                || host == "youtube-nocookie.com"
                || host.ends_with(".youtube-nocookie.com")
        }
        None => false,
    }
}

fn is_playlist(parsed: &url::Url) -> bool {
    if parsed.path().starts_with("/playlist") {
        return true;
    }
    parsed.query_pairs().any(|(k, _)| k == "list")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_url_is_generic() {
        assert_eq!(classify("https://example.com/cat.png"), LinkKind::Generic);
    }

    #[test]
    fn watch_url_is_single() {
        assert_eq!(
            classify("https://www.youtube.com/watch?v=abc123"),
            LinkKind::YouTubeSingle
        );
    }

    #[test]
    fn short_url_is_single() {
        assert_eq!(classify("https://youtu.be/abc123"), LinkKind::YouTubeSingle);
    }

    #[test]
    fn list_query_marks_playlist() {
        assert_eq!(
            classify("https://www.youtube.com/watch?v=abc123&list=PLxyz"),
            LinkKind::YouTubePlaylist
        );
    }

    #[test]
    fn playlist_path_marks_playlist() {
        assert_eq!(
            classify("https://www.youtube.com/playlist?list=PLxyz"),
            LinkKind::YouTubePlaylist
        );
    }

    #[test]
    fn nocookie_host_is_youtube() {
        assert_eq!(
            classify("https://www.youtube-nocookie.com/embed/abc123"),
            LinkKind::YouTubeSingle
        );
    }

    #[test]
    fn lookalike_host_is_generic() {
        assert_eq!(
            classify("https://notyoutube.com/watch?v=abc123"),
            LinkKind::Generic
        );
        assert_eq!(
            classify("https://myyoutu.be.example.com/x"),
            LinkKind::Generic
        );
    }

    #[test]
    fn unparseable_url_is_generic() {
        assert_eq!(classify("not a url at all"), LinkKind::Generic);
    }
}
