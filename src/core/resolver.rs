use crate::models::link::LinkRecord;

/// Split one input line into a logical name and a URL.
///
/// A `name:http://…` line splits on the first colon only, so the URL's
/// own scheme colon survives. A bare URL derives its name from the last
/// path segment, query string stripped. Always produces a record;
/// malformed input is absorbed downstream.
pub fn parse_line(line: &str) -> LinkRecord {
    let line = line.trim();

    let (name, url) = match line.split_once(':') {
        Some((name, rest)) if !is_scheme(name) => {
            let name = name.trim();
            let url = rest.trim();
            if name.is_empty() {
                (name_from_url(url), url)
            } else {
                (name, url)
            }
        }
        _ => (name_from_url(line), line),
    };

    LinkRecord {
        name: name.to_string(),
        url: normalize_scheme(url),
    }
}

/// Last path segment of the URL with any query string stripped.
fn name_from_url(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_query)
}

fn is_scheme(prefix: &str) -> bool {
    prefix.eq_ignore_ascii_case("http") || prefix.eq_ignore_ascii_case("https")
}

/// Prefix `https://` onto scheme-less URLs, stripping any leading
/// slashes first.
pub fn normalize_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_colon_only() {
        let record = parse_line("video1:https://youtu.be/abc");
        assert_eq!(record.name, "video1");
        assert_eq!(record.url, "https://youtu.be/abc");
    }

    #[test]
    fn name_with_colon_in_url_path() {
        let record = parse_line("doc:https://example.com/a:b/c.pdf");
        assert_eq!(record.name, "doc");
        assert_eq!(record.url, "https://example.com/a:b/c.pdf");
    }

    #[test]
    fn bare_url_derives_name_from_path() {
        let record = parse_line("https://example.com/files/cat.png");
        assert_eq!(record.name, "cat.png");
        assert_eq!(record.url, "https://example.com/files/cat.png");
    }

    #[test]
    fn query_string_stripped_from_derived_name() {
        let record = parse_line("https://example.com/files/cat.png?token=xyz");
        assert_eq!(record.name, "cat.png");
    }

    #[test]
    fn schemeless_url_gets_https_prefix() {
        let record = parse_line("example.com/video.mp4");
        assert_eq!(record.url, "https://example.com/video.mp4");
    }

    #[test]
    fn leading_slashes_stripped_before_prefixing() {
        assert_eq!(
            normalize_scheme("//cdn.example.com/a.bin"),
            "https://cdn.example.com/a.bin"
        );
    }

    #[test]
    fn http_scheme_preserved() {
        assert_eq!(
            normalize_scheme("http://example.com/cat.png"),
            "http://example.com/cat.png"
        );
    }

    #[test]
    fn empty_name_part_falls_back_to_url_naming() {
        let record = parse_line(":https://example.com/dog.gif");
        assert_eq!(record.name, "dog.gif");
    }

    #[test]
    fn named_schemeless_url() {
        let record = parse_line("backup:example.com/archive.tar.gz");
        assert_eq!(record.name, "backup");
        assert_eq!(record.url, "https://example.com/archive.tar.gz");
    }
}
