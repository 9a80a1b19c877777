/// Whether `url` is an absolute `http`/`https` URL, i.e. something the
/// synthesis API (or this relay) can fetch. Relay-local paths such as
/// `/uploads/x.png` and any other scheme are not.
pub fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        && !host.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_http_urls() {
        assert!(is_http_url("https://bucket.oss-cn-beijing.aliyuncs.com/a.png"));
        assert!(is_http_url("HTTP://example.com"));
        assert!(is_http_url("  http://127.0.0.1:8080/x.mp4?sig=1 "));
    }

    #[test]
    fn rejects_local_and_other_schemes() {
        assert!(!is_http_url("/uploads/abc_a.png"));
        assert!(!is_http_url("uploads/abc_a.png"));
        assert!(!is_http_url("file:///etc/passwd"));
        assert!(!is_http_url("ftp://example.com/a.mp4"));
        assert!(!is_http_url("https:///nohost"));
        assert!(!is_http_url(""));
    }
}
