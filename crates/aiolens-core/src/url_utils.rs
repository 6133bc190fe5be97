use url::Url;

/// Prefix `https://` when the target has no http(s) scheme.
pub fn normalize_target(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Registrable domain of a URL's host (`blog.example.co.uk` -> `example.co.uk`),
/// resolved against the public suffix list.
///
/// Returns `None` for URLs without a host (`mailto:`, `tel:`, unparsable).
pub fn registrable_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return None;
    }
    if url.host().is_some_and(|h| !matches!(h, url::Host::Domain(_))) {
        return Some(host);
    }

    // Hosts that are themselves a public suffix, or single labels such as
    // `localhost`, have no registrable part and are compared whole.
    let domain = psl::domain_str(&host).map(str::to_string).unwrap_or(host);
    Some(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(input: &str) -> Option<String> {
        registrable_domain(&Url::parse(input).unwrap())
    }

    #[test]
    fn adds_https_scheme_when_missing() {
        assert_eq!(normalize_target("example.com/page"), "https://example.com/page");
        assert_eq!(normalize_target(" http://example.com "), "http://example.com");
        assert_eq!(normalize_target("https://example.com"), "https://example.com");
    }

    #[test]
    fn strips_subdomains() {
        assert_eq!(domain("https://www.example.com/a").as_deref(), Some("example.com"));
        assert_eq!(domain("https://blog.shop.example.com").as_deref(), Some("example.com"));
        assert_eq!(domain("https://example.com").as_deref(), Some("example.com"));
    }

    #[test]
    fn keeps_two_level_public_suffixes() {
        assert_eq!(domain("https://news.example.co.uk").as_deref(), Some("example.co.uk"));
        assert_eq!(domain("https://www.example.co.jp").as_deref(), Some("example.co.jp"));
    }

    #[test]
    fn japanese_second_level_suffixes_separate_sites() {
        let school_a = domain("https://www.school-a.ed.jp/");
        let school_b = domain("https://www.school-b.ed.jp/");
        assert_eq!(school_a.as_deref(), Some("school-a.ed.jp"));
        assert_eq!(school_b.as_deref(), Some("school-b.ed.jp"));
        assert_ne!(school_a, school_b);
        assert_eq!(domain("https://www.city.lg.jp/").as_deref(), Some("city.lg.jp"));
        assert_eq!(domain("https://kyoto.gr.jp/").as_deref(), Some("kyoto.gr.jp"));
    }

    #[test]
    fn hosts_without_registrable_part_are_kept_whole() {
        assert_eq!(domain("http://localhost:3000/").as_deref(), Some("localhost"));
    }

    #[test]
    fn hostless_urls_have_no_domain() {
        assert_eq!(domain("mailto:someone@example.com"), None);
        assert_eq!(domain("tel:+15551234"), None);
    }

    #[test]
    fn ip_hosts_are_kept_whole() {
        assert_eq!(domain("http://127.0.0.1:8080/").as_deref(), Some("127.0.0.1"));
    }
}
