//! URL origin and href resolution helpers.

use reqwest::Url;

/// Extracts the scheme+host origin from a URL.
///
/// Given `"https://dealer.example/inventory/new/"`, returns `"https://dealer.example"`.
#[must_use]
pub fn site_origin(url: &str) -> String {
    Url::parse(url).map_or_else(
        |e| {
            tracing::warn!(
                url,
                error = %e,
                "could not parse URL, falling back to string split for origin extraction"
            );
            url.trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Resolves `href` against `base`, dropping any `#fragment`.
///
/// Returns `None` for hrefs that do not resolve to an http(s) URL
/// (`mailto:`, `tel:`, `javascript:`, or unparseable input).
#[must_use]
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut resolved = base.join(href).ok()?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}
