//! Domain comparison helpers.

use url::Url;

/// The last two dot-separated labels of a hostname.
///
/// `www.shop.example.com` and `example.com` both yield `example.com`, and
/// `bbc.co.uk` yields `co.uk`.
#[must_use]
pub fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// Checks if two URLs share a registrable domain. URLs without a host
/// (`mailto:`, `javascript:`) never match.
#[must_use]
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(h1), Some(h2)) => {
            registrable_domain(&h1.to_lowercase()) == registrable_domain(&h2.to_lowercase())
        }
        _ => false,
    }
}
