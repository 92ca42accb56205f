//! Link classification
//!
//! Given a raw href from the base page, resolves it to an absolute URL and
//! decides whether it points inside or outside the base page's host. A
//! per-run visited set guarantees each distinct absolute URL is classified
//! (and later liveness-checked) at most once.

use std::collections::HashSet;
use url::Url;

/// Outcome of classifying one raw href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    /// Host is empty or matches the base page's host
    Internal(String),

    /// Host differs from the base page's host
    External(String),

    /// Unresolvable, empty, or already seen this run
    Skip,
}

/// Classifies a raw href against the base page's URL
///
/// Resolution failures and duplicates map to `Skip`; there is no error path.
/// The authority comparison (host plus effective port) is a case-sensitive
/// exact match, and a link without a host (e.g. a fragment or relative path
/// resolving within the page) counts as internal. Inserts resolved URLs into
/// `visited` as a side effect.
pub fn classify(raw_href: &str, base_url: &Url, visited: &mut HashSet<String>) -> LinkKind {
    let href = raw_href.trim();
    if href.is_empty() {
        return LinkKind::Skip;
    }

    let resolved = match base_url.join(href) {
        Ok(url) => url,
        Err(_) => return LinkKind::Skip,
    };

    let absolute = resolved.to_string();
    if absolute.is_empty() || !visited.insert(absolute.clone()) {
        return LinkKind::Skip;
    }

    match resolved.host_str() {
        None => LinkKind::Internal(absolute),
        Some(host)
            if host == base_url.host_str().unwrap_or("")
                && resolved.port_or_known_default() == base_url.port_or_known_default() =>
        {
            LinkKind::Internal(absolute)
        }
        Some(_) => LinkKind::External(absolute),
    }
}
