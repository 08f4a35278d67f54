//! Cache Key Module
//!
//! Builds cache keys for API requests and holds the per-resource TTL table.

use std::time::Duration;

// == Resource TTLs ==
/// TTL used for resources missing from the table below.
pub const DEFAULT_RESOURCE_TTL: Duration = Duration::from_secs(300);

/// Per-resource cache lifetimes, in seconds.
const RESOURCE_TTLS: &[(&str, u64)] = &[
    ("categories", 600),
    ("formations", 180),
    ("rendezvous", 60),
];

/// Returns how long listings of `resource` may be served from cache.
pub fn ttl_for_resource(resource: &str) -> Duration {
    RESOURCE_TTLS
        .iter()
        .find(|(name, _)| *name == resource)
        .map(|(_, secs)| Duration::from_secs(*secs))
        .unwrap_or(DEFAULT_RESOURCE_TTL)
}

// == Cache Key ==
/// Builds a deterministic cache key from an endpoint and its parameters.
///
/// Parameters are sorted by name (then value) before being joined, so the
/// same logical request always yields the same key whatever order the
/// parameters arrived in. Without parameters the key is the endpoint itself;
/// otherwise it is `endpoint?a=1&b=2`.
pub fn cache_key<I, K, V>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    if pairs.is_empty() {
        return endpoint.to_string();
    }

    pairs.sort_by(|(ka, va), (kb, vb)| {
        ka.as_ref()
            .cmp(kb.as_ref())
            .then_with(|| va.as_ref().cmp(vb.as_ref()))
    });

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", endpoint, query)
}
