/// Relevance of a link's hostname to the caller's target domain, in [0, 1].
///
/// Exact match is the strongest signal; a subdomain relationship in either
/// direction still counts (covers both "mail.example.com" linking to
/// "example.com" and the reverse). Everything else gets a low but non-zero
/// baseline so unmatched links are surfaced, never hidden. An empty target
/// gives every link the same neutral score. Both inputs must already be
/// lowercased.
pub fn match_score(hostname: &str, target_domain: &str) -> f64 {
    if hostname.is_empty() {
        return 0.0;
    }
    if target_domain.is_empty() {
        return 0.5;
    }
    if hostname == target_domain {
        return 1.0;
    }
    if hostname.ends_with(target_domain) {
        return 0.9;
    }
    if target_domain.ends_with(hostname) {
        return 0.8;
    }
    0.4
}

/// Loose containment check backing the "domain match" badge. Deliberately
/// more permissive than [`match_score`]: any hostname containing the target
/// as a substring qualifies.
pub fn is_domain_match(hostname: &str, target_domain: &str) -> bool {
    !target_domain.is_empty() && hostname.contains(target_domain)
}
