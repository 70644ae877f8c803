//! Access tier resolution from the shared-secret allow-list.

use std::collections::HashSet;

use trackmerge::AccessTier;

/// Resolve a caller's tier from the presented secret.
///
/// A missing secret and an unknown secret are indistinguishable; both
/// resolve to the restricted tier. Tiers carry no expiry and no rate
/// limiting.
pub fn resolve_tier(codes: &HashSet<String>, secret: Option<&str>) -> AccessTier {
    match secret {
        Some(code) if codes.contains(code) => AccessTier::Full,
        _ => AccessTier::Restricted,
    }
}
