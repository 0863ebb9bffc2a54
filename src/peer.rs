//! Peer device name extraction from free-text interface descriptions.
//!
//! Interface descriptors follow no single grammar. Observed shapes:
//! `Ethernet1/27/SPINE MM-HE-CS64-SPINE1-Eth1/6 10`,
//! `Ethernet29/1 : LEAF SX-266-AS06-LEAF2-Et50/1 10`,
//! `Ethernet1/1/p2p to NX93180-SX-LEAF-01-eth1/49`.
//! Extraction runs an ordered chain of matchers; the first success wins.
//! No match is a valid outcome: edge-facing interfaces have no peer
//! switch and require no cost update.

use once_cell::sync::Lazy;
use regex::Regex;

/// One extraction strategy. Returns the canonical peer token when the
/// descriptor fits this matcher's shape.
pub trait PeerMatcher: Send + Sync {
    fn try_extract(&self, descriptor: &str) -> Option<String>;
}

/// Primary rule: a `<PREFIX>-LEAF<N>`/`<PREFIX>-SPINE<N>` style token
/// adjacent to a LEAF/SPINE role marker, following the word `to`, or at
/// the start of the descriptor.
struct RolePatternMatcher;

static ROLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:LEAF|SPINE)[^ ]*\s+|^|to\s+)([A-Z0-9\-]+-(?:LEAF\d+|SPINE\d+|LEAF-\d+|SPINE-\d+|LEAF|SPINE))\b",
    )
    .expect("invalid role pattern")
});

impl PeerMatcher for RolePatternMatcher {
    fn try_extract(&self, descriptor: &str) -> Option<String> {
        ROLE_PATTERN
            .captures(descriptor)
            .map(|caps| caps[1].to_string())
    }
}

/// Fallback rule: text after `to` up to a trailing `-eth` marker or the
/// end of the descriptor. Mainly point-to-point Cisco lab naming, e.g.
/// `p2p to C9336-eth1/1`.
struct TrailingLinkMatcher;

static TRAILING_BEFORE_ETH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)to\s+([A-Za-z0-9\- ]+?)\s*-\s*eth").expect("invalid trailing pattern")
});

static TRAILING_TO_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)to\s+([A-Za-z0-9\- ]+?)\s*$").expect("invalid trailing pattern")
});

impl PeerMatcher for TrailingLinkMatcher {
    fn try_extract(&self, descriptor: &str) -> Option<String> {
        TRAILING_BEFORE_ETH
            .captures(descriptor)
            .or_else(|| TRAILING_TO_END.captures(descriptor))
            .map(|caps| caps[1].trim().to_string())
    }
}

static MATCHERS: Lazy<Vec<Box<dyn PeerMatcher>>> =
    Lazy::new(|| vec![Box::new(RolePatternMatcher), Box::new(TrailingLinkMatcher)]);

/// Derives the canonical peer device name from an interface descriptor.
/// `None` means no peer could be identified; callers log and skip the
/// cost update.
pub fn extract_peer_name(descriptor: &str) -> Option<String> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher.try_extract(descriptor))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::extract_peer_name;

    #[test]
    fn extracts_spine_peer_after_role_marker() {
        assert_eq!(
            extract_peer_name("Ethernet1/27/SPINE MM-HE-CS64-SPINE1-Eth1/6 10").as_deref(),
            Some("MM-HE-CS64-SPINE1")
        );
    }

    #[test]
    fn extracts_hyphenated_leaf_peer_with_colon_separator() {
        assert_eq!(
            extract_peer_name("Ethernet29/1 : LEAF SX-266-AS06-LEAF2-Et50/1 10").as_deref(),
            Some("SX-266-AS06-LEAF2")
        );
    }

    #[test]
    fn trailing_utilization_token_is_not_absorbed() {
        let peer = extract_peer_name("Ethernet1/6/LEAF MM-HE-CS36-LEAF1-Eth1/27 10")
            .expect("missing peer");
        assert_eq!(peer, "MM-HE-CS36-LEAF1");
        assert!(!peer.contains(' '));
    }

    #[test]
    fn fallback_strips_trailing_eth_marker() {
        assert_eq!(
            extract_peer_name("Ethernet1/1/p2p to NX93180-SX-LEAF-01-eth1/49").as_deref(),
            Some("NX93180-SX-LEAF-01")
        );
    }

    #[test]
    fn fallback_handles_plain_p2p_descriptor() {
        assert_eq!(
            extract_peer_name("Ethernet1/49/p2p to C9336-eth1/1").as_deref(),
            Some("C9336")
        );
    }

    #[test]
    fn edge_facing_descriptor_yields_none() {
        assert_eq!(extract_peer_name("Ethernet1/3/uplink customer port"), None);
        assert_eq!(extract_peer_name(""), None);
    }
}
