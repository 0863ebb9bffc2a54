//! Per-invocation snapshot of the link resources destined for one peer.
//!
//! The snapshot is read fresh every run and discarded at the end; the
//! inventory platform stays the sole owner of persisted state.

use serde::{Deserialize, Serialize};

use crate::inventory::{LinkResource, COST_PROPERTY};

/// One link resource paired with its parsed cost and the pending value to
/// write back. `new_cost` starts equal to `cost` and is only moved by the
/// rebalancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSnapshotEntry {
    pub resource: LinkResource,
    pub cost: i64,
    pub new_cost: i64,
}

impl CostSnapshotEntry {
    fn new(resource: LinkResource, cost: i64) -> Self {
        Self {
            resource,
            cost,
            new_cost: cost,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.new_cost != self.cost
    }

    /// Applies the pending cost to the resource's property map and
    /// returns the record ready for the batched upsert.
    pub fn into_updated_resource(mut self) -> LinkResource {
        self.resource
            .set_property(COST_PROPERTY, self.new_cost.to_string());
        self.resource
    }
}

/// Ceiling comparison for snapshot admission: the escalation path only
/// considers links still below saturation, the recovery path also needs
/// the saturated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostBound {
    Below,
    AtOrBelow,
}

impl CostBound {
    fn admits(self, cost: i64, ceiling: i64) -> bool {
        match self {
            Self::Below => cost < ceiling,
            Self::AtOrBelow => cost <= ceiling,
        }
    }
}

/// Parses a string-encoded cost. Missing, empty, non-numeric, and
/// negative values all yield `None`; such resources are excluded from the
/// snapshot rather than treated as cost zero.
pub fn parse_cost(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|cost| *cost >= 0)
}

/// Builds the filtered, ascending-sorted snapshot for one peer.
///
/// Peer matching is case-sensitive substring containment on the resource
/// name, matching the inventory's naming convention. Ties in cost keep
/// the inventory return order (stable sort).
pub fn build_snapshot(
    resources: Vec<LinkResource>,
    peer_name: &str,
    ceiling: i64,
    bound: CostBound,
) -> Vec<CostSnapshotEntry> {
    let mut entries: Vec<CostSnapshotEntry> = resources
        .into_iter()
        .filter(|resource| resource.name.contains(peer_name))
        .filter_map(|resource| {
            let cost = resource.cost_value().and_then(parse_cost)?;
            bound
                .admits(cost, ceiling)
                .then(|| CostSnapshotEntry::new(resource, cost))
        })
        .collect();
    entries.sort_by_key(|entry| entry.cost);
    entries
}

#[cfg(test)]
mod tests {
    use super::{build_snapshot, parse_cost, CostBound};
    use crate::inventory::LinkResource;

    fn resource(name: &str, cost: Option<&str>) -> LinkResource {
        let mut properties = std::collections::BTreeMap::new();
        if let Some(cost) = cost {
            properties.insert("Cost".to_string(), cost.to_string());
        }
        LinkResource {
            id: format!("res-{name}"),
            name: name.to_string(),
            properties,
        }
    }

    #[test]
    fn parses_only_non_negative_integers() {
        assert_eq!(parse_cost("30"), Some(30));
        assert_eq!(parse_cost(" 15 "), Some(15));
        assert_eq!(parse_cost(""), None);
        assert_eq!(parse_cost("n/a"), None);
        assert_eq!(parse_cost("-5"), None);
    }

    #[test]
    fn excludes_resources_without_usable_cost() {
        let resources = vec![
            resource("SW-A-SPINE1-eth1", Some("20")),
            resource("SW-A-SPINE1-eth2", None),
            resource("SW-A-SPINE1-eth3", Some("")),
            resource("SW-A-SPINE1-eth4", Some("abc")),
        ];
        let snapshot = build_snapshot(resources, "SPINE1", 100, CostBound::Below);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].cost, 20);
    }

    #[test]
    fn peer_containment_is_case_sensitive() {
        let resources = vec![
            resource("SW-A-SPINE1-eth1", Some("20")),
            resource("sw-a-spine1-eth2", Some("30")),
        ];
        let snapshot = build_snapshot(resources, "SPINE1", 100, CostBound::Below);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].resource.name, "SW-A-SPINE1-eth1");
    }

    #[test]
    fn ceiling_is_strict_for_escalation_and_inclusive_for_recovery() {
        let resources = vec![
            resource("SPINE1-a", Some("100")),
            resource("SPINE1-b", Some("99")),
            resource("SPINE1-c", Some("101")),
        ];
        let below = build_snapshot(resources.clone(), "SPINE1", 100, CostBound::Below);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].cost, 99);

        let at_or_below = build_snapshot(resources, "SPINE1", 100, CostBound::AtOrBelow);
        assert_eq!(at_or_below.len(), 2);
        assert_eq!(at_or_below[0].cost, 99);
        assert_eq!(at_or_below[1].cost, 100);
    }

    #[test]
    fn sorts_ascending_preserving_inventory_order_on_ties() {
        let resources = vec![
            resource("SPINE1-x", Some("30")),
            resource("SPINE1-y", Some("10")),
            resource("SPINE1-z", Some("10")),
        ];
        let snapshot = build_snapshot(resources, "SPINE1", 100, CostBound::Below);
        let names: Vec<&str> = snapshot
            .iter()
            .map(|entry| entry.resource.name.as_str())
            .collect();
        assert_eq!(names, vec!["SPINE1-y", "SPINE1-z", "SPINE1-x"]);
    }
}
