//! Cost rebalancing across the links of one peer group.
//!
//! Escalation saturates the alarmed links and re-anchors the rest of the
//! pool around the vacated lowest value; recovery puts a restored link
//! just above the current group minimum so it rejoins path selection
//! without instantly becoming the most preferred path.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::snapshot::CostSnapshotEntry;

/// Tunables of the rebalancing algorithms. Defaults are the values the
/// downstream path-selection control plane expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RebalancePolicy {
    /// Cost that marks a link as de-preferred without withdrawing it.
    pub saturation_cost: i64,
    /// Offset above the group minimum for a recovered link.
    pub recovery_step: i64,
    /// How many alarmed links a single pass may saturate or restore.
    pub max_targets: usize,
}

impl Default for RebalancePolicy {
    fn default() -> Self {
        Self {
            saturation_cost: 100,
            recovery_step: 10,
            max_targets: 2,
        }
    }
}

/// Trims a trailing `.<suffix>` after the last dot of the alarm's
/// interface qualifier. The remainder is the token matched against
/// resource names.
pub fn base_name_token(qualifier: &str) -> &str {
    match qualifier.rfind('.') {
        Some(last_dot) => &qualifier[..last_dot],
        None => qualifier,
    }
}

/// Splits the snapshot into the first up-to-`max_targets` entries whose
/// resource name contains `token` (case-insensitive) and everything else.
/// Both halves keep the snapshot's ascending-cost order.
fn partition_targets(
    snapshot: Vec<CostSnapshotEntry>,
    token: &str,
    max_targets: usize,
) -> (Vec<CostSnapshotEntry>, Vec<CostSnapshotEntry>) {
    let needle = token.to_ascii_lowercase();
    let mut targets = Vec::new();
    let mut remaining = Vec::new();
    for entry in snapshot {
        if targets.len() < max_targets
            && entry.resource.name.to_ascii_lowercase().contains(&needle)
        {
            targets.push(entry);
        } else {
            remaining.push(entry);
        }
    }
    (targets, remaining)
}

/// Escalation pass: the alarmed link is degrading. Saturates the matched
/// targets and shifts the remaining pool down into the vacated range.
///
/// Returns the entries to persist; empty when no resource matches the
/// base token, in which case the inventory is left untouched.
pub fn escalate(
    snapshot: Vec<CostSnapshotEntry>,
    base_token: &str,
    policy: &RebalancePolicy,
) -> Vec<CostSnapshotEntry> {
    let (mut targets, mut remaining) = partition_targets(snapshot, base_token, policy.max_targets);
    if targets.is_empty() {
        info!(base_token, "no target resources match the alarmed link");
        return Vec::new();
    }

    // The cost each target held right before saturation; with two targets
    // the later (higher) one wins, anchoring the cascade.
    let mut previous_value = 0;
    for target in &mut targets {
        previous_value = target.cost;
        target.new_cost = policy.saturation_cost;
    }

    if remaining.is_empty() {
        return targets;
    }

    let next_cost = remaining[0].cost;
    let diff = next_cost - previous_value;
    for entry in &mut remaining {
        entry.new_cost = if entry.cost == next_cost {
            previous_value
        } else {
            previous_value + diff
        };
    }

    targets.extend(remaining);
    targets
}

/// Recovery pass: the alarmed link is back below the threshold. Targets
/// sitting at the saturation value are restored to just above the lowest
/// cost among the other links of the group; targets that were never
/// saturated are left alone.
///
/// Returns the full snapshot for persistence, empty only when the
/// snapshot itself was empty.
pub fn recover(
    snapshot: Vec<CostSnapshotEntry>,
    base_token: &str,
    policy: &RebalancePolicy,
) -> Vec<CostSnapshotEntry> {
    let (mut targets, remaining) = partition_targets(snapshot, base_token, policy.max_targets);
    if targets.is_empty() {
        info!(base_token, "no target resources match the recovered link");
    }

    // Lowest cost among the non-target links; defaults to 0 when the
    // group has no other links, which restores the target to bare
    // recovery_step. Preserved source behavior, not an intended design.
    let other_minimum = remaining.first().map(|entry| entry.cost).unwrap_or(0);

    for target in &mut targets {
        if target.cost == policy.saturation_cost {
            target.new_cost = if other_minimum < policy.saturation_cost {
                other_minimum + policy.recovery_step
            } else {
                policy.recovery_step
            };
        }
    }

    targets.extend(remaining);
    targets
}
