//! One alarm in, one batched inventory write out.
//!
//! The dispatcher owns the full invocation pipeline: decode the alarm,
//! route on the severity phrase, resolve the switch element, derive the
//! peer device, build the snapshot, rebalance, persist. All per-run state
//! is threaded through explicitly; nothing survives the invocation.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::alarm::{AlarmAction, AlarmEvent};
use crate::inventory::Inventory;
use crate::peer::extract_peer_name;
use crate::rebalance::{base_name_token, escalate, recover, RebalancePolicy};
use crate::snapshot::{build_snapshot, CostBound, CostSnapshotEntry};

/// One resource cost mutation, for the invocation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostUpdate {
    pub resource_name: String,
    pub old_cost: i64,
    pub new_cost: i64,
}

/// How the invocation ended. Everything here is a normal outcome;
/// fatal conditions surface as errors instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Costs rebalanced and persisted.
    Updated,
    /// Costs rebalanced but not persisted.
    DryRun,
    /// Severity text carried neither recognized phrase.
    UnrecognizedSeverity,
    /// Display key had no interface descriptor segment.
    UnroutableDisplayKey,
    /// No peer device name in the descriptor; edge-facing link.
    NoPeer,
    /// No link resource toward the peer had a usable cost.
    EmptySnapshot,
    /// No resource name matched the alarmed interface.
    NoMatchingTarget,
}

/// Report of one run, rendered for the host scheduler's logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub received_at: DateTime<Utc>,
    pub disposition: Disposition,
    pub action: Option<AlarmAction>,
    pub element: Option<String>,
    pub peer: Option<String>,
    pub updates: Vec<CostUpdate>,
}

impl InvocationOutcome {
    fn no_op(disposition: Disposition, action: Option<AlarmAction>) -> Self {
        Self {
            received_at: Utc::now(),
            disposition,
            action,
            element: None,
            peer: None,
            updates: Vec::new(),
        }
    }
}

/// Consumes one raw alarm record end to end.
///
/// Fatal: malformed record, unknown switch element, unsupported
/// connector, inventory transport failures. Everything else is a logged
/// no-op that leaves the inventory untouched.
pub async fn handle_alarm(
    inventory: &dyn Inventory,
    policy: &RebalancePolicy,
    raw_record: &str,
    dry_run: bool,
) -> Result<InvocationOutcome> {
    let event = AlarmEvent::parse(raw_record).context("failed decoding alarm record")?;

    let Some(action) = AlarmAction::from_severity_text(&event.severity_text) else {
        debug!(severity = %event.severity_text, "severity carries no recognized phrase");
        return Ok(InvocationOutcome::no_op(
            Disposition::UnrecognizedSeverity,
            None,
        ));
    };

    let Some((element_name, descriptor)) = event.display_key_parts() else {
        info!(display_key = %event.display_key, "display key has no interface descriptor");
        return Ok(InvocationOutcome::no_op(
            Disposition::UnroutableDisplayKey,
            Some(action),
        ));
    };

    let Some(element) = inventory
        .find_element(element_name)
        .await
        .with_context(|| format!("failed resolving switch element: {element_name}"))?
    else {
        bail!("switch element not found: {element_name}");
    };

    let Some(peer) = extract_peer_name(descriptor) else {
        info!(
            display_key = %event.display_key,
            "no peer device name in descriptor; edge device, no cost update needed"
        );
        let mut outcome = InvocationOutcome::no_op(Disposition::NoPeer, Some(action));
        outcome.element = Some(element.name);
        return Ok(outcome);
    };

    let family = element.connector_family()?;
    let resources = inventory
        .list_link_resources(family.pool_name(), element.domain_id, element.element_id)
        .await
        .with_context(|| format!("failed querying resources for {}", element.name))?;

    let bound = match action {
        AlarmAction::EscalateCost => CostBound::Below,
        AlarmAction::RecoverCost => CostBound::AtOrBelow,
    };
    let snapshot = build_snapshot(resources, &peer, policy.saturation_cost, bound);
    if snapshot.is_empty() {
        info!(peer = %peer, "no link resources found for the peer");
        let mut outcome = InvocationOutcome::no_op(Disposition::EmptySnapshot, Some(action));
        outcome.element = Some(element.name);
        outcome.peer = Some(peer);
        return Ok(outcome);
    }

    let token = base_name_token(&event.display_key);
    let entries = match action {
        AlarmAction::EscalateCost => escalate(snapshot, token, policy),
        AlarmAction::RecoverCost => recover(snapshot, token, policy),
    };
    if entries.is_empty() {
        let mut outcome = InvocationOutcome::no_op(Disposition::NoMatchingTarget, Some(action));
        outcome.element = Some(element.name);
        outcome.peer = Some(peer);
        return Ok(outcome);
    }

    let updates: Vec<CostUpdate> = entries
        .iter()
        .filter(|entry| entry.is_changed())
        .map(|entry| CostUpdate {
            resource_name: entry.resource.name.clone(),
            old_cost: entry.cost,
            new_cost: entry.new_cost,
        })
        .collect();
    for update in &updates {
        info!(
            resource = %update.resource_name,
            old_cost = update.old_cost,
            new_cost = update.new_cost,
            "resource cost updated"
        );
    }

    let disposition = if dry_run {
        Disposition::DryRun
    } else {
        let batch: Vec<_> = entries
            .into_iter()
            .map(CostSnapshotEntry::into_updated_resource)
            .collect();
        inventory
            .upsert_resources(&batch)
            .await
            .context("failed persisting rebalanced resources")?;
        Disposition::Updated
    };

    Ok(InvocationOutcome {
        received_at: Utc::now(),
        disposition,
        action: Some(action),
        element: Some(element.name),
        peer: Some(peer),
        updates,
    })
}
