pub mod http;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the resource property holding the link cost.
pub const COST_PROPERTY: &str = "Cost";

/// A switch element resolved from the inventory platform. The
/// (domain, element) pair scopes resource queries; the connector string
/// selects the resource pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchElement {
    pub name: String,
    pub connector: String,
    pub domain_id: u32,
    pub element_id: u32,
}

impl SwitchElement {
    pub fn connector_family(&self) -> Result<ConnectorFamily, ConnectorParseError> {
        self.connector.parse()
    }
}

/// The switch driver families with a known resource pool. Anything else
/// cannot be rebalanced and aborts the run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorFamily {
    AristaManager,
    CiscoNexus,
}

impl ConnectorFamily {
    pub fn pool_name(&self) -> &'static str {
        match self {
            Self::AristaManager => "Arista Network",
            Self::CiscoNexus => "Cisco Network",
        }
    }
}

impl Display for ConnectorFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::AristaManager => "Arista Manager",
            Self::CiscoNexus => "CISCO Nexus",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unsupported switch connector: {0}")]
pub struct ConnectorParseError(pub String);

impl FromStr for ConnectorFamily {
    type Err = ConnectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Arista Manager" => Ok(Self::AristaManager),
            "CISCO Nexus" => Ok(Self::CiscoNexus),
            other => Err(ConnectorParseError(other.to_string())),
        }
    }
}

/// One physical link/interface record owned by the inventory platform.
/// The core only ever holds an in-memory copy during a single invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl LinkResource {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set_property(&mut self, name: &str, value: String) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn cost_value(&self) -> Option<&str> {
        self.property(COST_PROPERTY)
    }
}

/// The external inventory platform. Sole owner of persisted state; the
/// upsert is treated as all-or-nothing.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Resolves a switch element by name. `None` is fatal for the caller.
    async fn find_element(&self, name: &str) -> Result<Option<SwitchElement>>;

    /// Returns all link resources in a pool scoped to one element.
    async fn list_link_resources(
        &self,
        pool: &str,
        domain_id: u32,
        element_id: u32,
    ) -> Result<Vec<LinkResource>>;

    /// Persists a batch of mutated resources.
    async fn upsert_resources(&self, resources: &[LinkResource]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::ConnectorFamily;

    #[test]
    fn maps_connectors_to_pools() {
        let arista: ConnectorFamily = "Arista Manager".parse().expect("failed to parse");
        assert_eq!(arista.pool_name(), "Arista Network");
        let cisco: ConnectorFamily = "CISCO Nexus".parse().expect("failed to parse");
        assert_eq!(cisco.pool_name(), "Cisco Network");
    }

    #[test]
    fn rejects_unknown_connector() {
        let err = "Juniper JunOS".parse::<ConnectorFamily>().unwrap_err();
        assert!(err.to_string().contains("Juniper JunOS"));
    }
}
