// ABOUTME: Data exchanged with the remote Spring service.
// ABOUTME: Includes the service tier classification that drives deployment branching.

use serde::Serialize;
use std::fmt;

use crate::types::{SpringResourceId, UploadReference};

/// Name the remote service reports for its Enterprise tier.
pub const ENTERPRISE_TIER: &str = "Enterprise";

/// Non-Enterprise tier names the remote service is known to report.
pub const STANDARD_TIERS: &[&str] = &["Basic", "Standard", "StandardGen2"];

/// Address of one Spring service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub subscription_id: String,
    pub resource_group: String,
    pub resource_name: String,
}

impl InstanceRef {
    pub fn resource_id(&self) -> SpringResourceId {
        SpringResourceId::new(
            &self.subscription_id,
            &self.resource_group,
            &self.resource_name,
        )
    }
}

/// Capability tier of a service instance.
///
/// Only Enterprise changes the deployment flow; any other name, including
/// ones this tool has never seen, is treated as `Standard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Tier {
    Enterprise,
    Standard(String),
}

impl Tier {
    pub fn from_name(name: &str) -> Self {
        if name == ENTERPRISE_TIER {
            Tier::Enterprise
        } else {
            Tier::Standard(name.to_string())
        }
    }

    pub fn requires_build(&self) -> bool {
        matches!(self, Tier::Enterprise)
    }

    /// False for a tier name outside the known set; it still deploys as Standard.
    pub fn is_recognized(&self) -> bool {
        match self {
            Tier::Enterprise => true,
            Tier::Standard(name) => STANDARD_TIERS.contains(&name.as_str()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tier::Enterprise => ENTERPRISE_TIER,
            Tier::Standard(name) => name,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.name().to_string()
    }
}

/// An existing app deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpringDeployment {
    pub name: String,
    pub provisioning_state: Option<String>,
}

/// Parameters of a build submitted to the build service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_service: String,
    pub agent_pool: String,
    pub builder: String,
    pub build_name: String,
    pub jvm_version: String,
    pub relative_path: UploadReference,
}

/// Settled outcome of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub name: String,
    pub provisioning_state: String,
}

/// App properties relevant to deployment output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppProperties {
    pub urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enterprise_is_recognized_exactly() {
        assert_eq!(Tier::from_name("Enterprise"), Tier::Enterprise);
        assert!(Tier::from_name("Enterprise").requires_build());
    }

    #[test]
    fn unknown_tiers_fall_back_to_standard() {
        for name in ["Standard", "Basic", "enterprise", "StandardGen2", ""] {
            let tier = Tier::from_name(name);
            assert_eq!(tier, Tier::Standard(name.to_string()));
            assert!(!tier.requires_build());
            assert_eq!(tier.name(), name);
        }
    }

    #[test]
    fn unfamiliar_tier_names_are_flagged() {
        assert!(Tier::Enterprise.is_recognized());
        assert!(Tier::from_name("StandardGen2").is_recognized());
        assert!(!Tier::from_name("enterprise").is_recognized());
        assert!(!Tier::from_name("Premium").is_recognized());
    }
}
