//! Capability tier value object

use serde::{Deserialize, Serialize};

/// Capability level requested for a unit of work (Value Object).
///
/// The orchestration core treats this as an opaque routing hint: executors
/// may back each tier with a different model, binary, or endpoint.
/// Coordinator-level work (synthesis, summarization of independent
/// analyses) is routed to [`CapabilityTier::Coordinator`]; delegated and
/// voting work runs at [`CapabilityTier::Worker`].
///
/// # Example
///
/// ```
/// use swarm_domain::CapabilityTier;
///
/// let tier = CapabilityTier::default();
/// assert_eq!(tier, CapabilityTier::Worker);
/// assert_eq!("coordinator".parse::<CapabilityTier>().unwrap(), CapabilityTier::Coordinator);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityTier {
    /// Standard tier for delegated and voting work
    #[default]
    Worker,
    /// Higher-capability tier for synthesis and coordination
    Coordinator,
}

impl CapabilityTier {
    /// Get the string identifier for this tier
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityTier::Worker => "worker",
            CapabilityTier::Coordinator => "coordinator",
        }
    }
}

impl std::fmt::Display for CapabilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CapabilityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "worker" => Ok(CapabilityTier::Worker),
            "coordinator" => Ok(CapabilityTier::Coordinator),
            other => Err(format!("Unknown capability tier: {}", other)),
        }
    }
}
