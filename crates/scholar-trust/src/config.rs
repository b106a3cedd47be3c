//! Deployment configuration.
//!
//! Defaults suit an in-memory deployment. Override via environment variables,
//! a YAML document, or explicit construction.

use serde::{Deserialize, Serialize};

use scholar_core::{BlockHeight, Principal, ValidationError};

/// Default custody account for escrowed funds.
pub const DEFAULT_CUSTODY: &str = "scholar-trust.custody";

/// Static contract metadata returned by `get_contract_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractInfo {
    /// Display name.
    pub name: String,
    /// Semantic version.
    pub version: String,
    /// One-line summary.
    pub description: String,
}

impl Default for ContractInfo {
    fn default() -> Self {
        Self {
            name: "Scholar Trust".to_string(),
            version: "1.0.0".to_string(),
            description: "Milestone-based scholarship fund management system".to_string(),
        }
    }
}

/// Configuration for a [`crate::ScholarTrust`] deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Account holding every pool's escrowed funds. Validated at deploy.
    pub custody: String,
    /// Chain height at deployment.
    pub genesis_height: BlockHeight,
    /// Reported by `get_contract_info`.
    pub metadata: ContractInfo,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            custody: DEFAULT_CUSTODY.to_string(),
            genesis_height: BlockHeight::GENESIS,
            metadata: ContractInfo::default(),
        }
    }
}

impl TrustConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SCHOLAR_TRUST_CUSTODY` (default: `scholar-trust.custody`)
    /// - `SCHOLAR_TRUST_GENESIS_HEIGHT` (default: 0)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVar`] if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(custody) = lookup("SCHOLAR_TRUST_CUSTODY") {
            Principal::new(custody.as_str()).map_err(|e| ConfigError::InvalidVar {
                var: "SCHOLAR_TRUST_CUSTODY".to_string(),
                reason: e.to_string(),
            })?;
            config.custody = custody;
        }
        if let Some(raw) = lookup("SCHOLAR_TRUST_GENESIS_HEIGHT") {
            let height: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    var: "SCHOLAR_TRUST_GENESIS_HEIGHT".to_string(),
                    reason: e.to_string(),
                }
            })?;
            config.genesis_height = BlockHeight::new(height);
        }
        Ok(config)
    }

    /// Parse configuration from YAML. Absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the document does not parse.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolve the custody account, checking it is distinct from `owner`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidCustody`] if `custody` is not a valid principal.
    /// - [`ConfigError::CustodyIsOwner`] if it names the owner.
    pub fn custody_for(&self, owner: &Principal) -> Result<Principal, ConfigError> {
        let custody = Principal::new(self.custody.as_str())?;
        if custody == *owner {
            return Err(ConfigError::CustodyIsOwner { custody });
        }
        Ok(custody)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but malformed.
    #[error("invalid value for {var}: {reason}")]
    InvalidVar {
        /// The variable name.
        var: String,
        /// Why its value was rejected.
        reason: String,
    },
    /// The YAML document did not parse.
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The custody account is not a valid principal.
    #[error("invalid custody account: {0}")]
    InvalidCustody(#[from] ValidationError),
    /// The custody account names the owner.
    #[error("custody account {custody} must differ from the owner")]
    CustodyIsOwner {
        /// The configured custody account.
        custody: Principal,
    },
}
