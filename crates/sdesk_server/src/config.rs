use std::env;
use std::fs;
use std::path::PathBuf;

use sdesk_core::error::AppError;
use sdesk_core::policy::PriorityPolicy;

/// Server configuration: defaults overridable through `SDESK_*` environment
/// variables, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    /// Optional JSON document overriding the default SLA policy.
    pub policy_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            db_path: PathBuf::from("sdesk.sqlite"),
            policy_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = env::var("SDESK_BIND") {
            if !addr.trim().is_empty() {
                config.bind_addr = addr;
            }
        }
        if let Ok(path) = env::var("SDESK_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = PathBuf::from(path);
            }
        }
        if let Ok(path) = env::var("SDESK_POLICY_PATH") {
            if !path.trim().is_empty() {
                config.policy_path = Some(PathBuf::from(path));
            }
        }
        config
    }

    /// Load the SLA policy: file overrides when configured, defaults otherwise.
    pub fn load_policy(&self) -> Result<PriorityPolicy, AppError> {
        match &self.policy_path {
            None => Ok(PriorityPolicy::default()),
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    AppError::new("CONFIG_READ_FAILED", "Failed to read SLA policy file")
                        .with_details(format!("path={}; err={e}", path.display()))
                })?;
                PriorityPolicy::from_json(&text)
            }
        }
    }
}
